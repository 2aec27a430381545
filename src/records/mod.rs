//! Teaching-fact records: models, sources, and synthetic data

pub mod models;
pub mod sample;
pub mod source;

pub use models::{FactBatch, FactSummary, RawTeachingFact, TeachingFact, Window};
pub use sample::{generate_facts, SampleSpec};
pub use source::{JsonRecordSource, MemoryRecordSource, RecordSource};
