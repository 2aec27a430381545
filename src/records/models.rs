//! Core record types: teaching facts, year windows, and batch accounting.
//!
//! A teaching fact is one row of the flattened teaching history — one faculty
//! member teaching one course offering in one term. Everything downstream
//! (graph views, metrics, evolution) is derived from slices of these facts.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

// ============================================================================
// Teaching facts
// ============================================================================

/// One validated teaching assignment: a faculty member teaching a course
/// offering in a specific term and year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeachingFact {
    /// Department offering the course (e.g. "MATH")
    pub department_code: String,
    /// Stable numeric identifier of the faculty member
    pub faculty_id: i64,
    /// Display name, "Last, First"
    pub faculty_name: String,
    /// Catalog code of the course (e.g. "MATH 241")
    pub course_code: String,
    /// Catalog title of the course
    pub course_title: String,
    /// Stable numeric identifier of this offering (course + term + year + section)
    pub offering_id: i64,
    /// Term name ("Fall", "Spring", "Summer")
    pub term: String,
    /// Calendar year of the offering
    pub year: i32,
}

/// Deserialization-stage mirror of [`TeachingFact`] where every field is
/// optional. Raw inputs come from joins that can leave holes (an offering
/// with no assigned instructor, a row with no year); [`RawTeachingFact::validate`]
/// decides which rows survive.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawTeachingFact {
    pub department_code: Option<String>,
    pub faculty_id: Option<i64>,
    pub faculty_name: Option<String>,
    pub course_code: Option<String>,
    pub course_title: Option<String>,
    pub offering_id: Option<i64>,
    pub term: Option<String>,
    pub year: Option<i32>,
}

impl RawTeachingFact {
    /// Promote a raw row to a validated fact.
    ///
    /// `faculty_id`, `offering_id`, and `year` are required: they carry node
    /// identity and window placement, and a row missing any of them cannot be
    /// represented in a graph view. Missing descriptive fields (names, titles,
    /// term) degrade to empty strings instead of rejecting the row.
    ///
    /// Returns the name of the first missing required field on failure, so
    /// callers can log what was dropped.
    pub fn validate(self) -> Result<TeachingFact, &'static str> {
        let faculty_id = self.faculty_id.ok_or("faculty_id")?;
        let offering_id = self.offering_id.ok_or("offering_id")?;
        let year = self.year.ok_or("year")?;

        Ok(TeachingFact {
            department_code: self.department_code.unwrap_or_default(),
            faculty_id,
            faculty_name: self.faculty_name.unwrap_or_default(),
            course_code: self.course_code.unwrap_or_default(),
            course_title: self.course_title.unwrap_or_default(),
            offering_id,
            term: self.term.unwrap_or_default(),
            year,
        })
    }
}

// ============================================================================
// Year windows
// ============================================================================

/// Inclusive year bounds selecting which facts participate in a build.
/// `None` on either side leaves that side open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Window {
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
}

impl Window {
    /// Window covering all years.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Closed window `[start, end]`, both inclusive.
    pub fn years(start: i32, end: i32) -> Self {
        Self {
            start_year: Some(start),
            end_year: Some(end),
        }
    }

    pub fn new(start_year: Option<i32>, end_year: Option<i32>) -> Self {
        Self {
            start_year,
            end_year,
        }
    }

    /// True when `year` falls inside the (inclusive) bounds.
    pub fn contains(&self, year: i32) -> bool {
        if let Some(start) = self.start_year {
            if year < start {
                return false;
            }
        }
        if let Some(end) = self.end_year {
            if year > end {
                return false;
            }
        }
        true
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.start_year, self.end_year) {
            (Some(s), Some(e)) => write!(f, "{s}-{e}"),
            (Some(s), None) => write!(f, "{s}-"),
            (None, Some(e)) => write!(f, "-{e}"),
            (None, None) => write!(f, "all"),
        }
    }
}

// ============================================================================
// Batches and summaries
// ============================================================================

/// Facts returned by a record source for one window, with validation
/// accounting. `skipped` counts raw rows the source dropped for missing
/// required fields — surfaced so callers can report data quality.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FactBatch {
    pub facts: Vec<TeachingFact>,
    pub skipped: usize,
}

impl FactBatch {
    pub fn new(facts: Vec<TeachingFact>) -> Self {
        Self { facts, skipped: 0 }
    }
}

/// Aggregate counts over a fact collection, for the `stats` surface.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FactSummary {
    /// Distinct department codes
    pub departments: usize,
    /// Distinct faculty identifiers
    pub faculty: usize,
    /// Distinct catalog course codes
    pub courses: usize,
    /// Distinct offering identifiers
    pub offerings: usize,
    /// Distinct (faculty, offering) assignments
    pub assignments: usize,
    /// Min and max year seen, None when there are no facts
    pub year_range: Option<(i32, i32)>,
}

impl FactSummary {
    pub fn from_facts(facts: &[TeachingFact]) -> Self {
        let mut departments = HashSet::new();
        let mut faculty = HashSet::new();
        let mut courses = HashSet::new();
        let mut offerings = HashSet::new();
        let mut assignments = HashSet::new();
        let mut year_range: Option<(i32, i32)> = None;

        for fact in facts {
            departments.insert(fact.department_code.as_str());
            faculty.insert(fact.faculty_id);
            courses.insert(fact.course_code.as_str());
            offerings.insert(fact.offering_id);
            assignments.insert((fact.faculty_id, fact.offering_id));
            year_range = Some(match year_range {
                Some((lo, hi)) => (lo.min(fact.year), hi.max(fact.year)),
                None => (fact.year, fact.year),
            });
        }

        Self {
            departments: departments.len(),
            faculty: faculty.len(),
            courses: courses.len(),
            offerings: offerings.len(),
            assignments: assignments.len(),
            year_range,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
