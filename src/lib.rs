//! CourseGraph
//!
//! A teaching-records network engine:
//! - Bipartite faculty–course graphs and their one-mode projections
//! - Centrality metrics (degree, betweenness, closeness, eigenvector)
//! - Deterministic Louvain community detection
//! - Network evolution across year windows
//! - Interdisciplinary faculty detection across departments

pub mod network;
pub mod records;
pub mod report;

use anyhow::Result;
use serde::Deserialize;
use std::path::Path;

use crate::network::AnalysisConfig;

// ============================================================================
// YAML file shape
// ============================================================================

/// Root of the YAML config file. Every section and field is optional.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub records: RecordsYamlConfig,
    pub analysis: AnalysisYamlConfig,
    pub export: ExportYamlConfig,
}

/// Records configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RecordsYamlConfig {
    pub facts_path: String,
}

impl Default for RecordsYamlConfig {
    fn default() -> Self {
        Self {
            facts_path: "data/teaching_facts.json".into(),
        }
    }
}

/// Analysis configuration section (YAML only — [`AnalysisConfig`] carries the
/// resolved values; absent fields fall back to its defaults)
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AnalysisYamlConfig {
    pub eigenvector_tolerance: Option<f64>,
    pub eigenvector_max_iterations: Option<usize>,
    pub louvain_resolution: Option<f64>,
    pub top_faculty: Option<usize>,
    pub window_years: Option<i32>,
    pub parallel_windows: Option<bool>,
}

/// Export configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportYamlConfig {
    pub output_dir: String,
}

impl Default for ExportYamlConfig {
    fn default() -> Self {
        Self {
            output_dir: "exports".into(),
        }
    }
}

// ============================================================================
// Resolved config
// ============================================================================

/// Fully resolved configuration consumed by the CLI and the analyzer.
#[derive(Debug, Clone)]
pub struct Config {
    pub facts_path: String,
    pub output_dir: String,
    pub analysis: AnalysisConfig,
}

impl Config {
    /// Resolve from env vars and defaults alone, skipping the YAML file.
    pub fn from_env() -> Result<Self> {
        Self::from_yaml_and_env(None)
    }

    /// Resolve the configuration: built-in defaults, overlaid by the YAML
    /// file, overlaid by `COURSEGRAPH_*` env vars (highest priority).
    ///
    /// With `yaml_path` unset, `config.yaml` in the working directory is
    /// tried; a missing or unparsable file is not an error.
    pub fn from_yaml_and_env(yaml_path: Option<&Path>) -> Result<Self> {
        let yaml = Self::load_yaml(yaml_path);

        let defaults = AnalysisConfig::default();
        let analysis = AnalysisConfig {
            eigenvector_tolerance: env_override("COURSEGRAPH_EIGENVECTOR_TOLERANCE")
                .or(yaml.analysis.eigenvector_tolerance)
                .unwrap_or(defaults.eigenvector_tolerance),
            eigenvector_max_iterations: env_override("COURSEGRAPH_EIGENVECTOR_MAX_ITERATIONS")
                .or(yaml.analysis.eigenvector_max_iterations)
                .unwrap_or(defaults.eigenvector_max_iterations),
            louvain_resolution: env_override("COURSEGRAPH_LOUVAIN_RESOLUTION")
                .or(yaml.analysis.louvain_resolution)
                .unwrap_or(defaults.louvain_resolution),
            top_faculty: env_override("COURSEGRAPH_TOP_FACULTY")
                .or(yaml.analysis.top_faculty)
                .unwrap_or(defaults.top_faculty),
            window_years: env_override("COURSEGRAPH_WINDOW_YEARS")
                .or(yaml.analysis.window_years)
                .unwrap_or(defaults.window_years),
            parallel_windows: env_override("COURSEGRAPH_PARALLEL_WINDOWS")
                .or(yaml.analysis.parallel_windows)
                .unwrap_or(defaults.parallel_windows),
        };

        Ok(Self {
            facts_path: std::env::var("COURSEGRAPH_FACTS_PATH")
                .unwrap_or(yaml.records.facts_path),
            output_dir: std::env::var("COURSEGRAPH_OUTPUT_DIR").unwrap_or(yaml.export.output_dir),
            analysis,
        })
    }

    /// Read and parse the YAML file; any failure logs and yields defaults.
    fn load_yaml(yaml_path: Option<&Path>) -> YamlConfig {
        let default_path = Path::new("config.yaml");
        let path = yaml_path.unwrap_or(default_path);

        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_yaml::from_str(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                    YamlConfig::default()
                }
            },
            Err(_) => {
                tracing::debug!(
                    "No config file at {}, using env vars / defaults",
                    path.display()
                );
                YamlConfig::default()
            }
        }
    }
}

/// Parse an env var into `T`, returning None when unset or unparseable.
fn env_override<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}

// ============================================================================
// Tests
// ============================================================================
