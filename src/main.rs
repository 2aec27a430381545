//! CourseGraph - Teaching-Network Analysis CLI
//!
//! Builds course/faculty graph views from teaching records and runs
//! centrality, community, temporal, and interdisciplinary analyses on them.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use coursegraph::network::{
    evolution_windows, graph_export, write_edge_list, write_json, NetworkAnalyzer, ViewKind,
};
use coursegraph::records::{generate_facts, JsonRecordSource, SampleSpec, Window};
use coursegraph::{report, Config};

#[derive(Parser)]
#[command(name = "coursegraph")]
#[command(about = "Course and faculty teaching-network analyzer")]
struct Cli {
    /// Path to a YAML config file (default: ./config.yaml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Teaching facts JSON file (overrides config)
    #[arg(short, long)]
    facts: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one graph view and print the full report
    Analyze {
        /// Graph view: bipartite, faculty, or course
        #[arg(short, long, default_value = "bipartite")]
        view: String,

        /// First year of the window (inclusive)
        #[arg(long)]
        start_year: Option<i32>,

        /// Last year of the window (inclusive)
        #[arg(long)]
        end_year: Option<i32>,
    },

    /// Trace network evolution across consecutive year windows
    Evolution {
        /// First year of the span (default: earliest year in the data)
        #[arg(long)]
        start_year: Option<i32>,

        /// Last year of the span (default: latest year in the data)
        #[arg(long)]
        end_year: Option<i32>,

        /// Window width in years (overrides config)
        #[arg(long)]
        width: Option<i32>,
    },

    /// List faculty teaching in multiple departments
    Interdisciplinary {
        /// How many entries to print
        #[arg(short, long, default_value = "10")]
        top: usize,
    },

    /// Export a graph view as a node/edge-list file
    Export {
        /// Graph view: bipartite, faculty, or course
        #[arg(short, long, default_value = "bipartite")]
        view: String,

        /// First year of the window (inclusive)
        #[arg(long)]
        start_year: Option<i32>,

        /// Last year of the window (inclusive)
        #[arg(long)]
        end_year: Option<i32>,

        /// Output format
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,

        /// Output file (default: <output_dir>/<view>_<window>.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show source statistics
    Stats,

    /// Generate a seeded sample facts file
    Sample {
        /// Output file (default: the configured facts path)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// First year of generated offerings
        #[arg(long, default_value = "2015")]
        start_year: i32,

        /// Last year of generated offerings
        #[arg(long, default_value = "2024")]
        end_year: i32,

        /// Offerings per term
        #[arg(long, default_value = "50")]
        offerings: usize,

        /// RNG seed
        #[arg(long, default_value = "42")]
        seed: u64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    /// Node-link JSON document
    Json,
    /// Line-oriented `source target weight` list
    EdgeList,
}

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,coursegraph=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::from_yaml_and_env(cli.config.as_deref())?;
    if let Some(facts) = cli.facts {
        config.facts_path = facts.to_string_lossy().into_owned();
    }

    match cli.command {
        Commands::Analyze {
            view,
            start_year,
            end_year,
        } => run_analyze(&config, &view, Window::new(start_year, end_year)),
        Commands::Evolution {
            start_year,
            end_year,
            width,
        } => run_evolution(&config, start_year, end_year, width),
        Commands::Interdisciplinary { top } => run_interdisciplinary(&config, top),
        Commands::Export {
            view,
            start_year,
            end_year,
            format,
            output,
        } => run_export(
            &config,
            &view,
            Window::new(start_year, end_year),
            format,
            output,
        ),
        Commands::Stats => run_stats(&config),
        Commands::Sample {
            output,
            start_year,
            end_year,
            offerings,
            seed,
        } => run_sample(&config, output, start_year, end_year, offerings, seed),
    }
}

fn analyzer_from(config: &Config) -> NetworkAnalyzer {
    let source = Arc::new(JsonRecordSource::new(&config.facts_path));
    NetworkAnalyzer::new(source, config.analysis.clone())
}

fn run_analyze(config: &Config, view: &str, window: Window) -> Result<()> {
    let view: ViewKind = view.parse()?;
    let analyzer = analyzer_from(config);

    let source = analyzer.summarize(Window::unbounded())?;
    let analysis = analyzer.analyze(view, window)?;
    // Scan the already-built graph when it is the bipartite one
    let interdisciplinary = match view {
        ViewKind::Bipartite => analyzer.interdisciplinary(Some(&analysis.network))?,
        _ => analyzer.interdisciplinary(None)?,
    };

    let report = report::analysis_report(
        &source,
        &analysis,
        &interdisciplinary,
        config.analysis.top_faculty,
    );
    println!("\n{report}");
    Ok(())
}

fn run_evolution(
    config: &Config,
    start_year: Option<i32>,
    end_year: Option<i32>,
    width: Option<i32>,
) -> Result<()> {
    let analyzer = analyzer_from(config);

    // Fill unspecified bounds from the data's year range
    let stats = analyzer.summarize(Window::unbounded())?;
    let (lo, hi) = match (start_year, end_year, stats.summary.year_range) {
        (Some(lo), Some(hi), _) => (lo, hi),
        (_, _, Some((data_lo, data_hi))) => {
            (start_year.unwrap_or(data_lo), end_year.unwrap_or(data_hi))
        }
        _ => {
            println!("No teaching facts available; nothing to analyze.");
            return Ok(());
        }
    };

    let windows = evolution_windows(lo, hi, width.unwrap_or(config.analysis.window_years));
    let rows = analyzer.evolution(&windows)?;
    println!("\n{}", report::evolution_report(&rows));
    Ok(())
}

fn run_interdisciplinary(config: &Config, top: usize) -> Result<()> {
    let analyzer = analyzer_from(config);
    let found = analyzer.interdisciplinary(None)?;
    println!("\n{}", report::interdisciplinary_report(&found, top));
    Ok(())
}

fn run_export(
    config: &Config,
    view: &str,
    window: Window,
    format: ExportFormat,
    output: Option<PathBuf>,
) -> Result<()> {
    let view: ViewKind = view.parse()?;
    let analyzer = analyzer_from(config);
    let built = analyzer.builder().build(view, window)?;
    let export = graph_export(&built.network, window);

    let path = match output {
        Some(path) => path,
        None => {
            let extension = match format {
                ExportFormat::Json => "json",
                ExportFormat::EdgeList => "edgelist",
            };
            Path::new(&config.output_dir).join(format!("{view}_{window}.{extension}"))
        }
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
        }
    }

    match format {
        ExportFormat::Json => write_json(&export, &path)?,
        ExportFormat::EdgeList => write_edge_list(&export, &path)?,
    }

    println!(
        "Exported {} view ({} nodes, {} edges) to {}",
        export.view,
        export.node_count,
        export.edge_count,
        path.display()
    );
    Ok(())
}

fn run_stats(config: &Config) -> Result<()> {
    let analyzer = analyzer_from(config);
    let stats = analyzer.summarize(Window::unbounded())?;
    println!("\n{}\n", report::stats_report(&stats));
    Ok(())
}

fn run_sample(
    config: &Config,
    output: Option<PathBuf>,
    start_year: i32,
    end_year: i32,
    offerings: usize,
    seed: u64,
) -> Result<()> {
    let spec = SampleSpec {
        start_year,
        end_year,
        offerings_per_term: offerings,
        seed,
    };
    let facts = generate_facts(&spec);

    let path = output.unwrap_or_else(|| PathBuf::from(&config.facts_path));
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
        }
    }

    let file = std::fs::File::create(&path)
        .with_context(|| format!("Failed to create facts file {}", path.display()))?;
    serde_json::to_writer_pretty(std::io::BufWriter::new(file), &facts)
        .with_context(|| format!("Failed to write facts to {}", path.display()))?;

    println!(
        "Generated {} teaching facts ({start_year}-{end_year}, seed {seed}) at {}",
        facts.len(),
        path.display()
    );
    Ok(())
}
