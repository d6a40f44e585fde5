use anyhow::Context;
use backlog_insights::{
    analytics::{AnalysisReport, BacklogStatistics, DEFAULT_TOP_ISSUES},
    config::{Config, EngineConfig, ExportConfig, ObservabilityConfig},
    AppError, CsvExporter, CsvReader, Pipeline,
};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "backlog-insights")]
#[command(version, about = "Cluster and prioritise issues from a backlog CSV export", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cluster and score a backlog export and print the analysis report
    Analyze(AnalyzeArgs),

    /// Print descriptive statistics for a backlog export
    Stats {
        #[arg(value_name = "CSV")]
        input: PathBuf,
    },
}

#[derive(Args)]
struct AnalyzeArgs {
    #[arg(value_name = "CSV")]
    input: PathBuf,

    /// Number of clusters (2-10)
    #[arg(short = 'k', long)]
    clusters: Option<usize>,

    /// Reach (1-100)
    #[arg(long)]
    reach: Option<u32>,

    /// Impact (1-10)
    #[arg(long)]
    impact: Option<u32>,

    /// Confidence percentage (1-100)
    #[arg(long)]
    confidence: Option<u32>,

    /// Maximum TF-IDF vocabulary size
    #[arg(long)]
    max_vocabulary: Option<usize>,

    /// Random seed for clustering
    #[arg(long)]
    seed: Option<u64>,

    /// Number of k-means initialisations
    #[arg(long)]
    n_init: Option<usize>,

    /// Skip the clustering stage
    #[arg(long)]
    no_clustering: bool,

    /// Skip the scoring stage
    #[arg(long)]
    no_scoring: bool,

    /// Write the processed CSV to the export directory
    #[arg(short, long)]
    export: bool,

    /// Export directory
    #[arg(long, value_name = "DIR")]
    export_dir: Option<PathBuf>,

    /// Number of top-scoring issues to list
    #[arg(short = 'n', long, default_value_t = DEFAULT_TOP_ISSUES)]
    top: usize,
}

impl AnalyzeArgs {
    fn apply(&self, engine: &mut EngineConfig, export: &mut ExportConfig) {
        if let Some(k) = self.clusters {
            engine.n_clusters = k;
        }
        if let Some(reach) = self.reach {
            engine.reach = reach;
        }
        if let Some(impact) = self.impact {
            engine.impact = impact;
        }
        if let Some(confidence) = self.confidence {
            engine.confidence = confidence;
        }
        if let Some(max_vocabulary) = self.max_vocabulary {
            engine.max_vocabulary = max_vocabulary;
        }
        if let Some(seed) = self.seed {
            engine.random_seed = seed;
        }
        if let Some(n_init) = self.n_init {
            engine.n_init = n_init;
        }
        if self.no_clustering {
            engine.run_clustering = false;
        }
        if self.no_scoring {
            engine.run_scoring = false;
        }
        if let Some(dir) = &self.export_dir {
            export.directory = dir.clone();
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        eprintln!("Using default configuration");
        Config {
            engine: EngineConfig::default(),
            export: ExportConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    });

    init_tracing(&config.observability);
    tracing::debug!("Starting Backlog Insights v{}", env!("CARGO_PKG_VERSION"));

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            let code = e
                .downcast_ref::<AppError>()
                .map(AppError::exit_code)
                .unwrap_or(1);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

async fn run(cli: Cli, mut config: Config) -> anyhow::Result<()> {
    match cli.command {
        Commands::Analyze(args) => {
            args.apply(&mut config.engine, &mut config.export);

            let records = CsvReader::from_path(&args.input)?;
            let pipeline = Pipeline::new(config.engine.to_pipeline_config())?;
            let output = pipeline.run(records)?;

            if args.export {
                let path = CsvExporter::export(&output.records, &config.export).await?;
                eprintln!("Exported processed issues to {}", path.display());
            }

            let report = AnalysisReport::from_output(&output, args.top).map_err(AppError::from)?;
            println!("{}", report.to_json().map_err(AppError::from)?);
        }

        Commands::Stats { input } => {
            let records = CsvReader::from_path(&input)?;
            let statistics = BacklogStatistics::from_records(&records);
            println!(
                "{}",
                serde_json::to_string_pretty(&statistics).context("rendering statistics")?
            );
        }
    }

    Ok(())
}

fn init_tracing(observability: &ObservabilityConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("backlog_insights={}", observability.log_level).into()
    });

    // Logs go to stderr; stdout carries the JSON report
    let json_layer = observability
        .json_logs
        .then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr));
    let text_layer = (!observability.json_logs)
        .then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}
