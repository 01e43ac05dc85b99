use std::path::{Path, PathBuf};

use af_app::{
    AppError, AppResult, DirectoryListingSource, DirectoryStageSource, EnvCredentials,
    HttpStageSource, ListingSource, ReportConfig, StageSource, build_report, load_config,
    load_records, normalize_file,
};
use af_core::StageName;
use clap::{Args, Parser, Subcommand};

mod preview;

#[derive(Parser)]
#[command(name = "af-cli")]
#[command(about = "AquaFlow CLI - system design report builder", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the paginated design report for a project
    Report {
        /// Project ID
        project_id: String,
        /// Directory holding <project_id>/<stage>.json payloads
        #[arg(long, conflicts_with = "base_url")]
        stages_dir: Option<PathBuf>,
        #[command(flatten)]
        common: CommonArgs,
        /// Write the report and laid-out document as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// List deduplicated projects with category counts
    Projects {
        /// Directory holding page-<n>.json listing pages
        #[arg(long, conflicts_with = "base_url")]
        listing_dir: Option<PathBuf>,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Normalize one stage payload and print the canonical JSON
    Normalize {
        /// Stage name (basic, stage3, stage4, stage6, stage7, stage8)
        stage: String,
        /// Path to the raw payload JSON
        payload: PathBuf,
    },
}

#[derive(Args)]
struct CommonArgs {
    /// Backend base URL
    #[arg(long)]
    base_url: Option<String>,
    /// Report configuration YAML
    #[arg(long)]
    config: Option<PathBuf>,
}

impl CommonArgs {
    fn load_config(&self) -> AppResult<ReportConfig> {
        match &self.config {
            Some(path) => load_config(path),
            None => Ok(ReportConfig::default()),
        }
    }

    fn http_source(&self, config: &ReportConfig) -> Option<HttpStageSource> {
        let base = self.base_url.clone().or_else(|| config.http.base_url.clone())?;
        let credentials = EnvCredentials::new(config.http.credential_env.clone());
        Some(HttpStageSource::new(base, &config.http, Box::new(credentials)))
    }
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            project_id,
            stages_dir,
            common,
            json,
        } => cmd_report(&project_id, stages_dir.as_deref(), &common, json.as_deref()),
        Commands::Projects {
            listing_dir,
            common,
        } => cmd_projects(listing_dir.as_deref(), &common),
        Commands::Normalize { stage, payload } => cmd_normalize(&stage, &payload),
    }
}

fn no_source() -> AppError {
    AppError::InvalidInput("a local directory or --base-url is required".to_string())
}

fn cmd_report(
    project_id: &str,
    stages_dir: Option<&Path>,
    common: &CommonArgs,
    json: Option<&Path>,
) -> AppResult<()> {
    let config = common.load_config()?;
    tracing::info!(project_id, "building report");
    let source: Box<dyn StageSource> = match stages_dir {
        Some(dir) => Box::new(DirectoryStageSource::new(dir)),
        None => Box::new(common.http_source(&config).ok_or_else(no_source)?),
    };

    let generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M").to_string();
    let build = build_report(project_id, source.as_ref(), &config, Some(generated_at))?;

    print!("{}", preview::Preview(&build.document));
    for diagnostic in &build.report.diagnostics {
        println!("note: {diagnostic}");
    }
    if build.document.overflowed {
        println!("note: some content was taller than a page and was placed on its own page");
    }

    if let Some(path) = json {
        let fingerprint = build.document.fingerprint()?;
        let export = serde_json::json!({
            "report": build.report,
            "document": build.document,
            "fingerprint": fingerprint,
        });
        let content = serde_json::to_string_pretty(&export)?;
        std::fs::write(path, content).map_err(|e| AppError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        println!("✓ Wrote {}", path.display());
    }
    Ok(())
}

fn cmd_projects(listing_dir: Option<&Path>, common: &CommonArgs) -> AppResult<()> {
    let config = common.load_config()?;
    let source: Box<dyn ListingSource> = match listing_dir {
        Some(dir) => Box::new(DirectoryListingSource::new(dir)),
        None => Box::new(common.http_source(&config).ok_or_else(no_source)?),
    };

    let records = load_records(source.as_ref(), config.http.listing_page_cap)?;
    if records.projects.is_empty() {
        println!("No projects found");
        return Ok(());
    }

    println!("Projects:");
    for project in &records.projects {
        let created = project
            .created_at
            .map(|t| t.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {} - {} [{}] {} ({})",
            project.usable_id().unwrap_or("-"),
            project.name,
            project.kind.as_str(),
            project.species_names.join(", "),
            created
        );
    }
    println!(
        "✓ {} projects ({} basic, {} advanced)",
        records.counts.total(),
        records.counts.basic,
        records.counts.advanced
    );
    Ok(())
}

fn cmd_normalize(stage: &str, payload: &Path) -> AppResult<()> {
    let stage: StageName = stage.parse()?;
    let sub = normalize_file(stage, payload)?;
    println!("{}", serde_json::to_string_pretty(&sub)?);
    Ok(())
}
