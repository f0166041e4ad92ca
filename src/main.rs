//! orgscope - company intelligence dashboard for the terminal
//!
//! Reads company profiles from a PostgREST backend, runs the
//! aggregation and filter engines over them and writes the result
//! as a Markdown or JSON report.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (configuration, backend failure, company not found)

mod analysis;
mod backend;
mod cli;
mod config;
mod models;
mod report;

use analysis::{AnalyticsView, CompanyFilter, DashboardStats, FilterView};
use anyhow::{Context, Result};
use backend::{load_profile, ClientConfig, ProfileView, QueryCache, QueryKey, RestClient};
use chrono::Utc;
use cli::{Args, OutputFormat, View};
use config::{Config, CONFIG_FILE};
use indicatif::{ProgressBar, ProgressStyle};
use models::{CultureRecord, LogisticsRecord, QueryState, SatelliteKind, TechnologiesRecord};
use report::{AnalyticsReport, AnalyticsSection, Report, ReportMetadata, SectionError, ViewReport};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Where the effective configuration came from.
enum ConfigSource {
    File(PathBuf),
    Defaults,
    InvalidDefault(String),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    let (mut config, source) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    init_logging(&args, &config);

    info!("orgscope v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    match source {
        ConfigSource::File(path) => info!("Loaded config from: {}", path.display()),
        ConfigSource::Defaults => debug!("No config file found, using defaults"),
        ConfigSource::InvalidDefault(e) => warn!("Failed to load config: {}", e),
    }

    match run(args, config).await {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            error!("Run failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .orgscope.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Edit it to set the backend URL, API key and report options.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args, config: &Config) {
    let level = if config.general.verbose && !args.quiet {
        tracing::Level::DEBUG
    } else {
        args.log_level()
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load configuration from an explicit path, the working directory, or defaults.
fn load_config(args: &Args) -> Result<(Config, ConfigSource)> {
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, ConfigSource::File(config_path.clone())));
    }

    match Config::load_default() {
        Ok(Some(config)) => Ok((config, ConfigSource::File(PathBuf::from(CONFIG_FILE)))),
        Ok(None) => Ok((Config::default(), ConfigSource::Defaults)),
        Err(e) => Ok((Config::default(), ConfigSource::InvalidDefault(format!("{:#}", e)))),
    }
}

/// Queries a view issues, in the order they are started.
fn planned_queries(args: &Args) -> Vec<QueryKey> {
    match args.view {
        View::Dashboard | View::Companies => vec![QueryKey::Companies],
        View::Analytics => vec![
            QueryKey::Companies,
            QueryKey::Collection(SatelliteKind::Technologies),
            QueryKey::Collection(SatelliteKind::Logistics),
            QueryKey::Collection(SatelliteKind::Culture),
        ],
        View::Company => {
            let id = args.company_id.clone().unwrap_or_default();
            let mut keys = vec![QueryKey::Company(id.clone())];
            keys.extend(
                SatelliteKind::ALL
                    .iter()
                    .map(|&kind| QueryKey::Satellite(kind, id.clone())),
            );
            keys
        }
    }
}

/// Handle --dry-run: print the requests the view would make, exit.
fn handle_dry_run(args: &Args, client: &RestClient) -> Result<i32> {
    println!("\n🔍 Dry run: no requests will be sent.\n");

    let keys = planned_queries(args);
    println!("   {:?} view issues {} queries:\n", args.view, keys.len());

    for key in &keys {
        let query: Vec<String> = key
            .params()
            .into_iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();
        println!(
            "     📡 GET {}?{}  {}",
            client.table_url(key.table()),
            query.join("&"),
            key
        );
    }

    println!("\n✅ Dry run complete.");
    Ok(0)
}

fn spinner(quiet: bool, message: &str) -> Option<ProgressBar> {
    if quiet {
        return None;
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}

/// Fetch and build the selected view. `Ok(None)` means the company was not found.
async fn build_view(
    args: &Args,
    config: &Config,
    cache: &QueryCache,
    progress: Option<&ProgressBar>,
) -> Result<Option<ViewReport>> {
    let view = match args.view {
        View::Dashboard => {
            let companies = cache
                .list_companies()
                .await
                .context("Failed to load companies")?;
            ViewReport::Dashboard(DashboardStats::from_companies(
                Some(companies.as_slice()),
                config.general.recent_limit,
            ))
        }
        View::Companies => {
            let companies = cache
                .list_companies()
                .await
                .context("Failed to load companies")?;
            let filter = CompanyFilter::new(
                args.search.clone().unwrap_or_default(),
                args.company_type.clone(),
                args.category.clone(),
            );
            ViewReport::Companies(FilterView::build(Some(companies.as_slice()), filter))
        }
        View::Analytics => {
            let (companies, technologies, logistics, cultures) = futures::join!(
                cache.list_companies(),
                cache.list_all::<TechnologiesRecord>(SatelliteKind::Technologies),
                cache.list_all::<LogisticsRecord>(SatelliteKind::Logistics),
                cache.list_all::<CultureRecord>(SatelliteKind::Culture),
            );
            let companies = companies.context("Failed to load companies")?;

            let mut errors = Vec::new();
            for (section, result) in [
                (AnalyticsSection::TechStack, technologies.as_ref().err()),
                (AnalyticsSection::RemotePolicy, logistics.as_ref().err()),
                (AnalyticsSection::Culture, cultures.as_ref().err()),
            ] {
                if let Some(e) = result {
                    warn!("{} unavailable: {}", section, e);
                    errors.push(SectionError {
                        section,
                        message: e.to_string(),
                    });
                }
            }

            let analytics = AnalyticsView::build(
                Some(companies.as_slice()),
                technologies.as_deref().ok(),
                logistics.as_deref().ok(),
                cultures.as_deref().ok(),
            );
            ViewReport::Analytics(AnalyticsReport { analytics, errors })
        }
        View::Company => {
            let id = args.company_id.as_deref().unwrap_or_default();
            let company = cache
                .get_company(id)
                .await
                .with_context(|| format!("Failed to load company {}", id))?;

            let Some(company) = company else {
                return Ok(None);
            };

            let mut view = ProfileView::new(id);
            view.company = QueryState::Ready(Some(company));

            load_profile(cache, &mut view, |view, kind| {
                debug!("{} ready for {}", kind, view.company_id());
                if let Some(pb) = progress {
                    pb.set_message(format!("Loaded {}", kind));
                }
            })
            .await;

            if !view.is_settled() {
                warn!("Some profile sections did not resolve for {}", id);
            }

            ViewReport::Company(view)
        }
    };

    Ok(Some(view))
}

fn summary_line(view: &ViewReport) -> String {
    match view {
        ViewReport::Dashboard(stats) => format!(
            "{} companies, {} types, {} categories",
            stats.total,
            stats.by_type.len(),
            stats.by_category.len()
        ),
        ViewReport::Analytics(report) => format!(
            "{} company types, {} technologies, {} unavailable sections",
            report.analytics.company_distribution.len(),
            report.analytics.tech_stack_frequency.len(),
            report.errors.len()
        ),
        ViewReport::Companies(view) => {
            format!("Showing {} of {} companies", view.shown(), view.total)
        }
        ViewReport::Company(view) => {
            let present = view.slots().iter().filter(|s| s.record().is_some()).count();
            let failed = view.slots().iter().filter(|s| s.state.is_failed()).count();
            format!("{} of 9 profile sections present, {} failed", present, failed)
        }
    }
}

/// Run the selected view end to end. Returns the exit code.
async fn run(args: Args, config: Config) -> Result<i32> {
    let start_time = Instant::now();

    let client = RestClient::new(ClientConfig::from(&config.backend))
        .context("Invalid backend configuration")?;

    if args.dry_run {
        return handle_dry_run(&args, &client);
    }

    if config.backend.api_key.is_empty() {
        warn!("No API key configured; requests are sent without credentials");
    }

    let cache = QueryCache::new(client);
    let quiet = args.quiet || args.stdout;

    if !quiet {
        println!("📡 Backend: {}", cache.client().base_url());
    }

    let progress = spinner(quiet, &format!("Loading {:?} view...", args.view));
    let built = build_view(&args, &config, &cache, progress.as_ref()).await;
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    let view = match built? {
        Some(view) => view,
        None => {
            let id = args.company_id.as_deref().unwrap_or_default();
            error!("Company not found: {}", id);
            eprintln!("\n❌ Company not found: {}", id);
            return Ok(1);
        }
    };

    debug!("{} queries cached", cache.len());

    let report = Report {
        metadata: ReportMetadata {
            generated_at: Utc::now(),
            backend_url: cache.client().base_url().to_string(),
            duration_seconds: start_time.elapsed().as_secs_f64(),
        },
        view,
    };

    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report, &config.report),
    };

    if args.stdout {
        print!("{}", output);
        return Ok(0);
    }

    let path = PathBuf::from(&config.general.output);
    std::fs::write(&path, &output)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;

    if !quiet {
        println!("\n📊 {}", summary_line(&report.view));
        println!("   Duration: {:.1}s", report.metadata.duration_seconds);
        println!("\n✅ Report saved to: {}", path.display());
    }

    Ok(0)
}
