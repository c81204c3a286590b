//! Menu Sync - Dispensary Live-Menu Publisher
//!
//! Joins active Metrc packages with the pricing spreadsheet and per-package
//! lab results, then publishes menu.json to the live-menu repository when
//! the content hash changes. Runs once per invocation; scheduling is left
//! to cron or a systemd timer.

use clap::Parser;
use menu_sync::config::{Config, Credentials, DEFAULT_BASE_URL, PAGE_SIZE, WINDOW_START};
use menu_sync::menu::build_menu;
use menu_sync::metrc::{fetch_all_lab_results, MetrcClient};
use menu_sync::publish::{publish, GitStore, Outcome};
use menu_sync::spreadsheet::PricingSheet;
use std::path::PathBuf;

/// Builds and publishes the live menu from Metrc inventory
#[derive(Parser, Debug)]
#[command(name = "menu_sync")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the Metrc credentials env file
    #[arg(long, default_value = "/etc/ceres/metrc.env")]
    env_file: PathBuf,

    /// Path to the locally synced pricing spreadsheet
    #[arg(long, default_value = "/tmp/Product Information.xlsx")]
    spreadsheet: PathBuf,

    /// Local clone of the live-menu repository
    #[arg(long, default_value = "/home/ceres/live-menu")]
    repo_dir: PathBuf,

    /// Artifact file name inside the repository
    #[arg(long, default_value = "menu.json")]
    artifact: String,

    /// Metrc API base URL
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Parallel lab-result requests (1 = sequential)
    #[arg(long, default_value_t = 1)]
    lab_concurrency: usize,
}

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    log::info!("Starting menu_sync...");

    // Credentials are the one thing checked before any network activity
    let credentials = match Credentials::load(&args.env_file) {
        Ok(credentials) => credentials,
        Err(e) => {
            log::error!("Failed to load credentials: {}", e);
            std::process::exit(1);
        }
    };

    let config = Config {
        credentials,
        base_url: args.base_url,
        spreadsheet_path: args.spreadsheet,
        repo_dir: args.repo_dir,
        artifact_name: args.artifact,
        page_size: PAGE_SIZE,
        lab_concurrency: args.lab_concurrency,
    };

    if let Err(e) = run(&config).await {
        log::error!("Run aborted: {}", e);
        std::process::exit(1);
    }
}

/// One full reconcile-and-publish cycle. Any error is fatal for the run;
/// the previously published menu stays untouched and the next scheduled
/// invocation starts fresh.
async fn run(config: &Config) -> menu_sync::Result<()> {
    let sheet = PricingSheet::load(&config.spreadsheet_path)?;

    let client = MetrcClient::new(config)?;

    let window_end = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
    let packages = client
        .fetch_active_packages(WINDOW_START, &window_end, config.page_size)
        .await?;

    let mut package_ids: Vec<i64> = packages.keys().copied().collect();
    package_ids.sort_unstable();
    let lab_results =
        fetch_all_lab_results(&client, &package_ids, config.lab_concurrency).await?;

    let payload = build_menu(&packages, &lab_results, &sheet);
    log::info!(
        "Built menu with {} items and {} bulk rules",
        payload.items.len(),
        payload.bulk_rules.len()
    );

    let store = GitStore::new(config.repo_dir.clone(), config.artifact_name.clone());
    match publish(&store, &payload.to_json()?)? {
        Outcome::Unchanged => log::info!("Menu unchanged, nothing published"),
        Outcome::Updated => log::info!("Menu updated and pushed"),
    }

    Ok(())
}
