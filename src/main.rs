use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use saccani_form_filler::{cli, error, manual, process};
use cli::{Cli, Commands};
use error::Result;
use sff_common::api::HttpApiClient;
use sff_common::{
    client_from_config, log_view, Config, FormFillerApi, LogStore, ManualEntryTab, MockApiClient,
    MockLatency,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "info" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn build_client(cli: &Cli, config: &Config) -> Result<Arc<dyn FormFillerApi>> {
    if cli.mock {
        let latency = if config.mock_latency { MockLatency::default() } else { MockLatency::none() };
        return Ok(Arc::new(MockApiClient::new(latency)));
    }
    // The flag beats SFF_API_URL as well as the config file
    if let Some(url) = &cli.api_url {
        return Ok(Arc::new(HttpApiClient::new(url, config.timeout_seconds)?));
    }
    Ok(client_from_config(config)?)
}

fn print_log(log: &LogStore) {
    println!("\nLog:");
    for line in log_view::render_lines(&log.entries()) {
        println!("  {line}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = Config::load()?;
    let log = LogStore::new();

    match &cli.command {
        Commands::Process { input, template, output } => {
            println!("📄 Saccani Form Filler - process files\n");

            let Some(output) = output.clone().or_else(|| config.default_output_dir.clone()) else {
                log.error("Please select all required files and specify output path");
                print_log(&log);
                return Err(sff_common::Error::Validation(
                    "Please select all required files and specify output path".into(),
                )
                .into());
            };

            let api = build_client(&cli, &config)?;
            let outcome = process::run_process(api.as_ref(), &log, input, template, &output).await;
            if cli.verbose || outcome.is_err() {
                print_log(&log);
            }
            let summary = outcome?;

            for path in &summary.saved {
                println!("✔ {}", path.display());
            }
            if summary.failed > 0 {
                return Err(error::FormFillerError::PartialFailure {
                    failed: summary.failed,
                    total: summary.total,
                });
            }
            println!("\n✅ {} PDF(s) written to {}", summary.saved.len(), output.display());
        }

        Commands::Manual => {
            let api = build_client(&cli, &config)?;
            let mut tab = ManualEntryTab::new(log.clone());
            manual::run_manual(&mut tab, api.as_ref()).await?;
            if cli.verbose {
                print_log(&log);
            }
        }

        Commands::Scrape { name, city } => {
            let api = build_client(&cli, &config)?;
            let response = api.scrape_business(name, city).await?;
            if response.results.is_empty() {
                println!("No business license found");
            } else {
                println!("{}", serde_json::to_string_pretty(&response.results)?);
            }
        }

        Commands::Config { set_api_url, clear_api_url, show } => {
            let mut config = config;

            if let Some(url) = set_api_url {
                config.set_api_url(Some(url.clone()))?;
                println!("✔ API URL saved");
            }
            if *clear_api_url {
                config.set_api_url(None)?;
                println!("✔ API URL cleared, using the mock backend");
            }

            if *show || (set_api_url.is_none() && !clear_api_url) {
                let path = Config::config_path().unwrap_or_else(|_| PathBuf::from("-"));
                println!("Config: {}", path.display());
                println!("  API URL: {}", config.api_base_url().unwrap_or_else(|| "(mock)".into()));
                println!("  Mock latency: {}", if config.mock_latency { "on" } else { "off" });
                println!("  Timeout: {}s", config.timeout_seconds);
                println!(
                    "  Output folder: {}",
                    config
                        .default_output_dir
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "-".into())
                );
            }
        }
    }

    Ok(())
}
