use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use log::info;

mod api;
mod batch;
mod cli;
mod error;
mod payload;
mod rows;

use api::UspacyClient;
use batch::BatchOptions;
use cli::Cli;
use error::ImportError;
use rows::RowSource;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Row diagnostics go to stderr as tagged lines; default to info so
    // skipped rows are always visible
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let cli = Cli::parse();
    info!("Starting uspacy-import");

    let token = cli
        .webhook_token
        .or_else(|| std::env::var(api::constants::TOKEN_ENV_VAR).ok())
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            ImportError::Config(
                "Webhook token is required. Use --webhook-token or set USPACY_WEBHOOK_TOKEN."
                    .to_string(),
            )
        })?;

    let rows = RowSource::open(&cli.file)?;
    let client = UspacyClient::new(&cli.base_url, &cli.webhook_header, &token)?;
    let options = BatchOptions {
        entity: cli.entity,
        search_field: cli.search_field,
        dry_run: cli.dry_run,
    };

    let summary = batch::run_batch(&client, rows, &options).await?;

    let verb = if options.dry_run { "would update" } else { "updated" };
    println!(
        "{}",
        format!(
            "Done: {} {} row(s), {} skipped, {} failed",
            verb, summary.updated, summary.skipped, summary.failed
        )
        .bold()
    );

    Ok(())
}
