mod cli;

use std::sync::Arc;

use chrono::Utc;
use clap::Parser;
use cli::{Cli, Commands};
use tootprune::api::MastodonClient;
use tootprune::config::{Config, ValidationError};
use tootprune::observability::{RunStats, init_tracing};
use tootprune::purge::{self, RunSummary};
use tootprune::transport::HttpTransport;

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[tokio::main]
async fn main() -> Result<(), AnyError> {
    let cli = Cli::parse();
    init_tracing(cli.quiet);

    let mut config = match &cli.config {
        Some(path) => Config::load_from_path(path.clone())?,
        None => Config::load()?,
    };
    let stats = Arc::new(RunStats::new());

    match cli.command {
        Commands::Purge(args) => {
            args.apply(&mut config.purge);
            // a missing or bad age must fail before any request goes out
            let options = config.purge_options(Utc::now())?;
            let client = connect(&config, stats)?;

            let summary = purge::run(&client, &options).await?;
            print_summary(&summary, options.dry_run);
        }
        Commands::Whoami => {
            let client = connect(&config, stats)?;
            let account = client.verify_credentials().await?;
            println!("{} (@{}), account id {}", account.username, account.acct, account.id);
        }
    }

    Ok(())
}

fn connect(config: &Config, stats: Arc<RunStats>) -> Result<MastodonClient<HttpTransport>, AnyError> {
    let server = config
        .account
        .server_url()
        .ok_or(ValidationError::MissingServer)?;
    let transport = HttpTransport::new(
        &server,
        config.account.access_token.as_deref(),
        config.http.to_http_config(),
        stats.clone(),
    )?;
    Ok(MastodonClient::new(transport, stats))
}

fn print_summary(summary: &RunSummary, dry_run: bool) {
    let statuses = &summary.statuses;
    if dry_run {
        println!(
            "[dry run] {} statuses would have been deleted, none were touched.",
            statuses.planned.len()
        );
    } else {
        println!("{} statuses were successfully deleted.", statuses.removed);
    }
    if !statuses.failed.is_empty() {
        println!("{} statuses could not be deleted: {:?}", statuses.failed.len(), statuses.failed);
    }

    if let Some(favourites) = &summary.favourites {
        if dry_run {
            println!("[dry run] {} favourites would have been removed.", favourites.planned.len());
        } else {
            println!("Removed {} favourites.", favourites.removed);
        }
    }

    let stats = &summary.stats;
    println!(
        "{} requests on {} pages, throttled {} times.",
        stats.requests_issued, stats.pages_fetched, stats.rate_limit_waits
    );
}
