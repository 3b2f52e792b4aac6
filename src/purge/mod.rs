//! Retention filter and deletion drivers
//!
//! A run verifies the credentials, loads the pinned statuses once, walks the
//! account timeline deleting everything older than the cutoff and, when
//! asked, does the same for favourites with un-favourite calls instead of
//! deletions. Failures on single items are logged and counted; anything that
//! prevents a safe traversal aborts the run.

mod favourites;
mod protected;
mod report;
mod retention;
mod statuses;

pub use favourites::FavouritePurger;
pub use protected::{ProtectedSet, load_protected};
pub use report::PurgeReport;
pub use retention::{Decision, KeepReason, RetentionPolicy};
pub use statuses::StatusPurger;

use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::info;

use crate::api::{Account, ApiError, MastodonClient};
use crate::observability::StatsSnapshot;
use crate::pagination::PAGE_LIMIT;
use crate::transport::Transport;

/// Pause after a page that had deletions, so the server can settle its pagination
pub const DEFAULT_PAGE_PAUSE: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum PurgeError {
    #[error("could not load pinned statuses: {0}")]
    Protected(#[source] ApiError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Switches for one purge run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurgeOptions {
    /// Items created before this instant are eligible
    pub cutoff: DateTime<Utc>,
    pub dry_run: bool,
    pub favourites: bool,
    pub page_limit: u32,
    pub page_pause: Duration,
}

impl PurgeOptions {
    pub fn new(cutoff: DateTime<Utc>) -> Self {
        Self {
            cutoff,
            dry_run: false,
            favourites: false,
            page_limit: PAGE_LIMIT,
            page_pause: DEFAULT_PAGE_PAUSE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub account: Account,
    pub statuses: PurgeReport,
    pub favourites: Option<PurgeReport>,
    pub stats: StatsSnapshot,
}

/// Run a complete purge for the account behind the client's credentials
pub async fn run<T: Transport>(
    client: &MastodonClient<T>,
    options: &PurgeOptions,
) -> Result<RunSummary, PurgeError> {
    info!("Requesting access to Mastodon account");
    let account = client.verify_credentials().await?;
    info!(account_id = account.id, username = %account.username, "Access granted");

    info!(
        cutoff = %options.cutoff.format("%b %-d, %Y at %-I:%M:%S %p UTC"),
        dry_run = options.dry_run,
        "Posts older than the cutoff will be deleted"
    );

    let statuses = StatusPurger::new(client, options).run(account.id).await?;
    info!(%statuses, "Finished purging statuses");

    let favourites = if options.favourites {
        let report = FavouritePurger::new(client, options).run().await?;
        info!(%report, "Finished purging favourites");
        Some(report)
    } else {
        None
    };

    Ok(RunSummary {
        account,
        statuses,
        favourites,
        stats: client.stats().snapshot(),
    })
}
