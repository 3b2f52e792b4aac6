use tracing::{debug, info, warn};

use super::protected::{ProtectedSet, load_protected};
use super::report::PurgeReport;
use super::retention::{Decision, KeepReason, RetentionPolicy};
use super::{PurgeError, PurgeOptions};
use crate::api::{Confirmation, MastodonClient, Status, account_statuses_path};
use crate::pagination::{CursorStrategy, PageWalker};
use crate::transport::Transport;

/// Deletes an account's statuses older than the cutoff, sparing pinned ones
pub struct StatusPurger<'c, T> {
    client: &'c MastodonClient<T>,
    options: &'c PurgeOptions,
    policy: RetentionPolicy,
}

impl<'c, T: Transport> StatusPurger<'c, T> {
    pub fn new(client: &'c MastodonClient<T>, options: &'c PurgeOptions) -> Self {
        Self {
            client,
            options,
            policy: RetentionPolicy::new(options.cutoff),
        }
    }

    pub async fn run(&self, account_id: u64) -> Result<PurgeReport, PurgeError> {
        info!("Fetching pinned statuses");
        let protected = load_protected(self.client, account_id)
            .await
            .map_err(PurgeError::Protected)?;
        if protected.is_empty() {
            info!("No pinned statuses found");
        } else {
            info!(count = protected.len(), "Found pinned statuses, which will not be deleted");
        }

        self.purge_pages(account_id, &protected).await
    }

    async fn purge_pages(&self, account_id: u64, protected: &ProtectedSet) -> Result<PurgeReport, PurgeError> {
        let mut report = PurgeReport::default();
        let mut walker = PageWalker::new(
            self.client,
            account_statuses_path(account_id),
            CursorStrategy::IdOffset,
        )
        .limit(self.options.page_limit);

        while let Some(page) = walker.next_page().await? {
            info!(page = page.number, until = %page.cursor, "Fetched statuses");
            report.pages += 1;

            let selected_before = report.selected();
            for status in &page.statuses {
                report.examined += 1;
                match self.policy.decide(status, protected) {
                    Decision::Keep(KeepReason::TooRecent) => report.retained += 1,
                    Decision::Keep(KeepReason::Protected) => {
                        info!(status_id = status.id, "Status is pinned; not deleting");
                        report.protected += 1;
                    }
                    Decision::Delete => self.delete(status, &mut report).await,
                }
            }

            if report.selected() == selected_before {
                debug!(page = page.number, "No posts to be deleted on this page, trying next page");
                continue;
            }

            info!(page = page.number, deleted = report.removed, "Statuses deleted so far");
            if !walker.is_done() && !self.options.page_pause.is_zero() {
                // give the server time to re-assemble its pages after the deletions
                tokio::time::sleep(self.options.page_pause).await;
            }
        }

        Ok(report)
    }

    /// Delete one status; failures are recorded and never abort the run
    async fn delete(&self, status: &Status, report: &mut PurgeReport) {
        if self.options.dry_run {
            info!(status_id = status.id, created_at = %status.created_at, "[dry run] Would delete status");
            report.planned.push(status.id);
            return;
        }

        match self.client.delete_status(status.id).await {
            Ok(Confirmation::Confirmed) => {
                debug!(status_id = status.id, "Deleted status");
                self.client.stats().status_deleted();
                report.removed += 1;
            }
            Ok(Confirmation::Unconfirmed { body }) => {
                warn!(status_id = status.id, response = %body, "Status could not be deleted");
                self.client.stats().item_failed();
                report.failed.push(status.id);
            }
            Err(e) => {
                warn!(status_id = status.id, error = %e, "Could not delete status");
                self.client.stats().item_failed();
                report.failed.push(status.id);
            }
        }
    }
}
