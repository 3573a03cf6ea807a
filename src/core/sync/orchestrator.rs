//! Batch sync orchestration
//!
//! Runs one full batch: authenticate, reach claim search, page through
//! results, extract rejection details, map, and persist each record
//! individually. Per-claim failures become error entries and the batch
//! continues; only authentication and the initial search are fatal. The
//! session is closed on every exit path, cancellation included.

use crate::adapters::browser::PortalDriver;
use crate::adapters::notify::RejectionNotifier;
use crate::adapters::store::{PersistOutcome, RejectionStore};
use crate::config::OasisConfig;
use crate::core::analyze;
use crate::core::extract;
use crate::core::map::{CanonicalMapper, Clock, HistoricalContext, SystemClock};
use crate::core::navigate::{self, NavigationGoal};
use crate::core::session::{PortalSession, SessionController};
use crate::domain::{
    ClaimStatus, ImportOutcome, ImportedRecord, PortalClaim, Result, SearchCriteria, SyncResult,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::watch;

/// Hard stop on result paging, far above any real portal window
const MAX_PAGES: u32 = 100;

/// Drives one sync run end to end
pub struct SyncOrchestrator {
    config: OasisConfig,
    store: Arc<dyn RejectionStore>,
    notifier: Arc<dyn RejectionNotifier>,
    shutdown: watch::Receiver<bool>,
    clock: Arc<dyn Clock>,
}

impl SyncOrchestrator {
    pub fn new(
        config: OasisConfig,
        store: Arc<dyn RejectionStore>,
        notifier: Arc<dyn RejectionNotifier>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            config,
            store,
            notifier,
            shutdown,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the time source (tests pin it).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Runs one batch against a live browser session.
    ///
    /// # Errors
    ///
    /// Only invalid criteria error out before anything runs; every later
    /// failure is folded into the returned [`SyncResult`].
    pub async fn run_sync(&self, criteria: SearchCriteria) -> Result<SyncResult> {
        criteria.validate()?;

        let controller = SessionController::new(self.config.portal.clone());
        let mut result =
            SyncResult::begin(criteria.from_date, criteria.to_date, self.clock.now());

        let session = match controller.open().await {
            Ok(session) => session,
            Err(e) => {
                tracing::error!(error = %e, "Session open failed, run aborted");
                result.mark_fatal(e.to_string());
                return Ok(self.finalize(result).await);
            }
        };

        self.drive_batch(&session, &criteria, &mut result).await;

        // Teardown runs on every path, cancellation included
        controller.close(&session).await;

        Ok(self.finalize(result).await)
    }

    /// Runs one batch over an already-launched driver.
    ///
    /// Same flow as [`run_sync`](Self::run_sync) with the browser seam
    /// open for scripted rehearsal.
    pub async fn run_sync_with_driver(
        &self,
        driver: Arc<dyn PortalDriver>,
        criteria: SearchCriteria,
    ) -> Result<SyncResult> {
        criteria.validate()?;

        let controller = SessionController::new(self.config.portal.clone());
        let mut result =
            SyncResult::begin(criteria.from_date, criteria.to_date, self.clock.now());

        let session = match controller.open_with_driver(driver).await {
            Ok(session) => session,
            Err(e) => {
                tracing::error!(error = %e, "Session open failed, run aborted");
                result.mark_fatal(e.to_string());
                return Ok(self.finalize(result).await);
            }
        };

        self.drive_batch(&session, &criteria, &mut result).await;
        controller.close(&session).await;

        Ok(self.finalize(result).await)
    }

    fn cancelled(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Everything between session open and teardown. Failures land in
    /// `result`; nothing propagates past here.
    async fn drive_batch(
        &self,
        session: &PortalSession,
        criteria: &SearchCriteria,
        result: &mut SyncResult,
    ) {
        let driver = session.driver();

        // The only path to search: a navigation failure here is fatal
        if let Err(e) = navigate::reach(driver, &NavigationGoal::ClaimSearch).await {
            tracing::error!(error = %e, "Claim search unreachable, run aborted");
            result.mark_fatal(format!("claim search unreachable: {e}"));
            self.write_diagnostics(driver, result).await;
            return;
        }

        let mapper = CanonicalMapper::new(&self.config.application.imported_by);
        let mut code_occurrences: HashMap<String, u32> = HashMap::new();
        let mut seen_claims: HashSet<String> = HashSet::new();
        let mut page_criteria = criteria.clone();

        for page in 0..MAX_PAGES {
            if self.cancelled() {
                tracing::warn!("Shutdown requested, stopping before next page");
                result.add_error(None, "run cancelled before page fetch", None);
                return;
            }

            let search_result = match extract::search(driver, &page_criteria).await {
                Ok(r) => r,
                Err(e) if page == 0 => {
                    // The initial search is fatal to the run
                    tracing::error!(error = %e, "Initial search failed, run aborted");
                    result.mark_fatal(format!("initial search failed: {e}"));
                    self.write_diagnostics(driver, result).await;
                    return;
                }
                Err(e) => {
                    tracing::warn!(page = page_criteria.page, error = %e, "Follow-up page failed");
                    result.add_error(None, format!("page {} failed: {e}", page_criteria.page), None);
                    break;
                }
            };

            if search_result.total_is_estimate {
                tracing::info!(
                    counted = search_result.total,
                    "Result total is a row-count estimate (no count indicator)"
                );
            }

            // Progress guard: a portal that ignores paging re-serves the
            // same rows forever
            let fresh: Vec<&PortalClaim> = search_result
                .claims
                .iter()
                .filter(|c| !seen_claims.contains(c.claim_number.as_str()))
                .collect();
            if search_result.rows_seen() > 0 && fresh.is_empty() {
                tracing::debug!(page = page_criteria.page, "No new claims on page, stopping");
                break;
            }

            result.total_fetched += fresh.len() + search_result.row_failures.len();

            for failure in &search_result.row_failures {
                result.add_error(
                    None,
                    format!("result row {} unparseable: {}", failure.row, failure.reason),
                    None,
                );
            }

            let fresh: Vec<PortalClaim> = fresh.into_iter().cloned().collect();
            for claim in fresh {
                if self.cancelled() {
                    tracing::warn!("Shutdown requested, stopping mid-page");
                    result.add_error(None, "run cancelled mid-page", None);
                    return;
                }
                seen_claims.insert(claim.claim_number.as_str().to_string());
                self.process_claim(driver, &mapper, &mut code_occurrences, claim, result)
                    .await;
            }

            if search_result.rows_seen() < page_criteria.page_size as usize {
                break;
            }
            page_criteria = page_criteria.next_page();

            // Back to the search form for the next page
            if let Err(e) = navigate::reach(driver, &NavigationGoal::ClaimSearch).await {
                tracing::warn!(error = %e, "Could not return to search for next page");
                result.add_error(None, format!("paging stopped: {e}"), None);
                break;
            }
        }
    }

    /// One claim through filter -> detail -> map -> persist. Every failure
    /// is recorded against the claim number; nothing aborts the batch.
    async fn process_claim(
        &self,
        driver: &dyn PortalDriver,
        mapper: &CanonicalMapper,
        code_occurrences: &mut HashMap<String, u32>,
        claim: PortalClaim,
        result: &mut SyncResult,
    ) {
        let claim_number = claim.claim_number.clone();

        let wanted = match claim.status {
            ClaimStatus::Rejected => self.config.sync.sync_rejections,
            ClaimStatus::Approved => self.config.sync.sync_approved,
            ClaimStatus::Pending | ClaimStatus::UnderReview | ClaimStatus::Submitted => {
                self.config.sync.sync_pending
            }
        };
        if !wanted {
            result.add_skipped(
                Some(claim_number),
                format!("status {} not selected for sync", claim.status),
            );
            return;
        }

        let rejection = if claim.status == ClaimStatus::Rejected {
            match extract::rejection_details(driver, &claim).await {
                Ok(rejection) => rejection,
                Err(e) => {
                    tracing::warn!(
                        claim_number = %claim_number,
                        error = %e,
                        "Rejection detail extraction failed"
                    );
                    result.add_error(
                        Some(claim_number),
                        format!("detail extraction failed: {e}"),
                        None,
                    );
                    return;
                }
            }
        } else {
            None
        };

        // Frequency context: occurrences of this code earlier in the batch
        let context = match &rejection {
            Some(r) => {
                let count = code_occurrences.entry(r.code.clone()).or_insert(0);
                let context = HistoricalContext::new(*count);
                *count += 1;
                context
            }
            None => HistoricalContext::default(),
        };

        let record = mapper.map(&claim, rejection.as_ref(), &context, self.clock.as_ref());

        match self.store.upsert(&record).await {
            Ok(PersistOutcome::Created(record_id)) => {
                result.add_imported(ImportedRecord {
                    record_id,
                    claim_number,
                    outcome: ImportOutcome::New,
                });
            }
            Ok(PersistOutcome::Updated(record_id)) => {
                result.add_imported(ImportedRecord {
                    record_id,
                    claim_number,
                    outcome: ImportOutcome::Updated,
                });
            }
            Ok(PersistOutcome::Unchanged(_)) => {
                result.add_skipped(Some(claim_number), "unchanged since last import");
            }
            Err(e) => {
                tracing::error!(claim_number = %claim_number, error = %e, "Persist failed");
                result.add_error(
                    Some(claim_number),
                    format!("persist failed: {e}"),
                    serde_json::to_value(&record).ok(),
                );
            }
        }
    }

    /// Finalizes, logs, and fires the notifier when configured.
    async fn finalize(&self, mut result: SyncResult) -> SyncResult {
        result.finalize(self.clock.now());
        result.log_summary();

        if self.config.sync.notify_on_new_rejections && result.new_records > 0 {
            if let Err(e) = self.notifier.notify(&result).await {
                tracing::warn!(error = %e, "Rejection notification failed");
            }
        }

        result
    }

    /// Best-effort failure diagnostics: a screenshot and a structural
    /// snapshot of wherever the session got stuck.
    async fn write_diagnostics(&self, driver: &dyn PortalDriver, result: &SyncResult) {
        let dir = std::path::Path::new(&self.config.portal.diagnostics_dir);
        if let Err(e) = tokio::fs::create_dir_all(dir).await {
            tracing::warn!(error = %e, "Diagnostics directory unavailable");
            return;
        }

        match driver.capture_screenshot().await {
            Ok(png) => {
                let path = dir.join(format!("{}.png", result.batch_id));
                if let Err(e) = tokio::fs::write(&path, png).await {
                    tracing::warn!(error = %e, "Failed to write failure screenshot");
                } else {
                    tracing::info!(path = %path.display(), "Failure screenshot written");
                }
            }
            Err(e) => tracing::warn!(error = %e, "Failure screenshot unavailable"),
        }

        if let Ok(structure) = analyze::analyze(driver).await {
            if let Ok(json) = serde_json::to_string_pretty(&structure) {
                let path = dir.join(format!("{}.structure.json", result.batch_id));
                if let Err(e) = tokio::fs::write(&path, json).await {
                    tracing::warn!(error = %e, "Failed to write structural snapshot");
                } else {
                    tracing::info!(path = %path.display(), "Structural snapshot written");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_invalid_criteria_rejected_before_navigation() {
        // Validation is on the criteria type itself; the orchestrator
        // checks it before any session exists (exercised end-to-end in
        // the integration suite)
        let criteria = SearchCriteria::for_window(
            NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        );
        assert!(criteria.validate().is_err());
    }
}
