//! Orchestration of the remote round-trips around the pure core.
//!
//! A submission is two sequential steps: write the normalized record, then
//! refetch and reassemble the dashboard. The refetch is only issued once the
//! write has been acknowledged. Concurrent submissions are not coordinated;
//! each runs its own write-then-refresh. Nothing is retried automatically.

use crate::client::RemoteStore;
use crate::draft::Draft;
use crate::insight::{build_insight_request, FALLBACK_ADVICE};
use crate::macros::ReportingWindow;
use crate::normalize::normalize;
use crate::snapshot::{assemble_snapshot, SnapshotLimits};
use crate::types::{DashboardSnapshot, FoodCandidate, InsightCategory};
use crate::{Error, Result};
use chrono::Utc;

/// Where the advice text came from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Advice {
    /// Produced by the advice service
    Generated(String),
    /// The service failed and the fallback text was substituted
    Fallback { text: String, reason: String },
}

impl Advice {
    pub fn text(&self) -> &str {
        match self {
            Advice::Generated(text) => text,
            Advice::Fallback { text, .. } => text,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Advice::Fallback { .. })
    }
}

/// Drives the remote store on behalf of a view
pub struct Tracker<S> {
    store: S,
    limits: SnapshotLimits,
    fallback_advice: String,
}

impl<S: RemoteStore> Tracker<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            limits: SnapshotLimits::default(),
            fallback_advice: FALLBACK_ADVICE.to_string(),
        }
    }

    pub fn with_limits(mut self, limits: SnapshotLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_fallback_advice(mut self, text: impl Into<String>) -> Self {
        self.fallback_advice = text.into();
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fetch the collections and assemble today's snapshot
    pub async fn load_dashboard(&self) -> Result<DashboardSnapshot> {
        let collections = self.store.fetch_dashboard().await?;
        Ok(assemble_snapshot(
            collections,
            &ReportingWindow::today(),
            &self.limits,
        ))
    }

    /// Normalize, write, then refresh
    ///
    /// A validation failure returns before anything is sent. A failed write
    /// is returned as-is; the caller still owns the draft and decides whether
    /// to keep it for a retry. Once the write is acknowledged, a failed
    /// refresh comes back as [`Error::RefreshFailed`] and the draft must not
    /// be sent again.
    pub async fn submit(&self, draft: &Draft) -> Result<DashboardSnapshot> {
        let record = normalize(draft, Utc::now())?;

        self.store.submit(&record).await?;
        tracing::info!("Logged {} to /{}", draft.label(), record.endpoint());

        let snapshot = self.load_dashboard().await.map_err(|e| {
            tracing::warn!("Dashboard refresh after {} write failed: {}", draft.label(), e);
            Error::RefreshFailed(Box::new(e))
        })?;
        tracing::info!("Dashboard refreshed after {} write", draft.label());
        Ok(snapshot)
    }

    /// Food candidates for a search box
    pub async fn search_foods(&self, query: &str) -> Result<Vec<FoodCandidate>> {
        self.store.search_foods(query).await
    }

    /// Advice for `category`, falling back to fixed text when unavailable
    pub async fn insights(&self, snapshot: &DashboardSnapshot, category: InsightCategory) -> Advice {
        match self.fetch_advice(snapshot, category).await {
            Ok(text) => Advice::Generated(text),
            Err(e) => {
                tracing::warn!("Falling back to canned advice: {}", e);
                Advice::Fallback {
                    text: self.fallback_advice.clone(),
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn fetch_advice(
        &self,
        snapshot: &DashboardSnapshot,
        category: InsightCategory,
    ) -> Result<String> {
        let request = build_insight_request(snapshot, category);
        let response = self
            .store
            .request_insights(&request)
            .await
            .map_err(|e| Error::AdviceUnavailable(e.to_string()))?;

        if response.error {
            return Err(Error::AdviceUnavailable(
                "advice service reported an error".into(),
            ));
        }
        if response.advice.trim().is_empty() {
            return Err(Error::AdviceUnavailable("empty advice".into()));
        }
        Ok(response.advice)
    }
}
