//! # Publishing
//!
//! Saving hands the serialized tree to a [`ContentStore`] and drives a small
//! state machine the UI shows next to the publish button:
//!
//! ```text
//! idle -> saving -> saved -> idle
//!                \-> error -> idle
//! ```
//!
//! `saved` and `error` fall back to `idle` once the display interval has
//! passed. Only one save runs at a time; a publish request while saving is
//! refused rather than queued. Failed saves are reported, never retried. A
//! publish future dropped mid-save ends in `error`, so the next request is
//! accepted.

use crate::{EditorConfig, PublishError, StoreError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex as StdMutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

/// Where serialized pages are persisted
pub trait ContentStore: Send + Sync {
    fn save(&self, document: &str) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// The stored tree or legacy text, `None` if nothing was ever stored
    fn load(&self) -> impl Future<Output = Result<Option<String>, StoreError>> + Send;
}

/// In-process store, for tests and previews
#[derive(Debug, Default)]
pub struct MemoryStore {
    document: Mutex<Option<String>>,
    failing: AtomicBool,
    saves: AtomicUsize,
    latency: Option<Duration>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `content` already stored
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            document: Mutex::new(Some(content.into())),
            ..Self::default()
        }
    }

    /// Delay every save by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make subsequent saves fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl ContentStore for MemoryStore {
    async fn save(&self, document: &str) -> Result<(), StoreError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store set to fail".to_string()));
        }

        *self.document.lock().await = Some(document.to_string());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(self.document.lock().await.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "message", rename_all = "lowercase")]
pub enum SaveState {
    Idle,
    Saving,
    Saved,
    Error(String),
}

const CANCELLED: &str = "Save cancelled";

/// Save indicator with timed fallback to idle
#[derive(Debug, Clone)]
pub struct SaveStatus {
    state: SaveState,
    since: Option<Instant>,
    display_for: Duration,
}

impl SaveStatus {
    pub fn new(display_for: Duration) -> Self {
        Self {
            state: SaveState::Idle,
            since: None,
            display_for,
        }
    }

    /// State as the UI should show it at `now`
    pub fn state_at(&self, now: Instant) -> SaveState {
        match (&self.state, self.since) {
            (SaveState::Saved | SaveState::Error(_), Some(since))
                if now.saturating_duration_since(since) >= self.display_for =>
            {
                SaveState::Idle
            }
            (state, _) => state.clone(),
        }
    }

    pub fn is_saving(&self) -> bool {
        self.state == SaveState::Saving
    }

    /// Enter `saving`; refused while a save is in flight
    pub fn begin(&mut self, now: Instant) -> Result<(), PublishError> {
        if self.is_saving() {
            return Err(PublishError::SaveInProgress);
        }
        self.transition(SaveState::Saving, now);
        Ok(())
    }

    pub fn finish(&mut self, result: &Result<(), StoreError>, now: Instant) {
        let next = match result {
            Ok(()) => SaveState::Saved,
            Err(e) => SaveState::Error(e.to_string()),
        };
        self.transition(next, now);
    }

    /// The save was abandoned before the store answered
    pub fn cancel(&mut self, now: Instant) {
        if self.is_saving() {
            self.transition(SaveState::Error(CANCELLED.to_string()), now);
        }
    }

    fn transition(&mut self, next: SaveState, now: Instant) {
        info!(from = ?self.state, to = ?next, "Save state");
        self.state = next;
        self.since = Some(now);
    }
}

/// Host-side identity of the page being edited
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl PageDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            legacy_content: None,
            updated_at: None,
        }
    }

    pub fn with_legacy_content(mut self, content: impl Into<String>) -> Self {
        self.legacy_content = Some(content.into());
        self
    }

    /// The descriptor handed back to the host after a successful save
    pub fn published(&self, at: DateTime<Utc>) -> Self {
        Self {
            updated_at: Some(at),
            ..self.clone()
        }
    }

    /// Route segment for this page
    pub fn slug(&self) -> String {
        let mut slug = String::new();
        for c in self.name.trim().chars() {
            if c.is_alphanumeric() {
                slug.extend(c.to_lowercase());
            } else if !slug.is_empty() && !slug.ends_with('-') {
                slug.push('-');
            }
        }
        slug.trim_end_matches('-').to_string()
    }
}

/// Sends documents to a store, one at a time
pub struct Publisher<S: ContentStore> {
    store: S,
    // never held across an await
    status: StdMutex<SaveStatus>,
}

impl<S: ContentStore> Publisher<S> {
    pub fn new(store: S, display_for: Duration) -> Self {
        Self {
            store,
            status: StdMutex::new(SaveStatus::new(display_for)),
        }
    }

    /// Publisher using the configured status display interval
    pub fn from_config(store: S, config: &EditorConfig) -> Self {
        Self::new(store, config.save_status_display())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn status_at(&self, now: Instant) -> SaveState {
        self.status().state_at(now)
    }

    /// Save `document`, returning `page` stamped with the save time.
    ///
    /// A store failure leaves the status at `error` and is returned; the
    /// caller's tree is untouched either way.
    #[instrument(skip_all, fields(page = %page.name, bytes = document.len()))]
    pub async fn publish(&self, document: &str, page: &PageDescriptor) -> Result<PageDescriptor, PublishError> {
        self.status().begin(Instant::now())?;
        let in_flight = InFlight { status: &self.status };

        let result = self.store.save(document).await;
        in_flight.finish(&result);

        match result {
            Ok(()) => {
                info!("Published page");
                Ok(page.published(Utc::now()))
            }
            Err(e) => {
                warn!(error = %e, "Publish failed");
                Err(PublishError::Store(e))
            }
        }
    }

    fn status(&self) -> MutexGuard<'_, SaveStatus> {
        lock(&self.status)
    }
}

fn lock(status: &StdMutex<SaveStatus>) -> MutexGuard<'_, SaveStatus> {
    status.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Moves the status out of `saving` however the save ends
struct InFlight<'a> {
    status: &'a StdMutex<SaveStatus>,
}

impl InFlight<'_> {
    fn finish(self, result: &Result<(), StoreError>) {
        lock(self.status).finish(result, Instant::now());
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut status = lock(self.status);
        if status.is_saving() {
            warn!("Publish dropped before the store answered");
            status.cancel(Instant::now());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_status_reverts_to_idle() {
        let start = Instant::now();
        let mut status = SaveStatus::new(Duration::from_secs(2));
        assert_eq!(status.state_at(start), SaveState::Idle);

        status.begin(start).unwrap();
        assert_eq!(status.state_at(start + Duration::from_secs(60)), SaveState::Saving);
        assert!(matches!(status.begin(start), Err(PublishError::SaveInProgress)));

        status.finish(&Ok(()), start);
        assert_eq!(status.state_at(start + Duration::from_secs(1)), SaveState::Saved);
        assert_eq!(status.state_at(start + Duration::from_secs(2)), SaveState::Idle);

        status.begin(start).unwrap();
        status.finish(&Err(StoreError::Rejected("too big".to_string())), start);
        assert_eq!(
            status.state_at(start),
            SaveState::Error("Store rejected the document: too big".to_string())
        );
        assert_eq!(status.state_at(start + Duration::from_secs(3)), SaveState::Idle);
    }

    #[test]
    fn test_cancel_only_leaves_saving() {
        let start = Instant::now();
        let mut status = SaveStatus::new(Duration::from_secs(2));
        status.cancel(start);
        assert_eq!(status.state_at(start), SaveState::Idle);

        status.begin(start).unwrap();
        status.cancel(start);
        assert_eq!(status.state_at(start), SaveState::Error(CANCELLED.to_string()));
        assert!(status.begin(start).is_ok());
    }

    #[tokio::test]
    async fn test_dropped_publish_does_not_block_retry() {
        let publisher = Publisher::new(
            MemoryStore::new().with_latency(Duration::from_millis(200)),
            Duration::from_secs(2),
        );
        let page = PageDescriptor::new("About");

        let attempt = tokio::time::timeout(Duration::from_millis(20), publisher.publish("[]", &page)).await;
        assert!(attempt.is_err());
        assert_eq!(
            publisher.status_at(Instant::now()),
            SaveState::Error(CANCELLED.to_string())
        );

        publisher.publish("[]", &page).await.unwrap();
        assert_eq!(publisher.status_at(Instant::now()), SaveState::Saved);
        assert_eq!(publisher.store().save_count(), 1);
    }

    #[test]
    fn test_from_config_uses_display_interval() {
        let config = EditorConfig {
            save_status_display_ms: 50,
            ..EditorConfig::default()
        };
        let publisher = Publisher::from_config(MemoryStore::new(), &config);
        let mut status = lock(&publisher.status);
        let start = Instant::now();
        status.begin(start).unwrap();
        status.finish(&Ok(()), start);
        assert_eq!(status.state_at(start + Duration::from_millis(49)), SaveState::Saved);
        assert_eq!(status.state_at(start + Duration::from_millis(50)), SaveState::Idle);
    }

    #[test]
    fn test_slug() {
        assert_eq!(PageDescriptor::new("About Us").slug(), "about-us");
        assert_eq!(PageDescriptor::new("  Contact / Team! ").slug(), "contact-team");
        assert_eq!(PageDescriptor::new("درباره ما").slug(), "درباره-ما");
    }

    #[test]
    fn test_descriptor_serialization() {
        let page = PageDescriptor::new("About").with_legacy_content("<p>Hi</p>");
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "About", "legacyContent": "<p>Hi</p>" }));
    }
}
