//! Draft Store
//!
//! Holds the one market draft of a wizard session and broadcasts every
//! change to subscribed steps. The draft lives only as long as the store;
//! nothing is persisted.

use predictpix_core::{DraftPatch, MarketDraft, MergePolicy};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;
use tracing::debug;

/// Owner of the in-progress [`MarketDraft`]
///
/// Updates never validate; each step checks its own gate before calling
/// [`DraftStore::update`].
#[derive(Debug)]
pub struct DraftStore {
    tx: watch::Sender<MarketDraft>,
    policy: MergePolicy,
    /// Merges applied since creation or the last reset
    revision: AtomicU64,
}

impl DraftStore {
    /// Create a store holding an empty draft, with shallow merges
    pub fn new() -> Self {
        Self::with_policy(MergePolicy::Shallow)
    }

    /// Create a store with an explicit metadata merge policy
    pub fn with_policy(policy: MergePolicy) -> Self {
        let (tx, _rx) = watch::channel(MarketDraft::new());
        Self {
            tx,
            policy,
            revision: AtomicU64::new(0),
        }
    }

    /// Snapshot of the current draft
    pub fn get(&self) -> MarketDraft {
        self.tx.borrow().clone()
    }

    /// Merge `patch` into the draft, notify subscribers and return the new value
    pub fn update(&self, patch: &DraftPatch) -> MarketDraft {
        let next = self.tx.borrow().merged(patch, self.policy);
        self.tx.send_replace(next.clone());
        let revision = self.revision.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(
            "Draft updated (revision {}, missing: {:?})",
            revision,
            next.missing_fields()
        );
        next
    }

    /// Receiver that observes every subsequent draft value
    pub fn subscribe(&self) -> watch::Receiver<MarketDraft> {
        self.tx.subscribe()
    }

    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::Relaxed)
    }

    /// Discard the draft and start over with an empty one
    pub fn reset(&self) {
        self.tx.send_replace(MarketDraft::new());
        self.revision.store(0, Ordering::Relaxed);
        debug!("Draft reset");
    }

    pub fn merge_policy(&self) -> MergePolicy {
        self.policy
    }
}

impl Default for DraftStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use predictpix_core::{OutcomeMetadata, Tier};

    #[test]
    fn test_starts_empty() {
        let store = DraftStore::new();
        assert!(store.get().is_empty());
        assert_eq!(store.revision(), 0);
        assert_eq!(store.merge_policy(), MergePolicy::Shallow);
    }

    #[test]
    fn test_update_returns_merged_draft() {
        let store = DraftStore::new();
        store.update(&DraftPatch::new().tier(Tier::Basic));
        let draft = store.update(&DraftPatch::new().title("Will it rain on Friday?"));

        assert_eq!(draft.tier(), Some(Tier::Basic));
        assert_eq!(draft.title(), Some("Will it rain on Friday?"));
        assert_eq!(store.get(), draft);
        assert_eq!(store.revision(), 2);
    }

    #[test]
    fn test_repeated_update_is_idempotent() {
        let store = DraftStore::new();
        let once = store.update(&DraftPatch::new().title("X"));
        let twice = store.update(&DraftPatch::new().title("X"));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_shallow_metadata_replacement() {
        let store = DraftStore::new();
        store.update(&DraftPatch::new().metadata(OutcomeMetadata {
            yes: Some("A".into()),
            no: Some("B".into()),
            ..Default::default()
        }));
        let draft = store.update(&DraftPatch::new().metadata(OutcomeMetadata {
            yes: Some("C".into()),
            ..Default::default()
        }));

        assert_eq!(
            draft.metadata(),
            Some(&OutcomeMetadata {
                yes: Some("C".into()),
                ..Default::default()
            })
        );
    }

    #[test]
    fn test_deep_policy_keeps_siblings() {
        let store = DraftStore::with_policy(MergePolicy::DeepMetadata);
        store.update(&DraftPatch::new().metadata(OutcomeMetadata {
            yes: Some("A".into()),
            no: Some("B".into()),
            ..Default::default()
        }));
        let draft = store.update(&DraftPatch::new().metadata(OutcomeMetadata {
            yes: Some("C".into()),
            ..Default::default()
        }));

        let metadata = draft.metadata().unwrap();
        assert_eq!(metadata.yes.as_deref(), Some("C"));
        assert_eq!(metadata.no.as_deref(), Some("B"));
    }

    #[test]
    fn test_subscribers_see_updates() {
        let store = DraftStore::new();
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        store.update(&DraftPatch::new().title("Broadcast title"));

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().title(), Some("Broadcast title"));
    }

    #[test]
    fn test_reset_clears_draft() {
        let store = DraftStore::new();
        store.update(&DraftPatch::new().tier(Tier::Partner));
        let mut rx = store.subscribe();

        store.reset();

        assert!(store.get().is_empty());
        assert_eq!(store.revision(), 0);
        assert!(rx.borrow_and_update().is_empty());
    }
}
