//! Onboarding completion flag

use parking_lot::RwLock;
use std::sync::Arc;

use storage::{OnboardingRecord, PersistedRecord, RecordStore, ONBOARDING_STORE_KEY};

/// Persisted "has the user finished onboarding" flag
pub struct OnboardingStore {
    state: RwLock<OnboardingRecord>,
    record: PersistedRecord<OnboardingRecord>,
}

impl std::fmt::Debug for OnboardingStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnboardingStore")
            .field("has_completed_onboarding", &self.has_completed_onboarding())
            .finish()
    }
}

impl OnboardingStore {
    /// Load the flag; missing or unreadable records mean "not completed"
    pub fn open(store: Arc<dyn RecordStore>) -> Self {
        let record = PersistedRecord::new(store, ONBOARDING_STORE_KEY);
        let state = record.load_or_default();
        Self { state: RwLock::new(state), record }
    }

    /// Whether onboarding has been completed
    pub fn has_completed_onboarding(&self) -> bool {
        self.state.read().has_completed_onboarding
    }

    /// Mark onboarding as completed
    pub fn set_onboarding_complete(&self) {
        self.set(true);
    }

    /// Show onboarding again on next launch
    pub fn reset_onboarding_status(&self) {
        self.set(false);
    }

    fn set(&self, completed: bool) {
        let mut state = self.state.write();
        state.has_completed_onboarding = completed;
        if let Err(e) = self.record.save(&state) {
            tracing::error!(key = %self.record.key(), error = %e, "Failed to persist onboarding state");
        }
        tracing::debug!(completed, "Onboarding state updated");
    }
}
