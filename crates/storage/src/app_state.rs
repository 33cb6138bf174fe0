//! Persisted record schemas
//!
//! This module defines the shape of every record the application writes to
//! durable storage. Field names are camelCase to keep the documents stable
//! across releases; every field has a default so older or partial records
//! still load.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::kv::scoped_key;

/// Key of the user data record
pub const PICKUP_STORE_KEY: &str = "pickup-store";

/// Key of the onboarding record
pub const ONBOARDING_STORE_KEY: &str = "onboarding-store";

/// Scope under which per-category generation caches are stored
pub const GENERATION_CACHE_SCOPE: &str = "generation-cache";

/// Key of the generation cache for `category_id`
pub fn generation_cache_key(category_id: &str) -> String {
    scoped_key(&[GENERATION_CACHE_SCOPE, category_id])
}

/// A generated line the user chose to keep
///
/// Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedLine {
    /// Identifier (`ai-<millis>-<n>`)
    pub id: String,
    /// Line text
    pub text: String,
    /// Category the line was generated for
    pub category_id: String,
    /// Tone the line was generated with
    pub tone: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// User data record
///
/// # Example
///
/// ```rust
/// use storage::app_state::PickupRecord;
///
/// let record: PickupRecord = serde_json::from_str(r#"{"favorites":["3"]}"#).unwrap();
/// assert_eq!(record.favorites, vec!["3".to_string()]);
/// assert!(record.recently_viewed.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickupRecord {
    /// Favorite identifiers in the order they were added
    #[serde(default)]
    pub favorites: Vec<String>,

    /// Recently viewed identifiers, most recent first
    #[serde(default)]
    pub recently_viewed: Vec<String>,

    /// Ratings keyed by identifier
    #[serde(default)]
    pub user_ratings: HashMap<String, i64>,

    /// Saved generated lines, most recent first
    #[serde(default)]
    pub ai_generated_lines: Vec<GeneratedLine>,
}

/// Onboarding record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingRecord {
    /// Whether the onboarding flow has been completed
    #[serde(default)]
    pub has_completed_onboarding: bool,
}

/// Recently generated texts for one category, most recent first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationCacheRecord {
    /// Generated texts
    #[serde(default)]
    pub texts: Vec<String>,
}
