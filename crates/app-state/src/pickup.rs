//! User state store
//!
//! Single source of truth for everything the user owns: favorites, recently
//! viewed lines, ratings and saved generated lines. Reads see every prior
//! write immediately. Each mutation rewrites the whole `pickup-store` record
//! and publishes a [`StoreEvent`] to subscribers.
//!
//! Persistence failures never reach the caller. They are logged and the
//! in-memory state keeps the mutation.

use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::broadcast;

use app_platform::{Clock, RandomSource, SystemClock, ThreadRandom};
use storage::{GeneratedLine, PersistedRecord, PickupRecord, RecordStore, PICKUP_STORE_KEY};

/// Maximum number of recently viewed identifiers kept
pub const MAX_RECENTLY_VIEWED: usize = 10;

/// Prefix of generated line identifiers
pub const GENERATED_ID_PREFIX: &str = "ai";

/// Exclusive upper bound of the random part of generated identifiers
pub const GENERATED_ID_SPREAD: u32 = 1000;

/// Capacity of the event channel
const EVENT_CAPACITY: usize = 64;

/// Check whether an identifier names a generated line
pub fn is_generated_id(id: &str) -> bool {
    id.strip_prefix(GENERATED_ID_PREFIX).is_some_and(|rest| rest.starts_with('-'))
}

/// Events published after each mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// A line was added to favorites
    FavoriteAdded(String),
    /// A line was removed from favorites
    FavoriteRemoved(String),
    /// Every favorite was removed
    FavoritesCleared,
    /// A line moved to the front of the recently viewed list
    Viewed(String),
    /// Viewing history was cleared
    RecentlyViewedCleared,
    /// A line was rated
    Rated {
        /// Line identifier
        id: String,
        /// New rating
        rating: i64,
    },
    /// Every rating was removed
    RatingsCleared,
    /// A generated line was saved
    GeneratedLineSaved(String),
    /// A generated line was deleted
    GeneratedLineRemoved(String),
    /// Every generated line was deleted
    GeneratedLinesCleared,
    /// All user data was reset
    Reset,
}

/// Counts shown on the settings screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserStats {
    /// Number of favorites
    pub favorites: usize,
    /// Number of recently viewed lines
    pub recently_viewed: usize,
    /// Number of rated lines
    pub rated: usize,
    /// Number of saved generated lines
    pub generated: usize,
}

#[derive(Debug, Default)]
struct PickupState {
    /// Favorites in insertion order
    favorites: Vec<String>,
    /// Membership index over `favorites`
    favorite_set: HashSet<String>,
    /// Most recent first
    recently_viewed: Vec<String>,
    ratings: HashMap<String, i64>,
    /// Most recent first
    generated: Vec<GeneratedLine>,
    /// Every generated identifier held or minted in this session
    known_generated_ids: HashSet<String>,
}

impl PickupState {
    /// Rebuild state from a persisted record, repairing invariants
    fn from_record(record: PickupRecord) -> Self {
        let mut state = Self::default();

        for id in record.favorites {
            if state.favorite_set.insert(id.clone()) {
                state.favorites.push(id);
            }
        }

        let mut seen = HashSet::new();
        state.recently_viewed = record
            .recently_viewed
            .into_iter()
            .filter(|id| seen.insert(id.clone()))
            .take(MAX_RECENTLY_VIEWED)
            .collect();

        state.ratings = record.user_ratings;

        for line in record.ai_generated_lines {
            if state.known_generated_ids.insert(line.id.clone()) {
                state.generated.push(line);
            }
        }

        state
    }

    fn to_record(&self) -> PickupRecord {
        PickupRecord {
            favorites: self.favorites.clone(),
            recently_viewed: self.recently_viewed.clone(),
            user_ratings: self.ratings.clone(),
            ai_generated_lines: self.generated.clone(),
        }
    }
}

/// Store for favorites, history, ratings and saved generated lines
///
/// # Example
///
/// ```
/// use app_state::pickup::UserStateStore;
/// use std::sync::Arc;
/// use storage::MemoryRecordStore;
///
/// let store = UserStateStore::open(Arc::new(MemoryRecordStore::new()));
/// store.add_favorite("12");
/// store.add_favorite("12");
/// assert_eq!(store.favorites(), vec!["12".to_string()]);
/// ```
pub struct UserStateStore {
    state: RwLock<PickupState>,
    record: PersistedRecord<PickupRecord>,
    clock: Arc<dyn Clock>,
    rng: Mutex<Box<dyn RandomSource>>,
    events_tx: broadcast::Sender<StoreEvent>,
}

impl std::fmt::Debug for UserStateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserStateStore")
            .field("key", &self.record.key())
            .field("stats", &self.stats())
            .finish()
    }
}

impl UserStateStore {
    /// Load the store from `store` using the system clock and randomness
    pub fn open(store: Arc<dyn RecordStore>) -> Self {
        Self::with_platform(store, Arc::new(SystemClock), Box::new(ThreadRandom))
    }

    /// Load the store with an explicit clock and random source
    ///
    /// Missing or unreadable records start the store empty.
    pub fn with_platform(
        store: Arc<dyn RecordStore>,
        clock: Arc<dyn Clock>,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        let record = PersistedRecord::new(store, PICKUP_STORE_KEY);
        let state = PickupState::from_record(record.load_or_default());
        let (events_tx, _) = broadcast::channel(EVENT_CAPACITY);

        tracing::info!(
            favorites = state.favorites.len(),
            generated = state.generated.len(),
            "Loaded user state"
        );

        Self { state: RwLock::new(state), record, clock, rng: Mutex::new(rng), events_tx }
    }

    /// Subscribe to mutation events
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events_tx.subscribe()
    }

    /// Apply `f`; when it reports an event, persist and publish it
    fn update<R>(&self, f: impl FnOnce(&mut PickupState) -> (R, Option<StoreEvent>)) -> R {
        let mut state = self.state.write();
        let (result, event) = f(&mut state);

        if let Some(event) = event {
            if let Err(e) = self.record.save(&state.to_record()) {
                tracing::error!(key = %self.record.key(), error = %e, "Failed to persist user state");
            }
            tracing::debug!(?event, "User state updated");
            let _ = self.events_tx.send(event);
        }

        result
    }

    // =========================================================================
    // Favorites
    // =========================================================================

    /// Add a favorite; adding an existing favorite does nothing
    pub fn add_favorite(&self, id: &str) {
        self.update(|state| {
            if !state.favorite_set.insert(id.to_string()) {
                return ((), None);
            }
            state.favorites.push(id.to_string());
            ((), Some(StoreEvent::FavoriteAdded(id.to_string())))
        })
    }

    /// Remove a favorite; removing a non-favorite does nothing
    pub fn remove_favorite(&self, id: &str) {
        self.update(|state| {
            if !state.favorite_set.remove(id) {
                return ((), None);
            }
            state.favorites.retain(|existing| existing != id);
            ((), Some(StoreEvent::FavoriteRemoved(id.to_string())))
        })
    }

    /// Flip favorite membership, returning the new membership
    pub fn toggle_favorite(&self, id: &str) -> bool {
        if self.is_favorite(id) {
            self.remove_favorite(id);
            false
        } else {
            self.add_favorite(id);
            true
        }
    }

    /// Check if a line is a favorite
    pub fn is_favorite(&self, id: &str) -> bool {
        self.state.read().favorite_set.contains(id)
    }

    /// Favorite identifiers in insertion order
    pub fn favorites(&self) -> Vec<String> {
        self.state.read().favorites.clone()
    }

    /// Remove every favorite
    pub fn clear_all_favorites(&self) {
        self.update(|state| {
            state.favorites.clear();
            state.favorite_set.clear();
            ((), Some(StoreEvent::FavoritesCleared))
        })
    }

    // =========================================================================
    // Recently viewed
    // =========================================================================

    /// Move `id` to the front of the recently viewed list
    pub fn add_recently_viewed(&self, id: &str) {
        self.update(|state| {
            if state.recently_viewed.first().map(String::as_str) == Some(id) {
                return ((), None);
            }
            state.recently_viewed.retain(|existing| existing != id);
            state.recently_viewed.insert(0, id.to_string());
            state.recently_viewed.truncate(MAX_RECENTLY_VIEWED);
            ((), Some(StoreEvent::Viewed(id.to_string())))
        })
    }

    /// Recently viewed identifiers, most recent first
    pub fn recently_viewed(&self) -> Vec<String> {
        self.state.read().recently_viewed.clone()
    }

    /// Clear viewing history
    pub fn clear_recently_viewed(&self) {
        self.update(|state| {
            state.recently_viewed.clear();
            ((), Some(StoreEvent::RecentlyViewedCleared))
        })
    }

    // =========================================================================
    // Ratings
    // =========================================================================

    /// Rate a line, replacing any earlier rating
    ///
    /// The value is stored as given; the 1 to 5 range is enforced by the UI.
    pub fn rate_pickup_line(&self, id: &str, rating: i64) {
        self.update(|state| {
            state.ratings.insert(id.to_string(), rating);
            ((), Some(StoreEvent::Rated { id: id.to_string(), rating }))
        })
    }

    /// The user's rating for a line
    pub fn user_rating(&self, id: &str) -> Option<i64> {
        self.state.read().ratings.get(id).copied()
    }

    /// Remove every rating
    pub fn clear_ratings(&self) {
        self.update(|state| {
            state.ratings.clear();
            ((), Some(StoreEvent::RatingsCleared))
        })
    }

    // =========================================================================
    // Generated lines
    // =========================================================================

    /// Save a generated line, returning its new identifier
    pub fn save_ai_generated_line(&self, text: &str, category_id: &str, tone: &str) -> String {
        self.update(|state| {
            let id = self.mint_generated_id(state);
            state.known_generated_ids.insert(id.clone());
            state.generated.insert(
                0,
                GeneratedLine {
                    id: id.clone(),
                    text: text.to_string(),
                    category_id: category_id.to_string(),
                    tone: tone.to_string(),
                    created_at: self.clock.now(),
                },
            );
            (id.clone(), Some(StoreEvent::GeneratedLineSaved(id)))
        })
    }

    /// Mint `ai-<unix-millis>-<n>`, redrawing `n` until the id is unused
    fn mint_generated_id(&self, state: &PickupState) -> String {
        let millis = self.clock.now().timestamp_millis();
        let format_id = |n: u32| format!("{GENERATED_ID_PREFIX}-{millis}-{n}");

        let mut rng = self.rng.lock();
        for _ in 0..GENERATED_ID_SPREAD {
            let id = format_id(rng.next_below(GENERATED_ID_SPREAD));
            if !state.known_generated_ids.contains(&id) {
                return id;
            }
        }

        // Random draws keep colliding; step past the random range
        let mut n = GENERATED_ID_SPREAD;
        loop {
            let id = format_id(n);
            if !state.known_generated_ids.contains(&id) {
                return id;
            }
            n += 1;
        }
    }

    /// Saved generated lines, most recent first
    pub fn ai_generated_lines(&self) -> Vec<GeneratedLine> {
        self.state.read().generated.clone()
    }

    /// Look up a saved generated line
    pub fn ai_generated_line(&self, id: &str) -> Option<GeneratedLine> {
        self.state.read().generated.iter().find(|line| line.id == id).cloned()
    }

    /// Delete a saved generated line; unknown ids do nothing
    pub fn remove_ai_generated_line(&self, id: &str) {
        self.update(|state| {
            let before = state.generated.len();
            state.generated.retain(|line| line.id != id);
            if state.generated.len() == before {
                return ((), None);
            }
            ((), Some(StoreEvent::GeneratedLineRemoved(id.to_string())))
        })
    }

    /// Delete every saved generated line
    pub fn clear_all_ai_generated_lines(&self) {
        self.update(|state| {
            state.generated.clear();
            ((), Some(StoreEvent::GeneratedLinesCleared))
        })
    }

    // =========================================================================
    // Whole store
    // =========================================================================

    /// Counts for the settings screen
    pub fn stats(&self) -> UserStats {
        let state = self.state.read();
        UserStats {
            favorites: state.favorites.len(),
            recently_viewed: state.recently_viewed.len(),
            rated: state.ratings.len(),
            generated: state.generated.len(),
        }
    }

    /// Clear all user data
    pub fn reset_all(&self) {
        self.update(|state| {
            state.favorites.clear();
            state.favorite_set.clear();
            state.recently_viewed.clear();
            state.ratings.clear();
            state.generated.clear();
            ((), Some(StoreEvent::Reset))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use app_platform::{ManualClock, SequenceRandom};
    use chrono::{Duration, TimeZone, Utc};
    use mockall::mock;
    use storage::{KvError, KvStore, MemoryRecordStore};

    mock! {
        Backend {}

        impl RecordStore for Backend {
            fn read(&self, key: &str) -> storage::kv::Result<Option<Vec<u8>>>;
            fn write(&self, key: &str, bytes: Vec<u8>) -> storage::kv::Result<()>;
            fn delete(&self, key: &str) -> storage::kv::Result<bool>;
        }
    }

    fn clock() -> Arc<ManualClock> {
        Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 2, 14, 9, 0, 0).unwrap()))
    }

    fn memory_store() -> (Arc<MemoryRecordStore>, UserStateStore) {
        let backend = Arc::new(MemoryRecordStore::new());
        let store = UserStateStore::open(backend.clone());
        (backend, store)
    }

    // =========================================================================
    // Favorites
    // =========================================================================

    #[test]
    fn test_add_favorite_is_idempotent() {
        let (_, store) = memory_store();
        store.add_favorite("1");
        store.add_favorite("1");
        store.add_favorite("2");

        assert_eq!(store.favorites(), vec!["1", "2"]);
        assert!(store.is_favorite("1"));
        assert!(!store.is_favorite("3"));
    }

    #[test]
    fn test_remove_non_favorite_is_noop() {
        let (_, store) = memory_store();
        store.add_favorite("1");
        store.remove_favorite("9");
        assert_eq!(store.favorites(), vec!["1"]);
    }

    #[test]
    fn test_favorite_sequence_final_state_matches_last_operation() {
        let (_, store) = memory_store();
        let ops = [true, true, false, true, false, false, true, true];

        for &add in &ops {
            if add {
                store.add_favorite("7");
            } else {
                store.remove_favorite("7");
            }
            assert!(store.favorites().len() <= 1);
        }

        assert_eq!(store.is_favorite("7"), *ops.last().unwrap());
    }

    #[test]
    fn test_favorites_keep_insertion_order() {
        let (_, store) = memory_store();
        for id in ["5", "2", "ai-1-1", "9"] {
            store.add_favorite(id);
        }
        store.remove_favorite("2");
        store.add_favorite("2");
        assert_eq!(store.favorites(), vec!["5", "ai-1-1", "9", "2"]);
    }

    #[test]
    fn test_toggle_favorite() {
        let (_, store) = memory_store();
        assert!(store.toggle_favorite("3"));
        assert!(store.is_favorite("3"));
        assert!(!store.toggle_favorite("3"));
        assert!(!store.is_favorite("3"));
    }

    #[test]
    fn test_clear_all_favorites() {
        let (_, store) = memory_store();
        store.add_favorite("1");
        store.add_favorite("2");
        store.clear_all_favorites();

        assert!(store.favorites().is_empty());
        assert!(!store.is_favorite("1"));
    }

    // =========================================================================
    // Recently viewed
    // =========================================================================

    #[test]
    fn test_recently_viewed_moves_to_front() {
        let (_, store) = memory_store();
        store.add_recently_viewed("1");
        store.add_recently_viewed("2");
        store.add_recently_viewed("1");

        assert_eq!(store.recently_viewed(), vec!["1", "2"]);
    }

    #[test]
    fn test_recently_viewed_bounded() {
        let (_, store) = memory_store();
        for i in 0..25 {
            store.add_recently_viewed(&(i % 13).to_string());

            let viewed = store.recently_viewed();
            assert!(viewed.len() <= MAX_RECENTLY_VIEWED);
            assert_eq!(viewed[0], (i % 13).to_string());
            let unique: HashSet<&String> = viewed.iter().collect();
            assert_eq!(unique.len(), viewed.len());
        }
    }

    #[test]
    fn test_clear_recently_viewed() {
        let (_, store) = memory_store();
        store.add_recently_viewed("1");
        store.clear_recently_viewed();
        assert!(store.recently_viewed().is_empty());
    }

    // =========================================================================
    // Ratings
    // =========================================================================

    #[test]
    fn test_rating_overwrites() {
        let (_, store) = memory_store();
        assert_eq!(store.user_rating("4"), None);

        store.rate_pickup_line("4", 2);
        store.rate_pickup_line("4", 5);
        assert_eq!(store.user_rating("4"), Some(5));
        assert_eq!(store.stats().rated, 1);
    }

    #[test]
    fn test_rating_is_not_validated() {
        let (_, store) = memory_store();
        store.rate_pickup_line("4", 42);
        assert_eq!(store.user_rating("4"), Some(42));
    }

    #[test]
    fn test_clear_ratings() {
        let (_, store) = memory_store();
        store.rate_pickup_line("1", 3);
        store.clear_ratings();
        assert_eq!(store.user_rating("1"), None);
    }

    // =========================================================================
    // Generated lines
    // =========================================================================

    #[test]
    fn test_saved_lines_have_distinct_ids_most_recent_first() {
        let (_, store) = memory_store();
        let ids: Vec<String> = (0..20)
            .map(|i| store.save_ai_generated_line(&format!("line {i}"), "funny", "witty"))
            .collect();

        let unique: HashSet<&String> = ids.iter().collect();
        assert_eq!(unique.len(), 20);

        let lines = store.ai_generated_lines();
        assert_eq!(lines.len(), 20);
        assert_eq!(lines[0].text, "line 19");
        assert_eq!(lines[19].text, "line 0");
        assert!(ids.iter().all(|id| is_generated_id(id)));
    }

    #[test]
    fn test_is_generated_id() {
        assert!(is_generated_id("ai-1700000000000-42"));
        assert!(!is_generated_id("42"));
        assert!(!is_generated_id("aim-high"));
        assert!(!is_generated_id("ai"));
    }

    #[test]
    fn test_generated_id_format_and_collision_redraw() {
        let backend: Arc<dyn RecordStore> = Arc::new(MemoryRecordStore::new());
        let clock = clock();
        let store = UserStateStore::with_platform(
            backend,
            clock.clone(),
            Box::new(SequenceRandom::new(vec![7, 7, 7, 8])),
        );

        let millis = clock.now().timestamp_millis();
        let first = store.save_ai_generated_line("a", "funny", "witty");
        let second = store.save_ai_generated_line("b", "funny", "witty");

        assert_eq!(first, format!("ai-{millis}-7"));
        assert_eq!(second, format!("ai-{millis}-8"));
    }

    #[test]
    fn test_generated_id_never_reuses_removed_id() {
        let backend: Arc<dyn RecordStore> = Arc::new(MemoryRecordStore::new());
        let store = UserStateStore::with_platform(
            backend,
            clock(),
            Box::new(SequenceRandom::new(vec![3])),
        );

        let first = store.save_ai_generated_line("a", "funny", "witty");
        store.remove_ai_generated_line(&first);
        let second = store.save_ai_generated_line("b", "funny", "witty");

        // Every random draw collides, so the store steps past the range
        assert_ne!(first, second);
        assert!(second.ends_with("-1000"));
    }

    #[test]
    fn test_saved_line_fields() {
        let backend: Arc<dyn RecordStore> = Arc::new(MemoryRecordStore::new());
        let clock = clock();
        let store =
            UserStateStore::with_platform(backend, clock.clone(), Box::new(SequenceRandom::new(vec![1])));

        clock.advance(Duration::seconds(30));
        let id = store.save_ai_generated_line("Are you Wi-Fi?", "nerdy", "playful");
        let line = store.ai_generated_line(&id).unwrap();

        assert_eq!(line.text, "Are you Wi-Fi?");
        assert_eq!(line.category_id, "nerdy");
        assert_eq!(line.tone, "playful");
        assert_eq!(line.created_at, Utc.with_ymd_and_hms(2024, 2, 14, 9, 0, 30).unwrap());
        assert!(store.ai_generated_line("ai-0-0").is_none());
    }

    #[test]
    fn test_remove_and_clear_generated_lines() {
        let (_, store) = memory_store();
        let a = store.save_ai_generated_line("a", "funny", "witty");
        let b = store.save_ai_generated_line("b", "sweet", "tender");

        store.remove_ai_generated_line(&a);
        store.remove_ai_generated_line("ai-missing");
        assert_eq!(store.ai_generated_lines().len(), 1);
        assert_eq!(store.ai_generated_lines()[0].id, b);

        store.clear_all_ai_generated_lines();
        assert!(store.ai_generated_lines().is_empty());
    }

    #[test]
    fn test_removing_generated_line_keeps_favorite() {
        let (_, store) = memory_store();
        let id = store.save_ai_generated_line("a", "funny", "witty");
        store.add_favorite(&id);
        store.remove_ai_generated_line(&id);
        assert!(store.is_favorite(&id));
    }

    // =========================================================================
    // Whole store
    // =========================================================================

    #[test]
    fn test_stats_and_reset_all() {
        let (_, store) = memory_store();
        store.add_favorite("1");
        store.add_recently_viewed("1");
        store.add_recently_viewed("2");
        store.rate_pickup_line("1", 4);
        store.save_ai_generated_line("x", "funny", "witty");

        assert_eq!(
            store.stats(),
            UserStats { favorites: 1, recently_viewed: 2, rated: 1, generated: 1 }
        );

        store.reset_all();
        assert_eq!(store.stats(), UserStats::default());
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    #[test]
    fn test_state_survives_reload() {
        let (backend, store) = memory_store();
        store.add_favorite("3");
        store.add_recently_viewed("3");
        store.rate_pickup_line("3", 5);
        let id = store.save_ai_generated_line("x", "clever", "smart");
        drop(store);

        let reloaded = UserStateStore::open(backend);
        assert_eq!(reloaded.favorites(), vec!["3"]);
        assert_eq!(reloaded.recently_viewed(), vec!["3"]);
        assert_eq!(reloaded.user_rating("3"), Some(5));
        assert_eq!(reloaded.ai_generated_line(&id).unwrap().text, "x");
    }

    #[test]
    fn test_state_survives_reload_on_kv() {
        let backend: Arc<dyn RecordStore> = Arc::new(KvStore::in_memory().unwrap());
        let store = UserStateStore::open(backend.clone());
        store.add_favorite("8");
        drop(store);

        assert!(UserStateStore::open(backend).is_favorite("8"));
    }

    #[test]
    fn test_corrupt_record_starts_empty() {
        let backend = Arc::new(MemoryRecordStore::new());
        backend.write(PICKUP_STORE_KEY, b"\x00\x01garbage".to_vec()).unwrap();

        let store = UserStateStore::open(backend);
        assert_eq!(store.stats(), UserStats::default());
    }

    #[test]
    fn test_loaded_record_is_repaired() {
        let backend = Arc::new(MemoryRecordStore::new());
        let record = PickupRecord {
            favorites: vec!["1".into(), "1".into(), "2".into()],
            recently_viewed: (0..15).map(|i| i.to_string()).collect(),
            ..Default::default()
        };
        backend.write(PICKUP_STORE_KEY, storage::persistence::encode(&record).unwrap()).unwrap();

        let store = UserStateStore::open(backend);
        assert_eq!(store.favorites(), vec!["1", "2"]);
        assert_eq!(store.recently_viewed().len(), MAX_RECENTLY_VIEWED);
    }

    #[test]
    fn test_write_failure_keeps_in_memory_state() {
        let mut backend = MockBackend::new();
        backend.expect_read().returning(|_| Ok(None));
        backend
            .expect_write()
            .times(2)
            .returning(|_, _| Err(KvError::Unavailable("disk full".into())));

        let store = UserStateStore::open(Arc::new(backend));
        store.add_favorite("1");
        store.rate_pickup_line("1", 3);

        assert!(store.is_favorite("1"));
        assert_eq!(store.user_rating("1"), Some(3));
    }

    #[test]
    fn test_read_failure_starts_empty() {
        let mut backend = MockBackend::new();
        backend.expect_read().returning(|_| Err(KvError::Unavailable("locked".into())));
        backend.expect_write().returning(|_, _| Ok(()));

        let store = UserStateStore::open(Arc::new(backend));
        assert!(store.favorites().is_empty());
        store.add_favorite("1");
        assert!(store.is_favorite("1"));
    }

    #[test]
    fn test_every_mutation_persists() {
        let mut backend = MockBackend::new();
        backend.expect_read().returning(|_| Ok(None));
        backend
            .expect_write()
            .withf(|key, _| key == PICKUP_STORE_KEY)
            .times(4)
            .returning(|_, _| Ok(()));

        let store = UserStateStore::open(Arc::new(backend));
        store.add_favorite("1");
        store.add_recently_viewed("1");
        store.rate_pickup_line("1", 4);
        store.save_ai_generated_line("x", "funny", "witty");
    }

    // =========================================================================
    // Events
    // =========================================================================

    #[test]
    fn test_subscribers_receive_events() {
        let (_, store) = memory_store();
        let mut rx = store.subscribe();

        store.add_favorite("1");
        store.add_favorite("1");
        store.rate_pickup_line("1", 5);
        store.reset_all();

        assert_eq!(rx.try_recv().unwrap(), StoreEvent::FavoriteAdded("1".into()));
        assert_eq!(rx.try_recv().unwrap(), StoreEvent::Rated { id: "1".into(), rating: 5 });
        assert_eq!(rx.try_recv().unwrap(), StoreEvent::Reset);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_mutations_without_subscribers() {
        let (_, store) = memory_store();
        store.add_favorite("1");
        assert!(store.is_favorite("1"));
    }
}
