//! Application facade
//!
//! [`PickupApp`] wires the catalog, the user and onboarding stores, the
//! generation client and swipe decks over one record store, and resolves
//! stored identifiers back into displayable lines.

use std::sync::Arc;

use app_core::{Catalog, CatalogItem, SearchParams};
use app_platform::{Clock, RandomSource, Scheduler, SystemClock};
use app_state::{is_generated_id, OnboardingStore, UserStateStore};
use app_ui::{SwipeConfig, SwipeController, SwipeItem, ViewRecorder};
use generation::{GenerationClient, LineGenerator};
use storage::{GeneratedLine, KvStore, MemoryRecordStore, RecordStore};

use crate::config::AppConfig;
use crate::error::Result;

/// A line from either the catalog or the user's saved generations
#[derive(Debug, Clone, PartialEq)]
pub enum PickupLine {
    /// Catalog line
    Catalog(CatalogItem),
    /// Saved generated line
    Generated(GeneratedLine),
}

impl PickupLine {
    /// Identifier
    pub fn id(&self) -> &str {
        match self {
            PickupLine::Catalog(item) => &item.id,
            PickupLine::Generated(line) => &line.id,
        }
    }

    /// Line text
    pub fn text(&self) -> &str {
        match self {
            PickupLine::Catalog(item) => &item.text,
            PickupLine::Generated(line) => &line.text,
        }
    }

    /// Category identifier
    pub fn category_id(&self) -> &str {
        match self {
            PickupLine::Catalog(item) => &item.category_id,
            PickupLine::Generated(line) => &line.category_id,
        }
    }

    /// Whether this is a saved generated line
    pub fn is_generated(&self) -> bool {
        matches!(self, PickupLine::Generated(_))
    }
}

impl SwipeItem for PickupLine {
    fn item_id(&self) -> &str {
        self.id()
    }
}

/// Application core
pub struct PickupApp {
    catalog: Catalog,
    user: Arc<UserStateStore>,
    onboarding: OnboardingStore,
    generator: Arc<dyn LineGenerator>,
    clock: Arc<dyn Clock>,
    swipe_config: SwipeConfig,
    kv: Option<KvStore>,
}

impl std::fmt::Debug for PickupApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PickupApp")
            .field("catalog_items", &self.catalog.len())
            .field("user", &self.user)
            .field("onboarding", &self.onboarding)
            .finish_non_exhaustive()
    }
}

impl PickupApp {
    /// Open the app with durable storage under the configured data directory
    pub fn open(config: AppConfig) -> Result<Self> {
        let kv = KvStore::open(&config.kv)?;
        tracing::info!(data_dir = %config.data_dir.display(), "Opening pickup lines store");
        Self::build(config, Arc::new(kv.clone()), Some(kv))
    }

    /// Open the app on a non-durable in-memory store
    pub fn in_memory(config: AppConfig) -> Result<Self> {
        Self::build(config, Arc::new(MemoryRecordStore::new()), None)
    }

    /// Open the app on a caller-supplied record store
    pub fn with_store(config: AppConfig, store: Arc<dyn RecordStore>) -> Result<Self> {
        Self::build(config, store, None)
    }

    fn build(config: AppConfig, store: Arc<dyn RecordStore>, kv: Option<KvStore>) -> Result<Self> {
        let catalog = Catalog::builtin()?;
        let user = Arc::new(UserStateStore::open(Arc::clone(&store)));
        let onboarding = OnboardingStore::open(Arc::clone(&store));
        let generator = Arc::new(GenerationClient::new(config.generation, store)?);

        Ok(Self {
            catalog,
            user,
            onboarding,
            generator,
            clock: Arc::new(SystemClock),
            swipe_config: config.swipe,
            kv,
        })
    }

    /// Replace the line generator
    pub fn with_generator(mut self, generator: Arc<dyn LineGenerator>) -> Self {
        self.generator = generator;
        self
    }

    /// Replace the clock used for the item of the day
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Line catalog
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// User state store
    pub fn user(&self) -> &Arc<UserStateStore> {
        &self.user
    }

    /// Onboarding store
    pub fn onboarding(&self) -> &OnboardingStore {
        &self.onboarding
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    /// Resolve an identifier to a catalog or saved generated line
    pub fn resolve(&self, id: &str) -> Option<PickupLine> {
        if is_generated_id(id) {
            return self.user.ai_generated_line(id).map(PickupLine::Generated);
        }
        self.catalog.item(id).cloned().map(PickupLine::Catalog)
    }

    /// Favorite lines in the order they were added
    ///
    /// Favorites whose line no longer exists are skipped.
    pub fn favorite_lines(&self) -> Vec<PickupLine> {
        self.resolve_all(&self.user.favorites())
    }

    /// Recently viewed lines, most recent first
    pub fn recently_viewed_lines(&self) -> Vec<PickupLine> {
        self.resolve_all(&self.user.recently_viewed())
    }

    fn resolve_all(&self, ids: &[String]) -> Vec<PickupLine> {
        ids.iter().filter_map(|id| self.resolve(id)).collect()
    }

    /// Display name of a line's category ("Custom" when unknown)
    pub fn category_name(&self, line: &PickupLine) -> &str {
        self.catalog.display_category_name(line.category_id())
    }

    // =========================================================================
    // Browsing
    // =========================================================================

    /// Today's line
    pub fn item_of_the_day(&self) -> Option<&CatalogItem> {
        self.catalog.item_of_the_day_now(self.clock.as_ref())
    }

    /// A random catalog line
    pub fn random_line(&self, rng: &mut dyn RandomSource) -> Option<&CatalogItem> {
        self.catalog.random_item(rng)
    }

    /// Search catalog text
    pub fn search(&self, query: &str) -> Vec<&CatalogItem> {
        self.catalog.search(&SearchParams::new(query))
    }

    // =========================================================================
    // Swipe decks
    // =========================================================================

    /// Deck over one category's lines
    pub fn category_deck(
        &self,
        category_id: &str,
        scheduler: Arc<dyn Scheduler>,
    ) -> Result<SwipeController<CatalogItem>> {
        let items = self.catalog.by_category(category_id).into_iter().cloned().collect();
        self.deck(items, scheduler)
    }

    /// Deck over the whole catalog
    pub fn catalog_deck(&self, scheduler: Arc<dyn Scheduler>) -> Result<SwipeController<CatalogItem>> {
        self.deck(self.catalog.items().to_vec(), scheduler)
    }

    /// Deck over the user's favorites
    pub fn favorites_deck(&self, scheduler: Arc<dyn Scheduler>) -> Result<SwipeController<PickupLine>> {
        self.deck(self.favorite_lines(), scheduler)
    }

    fn deck<T: SwipeItem>(
        &self,
        items: Vec<T>,
        scheduler: Arc<dyn Scheduler>,
    ) -> Result<SwipeController<T>> {
        let recorder: Arc<dyn ViewRecorder> = self.user.clone();
        Ok(SwipeController::new(items, self.swipe_config.clone(), scheduler, Some(recorder))?)
    }

    // =========================================================================
    // Generation
    // =========================================================================

    /// Generate a line for a category and tone
    pub async fn generate(&self, category_id: &str, tone: &str) -> Result<String> {
        Ok(self.generator.generate(category_id, tone).await?)
    }

    /// Keep a generated line in the user's collection, returning its id
    pub fn save_generated(&self, text: &str, category_id: &str, tone: &str) -> String {
        self.user.save_ai_generated_line(text, category_id, tone)
    }

    // =========================================================================
    // Storage
    // =========================================================================

    /// Flush buffered writes to disk
    pub fn flush(&self) -> Result<()> {
        if let Some(kv) = &self.kv {
            kv.flush()?;
        }
        Ok(())
    }
}
