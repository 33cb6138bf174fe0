//! Swipe deck controller
//!
//! A state machine for traversing a cyclic deck of cards with horizontal
//! drags, plus discrete forward/backward advances for keys and buttons.
//!
//! ```text
//!        start / move (horizontal)    release |dx| > threshold
//!   Idle ───────────────────▶ Dragging ─────────────────────▶ Committing(dir)
//!    ▲                           │                                 │ commit timer
//!    │        reset timer        │ release |dx| <= threshold       ▼
//!    └──────── Resetting ◀───────┘                             Settling
//!    ▲                                                             │ settle timer
//!    └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Timed phases request a delay from a [`Scheduler`] and wait for the host to
//! hand the token back through [`SwipeController::on_timer`]. Gesture input
//! arriving while a phase is animating is dropped, never queued.

use std::sync::Arc;
use std::time::Duration;

use app_core::CatalogItem;
use app_platform::{Scheduler, TimerToken};
use app_state::UserStateStore;

use crate::transform::{CardTransform, Offset, EXIT_DISTANCE_FACTOR, MAX_ROTATION_DEG};

/// Errors that can occur when building a swipe deck
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SwipeError {
    /// The deck has no cards
    #[error("Swipe deck must contain at least one item")]
    EmptySequence,
}

/// Result type for swipe operations
pub type Result<T> = std::result::Result<T, SwipeError>;

/// Anything that can sit in a swipe deck
pub trait SwipeItem {
    /// Identifier recorded when the card is viewed
    fn item_id(&self) -> &str;
}

impl SwipeItem for CatalogItem {
    fn item_id(&self) -> &str {
        &self.id
    }
}

impl SwipeItem for String {
    fn item_id(&self) -> &str {
        self
    }
}

/// Receives "this card was shown" notifications
#[cfg_attr(test, mockall::automock)]
pub trait ViewRecorder: Send + Sync {
    /// Record that the card with `id` became the current card
    fn record_view(&self, id: &str);
}

impl ViewRecorder for UserStateStore {
    fn record_view(&self, id: &str) {
        self.add_recently_viewed(id);
    }
}

/// Exit direction of a committed card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    /// Card leaves to the left (backward gesture)
    Left,
    /// Card leaves to the right (forward gesture)
    Right,
}

impl SwipeDirection {
    fn sign(self) -> f32 {
        match self {
            SwipeDirection::Left => -1.0,
            SwipeDirection::Right => 1.0,
        }
    }
}

/// Controller phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwipePhase {
    /// Waiting for input
    #[default]
    Idle,
    /// Following a drag
    Dragging,
    /// Springing back to the origin after a short drag
    Resetting,
    /// Flying off-screen before advancing
    Committing(SwipeDirection),
    /// Advanced; waiting out the settle delay
    Settling,
}

impl SwipePhase {
    /// Whether the card is animating (input is dropped)
    pub fn is_animating(&self) -> bool {
        matches!(self, SwipePhase::Resetting | SwipePhase::Committing(_) | SwipePhase::Settling)
    }
}

/// Swipe tuning
#[derive(Debug, Clone, PartialEq)]
pub struct SwipeConfig {
    /// Viewport width in points
    pub viewport_width: f32,
    /// Horizontal distance beyond which a release commits
    pub threshold: f32,
    /// Duration of the off-screen animation
    pub commit_duration: Duration,
    /// Duration of the return-to-origin animation
    pub reset_duration: Duration,
    /// Delay between advancing and accepting input again
    pub settle_delay: Duration,
    /// Rotation at half the viewport width, in degrees
    pub max_rotation_deg: f32,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            viewport_width: 390.0,
            threshold: 120.0,
            commit_duration: Duration::from_millis(400),
            reset_duration: Duration::from_millis(250),
            settle_delay: Duration::from_millis(100),
            max_rotation_deg: MAX_ROTATION_DEG,
        }
    }
}

impl SwipeConfig {
    /// Create a configuration for a viewport width
    pub fn new(viewport_width: f32) -> Self {
        Self { viewport_width, ..Default::default() }
    }

    /// Set the commit threshold
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the commit animation duration
    pub fn with_commit_duration(mut self, duration: Duration) -> Self {
        self.commit_duration = duration;
        self
    }

    /// Set the reset animation duration
    pub fn with_reset_duration(mut self, duration: Duration) -> Self {
        self.reset_duration = duration;
        self
    }

    /// Set the settle delay
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Set the maximum rotation
    pub fn with_max_rotation(mut self, degrees: f32) -> Self {
        self.max_rotation_deg = degrees;
        self
    }
}

/// What the outstanding timer completes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Reset,
    Commit(SwipeDirection),
    Settle,
}

type SwipeCallback = Box<dyn FnMut() + Send>;

/// Swipe deck controller
///
/// # Example
///
/// ```
/// use app_platform::ManualScheduler;
/// use app_ui::swipe::{SwipeConfig, SwipeController};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let scheduler = ManualScheduler::new();
/// let deck = vec!["a".to_string(), "b".to_string(), "c".to_string()];
/// let mut controller =
///     SwipeController::new(deck, SwipeConfig::new(400.0), Arc::new(scheduler.clone()), None)
///         .unwrap();
///
/// controller.on_drag_move(150.0, 0.0);
/// controller.on_drag_release(150.0, 0.0);
/// scheduler.advance(Duration::from_millis(500), |token| {
///     controller.on_timer(token);
/// });
///
/// assert_eq!(controller.current_index(), 1);
/// assert!(!controller.is_animating());
/// ```
pub struct SwipeController<T> {
    items: Vec<T>,
    config: SwipeConfig,
    scheduler: Arc<dyn Scheduler>,
    recorder: Option<Arc<dyn ViewRecorder>>,
    current_index: usize,
    drag_offset: Offset,
    phase: SwipePhase,
    pending: Option<(TimerToken, Pending)>,
    on_swipe_left: Option<SwipeCallback>,
    on_swipe_right: Option<SwipeCallback>,
}

impl<T> std::fmt::Debug for SwipeController<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwipeController")
            .field("len", &self.items.len())
            .field("current_index", &self.current_index)
            .field("drag_offset", &self.drag_offset)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl<T: SwipeItem> SwipeController<T> {
    /// Create a controller showing the first card
    ///
    /// The first card is reported to `recorder` immediately.
    pub fn new(
        items: Vec<T>,
        config: SwipeConfig,
        scheduler: Arc<dyn Scheduler>,
        recorder: Option<Arc<dyn ViewRecorder>>,
    ) -> Result<Self> {
        if items.is_empty() {
            return Err(SwipeError::EmptySequence);
        }

        let controller = Self {
            items,
            config,
            scheduler,
            recorder,
            current_index: 0,
            drag_offset: Offset::ORIGIN,
            phase: SwipePhase::Idle,
            pending: None,
            on_swipe_left: None,
            on_swipe_right: None,
        };
        controller.record_current();
        Ok(controller)
    }

    /// Run `callback` whenever a card leaves to the left
    pub fn on_swipe_left(mut self, callback: impl FnMut() + Send + 'static) -> Self {
        self.on_swipe_left = Some(Box::new(callback));
        self
    }

    /// Run `callback` whenever a card leaves to the right
    pub fn on_swipe_right(mut self, callback: impl FnMut() + Send + 'static) -> Self {
        self.on_swipe_right = Some(Box::new(callback));
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Index of the current card
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The current card
    pub fn current_item(&self) -> &T {
        &self.items[self.current_index]
    }

    /// The card underneath, absent for single-card decks
    pub fn next_item(&self) -> Option<&T> {
        if self.items.len() < 2 {
            return None;
        }
        self.items.get((self.current_index + 1) % self.items.len())
    }

    /// All cards
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Number of cards, at least one
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Current drag offset
    pub fn drag_offset(&self) -> Offset {
        self.drag_offset
    }

    /// Current phase
    pub fn phase(&self) -> SwipePhase {
        self.phase
    }

    /// Whether an animation is running
    pub fn is_animating(&self) -> bool {
        self.phase.is_animating()
    }

    /// Get the configuration
    pub fn config(&self) -> &SwipeConfig {
        &self.config
    }

    /// Visual transform of the top card for the current offset
    pub fn transform(&self) -> CardTransform {
        CardTransform::for_drag(
            self.drag_offset,
            self.config.viewport_width,
            self.config.max_rotation_deg,
        )
    }

    /// Where the running animation is heading, if one is running
    pub fn animation_target(&self) -> Option<Offset> {
        match self.phase {
            SwipePhase::Resetting => Some(Offset::ORIGIN),
            SwipePhase::Committing(direction) => Some(Offset::new(
                direction.sign() * EXIT_DISTANCE_FACTOR * self.config.viewport_width,
                0.0,
            )),
            _ => None,
        }
    }

    // =========================================================================
    // Gesture input
    // =========================================================================

    /// Finger touched the card
    ///
    /// Claims the gesture unless an animation is running. Returns whether
    /// the drag started.
    pub fn on_drag_start(&mut self) -> bool {
        if self.phase != SwipePhase::Idle {
            return false;
        }
        self.phase = SwipePhase::Dragging;
        self.drag_offset = Offset::ORIGIN;
        tracing::debug!("Swipe drag started");
        true
    }

    /// Feed a movement sample (cumulative `dx`, `dy` since touch-down)
    ///
    /// Without a preceding [`on_drag_start`](Self::on_drag_start), an idle
    /// card is only claimed by a horizontally dominant movement. Returns
    /// whether the sample was applied.
    pub fn on_drag_move(&mut self, dx: f32, dy: f32) -> bool {
        match self.phase {
            SwipePhase::Idle => {
                if dx.abs() <= (dy * 2.0).abs() {
                    return false;
                }
                self.phase = SwipePhase::Dragging;
                tracing::debug!(dx, dy, "Swipe drag claimed by movement");
            }
            SwipePhase::Dragging => {}
            _ => return false,
        }

        self.drag_offset = Offset::new(dx, dy);
        true
    }

    /// Finger lifted at cumulative (`dx`, `dy`)
    ///
    /// Beyond the threshold the card commits in the drag direction,
    /// otherwise it springs back. Ignored unless a drag is in progress.
    pub fn on_drag_release(&mut self, dx: f32, dy: f32) {
        if self.phase != SwipePhase::Dragging {
            return;
        }

        self.drag_offset = Offset::new(dx, dy);
        if dx > self.config.threshold {
            self.commit(SwipeDirection::Right);
        } else if dx < -self.config.threshold {
            self.commit(SwipeDirection::Left);
        } else {
            self.start_reset();
        }
    }

    /// Gesture taken away by the system; springs the card back
    pub fn on_drag_cancel(&mut self) {
        if self.phase == SwipePhase::Dragging {
            self.start_reset();
        }
    }

    /// Advance as if swiped right (e.g., right arrow key)
    ///
    /// Returns false when dropped because an animation is running.
    pub fn advance_forward(&mut self) -> bool {
        self.advance(SwipeDirection::Right)
    }

    /// Advance as if swiped left (e.g., left arrow key)
    ///
    /// The deck still moves to the next card; only the exit animation and
    /// callback differ. Returns false when dropped.
    pub fn advance_backward(&mut self) -> bool {
        self.advance(SwipeDirection::Left)
    }

    fn advance(&mut self, direction: SwipeDirection) -> bool {
        if self.is_animating() {
            tracing::debug!(?direction, "Advance dropped while animating");
            return false;
        }
        self.commit(direction);
        true
    }

    // =========================================================================
    // Timed transitions
    // =========================================================================

    /// Deliver an elapsed timer
    ///
    /// Tokens the controller is not waiting for are ignored. Returns whether
    /// the token advanced the state machine.
    pub fn on_timer(&mut self, token: TimerToken) -> bool {
        let pending = match self.pending {
            Some((expected, pending)) if expected == token => pending,
            _ => return false,
        };
        self.pending = None;

        match pending {
            Pending::Reset => {
                self.drag_offset = Offset::ORIGIN;
                self.phase = SwipePhase::Idle;
            }
            Pending::Commit(direction) => self.finish_commit(direction),
            Pending::Settle => {
                self.phase = SwipePhase::Idle;
                tracing::debug!(index = self.current_index, "Swipe settled");
            }
        }
        true
    }

    fn start_reset(&mut self) {
        self.phase = SwipePhase::Resetting;
        self.schedule(self.config.reset_duration, Pending::Reset);
    }

    fn commit(&mut self, direction: SwipeDirection) {
        tracing::debug!(?direction, index = self.current_index, "Swipe committing");
        self.phase = SwipePhase::Committing(direction);
        self.schedule(self.config.commit_duration, Pending::Commit(direction));
    }

    fn finish_commit(&mut self, direction: SwipeDirection) {
        let callback = match direction {
            SwipeDirection::Left => self.on_swipe_left.as_mut(),
            SwipeDirection::Right => self.on_swipe_right.as_mut(),
        };
        if let Some(callback) = callback {
            callback();
        }

        self.current_index = (self.current_index + 1) % self.items.len();
        self.drag_offset = Offset::ORIGIN;
        self.record_current();

        self.phase = SwipePhase::Settling;
        self.schedule(self.config.settle_delay, Pending::Settle);
    }

    fn schedule(&mut self, delay: Duration, pending: Pending) {
        let token = self.scheduler.delay(delay);
        self.pending = Some((token, pending));
    }

    fn record_current(&self) {
        if let Some(recorder) = &self.recorder {
            recorder.record_view(self.current_item().item_id());
        }
    }
}
