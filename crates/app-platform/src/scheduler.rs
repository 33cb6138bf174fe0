//! Timed callbacks
//!
//! Animation-driven state machines never sleep themselves. They ask a
//! [`Scheduler`] for a delay and get a [`TimerToken`] back; the host hands the
//! token back to the state machine once the delay has elapsed. With
//! [`ManualScheduler`] the host is the test itself and time is simulated.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

/// Identifies one requested delay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(u64);

impl TimerToken {
    /// Raw token value
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// A `delay(duration) -> completion` primitive
pub trait Scheduler: Send + Sync {
    /// Request a completion signal after `delay`
    fn delay(&self, delay: Duration) -> TimerToken;
}

// =============================================================================
// Manual (simulated clock) scheduler
// =============================================================================

#[derive(Debug, Default)]
struct ManualInner {
    now: Duration,
    next_id: u64,
    pending: Vec<(Duration, TimerToken)>,
}

/// Scheduler driven by a simulated clock
///
/// Cloning yields another handle onto the same timeline, so a test can keep
/// one handle while the state machine owns the other.
///
/// # Example
///
/// ```
/// use app_platform::scheduler::{ManualScheduler, Scheduler};
/// use std::time::Duration;
///
/// let scheduler = ManualScheduler::new();
/// let token = scheduler.delay(Duration::from_millis(400));
///
/// let mut fired = Vec::new();
/// scheduler.advance(Duration::from_millis(399), |t| fired.push(t));
/// assert!(fired.is_empty());
///
/// scheduler.advance(Duration::from_millis(1), |t| fired.push(t));
/// assert_eq!(fired, vec![token]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    inner: Arc<Mutex<ManualInner>>,
}

impl ManualScheduler {
    /// Create a scheduler at simulated time zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulated time
    pub fn now(&self) -> Duration {
        self.inner.lock().now
    }

    /// Number of delays that have not fired yet
    pub fn pending(&self) -> usize {
        self.inner.lock().pending.len()
    }

    /// Advance simulated time by `by`, firing due tokens in order
    ///
    /// Delays requested from inside `fire` are measured from the instant the
    /// firing timer was due, and fire in the same call if they fall within
    /// the window.
    pub fn advance(&self, by: Duration, mut fire: impl FnMut(TimerToken)) {
        let target = self.now() + by;

        loop {
            let next = {
                let mut inner = self.inner.lock();
                let earliest = inner
                    .pending
                    .iter()
                    .enumerate()
                    .filter(|(_, (due, _))| *due <= target)
                    .min_by_key(|(_, (due, token))| (*due, *token))
                    .map(|(index, _)| index);

                earliest.map(|index| {
                    let (due, token) = inner.pending.remove(index);
                    inner.now = due;
                    token
                })
            };

            match next {
                Some(token) => fire(token),
                None => break,
            }
        }

        self.inner.lock().now = target;
    }
}

impl Scheduler for ManualScheduler {
    fn delay(&self, delay: Duration) -> TimerToken {
        let mut inner = self.inner.lock();
        let token = TimerToken(inner.next_id);
        inner.next_id += 1;
        let due = inner.now + delay;
        inner.pending.push((due, token));
        token
    }
}

// =============================================================================
// Tokio scheduler
// =============================================================================

/// Scheduler backed by tokio timers
///
/// Elapsed tokens are delivered on the receiver returned by
/// [`TokioScheduler::new`]; the host loop forwards them to the state machine.
#[derive(Debug)]
pub struct TokioScheduler {
    handle: Handle,
    tx: mpsc::UnboundedSender<TimerToken>,
    next_id: AtomicU64,
}

impl TokioScheduler {
    /// Create a scheduler spawning timers on `handle`
    pub fn new(handle: Handle) -> (Self, mpsc::UnboundedReceiver<TimerToken>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { handle, tx, next_id: AtomicU64::new(0) }, rx)
    }

    /// Create a scheduler on the current runtime, if there is one
    pub fn from_current() -> Option<(Self, mpsc::UnboundedReceiver<TimerToken>)> {
        Handle::try_current().ok().map(Self::new)
    }
}

impl Scheduler for TokioScheduler {
    fn delay(&self, delay: Duration) -> TimerToken {
        let token = TimerToken(self.next_id.fetch_add(1, Ordering::SeqCst));
        let tx = self.tx.clone();

        self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            if tx.send(token).is_err() {
                tracing::debug!(token = token.id(), "Timer fired after receiver was dropped");
            }
        });

        token
    }
}
