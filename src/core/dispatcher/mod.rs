//! Single-flight command dispatcher.
//!
//! The Discord gateway delivers events at least once, and users double-click.
//! Before a command handler runs, the dispatcher decides whether this exact
//! event has been seen, whether the same user is already running the same
//! action, and whether that action was started too recently. Only an
//! [`Decision::Admitted`] call may run its handler.
//!
//! All three registries live behind one mutex so that check-and-record is a
//! single step: of any number of racing admissions for one key, exactly one
//! is admitted.
//!
//! ```text
//! admit(event, key)
//!   event seen within retention      -> DuplicateEvent
//!   key in flight (within timeout)   -> Busy
//!   key started within cooldown      -> Cooldown { remaining }
//!   otherwise record all three       -> Admitted
//! ```

mod clock;
mod registry;

pub use clock::{Clock, ManualClock, SystemClock};
pub use registry::Registry;

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace};

/// Identity of "this actor doing this action".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActionKey {
    actor: String,
    action: String,
}

impl ActionKey {
    /// Key for an action with no particular target (e.g. `inventory`).
    #[must_use]
    pub fn new(actor: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
            action: action.into(),
        }
    }

    /// Key for a command aimed at one entity, e.g. `add:glock`.
    #[must_use]
    pub fn with_target(actor: impl Into<String>, command: &str, target: &str) -> Self {
        Self::new(actor, format!("{command}:{target}"))
    }

    /// The user who issued the action.
    #[must_use]
    pub fn actor(&self) -> &str {
        &self.actor
    }

    /// The action identifier.
    #[must_use]
    pub fn action(&self) -> &str {
        &self.action
    }
}

impl fmt::Display for ActionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.actor, self.action)
    }
}

/// Raw upstream event identifier (message or interaction id).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventId(String);

impl From<u64> for EventId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for EventId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for EventId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The event id was already admitted within the retention horizon.
    DuplicateEvent,
    /// The key was started less than one cooldown window ago.
    Cooldown {
        /// Time left until the key may be admitted again
        remaining: Duration,
    },
    /// Another execution of the key is still running.
    Busy,
    /// The caller may run the handler and must release the key afterwards.
    Admitted,
}

impl Decision {
    /// Whether the handler may run.
    #[must_use]
    pub const fn is_admitted(self) -> bool {
        matches!(self, Self::Admitted)
    }
}

/// Timing knobs for the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Minimum spacing between two admitted starts of the same key
    pub cooldown_window: Duration,
    /// How long an in-flight entry blocks its key if the handler never returns
    pub busy_timeout: Duration,
    /// How long a raw event id is remembered
    pub event_retention: Duration,
    /// Period of the background sweep task
    pub sweep_interval: Duration,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            cooldown_window: Duration::from_secs(2),
            busy_timeout: Duration::from_secs(30),
            event_retention: Duration::from_secs(60),
            sweep_interval: Duration::from_secs(300),
        }
    }
}

/// Entry counts of the three registries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatcherStats {
    /// Remembered event ids
    pub seen_events: usize,
    /// Keys with a recorded last start
    pub cooldowns: usize,
    /// Keys currently executing
    pub in_flight: usize,
}

impl DispatcherStats {
    /// Sum over all registries.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.seen_events + self.cooldowns + self.in_flight
    }
}

#[derive(Debug)]
struct Registries {
    seen_events: Registry<EventId>,
    cooldowns: Registry<ActionKey>,
    in_flight: Registry<ActionKey>,
}

impl Registries {
    fn stats(&self) -> DispatcherStats {
        DispatcherStats {
            seen_events: self.seen_events.len(),
            cooldowns: self.cooldowns.len(),
            in_flight: self.in_flight.len(),
        }
    }
}

/// Owner of the seen-event, cooldown and in-flight registries.
///
/// Construct one per process and share it through an `Arc`.
#[derive(Debug)]
pub struct Dispatcher {
    registries: Mutex<Registries>,
    clock: Arc<dyn Clock>,
    config: DispatcherConfig,
}

impl Dispatcher {
    /// Creates a dispatcher on the system clock.
    #[must_use]
    pub fn new(config: DispatcherConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates a dispatcher reading time from `clock`.
    #[must_use]
    pub fn with_clock(config: DispatcherConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            registries: Mutex::new(Registries {
                seen_events: Registry::new(config.event_retention),
                cooldowns: Registry::new(config.cooldown_window),
                in_flight: Registry::new(config.busy_timeout),
            }),
            clock,
            config,
        }
    }

    /// The timing configuration this dispatcher was built with.
    #[must_use]
    pub const fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    // A panicking holder cannot leave the maps half-written: every mutation
    // is a single insert/remove/retain.
    fn registries(&self) -> MutexGuard<'_, Registries> {
        self.registries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Decides whether `key` may run for `event_id`, recording it if so.
    ///
    /// An admitted key stays in flight until [`Dispatcher::release`] is called
    /// or the busy timeout passes. Prefer [`Dispatcher::acquire`], which
    /// releases automatically.
    pub fn admit(&self, event_id: &EventId, key: &ActionKey) -> Decision {
        match self.check_and_record(event_id, key) {
            Ok(_) => Decision::Admitted,
            Err(decision) => decision,
        }
    }

    /// Like [`Dispatcher::admit`], but returns a permit that releases the key
    /// when dropped.
    ///
    /// # Errors
    /// Returns the rejecting [`Decision`] (never `Admitted`).
    pub fn acquire(
        self: &Arc<Self>,
        event_id: &EventId,
        key: &ActionKey,
    ) -> std::result::Result<ActionPermit, Decision> {
        let started_at = self.check_and_record(event_id, key)?;
        Ok(ActionPermit {
            dispatcher: Arc::clone(self),
            key: key.clone(),
            started_at,
        })
    }

    fn check_and_record(
        &self,
        event_id: &EventId,
        key: &ActionKey,
    ) -> std::result::Result<Instant, Decision> {
        let now = self.clock.now();
        let mut registries = self.registries();

        if registries.seen_events.live_since(event_id, now).is_some() {
            trace!(%event_id, %key, "Rejected redelivered event");
            return Err(Decision::DuplicateEvent);
        }
        if registries.in_flight.live_since(key, now).is_some() {
            debug!(%event_id, %key, "Rejected: action already running");
            return Err(Decision::Busy);
        }
        if let Some(started) = registries.cooldowns.live_since(key, now) {
            let remaining = self
                .config
                .cooldown_window
                .saturating_sub(now.saturating_duration_since(started));
            debug!(%event_id, %key, ?remaining, "Rejected: action on cooldown");
            return Err(Decision::Cooldown { remaining });
        }

        registries.seen_events.record(event_id.clone(), now);
        registries.cooldowns.record(key.clone(), now);
        registries.in_flight.record(key.clone(), now);
        trace!(%event_id, %key, "Admitted");
        Ok(now)
    }

    /// Marks `key` as no longer running. The cooldown entry is kept.
    ///
    /// Releasing a key that is not in flight does nothing.
    pub fn release(&self, key: &ActionKey) {
        if self.registries().in_flight.remove(key).is_some() {
            trace!(%key, "Released");
        }
    }

    fn release_started_at(&self, key: &ActionKey, started_at: Instant) {
        if self
            .registries()
            .in_flight
            .remove_if_recorded_at(key, started_at)
        {
            trace!(%key, "Released by permit");
        } else {
            debug!(%key, "Permit outlived its in-flight entry");
        }
    }

    /// Evicts expired entries using the dispatcher's clock.
    pub fn sweep(&self) -> DispatcherStats {
        self.sweep_at(self.clock.now())
    }

    /// Evicts every entry older than its registry's horizon at `now`.
    ///
    /// Returns how many entries were evicted from each registry.
    pub fn sweep_at(&self, now: Instant) -> DispatcherStats {
        let mut registries = self.registries();
        DispatcherStats {
            seen_events: registries.seen_events.sweep(now),
            cooldowns: registries.cooldowns.sweep(now),
            in_flight: registries.in_flight.sweep(now),
        }
    }

    /// Current entry counts.
    #[must_use]
    pub fn stats(&self) -> DispatcherStats {
        self.registries().stats()
    }
}

/// Proof of admission for one key; releases the key when dropped.
#[derive(Debug)]
#[must_use = "dropping the permit releases the action immediately"]
pub struct ActionPermit {
    dispatcher: Arc<Dispatcher>,
    key: ActionKey,
    started_at: Instant,
}

impl ActionPermit {
    /// The admitted key.
    #[must_use]
    pub const fn key(&self) -> &ActionKey {
        &self.key
    }
}

impl Drop for ActionPermit {
    fn drop(&mut self) {
        self.dispatcher.release_started_at(&self.key, self.started_at);
    }
}

/// Spawns a task that sweeps `dispatcher` every `sweep_interval`.
pub fn spawn_sweeper(dispatcher: Arc<Dispatcher>) -> JoinHandle<()> {
    let period = dispatcher.config().sweep_interval;
    info!(?period, "Starting dispatcher sweeper");
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let evicted = dispatcher.sweep();
            if evicted.total() > 0 {
                debug!(?evicted, remaining = ?dispatcher.stats(), "Swept dispatcher registries");
            }
        }
    })
}
