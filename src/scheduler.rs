//! Tick scheduling.
//!
//! Provides portable tick pacing without async/await or platform-specific timers.
//! The caller is responsible for sleeping/waiting between calls.

use embassy_time::{Duration, Instant};

use crate::compositor::Compositor;
use crate::queue::CommandReceiver;
use crate::random::RandomSource;
use crate::store::StoreError;
use crate::{ButtonInput, PixelSink};

/// Default period of the button sampling tick.
pub const DEFAULT_FAST_TICK: Duration = Duration::from_millis(20);

/// Default period of the light unit tick.
pub const DEFAULT_RENDER_TICK: Duration = Duration::from_millis(100);

/// Tick periods.
#[derive(Debug, Clone, Copy)]
pub struct TickTimings {
    /// Button sampling and press feedback.
    pub fast: Duration,
    /// Light unit animation.
    pub render: Duration,
}

impl Default for TickTimings {
    fn default() -> Self {
        Self {
            fast: DEFAULT_FAST_TICK,
            render: DEFAULT_RENDER_TICK,
        }
    }
}

/// Result of a scheduler step.
#[derive(Debug, Clone, Copy)]
pub struct TickResult {
    /// When the next tick is due.
    pub next_deadline: Instant,
    /// How long to wait until the next tick (zero if behind schedule).
    pub sleep_duration: Duration,
    /// Fast ticks run by this step.
    pub fast_ticks: u32,
    /// Render ticks run by this step.
    pub render_ticks: u32,
}

/// A periodic deadline with drift correction.
#[derive(Debug, Clone, Copy)]
struct Ticker {
    next: Instant,
    period: Duration,
}

impl Ticker {
    const fn new(period: Duration) -> Self {
        Self {
            next: Instant::from_millis(0),
            period,
        }
    }

    /// Skip the backlog if we've fallen more than two periods behind.
    fn correct_drift(&mut self, now: Instant) {
        let max_drift_ms = self.period.as_millis() * 2;
        if now.as_millis() > self.next.as_millis() + max_drift_ms {
            self.next = now;
        }
    }

    /// Consume the deadline if it is due.
    fn poll(&mut self, now: Instant) -> bool {
        if self.next.as_millis() > now.as_millis() {
            return false;
        }
        self.next += self.period;
        true
    }
}

/// Runs the compositor ticks on time.
///
/// Both tickers run on the same loop and never overlap: every due fast tick
/// runs first, then every due render tick. Queued commands are applied right
/// before each render tick.
///
/// # Usage
///
/// ```ignore
/// let mut scheduler = TickScheduler::new(compositor).with_commands(queue.receiver());
///
/// loop {
///     let now = get_current_time_ms();
///     let result = scheduler.tick(Instant::from_millis(now))?;
///
///     // Platform-specific sleep
///     sleep_ms(result.sleep_duration.as_millis());
/// }
/// ```
pub struct TickScheduler<
    'a,
    S: PixelSink,
    I: ButtonInput,
    R: RandomSource,
    const MAX_UNITS: usize,
    const QUEUE_SIZE: usize,
> {
    compositor: Compositor<S, I, R, MAX_UNITS>,
    commands: Option<CommandReceiver<'a, QUEUE_SIZE>>,
    fast: Ticker,
    render: Ticker,
}

impl<'a, S: PixelSink, I: ButtonInput, R: RandomSource, const MAX_UNITS: usize, const QUEUE_SIZE: usize>
    TickScheduler<'a, S, I, R, MAX_UNITS, QUEUE_SIZE>
{
    /// Create a scheduler with the default tick periods.
    pub fn new(compositor: Compositor<S, I, R, MAX_UNITS>) -> Self {
        Self::with_timings(compositor, TickTimings::default())
    }

    pub fn with_timings(compositor: Compositor<S, I, R, MAX_UNITS>, timings: TickTimings) -> Self {
        Self {
            compositor,
            commands: None,
            fast: Ticker::new(timings.fast),
            render: Ticker::new(timings.render),
        }
    }

    /// Drain this queue before every render tick.
    #[must_use]
    pub fn with_commands(mut self, commands: CommandReceiver<'a, QUEUE_SIZE>) -> Self {
        self.commands = Some(commands);
        self
    }

    /// Run every tick that is due at `now`.
    ///
    /// A failing queued command aborts the step before its render tick.
    /// Fatal errors should halt the device.
    pub fn tick(&mut self, now: Instant) -> Result<TickResult, StoreError> {
        self.fast.correct_drift(now);
        self.render.correct_drift(now);

        let mut fast_ticks = 0;
        while self.fast.poll(now) {
            self.compositor.fast_tick();
            fast_ticks += 1;
        }

        let mut render_ticks = 0;
        while self.render.poll(now) {
            if let Some(commands) = &self.commands {
                self.compositor.process_commands(commands)?;
            }
            self.compositor.render_tick();
            render_ticks += 1;
        }

        let next_deadline = if self.fast.next.as_millis() < self.render.next.as_millis() {
            self.fast.next
        } else {
            self.render.next
        };
        let sleep_duration = if next_deadline.as_millis() > now.as_millis() {
            Duration::from_millis(next_deadline.as_millis() - now.as_millis())
        } else {
            Duration::from_millis(0)
        };

        Ok(TickResult {
            next_deadline,
            sleep_duration,
            fast_ticks,
            render_ticks,
        })
    }

    pub fn compositor(&self) -> &Compositor<S, I, R, MAX_UNITS> {
        &self.compositor
    }

    pub fn compositor_mut(&mut self) -> &mut Compositor<S, I, R, MAX_UNITS> {
        &mut self.compositor
    }
}
