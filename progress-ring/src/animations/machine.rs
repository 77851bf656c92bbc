use std::fmt::{Display, Formatter};
use std::time::Duration;

use log::{debug, trace};
use tokio::time::Instant;

use crate::animations::AnimationConfig;

/// The state of an animation: either at rest, or running a pass started at a given instant.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationState {
    /// Not animating: the ring shows its target value.
    #[default]
    Idle,
    /// Running a pass started at `started_at`.
    Running { started_at: Instant },
}

/// The outcome of a [`AnimationMachine::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    /// Nothing is animating: no redraw is needed.
    Idle,
    /// The pass is still running: another redraw is needed.
    Running,
    /// The pass just completed. When `restarted`, a new pass started right away (repeat mode).
    Completed { restarted: bool },
}

impl Tick {
    /// Indicates if the ring must be redrawn again after this tick.
    pub fn needs_redraw(&self) -> bool {
        matches!(self, Tick::Running | Tick::Completed { restarted: true })
    }

    /// Indicates if this tick completed a pass.
    pub fn is_completed(&self) -> bool {
        matches!(self, Tick::Completed { .. })
    }
}

/// The animation state machine of a progress ring.
///
/// ```text
///        start()                      tick(): elapsed >= duration
///  Idle ────────► Running ──────────────────────────────► Idle
///   ▲               │  ▲                                   │
///   │    stop()     │  └──────── repeats: restart ◄────────┘
///   └───────────────┘
/// ```
///
/// The machine never reads the clock by itself in its `*_at` flavours: the caller provides `now`,
/// which keeps every computation a pure function of the configuration, the state and the time.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use progress_ring::animations::{AnimationConfig, AnimationMachine, Tick};
/// use progress_ring::utils::tokio::time::Instant;
///
/// let config = AnimationConfig::default()
///     .set_from_value(1.0)
///     .set_to_value(0.0)
///     .set_duration(6.0)
///     .unwrap();
/// let mut machine = AnimationMachine::new(config);
///
/// let start = Instant::now();
/// machine.start_at(start);
/// assert_eq!(machine.current_value_at(start + Duration::from_secs(3)), 0.5);
/// assert_eq!(machine.tick_at(start + Duration::from_secs(6)), Tick::Completed { restarted: false });
/// assert!(!machine.is_running());
/// ```
#[derive(Clone, Debug, Default)]
pub struct AnimationMachine {
    config: AnimationConfig,
    state: AnimationState,
    /// The number of completed passes.
    passes: u64,
}

impl AnimationMachine {
    pub fn new(config: AnimationConfig) -> Self {
        Self {
            config,
            state: AnimationState::Idle,
            passes: 0,
        }
    }

    /// Starts a pass at the given instant.
    ///
    /// Returns false (and does nothing) if a pass is already running: a running animation is never
    /// restarted mid-flight.
    pub fn start_at(&mut self, now: Instant) -> bool {
        match self.state {
            AnimationState::Running { .. } => {
                trace!("Animation already running: start ignored");
                false
            }
            AnimationState::Idle => {
                debug!("Animation started: {}", self.config);
                self.state = AnimationState::Running { started_at: now };
                true
            }
        }
    }

    /// Starts a pass now. See [`AnimationMachine::start_at`].
    pub fn start(&mut self) -> bool {
        self.start_at(Instant::now())
    }

    /// Stops the animation and returns to rest, without completing the pass.
    ///
    /// Returns whether a pass was running. Calling it on an idle machine does nothing.
    pub fn stop(&mut self) -> bool {
        let was_running = self.is_running();
        if was_running {
            debug!("Animation stopped before completion");
        }
        self.state = AnimationState::Idle;
        was_running
    }

    /// Evaluates the animation at the given instant and settles its state.
    ///
    /// - idle: nothing happens, [`Tick::Idle`] is returned,
    /// - running within the duration: [`Tick::Running`] is returned,
    /// - running past the duration (or nothing to animate): the pass completes, the machine goes
    ///   back to rest, then immediately restarts a fresh pass at `now` if it repeats.
    pub fn tick_at(&mut self, now: Instant) -> Tick {
        let AnimationState::Running { started_at } = self.state else {
            return Tick::Idle;
        };

        let elapsed = now.saturating_duration_since(started_at);
        if !self.config.is_degenerate() && elapsed < self.config.get_duration() {
            return Tick::Running;
        }

        self.passes += 1;
        self.state = AnimationState::Idle;
        let restarted = self.config.is_repeats();
        if restarted {
            self.state = AnimationState::Running { started_at: now };
        }
        debug!(
            "Animation pass {} completed (restarted: {})",
            self.passes, restarted
        );
        Tick::Completed { restarted }
    }

    /// Evaluates the animation now. See [`AnimationMachine::tick_at`].
    pub fn tick(&mut self) -> Tick {
        self.tick_at(Instant::now())
    }

    /// Returns the time elapsed in the current pass, if any.
    pub fn elapsed_at(&self, now: Instant) -> Option<Duration> {
        match self.state {
            AnimationState::Idle => None,
            AnimationState::Running { started_at } => Some(now.saturating_duration_since(started_at)),
        }
    }

    /// Returns the progress of the current pass in [0, 1].
    ///
    /// A machine at rest (or with nothing to animate) is considered complete: 1.0.
    pub fn progress_at(&self, now: Instant) -> f64 {
        let duration = self.config.get_duration();
        match self.elapsed_at(now) {
            Some(elapsed) if !self.config.is_degenerate() && !duration.is_zero() => {
                let ratio = elapsed.as_secs_f64() / duration.as_secs_f64();
                ratio.clamp(0.0, 1.0)
            }
            _ => 1.0,
        }
    }

    /// Returns the fraction displayed at the given instant.
    ///
    /// At rest, the target value is displayed. Otherwise the value is linearly interpolated between
    /// the start and target values: `from + (to - from) * progress`, exactly `from` at the start
    /// of the pass and exactly `to` at its end.
    pub fn current_value_at(&self, now: Instant) -> f64 {
        let from = self.config.get_from_value();
        let to = self.config.get_to_value();
        let progress = self.progress_at(now);
        if progress >= 1.0 {
            to
        } else if progress <= 0.0 {
            from
        } else {
            from + (to - from) * progress
        }
    }

    /// Returns the fraction displayed now. See [`AnimationMachine::current_value_at`].
    pub fn current_value(&self) -> f64 {
        self.current_value_at(Instant::now())
    }

    /// Returns the angle (in degrees, within [0, 360)) of the displayed value at the given instant.
    pub fn angle_at(&self, now: Instant) -> f64 {
        self.config
            .get_orientation()
            .angle_for(self.current_value_at(now))
    }

    /// Indicates if a pass is running and not over yet at the given instant.
    pub fn is_animating_at(&self, now: Instant) -> bool {
        match self.elapsed_at(now) {
            Some(elapsed) => !self.config.is_degenerate() && elapsed < self.config.get_duration(),
            None => false,
        }
    }

    /// Indicates if a pass is running and not over yet.
    pub fn is_animating(&self) -> bool {
        self.is_animating_at(Instant::now())
    }

    /// Indicates if the machine is in the running state (the pass may be over but not ticked yet).
    pub fn is_running(&self) -> bool {
        matches!(self.state, AnimationState::Running { .. })
    }

    // ########################################
    // Setters and Getters.

    pub fn get_state(&self) -> AnimationState {
        self.state
    }

    pub fn get_config(&self) -> &AnimationConfig {
        &self.config
    }

    /// Replaces the configuration. A running pass keeps running with the new configuration.
    pub fn set_config(&mut self, config: AnimationConfig) {
        self.config = config;
    }

    /// Returns the number of passes completed so far.
    pub fn get_passes(&self) -> u64 {
        self.passes
    }
}

impl Display for AnimationMachine {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let state = match self.state {
            AnimationState::Idle => "idle",
            AnimationState::Running { .. } => "running",
        };
        write!(f, "{} [state={}, passes={}]", self.config, state, self.passes)
    }
}

#[cfg(test)]
mod tests {
    use crate::animations::Orientation;

    use super::*;

    fn secs(value: f64) -> Duration {
        Duration::from_secs_f64(value)
    }

    fn countdown() -> AnimationMachine {
        AnimationMachine::new(
            AnimationConfig::default()
                .set_from_value(1.0)
                .set_to_value(0.0)
                .set_orientation(Orientation::Top)
                .set_duration(6.0)
                .unwrap(),
        )
    }

    #[test]
    fn test_new_machine_is_idle() {
        let machine = countdown();
        let now = Instant::now();
        assert_eq!(machine.get_state(), AnimationState::Idle);
        assert!(!machine.is_running());
        assert!(!machine.is_animating_at(now));
        assert_eq!(machine.get_passes(), 0);
        assert_eq!(machine.elapsed_at(now), None);
        // At rest, the target value is displayed.
        assert_eq!(machine.progress_at(now), 1.0);
        assert_eq!(machine.current_value_at(now), 0.0);
    }

    #[test]
    fn test_countdown_scenario() {
        let mut machine = countdown();
        let start = Instant::now();
        assert!(machine.start_at(start));
        assert_eq!(machine.get_state(), AnimationState::Running { started_at: start });

        assert_eq!(machine.current_value_at(start), 1.0);
        assert_eq!(machine.angle_at(start), 90.0);
        assert!(machine.is_animating_at(start));
        assert_eq!(machine.tick_at(start), Tick::Running);

        let half = start + secs(3.0);
        assert_eq!(machine.current_value_at(half), 0.5);
        assert_eq!(machine.angle_at(half), 270.0);
        assert_eq!(machine.tick_at(half), Tick::Running);

        let end = start + secs(6.0);
        assert_eq!(machine.current_value_at(end), 0.0);
        assert!(!machine.is_animating_at(end));
        assert_eq!(machine.tick_at(end), Tick::Completed { restarted: false });
        assert!(!machine.is_running());
        assert_eq!(machine.get_passes(), 1);
        assert_eq!(machine.current_value_at(end), 0.0);
    }

    #[test]
    fn test_interpolation_never_overshoots() {
        let mut machine = AnimationMachine::new(
            AnimationConfig::default()
                .set_from_value(0.2)
                .set_to_value(0.9)
                .set_duration(2.0)
                .unwrap(),
        );
        let start = Instant::now();
        machine.start_at(start);

        let mut previous = machine.current_value_at(start);
        assert_eq!(previous, 0.2);
        for step in 1..=40 {
            let value = machine.current_value_at(start + secs(step as f64 * 0.05));
            assert!((0.2..=0.9).contains(&value), "{} out of bounds", value);
            assert!(value >= previous, "interpolation is monotonic");
            previous = value;
        }
        assert_eq!(previous, 0.9);

        // Past the duration (before the tick settles it), the value stays on the target.
        assert_eq!(machine.current_value_at(start + secs(10.0)), 0.9);
        assert_eq!(machine.progress_at(start + secs(10.0)), 1.0);
    }

    #[test]
    fn test_countdown_never_overshoots() {
        let mut machine = AnimationMachine::new(
            AnimationConfig::default()
                .set_from_value(1.0)
                .set_to_value(0.0)
                .set_duration(2.0)
                .unwrap(),
        );
        let start = Instant::now();
        machine.start_at(start);

        let mut previous = machine.current_value_at(start);
        assert_eq!(previous, 1.0);
        for step in 1..=40 {
            let value = machine.current_value_at(start + secs(step as f64 * 0.05));
            assert!((0.0..=1.0).contains(&value), "{} out of bounds", value);
            assert!(value <= previous, "interpolation is monotonic");
            previous = value;
        }
        assert_eq!(previous, 0.0);
        assert_eq!(machine.current_value_at(start + secs(10.0)), 0.0);
    }

    #[test]
    fn test_time_before_start_is_clamped() {
        let mut machine = countdown();
        let now = Instant::now();
        machine.start_at(now + secs(1.0));
        assert_eq!(machine.progress_at(now), 0.0);
        assert_eq!(machine.current_value_at(now), 1.0);
    }

    #[test]
    fn test_start_is_ignored_while_running() {
        let mut machine = countdown();
        let start = Instant::now();
        assert!(machine.start_at(start));
        assert!(!machine.start_at(start + secs(2.0)));
        assert_eq!(machine.get_state(), AnimationState::Running { started_at: start });
    }

    #[test]
    fn test_tick_after_completion_is_noop() {
        let mut machine = countdown();
        let start = Instant::now();
        machine.start_at(start);
        assert!(machine.tick_at(start + secs(7.0)).is_completed());
        assert_eq!(machine.tick_at(start + secs(8.0)), Tick::Idle);
        assert_eq!(machine.tick_at(start + secs(9.0)), Tick::Idle);
        assert_eq!(machine.get_passes(), 1);
        assert!(!Tick::Idle.needs_redraw());
    }

    #[test]
    fn test_stop() {
        let mut machine = countdown();
        assert!(!machine.stop(), "Stopping an idle machine does nothing");

        let start = Instant::now();
        machine.start_at(start);
        assert!(machine.stop());
        assert!(!machine.stop(), "stop() is idempotent");
        assert_eq!(machine.tick_at(start + secs(7.0)), Tick::Idle);
        assert_eq!(machine.get_passes(), 0, "A stopped pass is not completed");

        // It can be started again afterwards.
        assert!(machine.start_at(start + secs(8.0)));
    }

    #[test]
    fn test_repeat_rebases_on_each_pass() {
        let mut machine = AnimationMachine::new(
            AnimationConfig::default()
                .set_duration(1.0)
                .unwrap()
                .set_repeats(true),
        );
        let start = Instant::now();
        machine.start_at(start);

        // The first pass is observed late: the next one starts from the observation time.
        let late = start + secs(1.5);
        let tick = machine.tick_at(late);
        assert_eq!(tick, Tick::Completed { restarted: true });
        assert!(tick.needs_redraw());
        assert_eq!(machine.get_state(), AnimationState::Running { started_at: late });
        assert!(machine.is_animating_at(late));
        assert_eq!(machine.current_value_at(late), 0.0);
        assert_eq!(machine.current_value_at(late + secs(0.5)), 0.5);

        let mut now = late;
        for _ in 0..10 {
            now += secs(1.0);
            assert_eq!(machine.tick_at(now), Tick::Completed { restarted: true });
        }
        assert_eq!(machine.get_passes(), 11);
        assert_eq!(machine.get_state(), AnimationState::Running { started_at: now });
    }

    #[test]
    fn test_degenerate_animation_completes_on_first_tick() {
        let mut machine = AnimationMachine::new(
            AnimationConfig::default()
                .set_from_value(0.3)
                .set_to_value(0.3),
        );
        let start = Instant::now();
        machine.start_at(start);
        assert!(!machine.is_animating_at(start));
        assert_eq!(machine.progress_at(start), 1.0);
        assert_eq!(machine.current_value_at(start), 0.3);
        assert_eq!(machine.tick_at(start), Tick::Completed { restarted: false });
        assert!(!machine.is_running());
    }

    #[test]
    fn test_set_config_keeps_running() {
        let mut machine = countdown();
        let start = Instant::now();
        machine.start_at(start);
        machine.set_config(machine.get_config().clone().set_duration(12.0).unwrap());
        assert!(machine.is_running());
        assert_eq!(machine.current_value_at(start + secs(3.0)), 0.75);
    }

    #[test]
    fn test_display() {
        let mut machine = countdown();
        assert_eq!(
            machine.to_string(),
            "Animation [from=1, to=0, orientation=top, duration=6000ms, repeats=false] [state=idle, passes=0]"
        );
        machine.start();
        assert!(machine.to_string().ends_with("[state=running, passes=0]"));
    }
}
