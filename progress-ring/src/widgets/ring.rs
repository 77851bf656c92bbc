use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, trace};
use parking_lot::RwLock;
use tokio::time::Instant;

use crate::animations::{AnimationConfig, AnimationMachine, AnimationState, Tick};
use crate::errors::{ConfigError, Error};
use crate::render::{ArcSegment, Bounds, RedrawRequester, Renderer, Stroke};
use crate::utils::{task, EventHandler, EventManager, TaskHandler};

/// Lists all events a ProgressRing can emit/listen.
pub enum RingEvent {
    /// Triggered when an animation pass starts.
    OnStart,
    /// Triggered each time an animation pass completes.
    OnComplete,
    /// Triggered when a running animation is stopped before completion.
    OnStop,
}

/// Convert events to string to facilitate usage with [`EventManager`].
impl From<RingEvent> for String {
    fn from(event: RingEvent) -> Self {
        let event = match event {
            RingEvent::OnStart => "start",
            RingEvent::OnComplete => "complete",
            RingEvent::OnStop => "stop",
        };
        event.into()
    }
}

/// A circular progress indicator: an arc sweeping from one fraction of a circle to another over
/// the configured duration.
///
/// The ring can be driven two ways:
/// - by its host: the host calls [`ProgressRing::render`] each time the ring asks for it through
///   its [`RedrawRequester`],
/// - by itself: [`ProgressRing::play`] runs a frame loop task rendering the ring at the configured
///   frame rate until the animation is over.
///
/// Clones share the same animation, frame loop and events: stopping one clone stops them all.
///
/// # Example
/// ```
/// use progress_ring::animations::AnimationConfig;
/// use progress_ring::render::SvgRenderer;
/// use progress_ring::widgets::ProgressRing;
///
/// let renderer = SvgRenderer::default();
/// let config = AnimationConfig::default().set_from_value(1.0).set_to_value(0.0);
/// let mut ring = ProgressRing::new(renderer.clone()).set_config(config);
///
/// ring.start_animation();
/// ring.render().unwrap();
/// assert!(!renderer.get_path().is_empty());
/// ```
#[derive(Clone, Debug)]
pub struct ProgressRing {
    /// The frame the ring is drawn into.
    bounds: Bounds,
    /// The stroke of the ring arc.
    stroke: Stroke,
    /// The frame rate of the self-driven frame loop (default: 60).
    fps: u16,
    /// The renderer drawing the ring.
    renderer: Box<dyn Renderer>,
    /// The host capability to schedule a render pass.
    redraw: Option<Box<dyn RedrawRequester>>,

    // ########################################
    // # Volatile utility data.
    /// The animation state machine.
    machine: Arc<RwLock<AnimationMachine>>,
    /// Inner handler to the task running the frame loop.
    driver: Arc<RwLock<Option<TaskHandler>>>,
    /// A redraw was requested and no render pass happened since.
    pending: Arc<AtomicBool>,
    /// The event manager for the ring.
    events: EventManager,
}

impl ProgressRing {
    /// Creates a ring drawn by the given renderer, with the default configuration.
    pub fn new<R: Renderer + 'static>(renderer: R) -> Self {
        Self {
            bounds: Bounds::default(),
            stroke: Stroke::default(),
            fps: 60,
            renderer: Box::new(renderer),
            redraw: None,
            machine: Arc::new(RwLock::new(AnimationMachine::default())),
            driver: Arc::new(RwLock::new(None)),
            pending: Arc::new(AtomicBool::new(false)),
            events: EventManager::default(),
        }
    }

    /// Starts an animation pass now. See [`ProgressRing::start_animation_at`].
    pub fn start_animation(&self) -> bool {
        self.start_animation_at(Instant::now())
    }

    /// Starts an animation pass at the given instant, then requests a redraw.
    ///
    /// Returns false (and does nothing) if the animation is already running.
    pub fn start_animation_at(&self, now: Instant) -> bool {
        let started = self.machine.write().start_at(now);
        if started {
            self.request_redraw();
            self.emit(RingEvent::OnStart);
        }
        started
    }

    /// Stops the animation and its frame loop, if any.
    ///
    /// The ring goes back to rest (showing its target value) without invoking the completion
    /// callback. Stopping an idle ring does nothing.
    pub fn stop_animating(&self) -> &Self {
        if let Some(handler) = self.driver.write().take() {
            trace!("Frame loop aborted");
            handler.abort();
        }
        if self.machine.write().stop() {
            self.emit(RingEvent::OnStop);
        }
        self
    }

    /// Renders the ring now. See [`ProgressRing::render_at`].
    pub fn render(&mut self) -> Result<Tick, Error> {
        self.render_at(Instant::now())
    }

    /// Renders the ring as it is at the given instant, then moves its animation forward:
    /// - the arc showing the current value is drawn,
    /// - the animation is ticked: on completion, the completion callback is invoked and the
    ///   `complete` event emitted,
    /// - another redraw is requested if the animation is still running.
    ///
    /// # Errors
    /// Returns the renderer error, if any: the animation has still been ticked.
    pub fn render_at(&mut self, now: Instant) -> Result<Tick, Error> {
        let (tick, drawn) = self.render_frame(now);
        drawn.map(|_| tick)
    }

    /// Runs the animation by itself: starts a pass (unless one is running) and spawns the frame
    /// loop task rendering the ring at the configured frame rate until the animation is over.
    ///
    /// At most one frame loop runs per ring: playing an already playing ring only (re)starts the
    /// animation.
    ///
    /// # Errors
    /// * `RuntimeError`: the ring is not played within a `#[progress_ring::runtime]`.
    pub fn play(&self) -> Result<&Self, Error> {
        let started = self.start_animation();

        let mut driver = self.driver.write();
        if driver.as_ref().is_some_and(|handler| !handler.is_finished()) {
            trace!("Frame loop already running");
            return Ok(self);
        }

        let mut ring = self.clone();
        let frame = Duration::from_secs_f64(1.0 / f64::from(self.fps));
        let handler = task::run(async move {
            loop {
                let (tick, drawn) = ring.render_frame(Instant::now());
                if let Err(err) = drawn {
                    *ring.driver.write() = None;
                    return Err(err);
                }
                if !tick.needs_redraw() {
                    let mut driver = ring.driver.write();
                    // A new pass may have started since that frame: keep going then.
                    if !ring.machine.read().is_running() {
                        *driver = None;
                        debug!("Frame loop done");
                        return Ok(());
                    }
                }
                tokio::time::sleep(frame).await;
            }
        });

        match handler {
            Ok(handler) => {
                debug!("Frame loop started at {} fps", self.fps);
                *driver = Some(handler);
                Ok(self)
            }
            Err(err) => {
                if started {
                    self.machine.write().stop();
                }
                Err(err)
            }
        }
    }

    /// Indicates if the self-driven frame loop is running.
    pub fn is_playing(&self) -> bool {
        self.driver.read().is_some()
    }

    /// Indicates if an animation pass is running and not over yet.
    pub fn is_animating(&self) -> bool {
        self.machine.read().is_animating()
    }

    /// Returns the fraction currently displayed.
    pub fn current_value(&self) -> f64 {
        self.machine.read().current_value()
    }

    /// Returns the arc showing the ring at the given instant.
    pub fn arc_segment_at(&self, now: Instant) -> ArcSegment {
        let machine = self.machine.read();
        ArcSegment::new(
            self.bounds.center(),
            self.bounds.ring_radius(self.stroke.width),
            machine.get_config().get_orientation(),
            machine.current_value_at(now),
        )
    }

    /// Inner helper: draws then ticks the animation, releasing the machine lock before any
    /// callback runs so that callbacks may use the ring.
    fn render_frame(&mut self, now: Instant) -> (Tick, Result<(), Error>) {
        self.pending.store(false, Ordering::SeqCst);
        let arc = self.arc_segment_at(now);
        let drawn = self.renderer.draw_arc(&arc, &self.stroke);

        let (tick, completion) = {
            let mut machine = self.machine.write();
            let tick = machine.tick_at(now);
            let completion = match tick.is_completed() {
                true => machine.get_config().get_completion().cloned(),
                false => None,
            };
            (tick, completion)
        };

        if tick.is_completed() {
            if let Some(completion) = completion {
                completion.call();
            }
            self.emit(RingEvent::OnComplete);
        }
        if tick.needs_redraw() {
            self.request_redraw();
        }
        (tick, drawn)
    }

    /// Inner helper: asks the host for a render pass, if the host provided the capability and no
    /// request is already pending.
    fn request_redraw(&self) {
        if let Some(redraw) = &self.redraw {
            if !self.pending.swap(true, Ordering::SeqCst) {
                redraw.request_redraw(Duration::ZERO);
            }
        }
    }

    /// Inner helper: emits an event with the ring as payload, only when someone listens.
    fn emit(&self, event: RingEvent) {
        let event: String = event.into();
        if self.events.count(event.as_str()) > 0 {
            self.events.emit(event, self.clone());
        }
    }

    // ########################################
    // Setters and Getters.

    /// Returns a copy of the animation configuration.
    pub fn get_config(&self) -> AnimationConfig {
        self.machine.read().get_config().clone()
    }

    /// Sets the animation configuration. A running pass keeps running with the new configuration.
    pub fn set_config(self, config: AnimationConfig) -> Self {
        self.machine.write().set_config(config);
        self
    }

    pub fn get_state(&self) -> AnimationState {
        self.machine.read().get_state()
    }

    /// Returns the number of passes completed so far.
    pub fn get_passes(&self) -> u64 {
        self.machine.read().get_passes()
    }

    pub fn get_bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn set_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn get_stroke(&self) -> Stroke {
        self.stroke
    }

    pub fn set_stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = stroke;
        self
    }

    pub fn get_fps(&self) -> u16 {
        self.fps
    }

    /// Sets the frame rate of the self-driven frame loop (applies from the next [`ProgressRing::play`]).
    ///
    /// # Errors
    /// * `InvalidFrameRate`: the frame rate is zero.
    pub fn set_fps(mut self, fps: u16) -> Result<Self, Error> {
        if fps == 0 {
            return Err(ConfigError::InvalidFrameRate.into());
        }
        self.fps = fps;
        Ok(self)
    }

    /// Sets the host capability used to schedule render passes.
    pub fn set_redraw_requester<R: RedrawRequester + 'static>(mut self, redraw: R) -> Self {
        self.redraw = Some(Box::new(redraw));
        self
    }

    // ########################################
    // Event related functions

    /// Registers a callback to be executed on a given event.
    ///
    /// Available events for a ring are defined by the enum: [`RingEvent`]:
    /// - **`OnStart` | `start`**: Triggered when an animation pass starts.
    /// - **`OnComplete` | `complete`**: Triggered each time an animation pass completes.
    /// - **`OnStop` | `stop`**: Triggered when a running animation is stopped.
    ///
    ///   _The callback must receive the following parameter: `|_: ProgressRing| { ... }`_
    ///
    /// Unlike the completion callback, event callbacks run as tasks: they require the ring to be
    /// used within `#[progress_ring::runtime]`.
    ///
    /// # Example
    /// ```no_run
    /// use progress_ring::render::SvgRenderer;
    /// use progress_ring::widgets::{ProgressRing, RingEvent};
    ///
    /// #[progress_ring::runtime]
    /// async fn main() {
    ///     let ring = ProgressRing::new(SvgRenderer::default());
    ///     ring.on(RingEvent::OnComplete, |ring: ProgressRing| async move {
    ///         println!("Pass {} done", ring.get_passes());
    ///         Ok(())
    ///     });
    ///     ring.play().unwrap();
    /// }
    /// ```
    pub fn on<S, F, T, Fut>(&self, event: S, callback: F) -> EventHandler
    where
        S: Into<String>,
        T: 'static + Send + Sync + Clone,
        F: FnMut(T) -> Fut + Send + 'static,
        Fut: std::future::Future<Output = Result<(), Error>> + Send + 'static,
    {
        self.events.on(event, callback)
    }
}

impl Display for ProgressRing {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let playing = self.is_playing();
        let machine = self.machine.read().clone();
        write!(
            f,
            "ProgressRing [value={}, fps={}, playing={}]: {}",
            machine.current_value(),
            self.fps,
            playing,
            machine
        )
    }
}
