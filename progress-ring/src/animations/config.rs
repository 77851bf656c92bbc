use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::animations::Orientation;
use crate::errors::{ConfigError, Error};

/// A zero-argument callback invoked each time an animation pass completes.
///
/// The callback runs on whichever thread runs the render pass that observed the completion: no
/// thread affinity is provided beyond that. Clones share the same callback.
#[derive(Clone)]
pub struct CompletionCallback(Arc<Mutex<Box<dyn FnMut() + Send>>>);

impl CompletionCallback {
    pub fn new<F: FnMut() + Send + 'static>(callback: F) -> Self {
        Self(Arc::new(Mutex::new(Box::new(callback))))
    }

    /// Invokes the callback.
    pub fn call(&self) {
        let mut callback = self.0.lock();
        (*callback)()
    }
}

impl Debug for CompletionCallback {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "CompletionCallback")
    }
}

/// Describes one animation pass of a progress ring: where it starts, where it ends, how long it
/// lasts and what happens when it is done.
///
/// Fractions are clamped into [0, 1] when set: the render path never has to deal with invalid
/// values. Invalid durations are rejected.
///
/// # Example
/// ```
/// use progress_ring::animations::{AnimationConfig, Orientation};
///
/// let config = AnimationConfig::default()
///     .set_from_value(1.0)
///     .set_to_value(0.0)
///     .set_orientation(Orientation::Top)
///     .set_duration(6.0)
///     .unwrap()
///     .set_repeats(false);
/// assert_eq!(config.get_duration().as_secs(), 6);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Debug)]
pub struct AnimationConfig {
    /// The fraction the animation starts from (default: 0.0).
    #[cfg_attr(feature = "serde", serde(deserialize_with = "deserialize_fraction"))]
    from_value: f64,
    /// The fraction the animation ends at (default: 1.0).
    #[cfg_attr(feature = "serde", serde(deserialize_with = "deserialize_fraction"))]
    to_value: f64,
    /// The zero reference point of the circle (default: top).
    orientation: Orientation,
    /// The duration of one pass (default: 1s).
    #[cfg_attr(feature = "serde", serde(deserialize_with = "deserialize_duration"))]
    duration: Duration,
    /// Restart immediately upon completion (default: false).
    repeats: bool,

    // ########################################
    // # Volatile utility data.
    #[cfg_attr(feature = "serde", serde(skip))]
    completion: Option<CompletionCallback>,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            from_value: 0.0,
            to_value: 1.0,
            orientation: Orientation::default(),
            duration: Duration::from_secs(1),
            repeats: false,
            completion: None,
        }
    }
}

/// Brings a fraction back into [0, 1] (NaN becomes 0).
pub(crate) fn clamp_fraction(value: f64) -> f64 {
    match value.is_nan() {
        true => 0.0,
        false => value.clamp(0.0, 1.0),
    }
}

#[cfg(feature = "serde")]
fn deserialize_fraction<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: f64 = serde::Deserialize::deserialize(deserializer)?;
    Ok(clamp_fraction(value))
}

#[cfg(feature = "serde")]
fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let duration: Duration = serde::Deserialize::deserialize(deserializer)?;
    match duration.is_zero() {
        true => Err(serde::de::Error::custom(ConfigError::InvalidDuration {
            value: 0.0,
        })),
        false => Ok(duration),
    }
}

impl AnimationConfig {
    /// Indicates a degenerate animation: nothing to animate, a pass is complete right away.
    pub fn is_degenerate(&self) -> bool {
        self.from_value == self.to_value
    }

    // ########################################
    // Setters and Getters.

    /// Returns the fraction the animation starts from.
    pub fn get_from_value(&self) -> f64 {
        self.from_value
    }

    /// Sets the fraction the animation starts from (clamped into [0, 1]).
    pub fn set_from_value(mut self, from_value: f64) -> Self {
        self.from_value = clamp_fraction(from_value);
        self
    }

    /// Returns the fraction the animation ends at.
    pub fn get_to_value(&self) -> f64 {
        self.to_value
    }

    /// Sets the fraction the animation ends at (clamped into [0, 1]).
    pub fn set_to_value(mut self, to_value: f64) -> Self {
        self.to_value = clamp_fraction(to_value);
        self
    }

    pub fn get_orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn set_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Returns the duration of one pass.
    pub fn get_duration(&self) -> Duration {
        self.duration
    }

    /// Sets the duration (in seconds) of one pass.
    ///
    /// # Errors
    /// * `InvalidDuration`: the duration is not a finite number of seconds greater than zero.
    pub fn set_duration(mut self, seconds: f64) -> Result<Self, Error> {
        let duration = Duration::try_from_secs_f64(seconds)
            .ok()
            .filter(|duration| !duration.is_zero())
            .ok_or(ConfigError::InvalidDuration { value: seconds })?;
        self.duration = duration;
        Ok(self)
    }

    pub fn is_repeats(&self) -> bool {
        self.repeats
    }

    pub fn set_repeats(mut self, repeats: bool) -> Self {
        self.repeats = repeats;
        self
    }

    /// Returns the completion callback, if any.
    pub fn get_completion(&self) -> Option<&CompletionCallback> {
        self.completion.as_ref()
    }

    /// Sets the callback invoked each time a pass completes (never when the animation is stopped).
    pub fn set_completion<F: FnMut() + Send + 'static>(mut self, callback: F) -> Self {
        self.completion = Some(CompletionCallback::new(callback));
        self
    }

    /// Removes the completion callback.
    pub fn clear_completion(mut self) -> Self {
        self.completion = None;
        self
    }
}

impl Display for AnimationConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Animation [from={}, to={}, orientation={}, duration={}ms, repeats={}]",
            self.from_value,
            self.to_value,
            self.orientation,
            self.duration.as_millis(),
            self.repeats
        )
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnimationConfig::default();
        assert_eq!(config.get_from_value(), 0.0);
        assert_eq!(config.get_to_value(), 1.0);
        assert_eq!(config.get_orientation(), Orientation::Top);
        assert_eq!(config.get_duration(), Duration::from_secs(1));
        assert!(!config.is_repeats());
        assert!(config.get_completion().is_none());
        assert!(!config.is_degenerate());
    }

    #[test]
    fn test_fractions_are_clamped() {
        let config = AnimationConfig::default()
            .set_from_value(1.5)
            .set_to_value(-0.2);
        assert_eq!(config.get_from_value(), 1.0);
        assert_eq!(config.get_to_value(), 0.0);

        let config = config.set_from_value(f64::NAN).set_to_value(f64::INFINITY);
        assert_eq!(config.get_from_value(), 0.0);
        assert_eq!(config.get_to_value(), 1.0);
    }

    #[test]
    fn test_set_duration() {
        let config = AnimationConfig::default().set_duration(6.0).unwrap();
        assert_eq!(config.get_duration(), Duration::from_secs(6));
        let config = config.set_duration(0.25).unwrap();
        assert_eq!(config.get_duration(), Duration::from_millis(250));

        assert!(AnimationConfig::default().set_duration(0.0).is_err());
        assert!(AnimationConfig::default().set_duration(-1.0).is_err());
        assert!(AnimationConfig::default().set_duration(f64::NAN).is_err());
        assert!(AnimationConfig::default()
            .set_duration(f64::INFINITY)
            .is_err());

        let error = AnimationConfig::default().set_duration(-2.0).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Configuration error: Duration must be a finite number of seconds greater than zero (found: -2)."
        );
    }

    #[test]
    fn test_degenerate() {
        let config = AnimationConfig::default()
            .set_from_value(0.4)
            .set_to_value(0.4);
        assert!(config.is_degenerate());
    }

    #[test]
    fn test_completion_callback() {
        let counter = Arc::new(AtomicUsize::new(0));
        let moved_counter = counter.clone();
        let config = AnimationConfig::default().set_completion(move || {
            moved_counter.fetch_add(1, Ordering::SeqCst);
        });

        let callback = config.get_completion().unwrap().clone();
        callback.call();
        config.get_completion().unwrap().call();
        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert_eq!(format!("{:?}", callback), "CompletionCallback");

        let config = config.clear_completion();
        assert!(config.get_completion().is_none());
    }

    #[test]
    fn test_display() {
        let config = AnimationConfig::default()
            .set_from_value(1.0)
            .set_to_value(0.0)
            .set_duration(6.0)
            .unwrap()
            .set_repeats(true);
        assert_eq!(
            config.to_string(),
            "Animation [from=1, to=0, orientation=top, duration=6000ms, repeats=true]"
        );
    }

    #[cfg(feature = "serde")]
    mod serde_tests {
        use super::*;

        #[test]
        fn test_config_serialize() {
            let config = AnimationConfig::default()
                .set_from_value(1.0)
                .set_to_value(0.0)
                .set_orientation(Orientation::Left)
                .set_completion(|| {});
            let json = serde_json::to_string(&config).unwrap();
            assert_eq!(
                json,
                r#"{"from_value":1.0,"to_value":0.0,"orientation":"left","duration":{"secs":1,"nanos":0},"repeats":false}"#
            );
        }

        #[test]
        fn test_config_deserialize() {
            let json = r#"{"from_value":0.5,"orientation":"bottom","repeats":true}"#;
            let config: AnimationConfig = serde_json::from_str(json).unwrap();
            assert_eq!(config.get_from_value(), 0.5);
            assert_eq!(config.get_to_value(), 1.0);
            assert_eq!(config.get_orientation(), Orientation::Bottom);
            assert!(config.is_repeats());
            assert!(config.get_completion().is_none());
        }

        #[test]
        fn test_deserialize_clamps_fractions() {
            let json = r#"{"from_value":3.0,"to_value":-1.0}"#;
            let config: AnimationConfig = serde_json::from_str(json).unwrap();
            assert_eq!(config.get_from_value(), 1.0);
            assert_eq!(config.get_to_value(), 0.0);
        }

        #[test]
        fn test_deserialize_rejects_zero_duration() {
            let json = r#"{"from_value":1.0,"to_value":0.0,"duration":{"secs":0,"nanos":0}}"#;
            let result: Result<AnimationConfig, _> = serde_json::from_str(json);
            let error = result.unwrap_err();
            assert!(error
                .to_string()
                .starts_with("Duration must be a finite number of seconds greater than zero"));

            let json = r#"{"duration":{"secs":0,"nanos":250000000}}"#;
            let config: AnimationConfig = serde_json::from_str(json).unwrap();
            assert_eq!(config.get_duration(), Duration::from_millis(250));
        }
    }
}
