//! Defines the progress-ring event manager.

use std::any::Any;
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use log::warn;
use parking_lot::Mutex;

use crate::errors::Error;
use crate::utils::task;

type BoxedCallback =
    Box<dyn FnMut(Arc<dyn Any + Send + Sync>) -> BoxFuture<'static, Result<(), Error>> + Send>;
type SyncedCallbackMap = Mutex<HashMap<String, Vec<CallbackWrapper>>>;

/// Identifies a registered callback (see [`EventManager::unregister`]).
pub type EventHandler = usize;

/// Registers async callbacks on named events and runs them as tasks when the event is emitted.
///
/// Clones share the same callbacks.
#[derive(Clone, Default)]
pub struct EventManager {
    callbacks: Arc<SyncedCallbackMap>,
    next_id: Arc<AtomicUsize>,
}

struct CallbackWrapper {
    id: EventHandler,
    callback: BoxedCallback,
}

impl EventManager {
    /// Registers a callback for a specific event name.
    ///
    /// # Parameters
    /// * `event` - The event name (anything that converts `Into<String>`)
    /// * `callback` - An async callback receiving the event payload as single parameter.
    ///   Tuples can be used to receive multiple values.
    ///
    /// # Return
    /// Returns an [`EventHandler`] to be used with [`EventManager::unregister`].
    ///
    /// # Errors
    /// A callback whose parameter type does not match the emitted payload type exactly is
    /// skipped (with a warning) when the event is emitted.
    pub fn on<S, F, T, Fut>(&self, event: S, mut callback: F) -> EventHandler
    where
        S: Into<String>,
        T: 'static + Send + Sync + Clone,
        F: FnMut(T) -> Fut + Send + 'static,
        Fut: std::future::Future<Output = Result<(), Error>> + Send + 'static,
    {
        let event_name = event.into();
        let callback_event = event_name.clone();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        let boxed_callback: BoxedCallback =
            Box::new(move |arg: Arc<dyn Any + Send + Sync>| match arg.downcast::<T>() {
                Ok(arg) => callback((*arg).clone()).boxed(),
                Err(_) => {
                    warn!(
                        "Callback for event '{}' skipped: payload type does not match",
                        callback_event
                    );
                    async { Ok::<(), Error>(()) }.boxed()
                }
            });

        self.callbacks
            .lock()
            .entry(event_name)
            .or_default()
            .push(CallbackWrapper {
                id,
                callback: boxed_callback,
            });

        id
    }

    /// Runs (as tasks) all callbacks registered for the given event name.
    ///
    /// Emitting an event nobody listens to is a no-op, even outside a runtime. Callbacks cannot be
    /// run outside `#[progress_ring::runtime]`: they are then dropped with a warning.
    pub fn emit<S, T>(&self, event: S, payload: T)
    where
        S: Into<String>,
        T: 'static + Send + Sync,
    {
        let event = event.into();
        let payload: Arc<dyn Any + Send + Sync> = Arc::new(payload);
        let mut callbacks = self.callbacks.lock();
        if let Some(wrappers) = callbacks.get_mut(&event) {
            for wrapper in wrappers.iter_mut() {
                let future = (wrapper.callback)(payload.clone());
                if let Err(err) = task::run(future) {
                    warn!("Callback for event '{}' dropped: {}", event, err);
                }
            }
        }
    }

    /// Unregisters a given handler, if found.
    pub fn unregister(&self, handler: EventHandler) {
        self.callbacks
            .lock()
            .values_mut()
            .for_each(|wrappers| wrappers.retain(|wrapper| wrapper.id != handler));
    }

    /// Returns the number of callbacks registered for an event.
    pub fn count<S: Into<String>>(&self, event: S) -> usize {
        self.callbacks
            .lock()
            .get(&event.into())
            .map_or(0, |wrappers| wrappers.len())
    }
}

impl Debug for EventManager {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let callbacks = self.callbacks.lock();
        f.debug_struct("EventManager")
            .field("events", &callbacks.keys().collect::<Vec<_>>())
            .finish()
    }
}
