use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;

use crate::render::RedrawRequester;

/// Mock [`RedrawRequester`] for testing purposes: counts the redraw requests.
#[derive(Clone, Debug, Default)]
pub struct MockRedraw {
    requests: Arc<AtomicUsize>,
    last_delay: Arc<RwLock<Option<Duration>>>,
}

impl MockRedraw {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn get_last_delay(&self) -> Option<Duration> {
        *self.last_delay.read()
    }

    /// Forgets all requests received so far.
    pub fn reset(&self) {
        self.requests.store(0, Ordering::SeqCst);
        *self.last_delay.write() = None;
    }
}

impl Display for MockRedraw {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "MockRedraw [requests={}]", self.get_requests())
    }
}

impl RedrawRequester for MockRedraw {
    fn request_redraw(&self, after: Duration) {
        self.requests.fetch_add(1, Ordering::SeqCst);
        *self.last_delay.write() = Some(after);
    }
}
