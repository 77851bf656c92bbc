use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use progress_ring::animations::AnimationConfig;
use progress_ring::render::{RedrawRequester, SvgRenderer};
use progress_ring::widgets::ProgressRing;

/// A host that renders on its next frame only when asked to.
#[derive(Clone, Debug, Default)]
struct Host {
    dirty: Arc<AtomicBool>,
}

impl RedrawRequester for Host {
    fn request_redraw(&self, _: Duration) {
        self.dirty.store(true, Ordering::SeqCst);
    }
}

fn main() {
    let host = Host::default();
    let renderer = SvgRenderer::default();
    let config = AnimationConfig::default()
        .set_duration(1.0)
        .unwrap()
        .set_completion(|| println!("Ring full"));
    let mut ring = ProgressRing::new(renderer.clone())
        .set_config(config)
        .set_redraw_requester(host.clone());

    ring.start_animation();

    // The host frame loop: ~25 frames per second.
    while host.dirty.swap(false, Ordering::SeqCst) {
        match ring.render() {
            Ok(tick) => println!("{:?}: {}", tick, renderer.get_path()),
            Err(err) => eprintln!("{}", err),
        }
        thread::sleep(Duration::from_millis(40));
    }
}
