use progress_ring::animations::{AnimationConfig, Orientation};
use progress_ring::pause;
use progress_ring::render::{Color, Stroke, SvgRenderer};
use progress_ring::widgets::{ProgressRing, RingEvent};

#[progress_ring::runtime]
async fn main() {
    let config = AnimationConfig::default()
        .set_from_value(1.0)
        .set_to_value(0.0)
        .set_orientation(Orientation::Top)
        .set_duration(3.0)
        .unwrap()
        .set_completion(|| println!("Countdown done"));

    let renderer = SvgRenderer::default();
    let ring = ProgressRing::new(renderer.clone())
        .set_config(config)
        .set_stroke(Stroke::default().set_color(Color::rgb(255, 59, 48)))
        .set_fps(30)
        .unwrap();

    ring.on(RingEvent::OnComplete, |ring: ProgressRing| async move {
        println!("{}", ring);
        Ok(())
    });

    ring.play().unwrap();
    while ring.is_playing() {
        println!("{:.2} -> {}", ring.current_value(), renderer.get_path());
        pause!(500);
    }

    println!("{}", renderer.document(100.0, 100.0).unwrap());
}
