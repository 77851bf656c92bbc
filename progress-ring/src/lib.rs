#![doc(html_root_url = "https://docs.rs/progress-ring/0.1.0-beta")]

//! <h1 align="center">PROGRESS-RING - An animated countdown ring</h1>
//! <div style="text-align:center;font-style:italic;">A circular progress indicator animating from one fraction to another over a fixed duration - written in Rust.</div>
//! <br/>
//!
//! # Features
//!
//! **Progress-Ring** is the visual analogue of a countdown timer: a stroked arc that sweeps from a
//! starting fraction to an ending fraction of a circle over a fixed duration, optionally repeating,
//! and notifying a completion callback each time it reaches its target.
//!
//! - Drive the [`AnimationMachine`](animations::AnimationMachine) state machine yourself, or
//! - Embed a [`ProgressRing`](widgets::ProgressRing) widget in your host render loop through the
//!   [`RedrawRequester`](render::RedrawRequester) capability, or
//! - Let the ring drive itself with [`ProgressRing::play()`](widgets::ProgressRing::play).
//! - Draw it with any [`Renderer`](render::Renderer) (an [`SvgRenderer`](render::SvgRenderer) is provided).
//!
//! # Getting Started
//!
//! - Add the following to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! progress-ring = "0.1.0-beta"
//! ```
//!
//! The following code demonstrates a six seconds countdown starting from a full ring:
//! ```no_run
//! use progress_ring::animations::AnimationConfig;
//! use progress_ring::render::SvgRenderer;
//! use progress_ring::widgets::ProgressRing;
//!
//! #[progress_ring::runtime]
//! async fn main() {
//!     let config = AnimationConfig::default()
//!         .set_from_value(1.0)
//!         .set_to_value(0.0)
//!         .set_duration(6.0)
//!         .unwrap()
//!         .set_completion(|| println!("Countdown done"));
//!
//!     let ring = ProgressRing::new(SvgRenderer::default()).set_config(config);
//!     ring.play().unwrap();
//! }
//! ```
//!
//! # Feature flags
//!
//! - **serde** -- Enables serialize/deserialize capabilities for the configuration entities.
//! - **mocks** -- Provides mocked renderer and redraw requester (useful for tests mostly).

#[cfg(test)]
extern crate self as progress_ring;

pub mod animations;
pub mod errors;
#[cfg(any(test, feature = "mocks"))]
pub mod mocks;
pub mod render;
pub mod utils;
pub mod widgets;

pub use progress_ring_macros::runtime;
