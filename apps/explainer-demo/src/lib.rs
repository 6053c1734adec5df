//! A short networking explainer: an animated title card, an HTTP
//! request/response walkthrough and a DNS lookup with camera moves.

pub mod args;
pub mod palette;
pub mod renderer;
pub mod scenes;

pub use args::DemoArgs;
pub use renderer::LoggingRenderer;

use reel_app::Project;

/// Every scene of the explainer, in playback order.
pub fn project() -> Project {
    Project::new("how-the-internet-works")
        .scene("intro", scenes::intro::build)
        .scene("http", scenes::http::build)
        .scene("dns", scenes::dns::build)
}
