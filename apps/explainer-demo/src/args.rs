//! Command line of the demo binary.

use clap::Parser;
use reel_app::PlayerOptions;

#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "explainer-demo")]
#[command(about = "Play the networking explainer headlessly and log its frames")]
pub struct DemoArgs {
    /// Frames per simulated second
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..))]
    pub fps: u32,

    /// Log every Nth frame at info level
    #[arg(
        long = "log-every",
        default_value_t = 30,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub log_every: u64,

    /// Fail scenes still running after this many simulated seconds
    #[arg(long = "max-seconds", default_value_t = 120.0, value_parser = positive_seconds)]
    pub max_seconds: f64,

    /// Only play the scene with this name
    #[arg(long)]
    pub scene: Option<String>,
}

impl DemoArgs {
    pub fn options(&self) -> PlayerOptions {
        PlayerOptions::default()
            .with_fps(self.fps)
            .with_max_scene_seconds(self.max_seconds)
    }
}

fn positive_seconds(raw: &str) -> Result<f64, String> {
    let seconds: f64 = raw.parse().map_err(|_| format!("{raw:?} is not a number"))?;
    if seconds.is_finite() && seconds > 0.0 {
        Ok(seconds)
    } else {
        Err("must be a positive number of seconds".to_string())
    }
}
