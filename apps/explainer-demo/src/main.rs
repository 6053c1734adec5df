use anyhow::bail;
use clap::Parser;
use explainer_demo::{project, DemoArgs, LoggingRenderer};
use reel_app::{Player, Project, SceneOutcome};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = DemoArgs::parse();
    let mut project = project();
    if let Some(name) = &args.scene {
        let mut only = Project::new(project.name());
        for scene in project.scenes().iter().filter(|scene| scene.name() == name) {
            only.add_scene(scene.clone());
        }
        if only.is_empty() {
            bail!("no scene named {name:?}");
        }
        project = only;
    }

    let player = Player::with_options(project, args.options());
    let mut renderer = LoggingRenderer::new(args.log_every);
    let report = player.play(&mut renderer);

    println!("=== {} ===", player.project().name());
    for scene in &report.scenes {
        let status = match &scene.outcome {
            SceneOutcome::Completed => "ok".to_string(),
            SceneOutcome::Cancelled => "cancelled".to_string(),
            SceneOutcome::Failed(err) => format!("failed: {err}"),
        };
        println!(
            "{:>2}. {:<8} {:>5} frames {:>7.3}s  {status}",
            scene.index + 1,
            scene.name,
            scene.frames_rendered,
            scene.duration
        );
    }
    println!(
        "total: {} frames, {:.3}s",
        report.total_frames(),
        report.total_duration()
    );

    let failed = report.failures().count();
    if failed > 0 {
        bail!("{failed} scene(s) failed");
    }
    Ok(())
}
