use super::*;
use crate::renderer::RecordingRenderer;
use crate::view::{Node, PropSample};
use reel_animation::prelude::*;
use reel_core::TimelineConfig;

async fn fail_after(seconds: f64) -> TaskResult {
    wait_for(seconds).await?;
    Err(AnimationError::script("boom"))
}

fn slide_project() -> Project {
    Project::new("demo")
        .scene("slide", |view: &mut View, ctx: SceneContext| {
            let x = ctx.signal(0.0f64);
            view.add(Node::rect("box").prop("x", &x));
            async move { x.to_eased(1.0, 0.5, Easing::Linear).await }
        })
        .scene("pause", |_view: &mut View, _ctx: SceneContext| wait_for(0.3))
}

fn options() -> PlayerOptions {
    PlayerOptions::default().with_fps(10)
}

#[test]
fn scenes_play_back_to_back() {
    let player = Player::with_options(slide_project(), options());
    let mut renderer = RecordingRenderer::new();
    let report = player.play(&mut renderer);

    assert!(report.all_completed());
    assert_eq!(renderer.scenes(), ["slide".to_string(), "pause".to_string()]);
    assert_eq!(report.scenes[0].frames_rendered, 6);
    assert_eq!(report.scenes[1].frames_rendered, 4);
    assert_eq!(report.total_frames(), 10);
    assert!((report.scenes[0].duration - 0.5).abs() < 1e-12);
    assert!((report.total_duration() - 0.8).abs() < 1e-12);

    let xs = renderer.track("slide", "box", "x");
    assert_eq!(xs.first(), Some(&PropSample::Number(0.0)));
    assert_eq!(xs.last(), Some(&PropSample::Number(1.0)));
    assert!(xs
        .windows(2)
        .all(|pair| pair[0].as_number() <= pair[1].as_number()));

    let pause: Vec<_> = renderer.frames_for("pause").collect();
    assert_eq!(pause[0].info.scene_index, 1);
    assert_eq!(pause[0].info.frame, 0);
    assert_eq!(pause[0].info.time, 0.0);
}

#[test]
fn a_failing_scene_does_not_stop_later_scenes() {
    let project = Project::new("demo")
        .scene("broken", |_view: &mut View, _ctx: SceneContext| fail_after(0.2))
        .scene("after", |_view: &mut View, _ctx: SceneContext| wait_for(0.1));
    let report = Player::with_options(project, options()).play(&mut RecordingRenderer::new());

    assert!(!report.all_completed());
    assert_eq!(report.failures().count(), 1);
    assert_eq!(
        report.scenes[0].outcome,
        SceneOutcome::Failed(PlaybackError::Animation(AnimationError::script("boom")))
    );
    assert!((report.scenes[0].duration - 0.2).abs() < 1e-12);
    assert!(report.scenes[1].outcome.is_completed());
    assert_eq!(report.scenes[1].frames_rendered, 2);
}

#[test]
fn scenes_over_the_time_limit_are_failed() {
    let project = Project::new("demo").scene("endless", |_view: &mut View, _ctx: SceneContext| {
        loop_forever(|_| wait_for(0.1))
    });
    let options = options().with_max_scene_seconds(0.5);
    assert_eq!(options.max_frames(), 5);

    let report = Player::with_options(project, options).play(&mut RecordingRenderer::new());
    let scene = &report.scenes[0];
    assert_eq!(scene.frames_rendered, 6);
    assert_eq!(
        scene.outcome.error().and_then(PlaybackError::animation),
        Some(&AnimationError::FrameLimitExceeded {
            scene: "endless".into(),
            frames: 5,
        })
    );
}

#[test]
fn background_tasks_end_with_their_scene() {
    let project = Project::new("demo").scene("ticker", |view: &mut View, ctx: SceneContext| {
        let ticks = ctx.signal(0.0f64);
        view.add(Node::text("counter").prop("ticks", &ticks));
        let counter = ticks.clone();
        let spawned = ctx.spawn(
            "ticker/loop",
            loop_forever(move |_| {
                let counter = counter.clone();
                async move {
                    wait_for(0.1).await?;
                    counter.update(|value| value + 1.0)
                }
            }),
        );
        async move {
            spawned?;
            wait_for(0.3).await
        }
    });
    let mut renderer = RecordingRenderer::new();
    let report = Player::with_options(project, options()).play(&mut renderer);

    assert!(report.all_completed());
    let ticks = renderer.track("ticker", "counter", "ticks");
    assert_eq!(ticks.last().and_then(PropSample::as_number), Some(3.0));
}

struct FailingRenderer {
    fail_at: u64,
    rendered: Vec<(String, u64)>,
    ended: Vec<String>,
}

impl FrameRenderer for FailingRenderer {
    fn render(&mut self, frame: &FrameInfo, _view: &View) -> Result<(), PlaybackError> {
        if frame.scene_index == 0 && frame.frame == self.fail_at {
            return Err(PlaybackError::renderer(&frame.scene, "out of canvas"));
        }
        self.rendered.push((frame.scene.clone(), frame.frame));
        Ok(())
    }

    fn end_scene(&mut self, scene: &str) -> Result<(), PlaybackError> {
        self.ended.push(scene.to_string());
        Ok(())
    }
}

#[test]
fn renderer_failures_fail_only_their_scene() {
    let mut renderer = FailingRenderer {
        fail_at: 2,
        rendered: Vec::new(),
        ended: Vec::new(),
    };
    let report = Player::with_options(slide_project(), options()).play(&mut renderer);

    assert_eq!(
        report.scenes[0].outcome,
        SceneOutcome::Failed(PlaybackError::Renderer {
            scene: "slide".into(),
            message: "out of canvas".into(),
        })
    );
    assert_eq!(report.scenes[0].frames_rendered, 2);
    assert!(report.scenes[1].outcome.is_completed());
    assert_eq!(renderer.ended, vec!["slide".to_string(), "pause".to_string()]);
    assert_eq!(
        renderer
            .rendered
            .iter()
            .filter(|(scene, _)| scene == "pause")
            .count(),
        4
    );
}

#[test]
fn final_frame_can_be_skipped() {
    let project = Project::new("demo")
        .scene("pause", |_view: &mut View, _ctx: SceneContext| wait_for(0.3));
    let options = options().with_render_final_frame(false);
    let report = Player::with_options(project, options).play(&mut RecordingRenderer::new());

    assert!(report.all_completed());
    assert_eq!(report.scenes[0].frames_rendered, 3);
    assert!((report.scenes[0].duration - 0.3).abs() < 1e-12);
}

#[test]
fn instantaneous_scenes_render_a_single_frame() {
    let project = Project::new("demo").scene("still", |view: &mut View, _ctx: SceneContext| {
        view.add(Node::rect("bg"));
        async { Ok::<(), AnimationError>(()) }
    });
    let report = Player::new(project).play(&mut RecordingRenderer::new());

    assert!(report.all_completed());
    assert_eq!(report.scenes[0].frames_rendered, 1);
    assert_eq!(report.scenes[0].duration, 0.0);
}

#[test]
fn an_aborted_root_is_not_a_failure() {
    let mut scene = Scene::new("cut", TimelineConfig::default());
    let root = scene.start(wait_for(1.0));
    assert_eq!(root_result(&scene), Ok(SceneOutcome::Completed));

    root.cancel();
    assert_eq!(root.state(), TaskState::Aborted);
    assert_eq!(root_result(&scene), Ok(SceneOutcome::Cancelled));
}

#[test]
fn a_script_cancelling_its_own_scene_ends_it_cleanly() {
    let project = Project::new("demo")
        .scene("cut", |_view: &mut View, ctx: SceneContext| async move {
            let id = reel_core::require_thread()?.task_id();
            wait_for(0.1).await?;
            ctx.runtime().cancel_task(id);
            wait_for(10.0).await
        })
        .scene("after", |_view: &mut View, _ctx: SceneContext| wait_for(0.2));
    let report = Player::with_options(project, options()).play(&mut RecordingRenderer::new());

    let cut = &report.scenes[0];
    assert!(cut.outcome.is_cancelled(), "{:?}", cut.outcome);
    assert_eq!(cut.outcome.error(), None);
    assert_eq!(cut.frames_rendered, 2);
    assert!((cut.duration - 0.1).abs() < 1e-9);

    assert!(report.scenes[1].outcome.is_completed());
    assert!(report.all_completed());
    assert_eq!(report.failures().count(), 0);
}

#[test]
fn empty_projects_produce_empty_reports() {
    let report = Player::new(Project::new("nothing")).play(&mut RecordingRenderer::new());
    assert!(report.scenes.is_empty());
    assert!(report.all_completed());
    assert_eq!(report.total_frames(), 0);
}
