use super::*;
use crate::runtime::TaskState;
use std::cell::Cell;

async fn tick(runtime: RuntimeHandle, counter: Signal<u32>) -> TaskResult {
    loop {
        counter.set(counter.get() + 1)?;
        runtime.frame_clock().next_frame().await?;
    }
}

#[test]
fn scene_without_root_is_finished() {
    let scene = Scene::new("empty", TimelineConfig::default());
    assert!(scene.is_finished());
    assert_eq!(scene.outcome(), None);
}

#[test]
fn root_outcome_is_reported() {
    let mut scene = Scene::new("failing", TimelineConfig::default());
    let ctx = scene.context();
    scene.start(async move {
        ctx.runtime().frame_clock().next_frame().await?;
        Err::<(), _>(AnimationError::script("broken scene"))
    });
    assert!(!scene.is_finished());
    scene.step();
    assert!(scene.is_finished());
    assert_eq!(
        scene.outcome(),
        Some(Err(AnimationError::script("broken scene")))
    );
}

#[test]
fn context_time_is_logical_inside_tasks() {
    let mut scene = Scene::new("timing", TimelineConfig::default().with_fps(10));
    let ctx = scene.context();
    let observed = Rc::new(Cell::new(-1.0));

    let task_ctx = ctx.clone();
    let sink = Rc::clone(&observed);
    scene.start(async move {
        task_ctx.runtime().frame_clock().next_frame().await?;
        sink.set(task_ctx.time());
        Ok::<(), AnimationError>(())
    });

    assert_eq!(ctx.time(), 0.0);
    scene.step();
    assert!((observed.get() - 0.1).abs() < 1e-9);
    assert_eq!(ctx.frame(), 1);
    assert_eq!(ctx.name(), "timing");
}

#[test]
fn background_tasks_end_with_the_scene() {
    let mut scene = Scene::new("background", TimelineConfig::default());
    let ctx = scene.context();
    let ticks = ctx.signal(0u32);

    let counter = ticks.clone();
    let clock = ctx.runtime().clone();
    let background = ctx.spawn("ticker", tick(clock, counter)).unwrap();

    let root_clock = ctx.runtime().clone();
    scene.start(async move {
        root_clock.frame_clock().next_frame().await
    });
    scene.step();
    assert!(scene.is_finished());
    assert_eq!(background.state(), TaskState::Suspended);

    scene.teardown();
    assert_eq!(background.state(), TaskState::Aborted);
    let settled = ticks.get();
    drop(scene);
    assert_eq!(ticks.get(), settled);
}
