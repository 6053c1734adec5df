use super::*;
use crate::combinators::wait_for;
use reel_core::{Color, TaskHandle, TaskState};
use reel_testing::TimelineTestRule;
use std::sync::Arc;
use std::task::{Wake, Waker};

struct NoopWaker;

impl Wake for NoopWaker {
    fn wake(self: Arc<Self>) {}
}

#[test]
fn tween_starts_at_its_start_value_and_ends_exactly() {
    let mut rule = TimelineTestRule::new();
    let x = rule.context().signal(0.0f64);
    let target = x.clone();
    rule.start(async move { target.to(10.0, 0.5).await });

    assert_eq!(x.get(), 0.0);
    rule.advance_frames(29);
    assert!(x.get() < 10.0);
    rule.advance_frame();
    assert_eq!(x.get(), 10.0);
    assert_eq!(rule.root().map(TaskHandle::state), Some(TaskState::Completed));
}

#[test]
fn zero_duration_commits_within_the_same_step() {
    let mut rule = TimelineTestRule::new();
    let x = rule.context().signal(1.0f64);
    let target = x.clone();
    let root = rule.start(async move { target.to(5.0, 0.0).await });

    assert_eq!(x.get(), 5.0);
    assert_eq!(x.get(), 5.0);
    assert_eq!(root.state(), TaskState::Completed);
    assert_eq!(rule.frame(), 0);
}

#[test]
fn invalid_durations_fail_the_awaiting_task() {
    for seconds in [-0.5, f64::NAN, f64::INFINITY] {
        let mut rule = TimelineTestRule::new();
        let x = rule.context().signal(0.0f64);
        let target = x.clone();
        let root = rule.start(async move { target.to(1.0, seconds).await });
        assert_eq!(root.state(), TaskState::Failed);
        assert!(matches!(
            root.error(),
            Some(AnimationError::InvalidDuration { .. })
        ));
        assert_eq!(x.version(), 0);
    }
}

#[test]
fn tweening_a_derived_signal_is_rejected() {
    let mut rule = TimelineTestRule::new();
    let ctx = rule.context();
    let base = ctx.signal(1.0f64);
    let source = base.clone();
    let doubled = ctx.derived(move || source.get() * 2.0).with_label("doubled");

    let root = rule.start(async move { doubled.to(10.0, 0.5).await });
    assert_eq!(
        root.error(),
        Some(AnimationError::TweenDerived {
            signal: "doubled".into()
        })
    );
}

#[test]
fn start_value_is_captured_at_activation() {
    let mut rule = TimelineTestRule::new();
    let x = rule.context().signal(0.0f64);
    let target = x.clone();
    rule.start(async move {
        let tween = target.to_eased(10.0, 1.0, Easing::Linear);
        target.set(4.0)?;
        tween.await
    });

    assert_eq!(x.get(), 4.0);
    rule.advance_to_seconds(0.5).unwrap();
    assert!((x.get() - 7.0).abs() < 1e-9);
}

#[test]
fn wait_then_tween_is_exact() {
    let mut rule = TimelineTestRule::new();
    let x = rule.context().signal(0.0f64);
    let target = x.clone();
    rule.start(async move {
        wait_for(0.2).await?;
        target.to(1.0, 0.5).await
    });

    rule.advance_frames(12);
    assert_eq!(x.get(), 0.0);
    assert_eq!(x.version(), 1);
    rule.advance_frame();
    assert!(x.get() > 0.0);

    assert_eq!(rule.run_until_finished(100), Ok(29));
    assert_eq!(rule.frame(), 42);
    assert_eq!(x.get(), 1.0);
}

#[test]
fn back_to_back_tweens_keep_exact_logical_time() {
    let mut rule = TimelineTestRule::new();
    let ctx = rule.context();
    let x = ctx.signal(0.0f64);
    let target = x.clone();
    let finished_at = ctx.signal(0.0f64);
    let sink = finished_at.clone();
    let task_ctx = ctx.clone();
    rule.start(async move {
        target.to(1.0, 0.31).await?;
        target.to(0.0, 0.39).await?;
        sink.set(task_ctx.time())
    });

    assert_eq!(rule.run_until_finished(100), Ok(42));
    assert!((finished_at.get() - 0.7).abs() < 1e-12);
}

#[test]
fn bounce_samples_are_not_monotonic() {
    let mut rule = TimelineTestRule::new();
    let y = rule.context().signal(0.0f64);
    let target = y.clone();
    rule.start(async move { target.to_eased(100.0, 1.0, Easing::EaseOutBounce).await });

    let samples = rule.sample_each_frame(&y, 60);
    assert!(samples.windows(2).any(|pair| pair[1] < pair[0]));
    assert_eq!(samples.last().copied(), Some(100.0));
}

#[test]
fn cubic_samples_are_monotonic() {
    let mut rule = TimelineTestRule::new();
    let y = rule.context().signal(0.0f64);
    let target = y.clone();
    rule.start(async move { target.to(100.0, 1.0).await });

    let samples = rule.sample_each_frame(&y, 60);
    assert!(samples.windows(2).all(|pair| pair[1] >= pair[0]));
    assert_eq!(samples.first().copied(), Some(0.0));
    assert_eq!(samples.last().copied(), Some(100.0));
}

#[test]
fn colors_and_text_tween_like_numbers() {
    let mut rule = TimelineTestRule::new();
    let ctx = rule.context();
    let fill = ctx.signal(Color::BLACK);
    let title = ctx.signal(String::from("HTTP"));
    let (fill_target, title_target) = (fill.clone(), title.clone());
    rule.start(async move {
        fill_target
            .to_eased(Color::WHITE, 0.5, Easing::Linear)
            .await?;
        title_target.to(String::from("HTTPS"), 0.5).await
    });

    rule.advance_to_seconds(0.25).unwrap();
    assert!((fill.get().r - 0.5).abs() < 1e-6);
    assert_eq!(rule.run_until_finished(100), Ok(45));
    assert_eq!(fill.get(), Color::WHITE);
    assert_eq!(title.get(), "HTTPS");
}

#[test]
fn polling_outside_a_task_is_an_error() {
    let rule = TimelineTestRule::new();
    let x = rule.context().signal(0.0f64);
    let mut tween = x.to(1.0, 0.5);
    let waker = Waker::from(Arc::new(NoopWaker));
    let mut cx = Context::from_waker(&waker);
    assert_eq!(
        Pin::new(&mut tween).poll(&mut cx),
        Poll::Ready(Err(AnimationError::NoActiveTask))
    );
}
