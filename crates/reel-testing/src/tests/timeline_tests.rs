use super::*;

async fn tick_forever(runtime: RuntimeHandle) -> TaskResult {
    loop {
        runtime.frame_clock().next_frame().await?;
    }
}

async fn count_each_frame(runtime: RuntimeHandle, counter: Signal<u32>) -> TaskResult {
    loop {
        runtime.frame_clock().next_frame().await?;
        counter.set(counter.get() + 1)?;
    }
}

#[test]
fn advance_to_seconds_lands_on_frame_boundaries() {
    let mut rule = TimelineTestRule::with_fps(10);
    rule.advance_to_seconds(0.25).unwrap();
    assert_eq!(rule.frame(), 3);
    assert!((rule.now_seconds() - 0.3).abs() < 1e-9);
}

#[test]
fn advance_to_seconds_rejects_negative_targets() {
    let mut rule = TimelineTestRule::new();
    assert_eq!(
        rule.advance_to_seconds(-1.0),
        Err(AnimationError::InvalidDuration { seconds: -1.0 })
    );
    assert_eq!(rule.frame(), 0);
}

#[test]
fn run_until_finished_counts_frames() {
    let mut rule = TimelineTestRule::new();
    let handle = rule.runtime_handle();
    rule.start(async move {
        for _ in 0..3 {
            handle.frame_clock().next_frame().await?;
        }
        Ok::<(), AnimationError>(())
    });
    assert_eq!(rule.run_until_finished(10), Ok(3));
    assert_eq!(rule.root().map(TaskHandle::is_finished), Some(true));
}

#[test]
fn run_until_finished_reports_the_frame_limit() {
    let mut rule = TimelineTestRule::new();
    rule.start(tick_forever(rule.runtime_handle()));
    assert!(matches!(
        rule.run_until_finished(5),
        Err(AnimationError::FrameLimitExceeded { frames: 5, .. })
    ));
}

#[test]
fn samples_include_the_current_value() {
    run_test_timeline(|rule| {
        let counter = rule.context().signal(0u32);
        rule.start(count_each_frame(rule.runtime_handle(), counter.clone()));
        assert_eq!(rule.sample_each_frame(&counter, 3), vec![0, 1, 2, 3]);
    });
}
