use reel_animation::prelude::*;
use reel_testing::TimelineTestRule;

#[test]
fn typed_text_grows_until_complete() {
    let mut rule = TimelineTestRule::with_fps(30);
    let ctx = rule.context();
    let progress = ctx.signal(0.0f64);
    let text = typewriter(&progress, "INTERNET");
    let driver = progress.clone();
    rule.start(async move { driver.to(1.0, 0.6).await });

    let samples = rule.sample_each_frame(&text, 18);
    assert_eq!(samples[0], "");
    assert!(samples
        .windows(2)
        .all(|pair| pair[0].chars().count() <= pair[1].chars().count()));
    assert_eq!(samples[18], "INTERNET");
    assert!(samples[..18].iter().all(|sample| sample != "INTERNET"));
}

#[test]
fn string_tweens_replace_characters_in_order() {
    let mut rule = TimelineTestRule::with_fps(10);
    let ctx = rule.context();
    let title = ctx.signal(String::from("HTTP"));
    let driver = title.clone();
    rule.start(async move {
        driver
            .to_eased(String::from("HTTPS"), 0.5, Easing::Linear)
            .await
    });

    let samples = rule.sample_each_frame(&title, 5);
    assert_eq!(samples.first().map(String::as_str), Some("HTTP"));
    assert_eq!(samples.last().map(String::as_str), Some("HTTPS"));
    assert_eq!(rule.run_until_finished(1), Ok(0));
}
