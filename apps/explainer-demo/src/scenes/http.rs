//! HTTP walkthrough: a browser and a server trade a request and a response,
//! then the title morphs through the methods and the encrypted variant.

use reel_animation::prelude::*;
use reel_app::{Node, View};

use crate::palette;

const METHODS: [&str; 4] = ["GET", "POST", "PUT", "DELETE"];

/// Every signal the script animates.
struct Cast {
    title: Signal<String>,
    title_opacity: Signal<f64>,
    browser_scale: Signal<f64>,
    browser_rotation: Signal<f64>,
    server_scale: Signal<f64>,
    server_rotation: Signal<f64>,
    request_opacity: Signal<f64>,
    response_opacity: Signal<f64>,
    methods: Vec<(Signal<f64>, Signal<f64>)>,
    http_box_scale: Signal<f64>,
    http_box_opacity: Signal<f64>,
    warning_scale: Signal<f64>,
    warning_opacity: Signal<f64>,
}

pub fn build(view: &mut View, ctx: SceneContext) -> TaskFuture {
    view.set_background(palette::dark());

    let cast = Cast {
        title: ctx.signal(String::from("HOW WEBSITES TALK")),
        title_opacity: ctx.signal(0.0),
        browser_scale: ctx.signal(0.0),
        browser_rotation: ctx.signal(0.0),
        server_scale: ctx.signal(0.0),
        server_rotation: ctx.signal(0.0),
        request_opacity: ctx.signal(0.0),
        response_opacity: ctx.signal(0.0),
        methods: METHODS
            .iter()
            .map(|_| (ctx.signal(0.0), ctx.signal(0.0)))
            .collect(),
        http_box_scale: ctx.signal(1.0),
        http_box_opacity: ctx.signal(0.0),
        warning_scale: ctx.signal(0.0),
        warning_opacity: ctx.signal(0.0),
    };

    view.add(
        Node::text("title")
            .prop("text", &cast.title)
            .prop("opacity", &cast.title_opacity)
            .prop("font_size", 64.0)
            .prop("fill", palette::white())
            .prop("y", -700.0),
    );
    view.add(
        Node::rect("browser")
            .prop("scale", &cast.browser_scale)
            .prop("rotation", &cast.browser_rotation)
            .prop("stroke", palette::cyan())
            .prop("y", -300.0),
    );
    view.add(
        Node::rect("server")
            .prop("scale", &cast.server_scale)
            .prop("rotation", &cast.server_rotation)
            .prop("stroke", palette::green())
            .prop("y", 300.0),
    );
    view.add(
        Node::line("request")
            .prop("opacity", &cast.request_opacity)
            .prop("stroke", palette::cyan()),
    );
    view.add(
        Node::line("response")
            .prop("opacity", &cast.response_opacity)
            .prop("stroke", palette::green()),
    );

    let methods = view.add(Node::group("methods").prop("y", 0.0));
    for (index, (label, (scale, rotation))) in METHODS.iter().zip(&cast.methods).enumerate() {
        view.add(
            Node::text(*label)
                .prop("text", *label)
                .prop("scale", scale)
                .prop("rotation", rotation)
                .prop("x", -330.0 + 220.0 * index as f64)
                .child_of(methods),
        );
    }

    let http_box = view.add(
        Node::rect("http-box")
            .prop("scale", &cast.http_box_scale)
            .prop("opacity", &cast.http_box_opacity)
            .prop("stroke", palette::red()),
    );
    view.add(
        Node::text("warning")
            .prop("text", "NOT SECURE")
            .prop("scale", &cast.warning_scale)
            .prop("opacity", &cast.warning_opacity)
            .prop("fill", palette::red())
            .child_of(http_box),
    );

    boxed(script(cast))
}

/// Grow to `peak` and settle back to rest.
async fn pulse(scale: Signal<f64>, peak: f64, seconds: f64) -> TaskResult {
    scale.to_eased(peak, seconds, Easing::EaseOutCubic).await?;
    scale.to_eased(1.0, seconds, Easing::EaseOutCubic).await
}

async fn script(cast: Cast) -> TaskResult {
    cast.title_opacity.to(1.0, 0.6).await?;
    wait_for(0.3).await?;

    reel_animation::all![
        cast.browser_scale.to_eased(1.0, 0.7, Easing::EaseOutBounce),
        cast.server_scale.to_eased(1.0, 0.7, Easing::EaseOutBounce),
        cast.browser_rotation.to_eased(-5.0, 0.4, Easing::EaseOutCubic),
        cast.server_rotation.to_eased(5.0, 0.4, Easing::EaseOutCubic),
    ]
    .await?;
    reel_animation::all![
        cast.browser_rotation.to(0.0, 0.3),
        cast.server_rotation.to(0.0, 0.3),
    ]
    .await?;
    wait_for(0.3).await?;

    cast.request_opacity.to(1.0, 0.5).await?;
    pulse(cast.browser_scale.clone(), 1.1, 0.15).await?;
    wait_for(0.2).await?;
    cast.response_opacity.to(1.0, 0.5).await?;
    pulse(cast.server_scale.clone(), 1.1, 0.15).await?;
    wait_for(0.6).await?;

    cast.title.to(String::from("HTTP METHODS"), 0.4).await?;
    wait_for(0.3).await?;
    sequence(
        0.4,
        cast.methods.iter().map(|(scale, rotation)| {
            boxed(reel_animation::all![
                scale.to_eased(1.0, 0.3, Easing::EaseOutBounce),
                rotation.to_eased(360.0, 0.3, Easing::EaseOutCubic),
            ])
        }),
    )
    .await?;
    wait_for(0.3).await?;
    all(cast
        .methods
        .iter()
        .map(|(scale, _)| boxed(pulse(scale.clone(), 1.15, 0.2))))
    .await?;
    wait_for(0.8).await?;

    cast.title.to(String::from("HTTP - NOT ENCRYPTED"), 0.4).await?;
    wait_for(0.3).await?;
    cast.http_box_opacity.to(1.0, 0.4).await?;
    reel_animation::chain![
        cast.http_box_scale.to_eased(1.1, 0.15, Easing::EaseOutCubic),
        cast.http_box_scale.to_eased(0.95, 0.15, Easing::EaseOutCubic),
        cast.http_box_scale.to_eased(1.0, 0.15, Easing::EaseOutCubic),
    ]
    .await?;
    wait_for(0.6).await?;

    reel_animation::all![
        cast.warning_opacity.to(1.0, 0.3),
        cast.warning_scale.to_eased(1.3, 0.3, Easing::EaseOutBounce),
    ]
    .await?;
    let (warning, http_box) = (cast.warning_scale.clone(), cast.http_box_scale.clone());
    loop_n(3, move |_| {
        reel_animation::chain![
            reel_animation::all![warning.to(1.4, 0.2), http_box.to(1.05, 0.2)],
            reel_animation::all![warning.to(1.3, 0.2), http_box.to(1.0, 0.2)],
            wait_for(0.1),
        ]
    })
    .await?;
    wait_for(1.2).await?;

    cast.title.to(String::from("HTTPS - ENCRYPTED ✓"), 0.5).await?;
    wait_for(0.4).await?;
    let shaking = cast.http_box_scale.clone();
    loop_n(4, move |_| {
        reel_animation::chain![shaking.to(1.1, 0.08), shaking.to(0.9, 0.08)]
    })
    .await?;
    wait_for(0.2).await?;

    reel_animation::all![
        cast.http_box_opacity.to(0.0, 0.4),
        cast.http_box_scale.to(1.5, 0.4),
        cast.warning_opacity.to(0.0, 0.3),
        cast.title_opacity.to(0.0, 0.4),
    ]
    .await
}
