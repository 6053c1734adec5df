//! DNS lookup: the four resolution steps bounce in one after another, the
//! domain is typed and resolved to an address while the camera follows.

use reel_animation::prelude::*;
use reel_app::{Camera, Node, View};

use crate::palette;

const STEPS: [&str; 4] = [
    "You type a name",
    "Browser asks DNS",
    "DNS finds the IP",
    "Browser connects",
];
const DOMAIN: &str = "www.example.com";
const ADDRESS: &str = "93.184.216.34";
/// Seconds per typed character.
const TYPING_PACE: f64 = 0.07;

struct Cast {
    camera: Camera,
    title_opacity: Signal<f64>,
    step_scales: Vec<Signal<f64>>,
    domain_scale: Signal<f64>,
    domain_progress: Signal<f64>,
    dns_scale: Signal<f64>,
    arrow_opacity: Signal<f64>,
    ip_scale: Signal<f64>,
    ip_progress: Signal<f64>,
}

pub fn build(view: &mut View, ctx: SceneContext) -> TaskFuture {
    view.set_background(palette::dark());

    let cast = Cast {
        camera: view.use_camera(&ctx),
        title_opacity: ctx.signal(0.0),
        step_scales: STEPS.iter().map(|_| ctx.signal(0.0)).collect(),
        domain_scale: ctx.signal(0.0),
        domain_progress: ctx.signal(0.0),
        dns_scale: ctx.signal(0.0),
        arrow_opacity: ctx.signal(0.0),
        ip_scale: ctx.signal(0.0),
        ip_progress: ctx.signal(0.0),
    };
    let glow = ctx.signal(0.3f64).with_label("dns.glow");

    view.add(
        Node::text("title")
            .prop("text", "DNS")
            .prop("opacity", &cast.title_opacity)
            .prop("font_size", 80.0)
            .prop("fill", palette::cyan())
            .prop("y", -750.0),
    );
    let steps = view.add(Node::group("steps").prop("y", -450.0));
    for (index, (label, scale)) in STEPS.iter().zip(&cast.step_scales).enumerate() {
        view.add(
            Node::text(format!("step{}", index + 1))
                .prop("text", *label)
                .prop("scale", scale)
                .prop("y", 90.0 * index as f64)
                .child_of(steps),
        );
    }
    view.add(
        Node::rect("domain")
            .prop("scale", &cast.domain_scale)
            .prop("stroke", palette::white())
            .prop("y", 0.0),
    );
    view.add(
        Node::text("domain-text")
            .prop("text", typewriter(&cast.domain_progress, DOMAIN))
            .prop("fill", palette::white()),
    );
    view.add(
        Node::circle("dns-server")
            .prop("scale", &cast.dns_scale)
            .prop("opacity", &glow)
            .prop("stroke", palette::cyan())
            .prop("y", 300.0),
    );
    view.add(
        Node::line("lookup")
            .prop("opacity", &cast.arrow_opacity)
            .prop("stroke", palette::cyan()),
    );
    view.add(
        Node::rect("ip")
            .prop("scale", &cast.ip_scale)
            .prop("stroke", palette::green())
            .prop("y", 600.0),
    );
    view.add(
        Node::text("ip-text")
            .prop("text", typewriter(&cast.ip_progress, ADDRESS))
            .prop("fill", palette::green())
            .prop("y", 600.0),
    );

    // Runs until the scene ends and its tasks are torn down.
    let breathing = ctx.spawn(
        "dns/glow",
        loop_forever(move |_| {
            reel_animation::chain![glow.to(0.8, 0.6), glow.to(0.3, 0.6)]
        }),
    );

    boxed(async move {
        breathing?;
        script(cast).await
    })
}

fn typing_time(text: &str) -> f64 {
    text.chars().count() as f64 * TYPING_PACE
}

async fn script(cast: Cast) -> TaskResult {
    cast.title_opacity.to(1.0, 0.8).await?;
    wait_for(0.6).await?;

    sequence(
        0.55,
        cast.step_scales
            .iter()
            .map(|scale| boxed(scale.to_eased(1.0, 0.4, Easing::EaseOutBounce))),
    )
    .await?;
    wait_for(0.8).await?;

    let focus = |y: f64| {
        reel_animation::all![
            cast.camera.zoom.to(1.4, 0.6),
            cast.camera.position.to(Vector2::new(0.0, y), 0.6),
        ]
    };

    focus(0.0).await?;
    cast.domain_scale.to_eased(1.0, 0.5, Easing::EaseOutBounce).await?;
    wait_for(0.3).await?;
    cast.domain_progress
        .to_eased(1.0, typing_time(DOMAIN), Easing::Linear)
        .await?;
    wait_for(0.8).await?;

    focus(300.0).await?;
    cast.dns_scale.to_eased(1.0, 0.6, Easing::EaseOutBounce).await?;
    wait_for(0.3).await?;
    cast.arrow_opacity.to(1.0, 0.5).await?;
    let dns_scale = cast.dns_scale.clone();
    loop_n(2, move |_| {
        reel_animation::chain![
            dns_scale.to_eased(1.25, 0.25, Easing::EaseOutCubic),
            dns_scale.to_eased(1.0, 0.25, Easing::EaseOutCubic),
            wait_for(0.1),
        ]
    })
    .await?;
    wait_for(0.5).await?;

    focus(600.0).await?;
    cast.ip_scale.to_eased(1.0, 0.5, Easing::EaseOutBounce).await?;
    wait_for(0.3).await?;
    cast.ip_progress
        .to_eased(1.0, typing_time(ADDRESS), Easing::Linear)
        .await?;
    wait_for(0.5).await?;
    reel_animation::chain![
        cast.ip_scale.to_eased(1.15, 0.3, Easing::EaseOutCubic),
        cast.ip_scale.to_eased(1.0, 0.3, Easing::EaseOutCubic),
    ]
    .await?;
    wait_for(1.5).await?;

    let mut exit = vec![
        boxed(cast.camera.zoom.to(0.5, 0.7)),
        boxed(cast.camera.position.to(Vector2::ZERO, 0.7)),
        boxed(cast.title_opacity.to(0.0, 0.5)),
        boxed(cast.domain_scale.to(0.0, 0.5)),
        boxed(cast.dns_scale.to(0.0, 0.5)),
        boxed(cast.arrow_opacity.to(0.0, 0.5)),
        boxed(cast.ip_scale.to(0.0, 0.5)),
    ];
    exit.extend(
        cast.step_scales
            .iter()
            .map(|scale| boxed(scale.to(0.0, 0.5))),
    );
    all(exit).await
}
