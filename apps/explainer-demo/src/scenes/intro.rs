//! Title card: the globe icon pops in and three lines type themselves out.

use reel_animation::prelude::*;
use reel_app::{Node, View};

use super::scaled;
use crate::palette;

struct Line {
    text: &'static str,
    font_size: f64,
    y: f64,
    accent: bool,
}

const LINES: [Line; 3] = [
    Line {
        text: "HOW DOES THE",
        font_size: 60.0,
        y: 40.0,
        accent: false,
    },
    Line {
        text: "INTERNET",
        font_size: 90.0,
        y: 150.0,
        accent: true,
    },
    Line {
        text: "WORK?",
        font_size: 60.0,
        y: 260.0,
        accent: false,
    },
];

pub fn build(view: &mut View, ctx: SceneContext) -> TaskFuture {
    view.set_background(palette::dark());

    let icon_scale = ctx.signal(0.0f64).with_label("icon.scale");
    let icon_rotation = ctx.signal(0.0f64).with_label("icon.rotation");
    let content_scale = ctx.signal(1.0f64).with_label("content.scale");
    let progress: Vec<Signal<f64>> = (0..LINES.len())
        .map(|index| ctx.signal(0.0).with_label(&format!("line{}.progress", index + 1)))
        .collect();

    view.add(
        Node::grid("grid")
            .prop("width", 1080.0)
            .prop("height", 1920.0)
            .prop("spacing", 60.0)
            .prop("stroke", palette::grid()),
    );
    let content = view.add(Node::group("content").prop("scale", &content_scale));

    let glow = scaled(&ctx, &icon_scale, 320.0);
    view.add(
        Node::circle("glow")
            .prop("width", &glow)
            .prop("height", &glow)
            .prop("stroke", palette::cyan())
            .prop("opacity", 0.4)
            .prop("y", -180.0)
            .child_of(content),
    );
    let icon = scaled(&ctx, &icon_scale, 200.0);
    view.add(
        Node::image("icon", "/asset/global-network.png")
            .prop("width", &icon)
            .prop("height", &icon)
            .prop("rotation", &icon_rotation)
            .prop("y", -180.0)
            .child_of(content),
    );

    for (index, (line, progress)) in LINES.iter().zip(&progress).enumerate() {
        let fill = if line.accent {
            palette::cyan()
        } else {
            palette::white()
        };
        view.add(
            Node::text(format!("line{}", index + 1))
                .prop("text", typewriter(progress, line.text))
                .prop("font_size", line.font_size)
                .prop("fill", fill)
                .prop("y", line.y)
                .child_of(content),
        );
    }

    boxed(script(icon_scale, icon_rotation, content_scale, progress))
}

async fn script(
    icon_scale: Signal<f64>,
    icon_rotation: Signal<f64>,
    content_scale: Signal<f64>,
    progress: Vec<Signal<f64>>,
) -> TaskResult {
    icon_scale.to_eased(1.0, 0.6, Easing::EaseOutBack).await?;
    wait_for(0.2).await?;

    for (index, line) in progress.iter().enumerate() {
        if index > 0 {
            wait_for(0.2).await?;
        }
        line.to(1.0, 0.6).await?;
    }

    wait_for(0.3).await?;
    icon_rotation.to(360.0, 2.0).await?;
    wait_for(0.5).await?;

    let mut exit = vec![
        boxed(content_scale.to(0.5, 0.5)),
        boxed(icon_scale.to(0.0, 0.4)),
    ];
    exit.extend(progress.iter().map(|line| boxed(line.to(0.0, 0.4))));
    all(exit).await
}
