use super::*;
use reel_core::{Scene, TimelineConfig};

fn scene() -> Scene {
    Scene::new("view", TimelineConfig::default())
}

#[test]
fn constant_props_sample_as_set() {
    let mut view = View::new();
    view.add(
        Node::rect("box")
            .prop("width", 120.0)
            .prop("fill", Color::WHITE)
            .prop("label", "hello"),
    );

    assert_eq!(view.sample("box", "width"), Some(PropSample::Number(120.0)));
    assert_eq!(view.sample("box", "fill"), Some(PropSample::Color(Color::WHITE)));
    assert_eq!(
        view.sample("box", "label").as_ref().and_then(PropSample::as_text),
        Some("hello")
    );
    assert_eq!(view.sample("box", "missing"), None);
    assert_eq!(view.sample("nobody", "width"), None);
}

#[test]
fn bound_props_follow_their_signal() {
    let scene = scene();
    let ctx = scene.context();
    let scale = ctx.signal(1.0f64);
    let mut view = View::new();
    view.add(Node::circle("dot").prop("scale", &scale));

    let dot = view.find("dot").expect("dot node");
    assert!(dot.props().all(|(_, value)| value.is_bound()));
    assert_eq!(view.sample("dot", "scale"), Some(PropSample::Number(1.0)));

    scale.set(2.5).expect("plain signal");
    assert_eq!(view.sample("dot", "scale"), Some(PropSample::Number(2.5)));
}

#[test]
fn derived_props_are_recomputed_on_sample() {
    let scene = scene();
    let ctx = scene.context();
    let width = ctx.signal(10.0f64);
    let source = width.clone();
    let half = ctx.derived(move || source.get() / 2.0);
    let mut view = View::new();
    view.add(Node::rect("panel").prop("half", half));

    width.set(40.0).expect("plain signal");
    assert_eq!(
        view.sample("panel", "half").and_then(|sample| sample.as_number()),
        Some(20.0)
    );
}

#[test]
fn setting_a_key_twice_keeps_the_last_value() {
    let node = Node::text("title").prop("text", "a").prop("text", "b");
    assert_eq!(node.props().count(), 1);
    assert_eq!(node.sample("text"), Some(PropSample::Text("b".into())));
}

#[test]
fn children_are_found_through_parent_links() {
    let mut view = View::new();
    let root = view.add(Node::group("root"));
    view.add(Node::rect("a").child_of(root));
    view.add(Node::image("logo", "assets/logo.svg").child_of(root));
    view.add(Node::line("stray"));

    let names: Vec<&str> = view.children(root).map(Node::name).collect();
    assert_eq!(names, vec!["a", "logo"]);
    assert_eq!(view.len(), 4);
    assert_eq!(view.node(root).map(|node| node.kind().as_str()), Some("group"));
    assert_eq!(
        view.find("logo").map(Node::kind),
        Some(&NodeKind::Image {
            src: "assets/logo.svg".into()
        })
    );
}

#[test]
fn camera_signals_start_at_identity() {
    let scene = scene();
    let ctx = scene.context();
    let mut view = View::new();
    assert!(view.camera().is_none());

    let camera = view.use_camera(&ctx);
    assert_eq!(camera.zoom.get(), 1.0);
    assert_eq!(camera.position.get(), Vector2::ZERO);
    assert_eq!(camera.rotation.get(), 0.0);

    camera.zoom.set(2.0).expect("plain signal");
    let installed = view.camera().expect("camera installed");
    assert!(installed.zoom.ptr_eq(&camera.zoom));
    assert_eq!(installed.zoom.label(), "camera.zoom");
}

#[test]
fn background_defaults_to_black() {
    let mut view = View::default();
    assert!(view.is_empty());
    assert_eq!(view.background(), Color::BLACK);
    view.set_background(Color::rgb8(0x14, 0x14, 0x14));
    assert_eq!(view.background(), Color::rgb8(0x14, 0x14, 0x14));
}

#[test]
fn samples_display_compactly() {
    assert_eq!(PropSample::Number(0.5).to_string(), "0.500");
    assert_eq!(
        PropSample::Vector(Vector2::new(1.0, -2.0)).to_string(),
        "(1.000, -2.000)"
    );
    assert_eq!(PropSample::Text("hi".into()).to_string(), "\"hi\"");
}
