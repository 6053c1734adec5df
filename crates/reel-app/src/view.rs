//! The visual tree a scene draws into.
//!
//! Nodes are flat records with a parent link. Every property is either a
//! constant or bound to a signal; renderers sample bound properties when they
//! draw a frame, so values always reflect the last committed write.

use std::fmt;

use reel_core::{Color, SceneContext, Signal, Vector2};

/// Index of a node inside its [`View`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Group,
    Rect,
    Circle,
    Text,
    /// Bitmap reference. The source is an opaque string resolved by the host.
    Image { src: String },
    Line,
    Grid,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Group => "group",
            NodeKind::Rect => "rect",
            NodeKind::Circle => "circle",
            NodeKind::Text => "text",
            NodeKind::Image { .. } => "image",
            NodeKind::Line => "line",
            NodeKind::Grid => "grid",
        }
    }
}

/// A constant or a signal-bound property value.
#[derive(Clone)]
pub enum Prop<T: Clone + 'static> {
    Constant(T),
    Bound(Signal<T>),
}

impl<T: Clone + 'static> Prop<T> {
    pub fn get(&self) -> T {
        match self {
            Prop::Constant(value) => value.clone(),
            Prop::Bound(signal) => signal.get(),
        }
    }

    pub fn is_bound(&self) -> bool {
        matches!(self, Prop::Bound(_))
    }
}

#[derive(Clone)]
pub enum PropValue {
    Number(Prop<f64>),
    Vector(Prop<Vector2>),
    Color(Prop<Color>),
    Text(Prop<String>),
}

impl PropValue {
    pub fn sample(&self) -> PropSample {
        match self {
            PropValue::Number(prop) => PropSample::Number(prop.get()),
            PropValue::Vector(prop) => PropSample::Vector(prop.get()),
            PropValue::Color(prop) => PropSample::Color(prop.get()),
            PropValue::Text(prop) => PropSample::Text(prop.get()),
        }
    }

    pub fn is_bound(&self) -> bool {
        match self {
            PropValue::Number(prop) => prop.is_bound(),
            PropValue::Vector(prop) => prop.is_bound(),
            PropValue::Color(prop) => prop.is_bound(),
            PropValue::Text(prop) => prop.is_bound(),
        }
    }
}

macro_rules! prop_value_from {
    ($variant:ident, $ty:ty) => {
        impl From<$ty> for PropValue {
            fn from(value: $ty) -> Self {
                PropValue::$variant(Prop::Constant(value))
            }
        }

        impl From<Signal<$ty>> for PropValue {
            fn from(signal: Signal<$ty>) -> Self {
                PropValue::$variant(Prop::Bound(signal))
            }
        }

        impl From<&Signal<$ty>> for PropValue {
            fn from(signal: &Signal<$ty>) -> Self {
                PropValue::$variant(Prop::Bound(signal.clone()))
            }
        }
    };
}

prop_value_from!(Number, f64);
prop_value_from!(Vector, Vector2);
prop_value_from!(Color, Color);
prop_value_from!(Text, String);

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::Text(Prop::Constant(value.to_string()))
    }
}

/// A property value read at render time.
#[derive(Debug, Clone, PartialEq)]
pub enum PropSample {
    Number(f64),
    Vector(Vector2),
    Color(Color),
    Text(String),
}

impl PropSample {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropSample::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropSample::Text(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for PropSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropSample::Number(value) => write!(f, "{value:.3}"),
            PropSample::Vector(value) => write!(f, "({:.3}, {:.3})", value.x, value.y),
            PropSample::Color(value) => write!(f, "{value}"),
            PropSample::Text(value) => write!(f, "{value:?}"),
        }
    }
}

#[derive(Clone)]
pub struct Node {
    name: String,
    kind: NodeKind,
    props: Vec<(String, PropValue)>,
    parent: Option<NodeId>,
}

impl Node {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            props: Vec::new(),
            parent: None,
        }
    }

    pub fn group(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Group)
    }

    pub fn rect(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Rect)
    }

    pub fn circle(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Circle)
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Text)
    }

    pub fn image(name: impl Into<String>, src: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Image { src: src.into() })
    }

    pub fn line(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Line)
    }

    pub fn grid(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Grid)
    }

    /// Set a property. Setting the same key twice replaces the earlier value.
    pub fn prop(mut self, key: &str, value: impl Into<PropValue>) -> Self {
        let value = value.into();
        match self.props.iter_mut().find(|(existing, _)| existing == key) {
            Some((_, slot)) => *slot = value,
            None => self.props.push((key.to_string(), value)),
        }
        self
    }

    pub fn child_of(mut self, parent: NodeId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn props(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.props.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn sample(&self, key: &str) -> Option<PropSample> {
        self.props
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.sample())
    }
}

/// Scene camera. Its signals are animated like any other signal.
#[derive(Clone)]
pub struct Camera {
    pub zoom: Signal<f64>,
    pub position: Signal<Vector2>,
    pub rotation: Signal<f64>,
}

impl Camera {
    pub fn new(ctx: &SceneContext) -> Self {
        Self {
            zoom: ctx.signal(1.0).with_label("camera.zoom"),
            position: ctx.signal(Vector2::ZERO).with_label("camera.position"),
            rotation: ctx.signal(0.0).with_label("camera.rotation"),
        }
    }
}

/// Flat visual tree of one scene.
pub struct View {
    nodes: Vec<Node>,
    background: Color,
    camera: Option<Camera>,
}

impl View {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            background: Color::BLACK,
            camera: None,
        }
    }

    pub fn add(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// First node with the given name.
    pub fn find(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.name == name)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn children(&self, parent: NodeId) -> impl Iterator<Item = &Node> {
        self.nodes
            .iter()
            .filter(move |node| node.parent == Some(parent))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn set_background(&mut self, color: Color) {
        self.background = color;
    }

    pub fn background(&self) -> Color {
        self.background
    }

    /// Install a camera, replacing any previous one, and return its handle.
    pub fn use_camera(&mut self, ctx: &SceneContext) -> Camera {
        let camera = Camera::new(ctx);
        self.camera = Some(camera.clone());
        camera
    }

    pub fn camera(&self) -> Option<&Camera> {
        self.camera.as_ref()
    }

    /// Current value of one node property.
    pub fn sample(&self, node: &str, key: &str) -> Option<PropSample> {
        self.find(node).and_then(|node| node.sample(key))
    }
}

impl Default for View {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
