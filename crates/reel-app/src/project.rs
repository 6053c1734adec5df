use std::fmt;
use std::future::Future;
use std::rc::Rc;

use reel_core::{SceneContext, TaskFuture, TaskResult};

use crate::view::View;

/// Builds a scene: populates the view and returns the root task.
pub type SceneBuilder = Rc<dyn Fn(&mut View, SceneContext) -> TaskFuture>;

#[derive(Clone)]
pub struct SceneDescriptor {
    name: String,
    build: SceneBuilder,
}

impl SceneDescriptor {
    pub fn new<B, F>(name: impl Into<String>, build: B) -> Self
    where
        B: Fn(&mut View, SceneContext) -> F + 'static,
        F: Future<Output = TaskResult> + 'static,
    {
        Self {
            name: name.into(),
            build: Rc::new(move |view: &mut View, ctx: SceneContext| -> TaskFuture {
                Box::pin(build(view, ctx))
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn build(&self, view: &mut View, ctx: SceneContext) -> TaskFuture {
        (self.build)(view, ctx)
    }
}

impl fmt::Debug for SceneDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneDescriptor")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Ordered list of scenes played back to back.
#[derive(Clone, Debug, Default)]
pub struct Project {
    name: String,
    scenes: Vec<SceneDescriptor>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scenes: Vec::new(),
        }
    }

    /// Append a scene.
    pub fn scene<B, F>(mut self, name: impl Into<String>, build: B) -> Self
    where
        B: Fn(&mut View, SceneContext) -> F + 'static,
        F: Future<Output = TaskResult> + 'static,
    {
        self.add_scene(SceneDescriptor::new(name, build));
        self
    }

    pub fn add_scene(&mut self, scene: SceneDescriptor) {
        self.scenes.push(scene);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scenes(&self) -> &[SceneDescriptor] {
        &self.scenes
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}
