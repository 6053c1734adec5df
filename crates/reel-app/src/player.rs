//! Headless back-to-back playback of a [`Project`].

use reel_core::{AnimationError, Scene, TaskFuture, TaskState};

use crate::error::PlaybackError;
use crate::options::PlayerOptions;
use crate::project::{Project, SceneDescriptor};
use crate::renderer::{FrameInfo, FrameRenderer};
use crate::view::View;

#[derive(Debug, Clone, PartialEq)]
pub enum SceneOutcome {
    Completed,
    /// The root task was aborted from outside. Cancellation unwinds the
    /// scene cleanly and is not a failure.
    Cancelled,
    Failed(PlaybackError),
}

impl SceneOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, SceneOutcome::Completed)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, SceneOutcome::Cancelled)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SceneOutcome::Failed(_))
    }

    pub fn error(&self) -> Option<&PlaybackError> {
        match self {
            SceneOutcome::Failed(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneReport {
    pub name: String,
    pub index: usize,
    /// Frames handed to the renderer, frame 0 included.
    pub frames_rendered: u64,
    /// Simulated seconds the scene ran for.
    pub duration: f64,
    pub outcome: SceneOutcome,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackReport {
    pub scenes: Vec<SceneReport>,
}

impl PlaybackReport {
    /// True when no scene failed. Cancelled scenes count as played.
    pub fn all_completed(&self) -> bool {
        !self.scenes.iter().any(|scene| scene.outcome.is_failed())
    }

    pub fn failures(&self) -> impl Iterator<Item = &SceneReport> {
        self.scenes.iter().filter(|scene| scene.outcome.is_failed())
    }

    pub fn total_frames(&self) -> u64 {
        self.scenes.iter().map(|scene| scene.frames_rendered).sum()
    }

    pub fn total_duration(&self) -> f64 {
        self.scenes.iter().map(|scene| scene.duration).sum()
    }
}

/// Plays every scene of a project in order, each in a fresh [`Scene`].
///
/// A scene that fails is reported and playback moves on to the next one.
pub struct Player {
    project: Project,
    options: PlayerOptions,
}

impl Player {
    pub fn new(project: Project) -> Self {
        Self::with_options(project, PlayerOptions::default())
    }

    pub fn with_options(project: Project, options: PlayerOptions) -> Self {
        Self { project, options }
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn options(&self) -> &PlayerOptions {
        &self.options
    }

    pub fn play(&self, renderer: &mut dyn FrameRenderer) -> PlaybackReport {
        log::info!(
            "playing project {:?}: {} scene(s) at {} fps",
            self.project.name(),
            self.project.len(),
            self.options.timeline.fps
        );
        let scenes = self
            .project
            .scenes()
            .iter()
            .enumerate()
            .map(|(index, descriptor)| self.play_scene(index, descriptor, renderer))
            .collect();
        PlaybackReport { scenes }
    }

    fn play_scene(
        &self,
        index: usize,
        descriptor: &SceneDescriptor,
        renderer: &mut dyn FrameRenderer,
    ) -> SceneReport {
        let name = descriptor.name();
        log::info!("scene {index} {name:?} starting");

        let mut scene = Scene::new(name, self.options.timeline);
        let mut view = View::new();
        let root = descriptor.build(&mut view, scene.context());
        let mut frames_rendered = 0;

        let result = self.drive(
            index,
            &mut scene,
            &view,
            root,
            renderer,
            &mut frames_rendered,
        );

        let duration = scene.now_seconds();
        scene.teardown();
        let ended = renderer.end_scene(name);
        let result = result.and_then(|outcome| ended.map(|()| outcome));

        let outcome = match result {
            Ok(SceneOutcome::Cancelled) => {
                log::info!("scene {index} {name:?} cancelled at {duration:.3}s");
                SceneOutcome::Cancelled
            }
            Ok(outcome) => {
                log::info!("scene {index} {name:?} completed after {duration:.3}s");
                outcome
            }
            Err(err) => {
                log::error!("scene {index} {name:?} failed at {duration:.3}s: {err}");
                SceneOutcome::Failed(err)
            }
        };
        SceneReport {
            name: name.to_string(),
            index,
            frames_rendered,
            duration,
            outcome,
        }
    }

    fn drive(
        &self,
        index: usize,
        scene: &mut Scene,
        view: &View,
        root: TaskFuture,
        renderer: &mut dyn FrameRenderer,
        frames_rendered: &mut u64,
    ) -> Result<SceneOutcome, PlaybackError> {
        let name = scene.name().to_string();
        renderer.begin_scene(&name, view)?;
        scene.start(root);
        self.render(renderer, index, scene, view)?;
        *frames_rendered += 1;

        let max_frames = self.options.max_frames();
        while !scene.is_finished() {
            if scene.frame() >= max_frames {
                return Err(AnimationError::FrameLimitExceeded {
                    scene: name,
                    frames: max_frames,
                }
                .into());
            }
            scene.step();
            if scene.is_finished() && !self.options.render_final_frame {
                break;
            }
            self.render(renderer, index, scene, view)?;
            *frames_rendered += 1;
        }
        root_result(scene)
    }

    fn render(
        &self,
        renderer: &mut dyn FrameRenderer,
        scene_index: usize,
        scene: &Scene,
        view: &View,
    ) -> Result<(), PlaybackError> {
        let info = FrameInfo {
            scene: scene.name().to_string(),
            scene_index,
            frame: scene.frame(),
            time: scene.now_seconds(),
        };
        log::trace!("rendering {} frame {}", info.scene, info.frame);
        renderer.render(&info, view)
    }
}

fn root_result(scene: &Scene) -> Result<SceneOutcome, PlaybackError> {
    match scene.root().map(|root| (root.state(), root.result())) {
        Some((_, Some(result))) => result
            .map(|()| SceneOutcome::Completed)
            .map_err(PlaybackError::from),
        Some((TaskState::Aborted, None)) => Ok(SceneOutcome::Cancelled),
        _ => Ok(SceneOutcome::Completed),
    }
}

#[cfg(test)]
#[path = "tests/player_tests.rs"]
mod tests;
