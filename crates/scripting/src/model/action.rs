use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::anim::{InterpolationMode, SceneTween, Tween, TweenType};
use crate::model::scene::{Camera, Color, Vec2};
use crate::model::verb::{ActionRef, Continuation};
use crate::model::world::World;

pub const DEFAULT_WALKING_SPEED: f32 = 4.0;

fn default_wait() -> bool {
    true
}

fn default_walking_speed() -> f32 {
    DEFAULT_WALKING_SPEED
}

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("no current scene")]
    NoScene,
    #[error("unknown actor: {id}")]
    UnknownActor { id: String },
    #[error("scene has no player actor")]
    NoPlayer,
    #[error("verb not found: {verb}")]
    UnknownVerb { verb: String },
}

/// One instruction inside a verb. The `class` tag is the loader's textual
/// kind field; actions are re-hydrated from save data by this tag alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "class")]
pub enum Action {
    PlaySound {
        sound: String,
    },
    SetState {
        actor: String,
        state: String,
    },
    SetProperty {
        key: String,
        value: String,
    },
    SetPosition {
        actor: String,
        x: f32,
        y: f32,
    },
    MusicVolume {
        volume: f32,
        duration: f32,
    },
    CancelVerb {
        actor: Option<String>,
        verb: String,
        target: Option<String>,
    },
    Wait {
        time: f32,
    },
    Goto {
        /// Defaults to the scene's player actor.
        actor: Option<String>,
        x: f32,
        y: f32,
        #[serde(default = "default_walking_speed")]
        speed: f32,
        #[serde(default = "default_wait")]
        wait: bool,
    },
    MoveAnim {
        actor: String,
        x: f32,
        y: f32,
        duration: f32,
        #[serde(default)]
        interpolation: InterpolationMode,
        #[serde(default = "default_wait")]
        wait: bool,
    },
    ScaleAnim {
        actor: String,
        scale: f32,
        duration: f32,
        #[serde(default = "default_wait")]
        wait: bool,
    },
    FadeAnim {
        actor: String,
        alpha: f32,
        duration: f32,
        #[serde(default = "default_wait")]
        wait: bool,
    },
    TintAnim {
        actor: String,
        r: f32,
        g: f32,
        b: f32,
        a: f32,
        duration: f32,
        #[serde(default = "default_wait")]
        wait: bool,
    },
    CameraMove {
        x: f32,
        y: f32,
        zoom: f32,
        duration: f32,
        #[serde(default = "default_wait")]
        wait: bool,
    },
    RunVerb {
        actor: Option<String>,
        verb: String,
        target: Option<String>,
        #[serde(default = "default_wait")]
        wait: bool,
    },
}

impl Action {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::PlaySound { .. } => "PlaySound",
            Self::SetState { .. } => "SetState",
            Self::SetProperty { .. } => "SetProperty",
            Self::SetPosition { .. } => "SetPosition",
            Self::MusicVolume { .. } => "MusicVolume",
            Self::CancelVerb { .. } => "CancelVerb",
            Self::Wait { .. } => "Wait",
            Self::Goto { .. } => "Goto",
            Self::MoveAnim { .. } => "MoveAnim",
            Self::ScaleAnim { .. } => "ScaleAnim",
            Self::FadeAnim { .. } => "FadeAnim",
            Self::TintAnim { .. } => "TintAnim",
            Self::CameraMove { .. } => "CameraMove",
            Self::RunVerb { .. } => "RunVerb",
        }
    }

    /// Whether running this action parks the owning verb until an external
    /// event resumes it.
    pub fn blocks(&self) -> bool {
        match self {
            Self::Wait { .. } => true,
            Self::Goto { wait, .. }
            | Self::MoveAnim { wait, .. }
            | Self::ScaleAnim { wait, .. }
            | Self::FadeAnim { wait, .. }
            | Self::TintAnim { wait, .. }
            | Self::CameraMove { wait, .. }
            | Self::RunVerb { wait, .. } => *wait,
            _ => false,
        }
    }

    /// Whether this action variant can stand in as a continuation target.
    /// Static per variant, independent of the `wait` flag.
    pub fn is_callback(&self) -> bool {
        matches!(
            self,
            Self::Wait { .. }
                | Self::Goto { .. }
                | Self::MoveAnim { .. }
                | Self::ScaleAnim { .. }
                | Self::FadeAnim { .. }
                | Self::TintAnim { .. }
                | Self::CameraMove { .. }
                | Self::RunVerb { .. }
        )
    }

    pub(crate) fn execute(&self, world: &mut World, at: &ActionRef) -> Result<(), ActionError> {
        match self {
            Self::PlaySound { sound } => {
                world.queue_sound(sound);
                Ok(())
            }
            Self::SetState { actor, state } => {
                let scene = world.current_scene_mut().ok_or(ActionError::NoScene)?;
                let actor = scene
                    .actor_mut(actor)
                    .ok_or_else(|| ActionError::UnknownActor { id: actor.clone() })?;
                actor.state = Some(state.clone());
                Ok(())
            }
            Self::SetProperty { key, value } => {
                world.set_property(key, value);
                Ok(())
            }
            Self::SetPosition { actor, x, y } => {
                let scene = world.current_scene_mut().ok_or(ActionError::NoScene)?;
                let actor = scene
                    .actor_mut(actor)
                    .ok_or_else(|| ActionError::UnknownActor { id: actor.clone() })?;
                actor.position = Vec2::new(*x, *y);
                Ok(())
            }
            Self::MusicVolume { volume, duration } => {
                if *duration <= 0.0 {
                    world.set_music_volume(*volume);
                } else {
                    let tween =
                        Tween::new(TweenType::NoRepeat, 1, *duration, InterpolationMode::Linear, None);
                    let from = world.music_volume();
                    world.add_tween(SceneTween::music_volume(tween, from, *volume));
                }
                Ok(())
            }
            Self::CancelVerb {
                actor,
                verb,
                target,
            } => {
                let vref = world
                    .find_verb(actor.as_deref(), verb, target.as_deref())
                    .ok_or_else(|| ActionError::UnknownVerb { verb: verb.clone() })?;
                world.cancel_verb(&vref);
                Ok(())
            }
            Self::Wait { time } => {
                world
                    .timers_mut()
                    .add(*time, Continuation::Action(at.clone()));
                Ok(())
            }
            Self::Goto {
                actor,
                x,
                y,
                speed,
                wait,
            } => {
                let scene = world.current_scene().ok_or(ActionError::NoScene)?;
                let actor_id = match actor {
                    Some(id) => id.clone(),
                    None => scene.player.clone().ok_or(ActionError::NoPlayer)?,
                };
                let cb = wait.then(|| Continuation::Action(at.clone()));
                world.start_walk(&actor_id, Vec2::new(*x, *y), *speed, cb)
            }
            Self::MoveAnim {
                actor,
                x,
                y,
                duration,
                interpolation,
                wait,
            } => {
                let from = actor_position(world, actor)?;
                let cb = wait.then(|| Continuation::Action(at.clone()));
                let tween = Tween::new(TweenType::NoRepeat, 1, *duration, *interpolation, cb);
                world.add_tween(SceneTween::actor_pos(
                    tween,
                    actor.clone(),
                    from,
                    Vec2::new(*x, *y),
                ));
                Ok(())
            }
            Self::ScaleAnim {
                actor,
                scale,
                duration,
                wait,
            } => {
                let from = lookup_actor(world, actor)?.scale;
                let cb = wait.then(|| Continuation::Action(at.clone()));
                let tween =
                    Tween::new(TweenType::NoRepeat, 1, *duration, InterpolationMode::Linear, cb);
                world.add_tween(SceneTween::actor_scale(tween, actor.clone(), from, *scale));
                Ok(())
            }
            Self::FadeAnim {
                actor,
                alpha,
                duration,
                wait,
            } => {
                let from = lookup_actor(world, actor)?.alpha;
                let cb = wait.then(|| Continuation::Action(at.clone()));
                let tween =
                    Tween::new(TweenType::NoRepeat, 1, *duration, InterpolationMode::Linear, cb);
                world.add_tween(SceneTween::actor_alpha(tween, actor.clone(), from, *alpha));
                Ok(())
            }
            Self::TintAnim {
                actor,
                r,
                g,
                b,
                a,
                duration,
                wait,
            } => {
                let from = lookup_actor(world, actor)?.tint;
                let cb = wait.then(|| Continuation::Action(at.clone()));
                let tween =
                    Tween::new(TweenType::NoRepeat, 1, *duration, InterpolationMode::Linear, cb);
                world.add_tween(SceneTween::actor_tint(
                    tween,
                    actor.clone(),
                    from,
                    Color::new(*r, *g, *b, *a),
                ));
                Ok(())
            }
            Self::CameraMove {
                x,
                y,
                zoom,
                duration,
                wait,
            } => {
                let scene = world.current_scene().ok_or(ActionError::NoScene)?;
                let from = scene.camera;
                let to = Camera {
                    position: Vec2::new(*x, *y),
                    zoom: *zoom,
                };
                let cb = wait.then(|| Continuation::Action(at.clone()));
                let tween =
                    Tween::new(TweenType::NoRepeat, 1, *duration, InterpolationMode::Pow2InOut, cb);
                world.add_tween(SceneTween::camera(tween, from, to));
                Ok(())
            }
            Self::RunVerb {
                actor,
                verb,
                target,
                wait,
            } => {
                let vref = world
                    .find_verb(actor.as_deref(), verb, target.as_deref())
                    .ok_or_else(|| ActionError::UnknownVerb { verb: verb.clone() })?;
                let cb = wait.then(|| Continuation::Action(at.clone()));
                world.run_verb(&vref, cb);
                Ok(())
            }
        }
    }
}

fn lookup_actor<'a>(world: &'a World, id: &str) -> Result<&'a crate::model::Actor, ActionError> {
    world
        .current_scene()
        .ok_or(ActionError::NoScene)?
        .actor(id)
        .ok_or_else(|| ActionError::UnknownActor { id: id.to_string() })
}

fn actor_position(world: &World, id: &str) -> Result<Vec2, ActionError> {
    Ok(lookup_actor(world, id)?.position)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wait_flag_controls_blocking_but_not_callback_capability() {
        let moving = Action::MoveAnim {
            actor: "bob".to_string(),
            x: 1.0,
            y: 2.0,
            duration: 1.0,
            interpolation: InterpolationMode::Linear,
            wait: false,
        };
        assert!(!moving.blocks());
        assert!(moving.is_callback());

        let sound = Action::PlaySound {
            sound: "click".to_string(),
        };
        assert!(!sound.blocks());
        assert!(!sound.is_callback());

        let wait = Action::Wait { time: 1.0 };
        assert!(wait.blocks());
        assert!(wait.is_callback());
    }

    #[test]
    fn actions_rehydrate_by_class_tag() {
        let json = r#"{"class":"RunVerb","actor":"door","verb":"open"}"#;
        let action: Action = serde_json::from_str(json).expect("action");
        assert_eq!(
            action,
            Action::RunVerb {
                actor: Some("door".to_string()),
                verb: "open".to_string(),
                target: None,
                wait: true,
            }
        );
        assert_eq!(action.kind_name(), "RunVerb");
    }

    #[test]
    fn goto_defaults_speed_and_wait() {
        let json = r#"{"class":"Goto","actor":null,"x":3.0,"y":4.0}"#;
        let action: Action = serde_json::from_str(json).expect("action");
        let Action::Goto { speed, wait, .. } = action else {
            panic!("expected Goto");
        };
        assert_eq!(speed, DEFAULT_WALKING_SPEED);
        assert!(wait);
    }
}
