use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::anim::{InterpolationMode, SceneTween, Tween, TweenTarget, TweenType, WalkState};
use crate::model::{
    Action, Actor, ActorPose, Camera, Color, FakeDepth, Scene, Vec2, Verb, VerbManager, VerbOwner,
    VerbRef, World,
};
use crate::save::address::{address_of, resolve_address};

pub const SAVE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("failed to encode save json: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to parse save json at {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("unsupported save version {actual}, expected {expected}")]
    Version { expected: u32, actual: u32 },
    #[error("save references unknown current scene: {id}")]
    UnknownScene { id: String },
    #[error("failed to read save file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write save file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to create save directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavedVec2 {
    pub x: f32,
    pub y: f32,
}

impl SavedVec2 {
    fn from_vec2(value: Vec2) -> Self {
        Self {
            x: value.x,
            y: value.y,
        }
    }

    fn to_vec2(self) -> Vec2 {
        Vec2 {
            x: self.x,
            y: self.y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavedColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl SavedColor {
    fn from_color(value: Color) -> Self {
        Self {
            r: value.r,
            g: value.g,
            b: value.b,
            a: value.a,
        }
    }

    fn to_color(self) -> Color {
        Color {
            r: self.r,
            g: self.g,
            b: self.b,
            a: self.a,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavedCamera {
    pub position: SavedVec2,
    pub zoom: f32,
}

impl SavedCamera {
    fn from_camera(value: Camera) -> Self {
        Self {
            position: SavedVec2::from_vec2(value.position),
            zoom: value.zoom,
        }
    }

    fn to_camera(self) -> Camera {
        Camera {
            position: self.position.to_vec2(),
            zoom: self.zoom,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavedFakeDepth {
    pub near_y: f32,
    pub far_y: f32,
    pub min_scale: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedVerb {
    pub id: String,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    pub ip: i32,
    #[serde(default)]
    pub cb: Option<String>,
    pub actions: Vec<Action>,
}

impl SavedVerb {
    fn from_verb(world: &World, verb: &Verb) -> Self {
        Self {
            id: verb.id().to_string(),
            target: verb.target().map(str::to_string),
            state: verb.state().map(str::to_string),
            ip: verb.ip(),
            cb: verb.cb().and_then(|cb| address_of(world, cb)),
            actions: verb.actions().to_vec(),
        }
    }

    fn to_verb(&self) -> Verb {
        let mut verb = Verb::new(&self.id);
        if let Some(target) = &self.target {
            verb = verb.with_target(target);
        }
        if let Some(state) = &self.state {
            verb = verb.with_state(state);
        }
        for action in &self.actions {
            verb.add(action.clone());
        }
        verb.set_ip(self.ip);
        verb
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedActor {
    pub id: String,
    pub position: SavedVec2,
    pub scale: f32,
    pub alpha: f32,
    pub tint: SavedColor,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub fake_depth: bool,
    #[serde(default)]
    pub walking: bool,
    pub verbs: Vec<SavedVerb>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedScene {
    pub id: String,
    #[serde(default)]
    pub player: Option<String>,
    pub camera: SavedCamera,
    #[serde(default)]
    pub fake_depth: Option<SavedFakeDepth>,
    pub verbs: Vec<SavedVerb>,
    pub actors: Vec<SavedActor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum SavedTweenTarget {
    ActorPos {
        actor: String,
        from: SavedVec2,
        to: SavedVec2,
    },
    ActorScale {
        actor: String,
        from: f32,
        to: f32,
    },
    ActorAlpha {
        actor: String,
        from: f32,
        to: f32,
    },
    ActorTint {
        actor: String,
        from: SavedColor,
        to: SavedColor,
    },
    Camera {
        from: SavedCamera,
        to: SavedCamera,
    },
    MusicVolume {
        from: f32,
        to: f32,
    },
    Walk {
        actor: String,
        path: Vec<SavedVec2>,
        step: u32,
        speed: f32,
        from: SavedVec2,
        to: SavedVec2,
        #[serde(default)]
        walk_cb: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedTween {
    pub target: SavedTweenTarget,
    pub time: f32,
    pub duration: f32,
    pub tween_type: TweenType,
    pub count: i32,
    pub interpolation: InterpolationMode,
    pub reverse: bool,
    pub began: bool,
    pub complete: bool,
    #[serde(default)]
    pub cb: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedTimer {
    pub time: f32,
    pub current_time: f32,
    #[serde(default)]
    pub cb: Option<String>,
}

/// One logical save document: static-looking content (verb registries,
/// actors) and in-flight state (instruction pointers, tweens, timers) in a
/// single record, with every pending continuation flattened to an address
/// string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedWorld {
    pub save_version: u32,
    pub current_scene_id: String,
    pub elapsed_time: f32,
    pub music_volume: f32,
    pub world_scale: f32,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    pub default_verbs: Vec<SavedVerb>,
    pub scenes: Vec<SavedScene>,
    pub tweens: Vec<SavedTween>,
    pub timers: Vec<SavedTimer>,
}

fn saved_verbs(world: &World, manager: &VerbManager) -> Vec<SavedVerb> {
    manager
        .verbs()
        .map(|(_, verb)| SavedVerb::from_verb(world, verb))
        .collect()
}

fn saved_tween_target(world: &World, target: &TweenTarget) -> SavedTweenTarget {
    match target {
        TweenTarget::ActorPos { actor, from, to } => SavedTweenTarget::ActorPos {
            actor: actor.clone(),
            from: SavedVec2::from_vec2(*from),
            to: SavedVec2::from_vec2(*to),
        },
        TweenTarget::ActorScale { actor, from, to } => SavedTweenTarget::ActorScale {
            actor: actor.clone(),
            from: *from,
            to: *to,
        },
        TweenTarget::ActorAlpha { actor, from, to } => SavedTweenTarget::ActorAlpha {
            actor: actor.clone(),
            from: *from,
            to: *to,
        },
        TweenTarget::ActorTint { actor, from, to } => SavedTweenTarget::ActorTint {
            actor: actor.clone(),
            from: SavedColor::from_color(*from),
            to: SavedColor::from_color(*to),
        },
        TweenTarget::Camera { from, to } => SavedTweenTarget::Camera {
            from: SavedCamera::from_camera(*from),
            to: SavedCamera::from_camera(*to),
        },
        TweenTarget::MusicVolume { from, to } => SavedTweenTarget::MusicVolume {
            from: *from,
            to: *to,
        },
        TweenTarget::Walk(state) => {
            let (from, to) = state.segment();
            SavedTweenTarget::Walk {
                actor: state.actor().to_string(),
                path: state.path().iter().copied().map(SavedVec2::from_vec2).collect(),
                step: state.step() as u32,
                speed: state.speed(),
                from: SavedVec2::from_vec2(from),
                to: SavedVec2::from_vec2(to),
                walk_cb: state.walk_cb().and_then(|cb| address_of(world, cb)),
            }
        }
    }
}

fn restored_tween_target(world: &World, saved: &SavedTweenTarget) -> TweenTarget {
    match saved {
        SavedTweenTarget::ActorPos { actor, from, to } => TweenTarget::ActorPos {
            actor: actor.clone(),
            from: from.to_vec2(),
            to: to.to_vec2(),
        },
        SavedTweenTarget::ActorScale { actor, from, to } => TweenTarget::ActorScale {
            actor: actor.clone(),
            from: *from,
            to: *to,
        },
        SavedTweenTarget::ActorAlpha { actor, from, to } => TweenTarget::ActorAlpha {
            actor: actor.clone(),
            from: *from,
            to: *to,
        },
        SavedTweenTarget::ActorTint { actor, from, to } => TweenTarget::ActorTint {
            actor: actor.clone(),
            from: from.to_color(),
            to: to.to_color(),
        },
        SavedTweenTarget::Camera { from, to } => TweenTarget::Camera {
            from: from.to_camera(),
            to: to.to_camera(),
        },
        SavedTweenTarget::MusicVolume { from, to } => TweenTarget::MusicVolume {
            from: *from,
            to: *to,
        },
        SavedTweenTarget::Walk {
            actor,
            path,
            step,
            speed,
            from,
            to,
            walk_cb,
        } => TweenTarget::Walk(WalkState::restore(
            actor.clone(),
            path.iter().copied().map(SavedVec2::to_vec2).collect(),
            *step as usize,
            *speed,
            from.to_vec2(),
            to.to_vec2(),
            resolve_saved_cb(world, walk_cb.as_deref()),
        )),
    }
}

fn resolve_saved_cb(
    world: &World,
    address: Option<&str>,
) -> Option<crate::model::Continuation> {
    let address = address?;
    let resolved = resolve_address(world, address);
    if resolved.is_none() {
        warn!(address, "dropping unresolvable continuation address");
    }
    resolved
}

impl SavedWorld {
    pub fn from_world(world: &World) -> Self {
        Self {
            save_version: SAVE_VERSION,
            current_scene_id: world.current_scene_id().to_string(),
            elapsed_time: world.elapsed_time(),
            music_volume: world.music_volume(),
            world_scale: world.world_scale(),
            properties: world.properties().clone(),
            default_verbs: saved_verbs(world, &world.default_verbs),
            scenes: world
                .scenes()
                .map(|scene| SavedScene {
                    id: scene.id.clone(),
                    player: scene.player.clone(),
                    camera: SavedCamera::from_camera(scene.camera),
                    fake_depth: scene.fake_depth.map(|depth| SavedFakeDepth {
                        near_y: depth.near_y,
                        far_y: depth.far_y,
                        min_scale: depth.min_scale,
                    }),
                    verbs: saved_verbs(world, &scene.verbs),
                    actors: scene
                        .actors()
                        .map(|actor| SavedActor {
                            id: actor.id.clone(),
                            position: SavedVec2::from_vec2(actor.position),
                            scale: actor.scale,
                            alpha: actor.alpha,
                            tint: SavedColor::from_color(actor.tint),
                            state: actor.state.clone(),
                            fake_depth: actor.fake_depth,
                            walking: actor.pose == ActorPose::Walking,
                            verbs: saved_verbs(world, &actor.verbs),
                        })
                        .collect(),
                })
                .collect(),
            tweens: world
                .tweens()
                .iter()
                .map(|scene_tween| {
                    let tween = scene_tween.tween();
                    SavedTween {
                        target: saved_tween_target(world, scene_tween.target()),
                        time: tween.time(),
                        duration: tween.duration(),
                        tween_type: tween.tween_type(),
                        count: tween.count(),
                        interpolation: tween.interpolation(),
                        reverse: tween.is_reverse(),
                        began: tween.began(),
                        complete: tween.is_complete(),
                        cb: tween.cb().and_then(|cb| address_of(world, cb)),
                    }
                })
                .collect(),
            timers: world
                .timers()
                .entries()
                .iter()
                .map(|entry| SavedTimer {
                    time: entry.time(),
                    current_time: entry.current_time(),
                    cb: entry.cb().and_then(|cb| address_of(world, cb)),
                })
                .collect(),
        }
    }

    /// Rebuilds a live world. Two phases: the scene graph and registries
    /// come up first, then continuation addresses are resolved against the
    /// rebuilt graph — resolution needs the live registries to exist.
    pub fn restore(self) -> Result<World, SaveError> {
        if self.save_version != SAVE_VERSION {
            return Err(SaveError::Version {
                expected: SAVE_VERSION,
                actual: self.save_version,
            });
        }

        let mut world = World::new();
        world.set_elapsed_time(self.elapsed_time);
        world.set_music_volume(self.music_volume);
        world.set_world_scale(self.world_scale);
        for (key, value) in &self.properties {
            world.set_property(key, value);
        }

        let mut deferred_verb_cbs: Vec<(VerbRef, String)> = Vec::new();
        let mut collect = |owner: VerbOwner, saved: &[SavedVerb], manager: &mut VerbManager| {
            for saved_verb in saved {
                let verb = saved_verb.to_verb();
                if let Some(address) = &saved_verb.cb {
                    deferred_verb_cbs.push((
                        VerbRef {
                            owner: owner.clone(),
                            key: verb.hash_key(),
                        },
                        address.clone(),
                    ));
                }
                manager.add(verb);
            }
        };

        let mut default_verbs = VerbManager::default();
        collect(VerbOwner::Default, &self.default_verbs, &mut default_verbs);

        let mut scenes = Vec::new();
        for saved_scene in &self.scenes {
            let mut scene = Scene::new(&saved_scene.id);
            scene.player = saved_scene.player.clone();
            scene.camera = saved_scene.camera.to_camera();
            scene.fake_depth = saved_scene.fake_depth.map(|depth| FakeDepth {
                near_y: depth.near_y,
                far_y: depth.far_y,
                min_scale: depth.min_scale,
            });
            collect(
                VerbOwner::Scene(saved_scene.id.clone()),
                &saved_scene.verbs,
                &mut scene.verbs,
            );

            for saved_actor in &saved_scene.actors {
                let mut actor = Actor::new(&saved_actor.id);
                actor.position = saved_actor.position.to_vec2();
                actor.scale = saved_actor.scale;
                actor.alpha = saved_actor.alpha;
                actor.tint = saved_actor.tint.to_color();
                actor.state = saved_actor.state.clone();
                actor.fake_depth = saved_actor.fake_depth;
                actor.pose = if saved_actor.walking {
                    ActorPose::Walking
                } else {
                    ActorPose::Standing
                };
                collect(
                    VerbOwner::Actor(saved_actor.id.clone()),
                    &saved_actor.verbs,
                    &mut actor.verbs,
                );
                scene.add_actor(actor);
            }

            scenes.push(scene);
        }

        world.default_verbs = default_verbs;
        for scene in scenes {
            world.add_scene(scene);
        }
        if !world.set_current_scene(&self.current_scene_id) {
            return Err(SaveError::UnknownScene {
                id: self.current_scene_id,
            });
        }

        // second pass: the graph is live, addresses can resolve now
        for (vref, address) in deferred_verb_cbs {
            let cb = resolve_saved_cb(&world, Some(&address));
            if let Some(verb) = world.verb_mut(&vref) {
                verb.set_cb(cb);
            }
        }

        let restored_tweens: Vec<SceneTween> = self
            .tweens
            .iter()
            .map(|saved| {
                let cb = resolve_saved_cb(&world, saved.cb.as_deref());
                let tween = Tween::restore(
                    saved.time,
                    saved.duration,
                    saved.tween_type,
                    saved.count,
                    saved.interpolation,
                    saved.reverse,
                    saved.began,
                    saved.complete,
                    cb,
                );
                SceneTween::restore(tween, restored_tween_target(&world, &saved.target))
            })
            .collect();
        for tween in restored_tweens {
            world.add_tween(tween);
        }

        let restored_timers: Vec<(f32, f32, Option<crate::model::Continuation>)> = self
            .timers
            .iter()
            .map(|saved| {
                (
                    saved.time,
                    saved.current_time,
                    resolve_saved_cb(&world, saved.cb.as_deref()),
                )
            })
            .collect();
        for (time, current_time, cb) in restored_timers {
            world.timers_mut().restore(time, current_time, cb);
        }

        Ok(world)
    }
}

pub fn encode_world(world: &World) -> Result<String, SaveError> {
    serde_json::to_string_pretty(&SavedWorld::from_world(world)).map_err(SaveError::Encode)
}

pub fn decode_world(raw: &str) -> Result<World, SaveError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    let saved: SavedWorld = serde_path_to_error::deserialize(&mut deserializer).map_err(
        |error| {
            let path = error.path().to_string();
            SaveError::Parse {
                path,
                source: error.into_inner(),
            }
        },
    )?;
    saved.restore()
}

pub fn save_world_to_path(world: &World, path: &Path) -> Result<(), SaveError> {
    let json = encode_world(world)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| SaveError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, json).map_err(|source| SaveError::Write {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_world_from_path(path: &Path) -> Result<World, SaveError> {
    let raw = fs::read_to_string(path).map_err(|source| SaveError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    decode_world(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opened_door_world() -> World {
        let mut world = World::new();
        let mut scene = Scene::new("room");
        scene.add_actor(Actor::new("bob").at(0.0, 0.0));
        scene.add_actor(Actor::new("door").at(5.0, 0.0));
        scene.player = Some("bob".to_string());

        let mut verb = Verb::new("open");
        verb.add(Action::PlaySound {
            sound: "click".to_string(),
        });
        verb.add(Action::MoveAnim {
            actor: "door".to_string(),
            x: 5.0,
            y: 2.0,
            duration: 2.0,
            interpolation: InterpolationMode::Linear,
            wait: true,
        });
        verb.add(Action::SetState {
            actor: "door".to_string(),
            state: "opened".to_string(),
        });
        scene.verbs.add(verb);

        world.add_scene(scene);
        world.set_current_scene("room");
        world
    }

    fn open_verb_ref() -> VerbRef {
        VerbRef {
            owner: VerbOwner::Scene("room".to_string()),
            key: "open".to_string(),
        }
    }

    #[test]
    fn mid_animation_save_resumes_at_the_same_point() {
        let mut world = opened_door_world();
        world.run_verb(&open_verb_ref(), None);
        world.tick(0.8); // 40% through the 2s move

        let json = encode_world(&world).expect("encode");
        let mut restored = decode_world(&json).expect("decode");

        let tween = restored.tweens().first().expect("tween").tween();
        assert!((tween.time() - 0.8).abs() < 1e-5);
        assert_eq!(tween.duration(), 2.0);
        assert_eq!(restored.verb(&open_verb_ref()).expect("verb").ip(), 1);
        assert!((restored.elapsed_time() - 0.8).abs() < 1e-5);

        restored.tick(1.2);
        let verb = restored.verb(&open_verb_ref()).expect("verb");
        assert!(verb.is_finished());
        let door_state = restored
            .current_scene()
            .and_then(|scene| scene.actor("door"))
            .and_then(|door| door.state.clone());
        assert_eq!(door_state.as_deref(), Some("opened"));
    }

    #[test]
    fn parent_child_verb_callbacks_survive_a_save() {
        let mut world = opened_door_world();

        let mut child = Verb::new("child");
        child.add(Action::Wait { time: 1.0 });
        let mut parent = Verb::new("parent");
        parent.add(Action::RunVerb {
            actor: None,
            verb: "child".to_string(),
            target: None,
            wait: true,
        });
        parent.add(Action::SetProperty {
            key: "done".to_string(),
            value: "yes".to_string(),
        });
        {
            let scene = world.current_scene_mut().expect("scene");
            scene.verbs.add(child);
            scene.verbs.add(parent);
        }

        let parent_ref = VerbRef {
            owner: VerbOwner::Scene("room".to_string()),
            key: "parent".to_string(),
        };
        world.run_verb(&parent_ref, None);

        let json = encode_world(&world).expect("encode");
        let mut restored = decode_world(&json).expect("decode");
        assert_eq!(restored.timers().len(), 1);

        restored.tick(1.0);
        assert!(restored.verb(&parent_ref).expect("parent").is_finished());
        assert_eq!(restored.property("done"), Some("yes"));
    }

    #[test]
    fn unresolvable_addresses_become_missing_continuations_not_errors() {
        let mut world = opened_door_world();
        world.run_verb(&open_verb_ref(), None);

        let mut saved = SavedWorld::from_world(&world);
        saved.tweens[0].cb = Some("room#deleted_verb#1".to_string());

        let mut restored = saved.restore().expect("restore");
        assert!(restored.tweens()[0].tween().cb().is_none());

        // the animation completes but resumes nothing; the verb stays parked
        restored.tick(3.0);
        assert_eq!(restored.verb(&open_verb_ref()).expect("verb").ip(), 1);
    }

    #[test]
    fn properties_and_scalars_round_trip() {
        let mut world = opened_door_world();
        world.set_property("chapter", "2");
        world.set_music_volume(0.25);
        world.set_world_scale(2.0);
        world.tick(1.5);

        let json = encode_world(&world).expect("encode");
        let restored = decode_world(&json).expect("decode");

        assert_eq!(restored.property("chapter"), Some("2"));
        assert_eq!(restored.music_volume(), 0.25);
        assert_eq!(restored.world_scale(), 2.0);
        assert_eq!(restored.elapsed_time(), 1.5);
        assert_eq!(restored.current_scene_id(), "room");
    }

    #[test]
    fn version_mismatch_is_rejected() {
        let world = opened_door_world();
        let mut saved = SavedWorld::from_world(&world);
        saved.save_version = 99;

        match saved.restore() {
            Err(SaveError::Version { expected, actual }) => {
                assert_eq!(expected, SAVE_VERSION);
                assert_eq!(actual, 99);
            }
            other => panic!("expected version error, got {other:?}"),
        }
    }

    #[test]
    fn save_file_round_trips_through_disk() {
        let mut world = opened_door_world();
        world.run_verb(&open_verb_ref(), None);
        world.tick(0.5);

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("saves").join("slot0.save.json");
        save_world_to_path(&world, &path).expect("save");

        let restored = load_world_from_path(&path).expect("load");
        assert_eq!(restored.verb(&open_verb_ref()).expect("verb").ip(), 1);
        assert_eq!(restored.tweens().len(), 1);
    }

    #[test]
    fn walk_tween_round_trips_with_its_path_and_callback() {
        let mut world = opened_door_world();
        let mut verb = Verb::new("approach");
        verb.add(Action::Goto {
            actor: None,
            x: 4.0,
            y: 0.0,
            speed: 2.0,
            wait: true,
        });
        world
            .current_scene_mut()
            .expect("scene")
            .verbs
            .add(verb);
        let vref = VerbRef {
            owner: VerbOwner::Scene("room".to_string()),
            key: "approach".to_string(),
        };

        world.run_verb(&vref, None);
        world.tick(0.5);

        let json = encode_world(&world).expect("encode");
        let mut restored = decode_world(&json).expect("decode");

        let TweenTarget::Walk(state) = restored.tweens()[0].target() else {
            panic!("expected walk tween");
        };
        assert_eq!(state.path().len(), 2);

        restored.tick(2.0);
        assert!(restored.verb(&vref).expect("verb").is_finished());
        let bob = restored
            .current_scene()
            .and_then(|scene| scene.actor("bob"))
            .expect("bob");
        assert!((bob.position.x - 4.0).abs() < 1e-3);
    }
}
