use std::collections::BTreeMap;

use tracing::{debug, error};

use crate::anim::{SceneTween, TweenCtx};
use crate::model::action::ActionError;
use crate::model::scene::{Scene, Vec2};
use crate::model::verb::{ActionRef, Continuation, Verb, VerbManager, VerbOwner, VerbRef};
use crate::runtime::{CallbackQueue, Timers};

/// The game session context: scenes, verb registries, and the three
/// schedulers (tweens, timers, callback queue). There is exactly one
/// logical thread of control; everything here is driven from `tick`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct World {
    scenes: BTreeMap<String, Scene>,
    current_scene: String,
    pub default_verbs: VerbManager,
    tweens: Vec<SceneTween>,
    timers: Timers,
    callbacks: CallbackQueue,
    elapsed_time: f32,
    music_volume: f32,
    world_scale: f32,
    properties: BTreeMap<String, String>,
    played_sounds: Vec<String>,
}

impl World {
    pub fn new() -> Self {
        Self {
            music_volume: 1.0,
            world_scale: 1.0,
            ..Self::default()
        }
    }

    pub fn add_scene(&mut self, scene: Scene) {
        self.scenes.insert(scene.id.clone(), scene);
    }

    /// Switches the current scene, clearing the session schedulers: pending
    /// tweens, timers, and callbacks belong to the scene that started them.
    pub fn set_current_scene(&mut self, id: &str) -> bool {
        if !self.scenes.contains_key(id) {
            return false;
        }
        self.current_scene = id.to_string();
        self.tweens.clear();
        self.timers.clear();
        self.callbacks.clear();
        true
    }

    pub fn current_scene_id(&self) -> &str {
        &self.current_scene
    }

    pub fn current_scene(&self) -> Option<&Scene> {
        self.scenes.get(&self.current_scene)
    }

    pub fn current_scene_mut(&mut self) -> Option<&mut Scene> {
        self.scenes.get_mut(&self.current_scene)
    }

    pub fn scene(&self, id: &str) -> Option<&Scene> {
        self.scenes.get(id)
    }

    pub fn scenes(&self) -> impl Iterator<Item = &Scene> {
        self.scenes.values()
    }

    pub fn verb(&self, vref: &VerbRef) -> Option<&Verb> {
        match &vref.owner {
            VerbOwner::Default => self.default_verbs.get(&vref.key),
            VerbOwner::Scene(id) => self.scenes.get(id)?.verbs.get(&vref.key),
            VerbOwner::Actor(id) => self
                .scenes
                .get(&self.current_scene)?
                .actor(id)?
                .verbs
                .get(&vref.key),
        }
    }

    pub fn verb_mut(&mut self, vref: &VerbRef) -> Option<&mut Verb> {
        match &vref.owner {
            VerbOwner::Default => self.default_verbs.get_mut(&vref.key),
            VerbOwner::Scene(id) => self.scenes.get_mut(id)?.verbs.get_mut(&vref.key),
            VerbOwner::Actor(id) => self
                .scenes
                .get_mut(&self.current_scene)?
                .actor_mut(id)?
                .verbs
                .get_mut(&vref.key),
        }
    }

    /// Resolves a verb id through the registry chain: the actor's own scope
    /// (qualified by its current state), then the scene's, then the global
    /// default scope.
    pub fn find_verb(
        &self,
        actor_id: Option<&str>,
        verb_id: &str,
        target: Option<&str>,
    ) -> Option<VerbRef> {
        if let Some(scene) = self.current_scene() {
            if let Some(actor_id) = actor_id {
                if let Some(actor) = scene.actor(actor_id) {
                    if let Some(key) =
                        actor.verbs.find_key(verb_id, target, actor.state.as_deref())
                    {
                        return Some(VerbRef {
                            owner: VerbOwner::Actor(actor_id.to_string()),
                            key,
                        });
                    }
                }
            } else if let Some(key) = scene.verbs.find_key(verb_id, target, None) {
                return Some(VerbRef {
                    owner: VerbOwner::Scene(scene.id.clone()),
                    key,
                });
            }
        }

        self.default_verbs
            .find_key(verb_id, target, None)
            .map(|key| VerbRef {
                owner: VerbOwner::Default,
                key,
            })
    }

    /// Starts a verb from its first action. `cb`, if any, is resumed when
    /// the verb finishes or is cancelled. Calling this on a verb that is
    /// already running is a caller bug and simply restarts it.
    pub fn run_verb(&mut self, vref: &VerbRef, cb: Option<Continuation>) -> bool {
        let Some(verb) = self.verb_mut(vref) else {
            debug!(verb = %vref.key, "run_verb: verb not found");
            return false;
        };

        debug!(verb = %vref.key, ">>> running verb");
        verb.set_cb(cb);
        verb.set_ip(0);
        self.advance_verb(vref);
        true
    }

    /// The step loop. Non-blocking actions have the instruction pointer
    /// advanced *before* they execute, so `resume` always means "the action
    /// at the previous ip has truly completed" even if the action mutates
    /// the verb while running. Execution faults are logged and swallowed;
    /// the loop carries on as if the action had succeeded.
    fn advance_verb(&mut self, vref: &VerbRef) {
        let mut stop = false;

        loop {
            let Some(verb) = self.verb(vref) else {
                return;
            };
            let ip = verb.ip();
            if stop || ip < 0 || ip >= verb.actions().len() as i32 {
                break;
            }

            let action = verb.actions()[ip as usize].clone();
            debug!(verb = %vref.key, ip, kind = action.kind_name(), "step");

            let at = ActionRef {
                verb: vref.clone(),
                index: ip as usize,
            };

            if action.blocks() {
                stop = true;
            } else if let Some(verb) = self.verb_mut(vref) {
                verb.advance_ip();
            }

            if let Err(source) = action.execute(self, &at) {
                error!(
                    verb = %vref.key,
                    action = action.kind_name(),
                    %source,
                    "action execution failed"
                );
            }
        }

        let Some(verb) = self.verb_mut(vref) else {
            return;
        };
        if verb.ip() == verb.actions().len() as i32 {
            debug!(verb = %vref.key, ">>> verb finished");
            if let Some(cb) = verb.take_cb() {
                self.resume(cb);
            }
        }
    }

    /// Resumes a parked verb: advance past the blocking action and keep
    /// stepping. Safe no-op on verbs that already finished (e.g. cancelled
    /// while an event they were waiting on was still in flight).
    pub fn resume_verb(&mut self, vref: &VerbRef) {
        let Some(verb) = self.verb_mut(vref) else {
            debug!(verb = %vref.key, "resume: verb not found");
            return;
        };
        if verb.is_finished() {
            debug!(verb = %vref.key, "resume on a finished verb ignored");
            return;
        }
        verb.advance_ip();
        self.advance_verb(vref);
    }

    pub fn resume(&mut self, cb: Continuation) {
        match cb {
            Continuation::Verb(vref) => self.resume_verb(&vref),
            Continuation::Action(at) => {
                let Some(verb) = self.verb(&at.verb) else {
                    debug!(verb = %at.verb.key, "resume: owning verb gone, dropped");
                    return;
                };
                match verb.actions().get(at.index) {
                    Some(action) if action.is_callback() => {
                        if !verb.is_finished() {
                            debug_assert_eq!(
                                verb.ip(),
                                at.index as i32,
                                "resume targets an action the verb is not parked on"
                            );
                        }
                        self.resume_verb(&at.verb);
                    }
                    _ => {
                        debug!(
                            verb = %at.verb.key,
                            index = at.index,
                            "resume: action is not a continuation target, dropped"
                        );
                    }
                }
            }
        }
    }

    /// Forces a verb into the finished state, recursively cancelling any
    /// nested verbs its sub-verb actions started. Events the verb was
    /// waiting on keep running; their resume becomes a no-op.
    pub fn cancel_verb(&mut self, vref: &VerbRef) {
        let Some(verb) = self.verb_mut(vref) else {
            return;
        };

        verb.set_ip(verb.actions().len() as i32);
        let cb = verb.take_cb();

        let children: Vec<_> = verb
            .actions()
            .iter()
            .filter_map(|action| match action {
                crate::model::Action::RunVerb {
                    actor,
                    verb,
                    target,
                    ..
                } => Some((actor.clone(), verb.clone(), target.clone())),
                _ => None,
            })
            .collect();

        for (actor, verb_id, target) in children {
            if let Some(child) = self.find_verb(actor.as_deref(), &verb_id, target.as_deref()) {
                if child != *vref {
                    self.cancel_verb(&child);
                }
            }
        }

        debug!(verb = %vref.key, ">>> verb cancelled");
        if let Some(cb) = cb {
            self.resume(cb);
        }
    }

    /// Per-tick driver, called once per rendered frame. Fixed order: tweens
    /// advance first, then timers, then the callback queue drains. Anything
    /// a resumption enqueues runs on the next drain, never recursively
    /// within this one.
    pub fn tick(&mut self, delta: f32) {
        self.elapsed_time += delta;
        self.played_sounds.clear();

        let mut active = std::mem::take(&mut self.tweens);
        if let Some(scene) = self.scenes.get_mut(&self.current_scene) {
            let mut ctx = TweenCtx {
                scene,
                music_volume: &mut self.music_volume,
                world_scale: self.world_scale,
            };
            for tween in &mut active {
                tween.update(&mut ctx, &mut self.callbacks, delta);
            }
        }
        active.retain(|tween| !tween.is_complete());
        active.append(&mut self.tweens);
        self.tweens = active;

        for cb in self.timers.update(delta) {
            self.resume(cb);
        }

        for cb in self.callbacks.drain() {
            self.resume(cb);
        }
    }

    pub fn add_tween(&mut self, tween: SceneTween) {
        self.tweens.push(tween);
    }

    pub fn tweens(&self) -> &[SceneTween] {
        &self.tweens
    }

    /// Starts an actor walking in a straight line to `dest`. Richer paths
    /// come from the navigation collaborator via `add_tween`.
    pub fn start_walk(
        &mut self,
        actor_id: &str,
        dest: Vec2,
        speed: f32,
        cb: Option<Continuation>,
    ) -> Result<(), ActionError> {
        let world_scale = self.world_scale;
        let scene = self
            .scenes
            .get_mut(&self.current_scene)
            .ok_or(ActionError::NoScene)?;
        let from = scene
            .actor(actor_id)
            .ok_or_else(|| ActionError::UnknownActor {
                id: actor_id.to_string(),
            })?
            .position;

        let path = vec![from, dest];
        if let Some(tween) = SceneTween::walk(scene, world_scale, actor_id, path, speed, cb) {
            self.tweens.push(tween);
        }
        Ok(())
    }

    /// Skips an in-flight walk to its destination and resumes whatever was
    /// waiting on it.
    pub fn fast_forward_walk(&mut self, actor_id: &str) {
        let Some(index) = self.tweens.iter().position(|t| t.is_walk_for(actor_id)) else {
            return;
        };
        let mut walk = self.tweens.remove(index);

        let cb = self
            .scenes
            .get_mut(&self.current_scene)
            .and_then(|scene| walk.finish_walk(scene));
        if let Some(cb) = cb {
            self.resume(cb);
        }
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    pub fn timers_mut(&mut self) -> &mut Timers {
        &mut self.timers
    }

    pub fn callbacks(&self) -> &CallbackQueue {
        &self.callbacks
    }

    pub fn callbacks_mut(&mut self) -> &mut CallbackQueue {
        &mut self.callbacks
    }

    pub fn elapsed_time(&self) -> f32 {
        self.elapsed_time
    }

    pub fn set_elapsed_time(&mut self, elapsed: f32) {
        self.elapsed_time = elapsed;
    }

    pub fn music_volume(&self) -> f32 {
        self.music_volume
    }

    pub fn set_music_volume(&mut self, volume: f32) {
        self.music_volume = volume;
    }

    pub fn world_scale(&self) -> f32 {
        self.world_scale
    }

    pub fn set_world_scale(&mut self, scale: f32) {
        self.world_scale = scale;
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn set_property(&mut self, key: &str, value: &str) {
        self.properties.insert(key.to_string(), value.to_string());
    }

    pub(crate) fn queue_sound(&mut self, sound: &str) {
        debug!(sound, "play sound");
        self.played_sounds.push(sound.to_string());
    }

    /// Sounds requested since the start of the last tick; the renderer/audio
    /// collaborator reads these after `tick` returns.
    pub fn played_sounds(&self) -> &[String] {
        &self.played_sounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Action, Actor};

    fn sound(name: &str) -> Action {
        Action::PlaySound {
            sound: name.to_string(),
        }
    }

    fn world_with_scene() -> World {
        let mut world = World::new();
        let mut scene = Scene::new("room");
        scene.add_actor(Actor::new("bob").at(0.0, 0.0));
        scene.add_actor(Actor::new("door").at(5.0, 0.0));
        scene.player = Some("bob".to_string());
        world.add_scene(scene);
        world.set_current_scene("room");
        world
    }

    fn scene_verb_ref(world: &mut World, verb: Verb) -> VerbRef {
        let key = verb.hash_key();
        world.current_scene_mut().expect("scene").verbs.add(verb);
        VerbRef {
            owner: VerbOwner::Scene("room".to_string()),
            key,
        }
    }

    #[test]
    fn non_blocking_verb_runs_to_completion_in_order() {
        let mut world = world_with_scene();
        let mut verb = Verb::new("greet");
        verb.add(sound("one"));
        verb.add(sound("two"));
        verb.add(sound("three"));
        let vref = scene_verb_ref(&mut world, verb);

        world.run_verb(&vref, None);

        assert_eq!(world.verb(&vref).expect("verb").ip(), 3);
        assert!(world.verb(&vref).expect("verb").is_finished());
        assert_eq!(world.played_sounds(), ["one", "two", "three"]);
    }

    #[test]
    fn verb_parks_on_a_blocking_action_and_resumes_past_it() {
        let mut world = world_with_scene();
        let mut verb = Verb::new("wait_and_talk");
        verb.add(sound("before"));
        verb.add(Action::Wait { time: 1.0 });
        verb.add(sound("after"));
        let vref = scene_verb_ref(&mut world, verb);

        world.run_verb(&vref, None);
        assert_eq!(world.verb(&vref).expect("verb").ip(), 1);
        assert_eq!(world.played_sounds(), ["before"]);
        assert_eq!(world.timers().len(), 1);

        world.tick(1.0);
        assert_eq!(world.verb(&vref).expect("verb").ip(), 3);
        assert_eq!(world.played_sounds(), ["after"]);
    }

    #[test]
    fn open_door_scenario_waits_for_the_animation() {
        let mut world = world_with_scene();
        let mut verb = Verb::new("open");
        verb.add(sound("click"));
        verb.add(Action::MoveAnim {
            actor: "door".to_string(),
            x: 5.0,
            y: 2.0,
            duration: 2.0,
            interpolation: Default::default(),
            wait: true,
        });
        verb.add(Action::SetState {
            actor: "door".to_string(),
            state: "opened".to_string(),
        });
        let vref = scene_verb_ref(&mut world, verb);

        world.run_verb(&vref, None);
        assert_eq!(world.played_sounds(), ["click"]);
        assert_eq!(world.verb(&vref).expect("verb").ip(), 1);
        assert_eq!(world.tweens().len(), 1);

        world.tick(1.0);
        assert_eq!(world.verb(&vref).expect("verb").ip(), 1, "still animating");

        world.tick(1.0);
        let door_state = world
            .current_scene()
            .and_then(|scene| scene.actor("door"))
            .and_then(|door| door.state.clone());
        assert_eq!(door_state.as_deref(), Some("opened"));
        assert!(world.verb(&vref).expect("verb").is_finished());
        assert!(world.tweens().is_empty());
    }

    #[test]
    fn failing_action_is_skipped_and_the_next_one_still_runs() {
        let mut world = world_with_scene();
        let mut verb = Verb::new("broken");
        verb.add(Action::SetState {
            actor: "nobody".to_string(),
            state: "x".to_string(),
        });
        verb.add(sound("survived"));
        let vref = scene_verb_ref(&mut world, verb);

        world.run_verb(&vref, None);
        assert!(world.verb(&vref).expect("verb").is_finished());
        assert_eq!(world.played_sounds(), ["survived"]);
    }

    #[test]
    fn sub_verb_with_wait_parks_parent_until_child_finishes() {
        let mut world = world_with_scene();

        let mut child = Verb::new("child");
        child.add(Action::Wait { time: 1.0 });
        child.add(sound("child-done"));
        let child_ref = scene_verb_ref(&mut world, child);

        let mut parent = Verb::new("parent");
        parent.add(Action::RunVerb {
            actor: None,
            verb: "child".to_string(),
            target: None,
            wait: true,
        });
        parent.add(sound("parent-done"));
        let parent_ref = scene_verb_ref(&mut world, parent);

        world.run_verb(&parent_ref, None);
        assert_eq!(world.verb(&parent_ref).expect("parent").ip(), 0);
        assert_eq!(world.verb(&child_ref).expect("child").ip(), 0);

        world.tick(1.0);
        assert!(world.verb(&child_ref).expect("child").is_finished());
        assert!(world.verb(&parent_ref).expect("parent").is_finished());
        assert_eq!(world.played_sounds(), ["child-done", "parent-done"]);
    }

    #[test]
    fn sub_verb_without_wait_lets_the_parent_continue() {
        let mut world = world_with_scene();

        let mut child = Verb::new("child");
        child.add(Action::Wait { time: 5.0 });
        scene_verb_ref(&mut world, child);

        let mut parent = Verb::new("parent");
        parent.add(Action::RunVerb {
            actor: None,
            verb: "child".to_string(),
            target: None,
            wait: false,
        });
        parent.add(sound("parent-done"));
        let parent_ref = scene_verb_ref(&mut world, parent);

        world.run_verb(&parent_ref, None);
        assert!(world.verb(&parent_ref).expect("parent").is_finished());
        assert_eq!(world.played_sounds(), ["parent-done"]);
    }

    #[test]
    fn cancel_propagates_into_sub_verbs_and_later_events_are_no_ops() {
        let mut world = world_with_scene();

        let mut child = Verb::new("child");
        child.add(Action::Wait { time: 1.0 });
        child.add(sound("never"));
        let child_ref = scene_verb_ref(&mut world, child);

        let mut parent = Verb::new("parent");
        parent.add(Action::RunVerb {
            actor: None,
            verb: "child".to_string(),
            target: None,
            wait: true,
        });
        let parent_ref = scene_verb_ref(&mut world, parent);

        world.run_verb(&parent_ref, None);
        world.cancel_verb(&parent_ref);
        assert!(world.verb(&parent_ref).expect("parent").is_finished());
        assert!(world.verb(&child_ref).expect("child").is_finished());

        // the child's timer is still scheduled; firing it must do nothing
        world.tick(1.0);
        assert!(world.played_sounds().is_empty());
    }

    #[test]
    fn timer_added_while_timers_fire_does_not_run_in_the_same_pass() {
        let mut world = world_with_scene();
        let mut verb = Verb::new("chained");
        verb.add(Action::Wait { time: 1.0 });
        verb.add(Action::Wait { time: 5.0 });
        verb.add(sound("end"));
        let vref = scene_verb_ref(&mut world, verb);

        world.run_verb(&vref, None);
        world.tick(1.0);

        // the first timer fired and its resumption scheduled the second
        assert_eq!(world.verb(&vref).expect("verb").ip(), 1);
        assert_eq!(world.timers().len(), 1);
        assert!(world.played_sounds().is_empty());

        world.tick(5.0);
        assert!(world.verb(&vref).expect("verb").is_finished());
        assert_eq!(world.played_sounds(), ["end"]);
    }

    #[test]
    fn resuming_a_finished_verb_has_no_effect() {
        let mut world = world_with_scene();
        let mut verb = Verb::new("done");
        verb.add(sound("only"));
        let vref = scene_verb_ref(&mut world, verb);

        world.run_verb(&vref, None);
        assert!(world.verb(&vref).expect("verb").is_finished());

        world.resume_verb(&vref);
        assert_eq!(world.verb(&vref).expect("verb").ip(), 1);
        assert_eq!(world.played_sounds(), ["only"]);
    }

    #[test]
    fn goto_walks_the_player_and_resumes_on_arrival() {
        let mut world = world_with_scene();
        let mut verb = Verb::new("approach");
        verb.add(Action::Goto {
            actor: None,
            x: 4.0,
            y: 0.0,
            speed: 2.0,
            wait: true,
        });
        verb.add(sound("arrived"));
        let vref = scene_verb_ref(&mut world, verb);

        world.run_verb(&vref, None);
        assert_eq!(world.tweens().len(), 1);

        world.tick(1.0);
        assert!(!world.verb(&vref).expect("verb").is_finished());

        world.tick(1.0);
        assert!(world.verb(&vref).expect("verb").is_finished());
        assert_eq!(world.played_sounds(), ["arrived"]);
        let bob = world.current_scene().and_then(|s| s.actor("bob")).expect("bob");
        assert!((bob.position.x - 4.0).abs() < 1e-3);
    }

    #[test]
    fn fast_forward_walk_jumps_to_the_destination_and_resumes() {
        let mut world = world_with_scene();
        let mut verb = Verb::new("approach");
        verb.add(Action::Goto {
            actor: None,
            x: 4.0,
            y: 0.0,
            speed: 1.0,
            wait: true,
        });
        verb.add(sound("arrived"));
        let vref = scene_verb_ref(&mut world, verb);

        world.run_verb(&vref, None);
        world.tick(0.5);

        world.fast_forward_walk("bob");
        assert!(world.tweens().is_empty());
        assert!(world.verb(&vref).expect("verb").is_finished());
        let bob = world.current_scene().and_then(|s| s.actor("bob")).expect("bob");
        assert_eq!(bob.position.x, 4.0);
    }

    #[test]
    fn scene_change_clears_session_schedulers() {
        let mut world = world_with_scene();
        world.add_scene(Scene::new("hall"));

        let mut verb = Verb::new("linger");
        verb.add(Action::Wait { time: 10.0 });
        let vref = scene_verb_ref(&mut world, verb);
        world.run_verb(&vref, None);
        assert_eq!(world.timers().len(), 1);

        assert!(world.set_current_scene("hall"));
        assert!(world.timers().is_empty());
        assert!(world.callbacks().is_empty());
        assert!(world.tweens().is_empty());
        assert!(!world.set_current_scene("missing"));
    }
}
