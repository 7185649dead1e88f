use std::collections::BTreeMap;

use crate::model::action::Action;

/// Which registry a verb lives in. `Default` is the global fallback scope
/// shared by every scene.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VerbOwner {
    Default,
    Scene(String),
    Actor(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VerbRef {
    pub owner: VerbOwner,
    pub key: String,
}

/// Position of one action inside a registered verb. Stands in for a live
/// reference: it stays valid across save/load as long as the content does
/// not change underneath it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActionRef {
    pub verb: VerbRef,
    pub index: usize,
}

/// Anything that can be resumed with no arguments once a pending event
/// (tween, timer, nested verb, asset load) completes. Plain data, so it can
/// sit in queues and save files without holding borrows into the world.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Continuation {
    /// Resume the verb itself: advance its instruction pointer and keep
    /// running. Not addressable in save files.
    Verb(VerbRef),
    /// Resume through the blocking action the verb is parked on.
    Action(ActionRef),
}

/// A named, ordered script of actions. The action list is fixed after
/// construction; only the instruction pointer and the completion
/// continuation mutate at runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct Verb {
    id: String,
    target: Option<String>,
    state: Option<String>,
    actions: Vec<Action>,
    ip: i32,
    cb: Option<Continuation>,
}

impl Verb {
    pub const LOOKAT: &'static str = "lookat";
    pub const PICKUP: &'static str = "pickup";
    pub const LEAVE: &'static str = "leave";
    pub const TALKTO: &'static str = "talkto";
    pub const USE: &'static str = "use";
    pub const INIT: &'static str = "init";
    pub const TEST: &'static str = "test";

    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            target: None,
            state: None,
            actions: Vec::new(),
            ip: -1,
            cb: None,
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn add(&mut self, action: Action) {
        self.actions.push(action);
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Registry key: `id[.target][.state]`.
    pub fn hash_key(&self) -> String {
        let mut key = self.id.clone();
        if let Some(target) = &self.target {
            key.push('.');
            key.push_str(target);
        }
        if let Some(state) = &self.state {
            key.push('.');
            key.push_str(state);
        }
        key
    }

    pub fn ip(&self) -> i32 {
        self.ip
    }

    pub fn set_ip(&mut self, ip: i32) {
        self.ip = ip;
    }

    pub(crate) fn advance_ip(&mut self) {
        self.ip += 1;
    }

    /// True when the verb is not positioned on a runnable action: either it
    /// has run past the end or it was never started.
    pub fn is_finished(&self) -> bool {
        self.ip >= self.actions.len() as i32 || self.ip < 0
    }

    pub fn cb(&self) -> Option<&Continuation> {
        self.cb.as_ref()
    }

    pub fn set_cb(&mut self, cb: Option<Continuation>) {
        self.cb = cb;
    }

    pub(crate) fn take_cb(&mut self) -> Option<Continuation> {
        self.cb.take()
    }
}

/// One verb scope: a scene's, an actor's, or the global default registry.
/// Keyed by `Verb::hash_key`; ordered so registry walks are deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VerbManager {
    verbs: BTreeMap<String, Verb>,
}

impl VerbManager {
    pub fn add(&mut self, verb: Verb) {
        self.verbs.insert(verb.hash_key(), verb);
    }

    pub fn get(&self, key: &str) -> Option<&Verb> {
        self.verbs.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Verb> {
        self.verbs.get_mut(key)
    }

    /// Most-specific lookup: `id.target.state`, `id.target`, `id.state`,
    /// then the bare id.
    pub fn find_key(&self, id: &str, target: Option<&str>, state: Option<&str>) -> Option<String> {
        let mut candidates = Vec::with_capacity(4);
        if let (Some(target), Some(state)) = (target, state) {
            candidates.push(format!("{id}.{target}.{state}"));
        }
        if let Some(target) = target {
            candidates.push(format!("{id}.{target}"));
        }
        if let Some(state) = state {
            candidates.push(format!("{id}.{state}"));
        }
        candidates.push(id.to_string());

        candidates
            .into_iter()
            .find(|key| self.verbs.contains_key(key))
    }

    pub fn verbs(&self) -> impl Iterator<Item = (&String, &Verb)> {
        self.verbs.iter()
    }

    pub fn len(&self) -> usize {
        self.verbs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verbs.is_empty()
    }

    pub fn clear(&mut self) {
        self.verbs.clear();
    }
}
