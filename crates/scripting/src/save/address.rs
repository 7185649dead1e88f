use crate::model::{ActionRef, Continuation, VerbManager, VerbOwner, VerbRef, World};

/// Owner field written for continuations found in the global registry.
pub const DEFAULT_VERB_SCOPE: &str = "DEFAULT_VERB";

pub const SEPARATOR: char = '#';

fn owner_label(owner: &VerbOwner) -> &str {
    match owner {
        VerbOwner::Default => DEFAULT_VERB_SCOPE,
        VerbOwner::Scene(id) | VerbOwner::Actor(id) => id,
    }
}

fn find_in_manager(at: &ActionRef, owner: &VerbOwner, manager: &VerbManager) -> Option<String> {
    if at.verb.owner != *owner {
        return None;
    }

    for (key, verb) in manager.verbs() {
        for (index, action) in verb.actions().iter().enumerate() {
            if action.is_callback() && at.verb.key == *key && at.index == index {
                return Some(format!(
                    "{}{SEPARATOR}{}{SEPARATOR}{}",
                    owner_label(owner),
                    key,
                    index
                ));
            }
        }
    }

    None
}

/// Converts a live continuation into its stable `owner#verb#index` path by
/// searching the current scene's registries and the global default scope,
/// first match wins. Returns `None` for continuations outside the scheme's
/// reach: verb-level resumes, or actions no registry can see.
pub fn address_of(world: &World, cb: &Continuation) -> Option<String> {
    let Continuation::Action(at) = cb else {
        return None;
    };
    let scene = world.current_scene()?;

    let scene_owner = VerbOwner::Scene(scene.id.clone());
    if let Some(found) = find_in_manager(at, &scene_owner, &scene.verbs) {
        return Some(found);
    }

    if let Some(player) = scene.player_actor() {
        let owner = VerbOwner::Actor(player.id.clone());
        if let Some(found) = find_in_manager(at, &owner, &player.verbs) {
            return Some(found);
        }
    }

    for actor in scene.actors() {
        if scene.player.as_deref() == Some(actor.id.as_str()) {
            continue;
        }
        let owner = VerbOwner::Actor(actor.id.clone());
        if let Some(found) = find_in_manager(at, &owner, &actor.verbs) {
            return Some(found);
        }
    }

    find_in_manager(at, &VerbOwner::Default, &world.default_verbs)
}

/// Resolves an address string back to a live continuation. Any failure —
/// wrong field count, unknown owner or verb, index out of range, an action
/// that is not a continuation target — yields `None`, never a panic:
/// addresses legitimately go stale when content changes between save and
/// load.
pub fn resolve_address(world: &World, address: &str) -> Option<Continuation> {
    let parts: Vec<&str> = address.split(SEPARATOR).collect();
    if parts.len() != 3 {
        return None;
    }

    let index: usize = parts[2].parse().ok()?;
    let scene = world.current_scene()?;

    let owner = if parts[0] == DEFAULT_VERB_SCOPE {
        VerbOwner::Default
    } else if parts[0] == scene.id {
        VerbOwner::Scene(scene.id.clone())
    } else {
        scene.actor(parts[0])?;
        VerbOwner::Actor(parts[0].to_string())
    };

    let manager = match &owner {
        VerbOwner::Default => &world.default_verbs,
        VerbOwner::Scene(_) => &scene.verbs,
        VerbOwner::Actor(id) => &scene.actor(id)?.verbs,
    };

    let verb = manager.get(parts[1])?;
    let action = verb.actions().get(index)?;
    if !action.is_callback() {
        return None;
    }

    Some(Continuation::Action(ActionRef {
        verb: VerbRef {
            owner,
            key: parts[1].to_string(),
        },
        index,
    }))
}
