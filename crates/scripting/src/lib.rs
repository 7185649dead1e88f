pub mod anim;
pub mod model;
pub mod runtime;
pub mod save;

pub use anim::{InterpolationMode, SceneTween, Tween, TweenTarget, TweenType, WalkState, INFINITY};
pub use model::{
    Action, ActionError, ActionRef, Actor, ActorPose, Camera, Color, Continuation, FakeDepth,
    Scene, Vec2, Verb, VerbManager, VerbOwner, VerbRef, World, DEFAULT_WALKING_SPEED,
};
pub use runtime::{CallbackQueue, TimerEntry, Timers};
pub use save::{
    address_of, decode_world, encode_world, load_world_from_path, resolve_address,
    save_world_to_path, SaveError, SavedWorld, DEFAULT_VERB_SCOPE, SAVE_VERSION, SEPARATOR,
};
