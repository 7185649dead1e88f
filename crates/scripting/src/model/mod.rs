mod action;
mod scene;
mod verb;
mod world;

pub use action::{Action, ActionError, DEFAULT_WALKING_SPEED};
pub use scene::{Actor, ActorPose, Camera, Color, FakeDepth, Scene, Vec2};
pub use verb::{ActionRef, Continuation, Verb, VerbManager, VerbOwner, VerbRef};
pub use world::World;
