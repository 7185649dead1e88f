mod targets;
mod tween;

pub use targets::{SceneTween, TweenTarget, WalkState};
pub use tween::{InterpolationMode, Tween, TweenType, INFINITY};

pub(crate) use targets::TweenCtx;
