use tracing::debug;

use crate::anim::tween::{InterpolationMode, Tween, TweenType, TIME_EPSILON};
use crate::model::{ActorPose, Camera, Color, Continuation, Scene, Vec2};
use crate::runtime::CallbackQueue;

/// Depth-scale difference between segment endpoints above which the walk
/// switches from a linear pace to an eased one.
const WALK_EASE_SCALE_DIFF: f32 = 0.05;

/// Mutable view the tween pass gets over the current scene. Carried as one
/// struct so the world can hand out disjoint borrows for a whole pass.
pub(crate) struct TweenCtx<'a> {
    pub scene: &'a mut Scene,
    pub music_volume: &'a mut f32,
    pub world_scale: f32,
}

/// Multi-waypoint walk state. The base tween always paces the current
/// segment; the externally supplied continuation is only attached to the
/// final one.
#[derive(Debug, Clone, PartialEq)]
pub struct WalkState {
    actor: String,
    path: Vec<Vec2>,
    step: usize,
    speed: f32,
    from: Vec2,
    to: Vec2,
    walk_cb: Option<Continuation>,
}

impl WalkState {
    pub fn actor(&self) -> &str {
        &self.actor
    }

    pub fn path(&self) -> &[Vec2] {
        &self.path
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn segment(&self) -> (Vec2, Vec2) {
        (self.from, self.to)
    }

    pub fn walk_cb(&self) -> Option<&Continuation> {
        self.walk_cb.as_ref()
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn restore(
        actor: String,
        path: Vec<Vec2>,
        step: usize,
        speed: f32,
        from: Vec2,
        to: Vec2,
        walk_cb: Option<Continuation>,
    ) -> Self {
        Self {
            actor,
            path,
            step,
            speed,
            from,
            to,
            walk_cb,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TweenTarget {
    ActorPos { actor: String, from: Vec2, to: Vec2 },
    ActorScale { actor: String, from: f32, to: f32 },
    ActorAlpha { actor: String, from: f32, to: f32 },
    ActorTint { actor: String, from: Color, to: Color },
    Camera { from: Camera, to: Camera },
    MusicVolume { from: f32, to: f32 },
    Walk(WalkState),
}

/// A base tween bound to the property it animates. The tween owns pacing;
/// `update` pushes the interpolated value onto the target each tick.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneTween {
    tween: Tween,
    target: TweenTarget,
}

impl SceneTween {
    pub fn actor_pos(tween: Tween, actor: String, from: Vec2, to: Vec2) -> Self {
        Self {
            tween,
            target: TweenTarget::ActorPos { actor, from, to },
        }
    }

    pub fn actor_scale(tween: Tween, actor: String, from: f32, to: f32) -> Self {
        Self {
            tween,
            target: TweenTarget::ActorScale { actor, from, to },
        }
    }

    pub fn actor_alpha(tween: Tween, actor: String, from: f32, to: f32) -> Self {
        Self {
            tween,
            target: TweenTarget::ActorAlpha { actor, from, to },
        }
    }

    pub fn actor_tint(tween: Tween, actor: String, from: Color, to: Color) -> Self {
        Self {
            tween,
            target: TweenTarget::ActorTint { actor, from, to },
        }
    }

    pub fn camera(tween: Tween, from: Camera, to: Camera) -> Self {
        Self {
            tween,
            target: TweenTarget::Camera { from, to },
        }
    }

    pub fn music_volume(tween: Tween, from: f32, to: f32) -> Self {
        Self {
            tween,
            target: TweenTarget::MusicVolume { from, to },
        }
    }

    /// Starts an actor walking along `path`. Returns `None` for degenerate
    /// paths (fewer than two waypoints).
    pub fn walk(
        scene: &mut Scene,
        world_scale: f32,
        actor: &str,
        path: Vec<Vec2>,
        speed: f32,
        cb: Option<Continuation>,
    ) -> Option<Self> {
        if path.len() < 2 {
            return None;
        }
        scene.actor(actor)?;

        let mut state = WalkState {
            actor: actor.to_string(),
            path,
            step: 0,
            speed,
            from: Vec2::default(),
            to: Vec2::default(),
            walk_cb: cb,
        };
        let mut tween = Tween::new(TweenType::NoRepeat, 1, 0.0, InterpolationMode::Linear, None);
        start_segment(&mut tween, &mut state, scene, world_scale);

        Some(Self {
            tween,
            target: TweenTarget::Walk(state),
        })
    }

    pub(crate) fn restore(tween: Tween, target: TweenTarget) -> Self {
        Self { tween, target }
    }

    pub fn tween(&self) -> &Tween {
        &self.tween
    }

    pub fn target(&self) -> &TweenTarget {
        &self.target
    }

    pub fn is_complete(&self) -> bool {
        self.tween.is_complete()
    }

    pub(crate) fn is_walk_for(&self, actor: &str) -> bool {
        matches!(&self.target, TweenTarget::Walk(state) if state.actor == actor)
    }

    pub(crate) fn update(&mut self, ctx: &mut TweenCtx<'_>, queue: &mut CallbackQueue, delta: f32) {
        self.tween.update(delta, queue);
        let percent = self.tween.percent();

        match &mut self.target {
            TweenTarget::ActorPos { actor, from, to } => {
                if let Some(actor) = ctx.scene.actor_mut(actor) {
                    actor.position = from.lerp(*to, percent);
                }
            }
            TweenTarget::ActorScale { actor, from, to } => {
                if let Some(actor) = ctx.scene.actor_mut(actor) {
                    actor.scale = *from + (*to - *from) * percent;
                }
            }
            TweenTarget::ActorAlpha { actor, from, to } => {
                if let Some(actor) = ctx.scene.actor_mut(actor) {
                    actor.alpha = *from + (*to - *from) * percent;
                }
            }
            TweenTarget::ActorTint { actor, from, to } => {
                if let Some(actor) = ctx.scene.actor_mut(actor) {
                    actor.tint = from.lerp(*to, percent);
                }
            }
            TweenTarget::Camera { from, to } => {
                ctx.scene.camera.position = from.position.lerp(to.position, percent);
                ctx.scene.camera.zoom = from.zoom + (to.zoom - from.zoom) * percent;
            }
            TweenTarget::MusicVolume { from, to } => {
                *ctx.music_volume = *from + (*to - *from) * percent;
            }
            TweenTarget::Walk(state) => {
                if let Some(actor) = ctx.scene.actor_mut(&state.actor) {
                    actor.position = state.from.lerp(state.to, percent);
                }
                if self.tween.is_complete() {
                    state.step += 1;
                    if state.step + 1 < state.path.len() {
                        start_segment(&mut self.tween, state, ctx.scene, ctx.world_scale);
                    } else if let Some(actor) = ctx.scene.actor_mut(&state.actor) {
                        actor.pose = ActorPose::Standing;
                    }
                }
            }
        }
    }

    /// Fast-forwards a walk: jump to the last waypoint, stand, and hand back
    /// whichever continuation is still pending (the walk's own, or the one
    /// already moved onto the final segment).
    pub(crate) fn finish_walk(&mut self, scene: &mut Scene) -> Option<Continuation> {
        let TweenTarget::Walk(state) = &mut self.target else {
            return None;
        };

        if let Some(last) = state.path.last().copied() {
            if let Some(actor) = scene.actor_mut(&state.actor) {
                actor.position = last;
                actor.pose = ActorPose::Standing;
            }
        }
        state.step = state.path.len();
        self.tween.finish();

        state.walk_cb.take().or_else(|| self.tween.take_cb())
    }
}

fn start_segment(tween: &mut Tween, state: &mut WalkState, scene: &mut Scene, world_scale: f32) {
    let p0 = state.path[state.step];
    let pf = state.path[state.step + 1];

    let fake_depth = scene
        .actor(&state.actor)
        .map(|actor| actor.fake_depth)
        .unwrap_or(false);
    let (s0, sf) = if fake_depth {
        (scene.fake_depth_scale(p0.y), scene.fake_depth_scale(pf.y))
    } else {
        (1.0, 1.0)
    };

    // avoid a visible speed jump between segments of very different depth
    let interpolation = if (s0 - sf).abs() > WALK_EASE_SCALE_DIFF {
        if sf < s0 {
            InterpolationMode::Pow2Out
        } else {
            InterpolationMode::Pow2In
        }
    } else {
        InterpolationMode::Linear
    };

    // t = dst / ((v0 + vf) / 2)
    let duration = p0.distance(pf) / (world_scale * state.speed * (s0 + sf) / 2.0);
    let duration = if duration.is_finite() {
        duration.max(TIME_EPSILON)
    } else {
        TIME_EPSILON
    };

    let last_segment = state.step == state.path.len() - 2;
    let cb = if last_segment {
        state.walk_cb.take()
    } else {
        None
    };

    debug!(
        actor = %state.actor,
        step = state.step,
        duration,
        "walk segment"
    );

    state.from = p0;
    state.to = pf;
    *tween = Tween::new(TweenType::NoRepeat, 1, duration, interpolation, cb);

    if let Some(actor) = scene.actor_mut(&state.actor) {
        actor.pose = ActorPose::Walking;
    }
}
