use serde::{Deserialize, Serialize};

use crate::model::Continuation;
use crate::runtime::CallbackQueue;

/// Repeat count meaning "repeat forever".
pub const INFINITY: i32 = -1;

/// Time is reset to this instead of exactly zero on a repeat rollover, so
/// percent computation never sees a 0/duration edge case mid-cycle.
pub(crate) const TIME_EPSILON: f32 = 1e-5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TweenType {
    NoRepeat,
    Repeat,
    PingPong,
    Reverse,
    ReverseRepeat,
    /// Repeat policy comes from the sprite's embedded animation definition.
    SpriteDefined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterpolationMode {
    Linear,
    Pow2In,
    Pow2Out,
    Pow2InOut,
    Sine,
    SineIn,
    SineOut,
}

impl Default for InterpolationMode {
    fn default() -> Self {
        Self::Linear
    }
}

impl InterpolationMode {
    pub fn apply(self, t: f32) -> f32 {
        match self {
            Self::Linear => t,
            Self::Pow2In => t * t,
            Self::Pow2Out => 1.0 - (1.0 - t) * (1.0 - t),
            Self::Pow2InOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - 2.0 * (1.0 - t) * (1.0 - t)
                }
            }
            Self::Sine => (1.0 - (t * std::f32::consts::PI).cos()) / 2.0,
            Self::SineIn => 1.0 - (t * std::f32::consts::FRAC_PI_2).cos(),
            Self::SineOut => (t * std::f32::consts::FRAC_PI_2).sin(),
        }
    }
}

/// Time-driven interpolator over one property. Owns pacing only; the value
/// being animated lives with the tween's owner, which reads `percent()`.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    time: f32,
    duration: f32,
    tween_type: TweenType,
    count: i32,
    interpolation: InterpolationMode,
    reverse: bool,
    began: bool,
    complete: bool,
    cb: Option<Continuation>,
}

impl Tween {
    pub fn new(
        tween_type: TweenType,
        count: i32,
        duration: f32,
        interpolation: InterpolationMode,
        cb: Option<Continuation>,
    ) -> Self {
        Self {
            time: 0.0,
            duration,
            tween_type,
            count,
            interpolation,
            reverse: matches!(tween_type, TweenType::Reverse | TweenType::ReverseRepeat),
            began: false,
            complete: false,
            cb,
        }
    }

    /// Advances elapsed time. On completion the continuation, if any, is
    /// detached first and then pushed onto the queue, so it can fire at most
    /// once no matter how many further updates arrive.
    pub fn update(&mut self, delta: f32, queue: &mut CallbackQueue) {
        if self.complete {
            return;
        }

        if !self.began {
            self.began = true;
        }

        self.time += delta;

        if self.time >= self.duration {
            if matches!(self.tween_type, TweenType::NoRepeat | TweenType::Reverse)
                || self.count == 1
            {
                self.complete = true;
            } else {
                if self.count > 0 {
                    self.count -= 1;
                }
                self.time = TIME_EPSILON;

                if self.tween_type == TweenType::PingPong {
                    self.reverse = !self.reverse;
                }
            }
        }

        if self.complete {
            if let Some(cb) = self.cb.take() {
                queue.add(cb);
            }
        }
    }

    pub fn percent(&self) -> f32 {
        let percent = if self.complete {
            1.0
        } else {
            self.interpolation.apply(self.time / self.duration)
        };

        if self.reverse {
            1.0 - percent
        } else {
            percent
        }
    }

    /// Skips to the end of the transition.
    pub fn finish(&mut self) {
        self.time = self.duration;
    }

    pub fn restart(&mut self) {
        self.time = 0.0;
        self.began = false;
        self.complete = false;
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn tween_type(&self) -> TweenType {
        self.tween_type
    }

    pub fn count(&self) -> i32 {
        self.count
    }

    pub fn interpolation(&self) -> InterpolationMode {
        self.interpolation
    }

    pub fn is_reverse(&self) -> bool {
        self.reverse
    }

    pub fn began(&self) -> bool {
        self.began
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

    /// Rebuilds a tween from persisted scalar state.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn restore(
        time: f32,
        duration: f32,
        tween_type: TweenType,
        count: i32,
        interpolation: InterpolationMode,
        reverse: bool,
        began: bool,
        complete: bool,
        cb: Option<Continuation>,
    ) -> Self {
        Self {
            time,
            duration,
            tween_type,
            count,
            interpolation,
            reverse,
            began,
            complete,
            cb,
        }
    }
}
