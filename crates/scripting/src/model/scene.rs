use std::collections::BTreeMap;

use crate::model::verb::VerbManager;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Vec2) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn lerp(self, other: Vec2, t: f32) -> Vec2 {
        Vec2 {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };

    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn lerp(self, other: Color, t: f32) -> Color {
        Color {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec2,
    pub zoom: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec2::default(),
            zoom: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActorPose {
    #[default]
    Standing,
    Walking,
}

/// Perspective emulation: actors standing "further away" (towards `far_y`)
/// are drawn and moved at a smaller scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FakeDepth {
    pub near_y: f32,
    pub far_y: f32,
    pub min_scale: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    pub id: String,
    pub position: Vec2,
    pub scale: f32,
    pub alpha: f32,
    pub tint: Color,
    pub state: Option<String>,
    pub fake_depth: bool,
    pub pose: ActorPose,
    pub verbs: VerbManager,
}

impl Actor {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            position: Vec2::default(),
            scale: 1.0,
            alpha: 1.0,
            tint: Color::WHITE,
            state: None,
            fake_depth: false,
            pose: ActorPose::Standing,
            verbs: VerbManager::default(),
        }
    }

    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.position = Vec2::new(x, y);
        self
    }

    pub fn with_fake_depth(mut self) -> Self {
        self.fake_depth = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub id: String,
    pub player: Option<String>,
    pub camera: Camera,
    pub fake_depth: Option<FakeDepth>,
    pub verbs: VerbManager,
    actors: BTreeMap<String, Actor>,
}

impl Scene {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            player: None,
            camera: Camera::default(),
            fake_depth: None,
            verbs: VerbManager::default(),
            actors: BTreeMap::new(),
        }
    }

    pub fn add_actor(&mut self, actor: Actor) {
        self.actors.insert(actor.id.clone(), actor);
    }

    pub fn actor(&self, id: &str) -> Option<&Actor> {
        self.actors.get(id)
    }

    pub fn actor_mut(&mut self, id: &str) -> Option<&mut Actor> {
        self.actors.get_mut(id)
    }

    pub fn actors(&self) -> impl Iterator<Item = &Actor> {
        self.actors.values()
    }

    pub fn player_actor(&self) -> Option<&Actor> {
        self.actors.get(self.player.as_deref()?)
    }

    /// Scale factor for a point at depth `y`; 1.0 when the scene has no
    /// depth plane or the plane is degenerate.
    pub fn fake_depth_scale(&self, y: f32) -> f32 {
        let Some(depth) = self.fake_depth else {
            return 1.0;
        };
        let span = depth.far_y - depth.near_y;
        if span.abs() < f32::EPSILON {
            return 1.0;
        }
        let t = ((y - depth.near_y) / span).clamp(0.0, 1.0);
        1.0 + (depth.min_scale - 1.0) * t
    }
}
