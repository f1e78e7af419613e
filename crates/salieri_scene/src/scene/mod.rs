//! In-memory model of a decoded mission scene
//!
//! A scene is what one `scene2.bin` file boils down to: a handful of
//! world-level scalars and a name-keyed table of objects. Everything here is
//! built once by [`Scene::from_reader`](crate::Scene::from_reader) and not
//! touched afterwards.

use ahash::AHashMap;
use glam::{Quat, Vec2, Vec3};
use std::fmt;

pub mod read;
mod tags;

#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub view_distance: f32,
    /// Near and far clipping plane distances, in that order.
    pub clipping_planes: Vec2,
    pub field_of_view: f32,
    pub objects: AHashMap<String, Object>,
    /// Names from special object chunks that never matched a plain object
    /// definition. Their data is dropped, this is the only trace of them.
    pub orphan_specials: Vec<String>,
}

/// One named object of the scene hierarchy.
///
/// Objects come out of plain object chunks; special object chunks only ever
/// overlay `special_kind` and `physical` onto an existing entry.
#[derive(Debug, Clone, Default)]
pub struct Object {
    pub name: String,
    pub kind: RenderKind,
    pub special_kind: SpecialKind,
    pub position: Vec3,
    pub secondary_position: Vec3,
    /// Stored in the engine's own convention, already converted on read.
    pub rotation: Quat,
    pub scale: Vec3,
    /// Mesh file the object renders with, already rewritten to its `.4ds`
    /// form.
    pub model: Option<String>,
    /// Name of the parent object. A weak reference only; resolving it (and
    /// detecting missing or cyclic parents) is left to the consumer.
    pub parent_name: Option<String>,
    pub light: Option<LightProperties>,
    /// Present only for [`SpecialKind::Physical`] objects.
    pub physical: Option<PhysicalProperties>,
}

/// How an object participates in rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderKind {
    Light,
    Camera,
    Sound,
    Model,
    Occluder,
    Sector,
    Script,
    Unknown(u32),
}

impl RenderKind {
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            0x02 => Self::Light,
            0x03 => Self::Camera,
            0x04 => Self::Sound,
            0x09 => Self::Model,
            0x0C => Self::Occluder,
            0x99 => Self::Sector,
            0x9B => Self::Script,
            other => Self::Unknown(other),
        }
    }
}

impl Default for RenderKind {
    fn default() -> Self {
        Self::Unknown(0)
    }
}

/// Gameplay role of an object, carried by special object chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialKind {
    Normal,
    Player,
    Car,
    Script,
    PubVehicle,
    Character,
    Physical,
    Unknown(u32),
}

impl SpecialKind {
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            0x00 => Self::Normal,
            0x02 => Self::Player,
            0x04 => Self::Car,
            0x05 => Self::Script,
            0x08 => Self::PubVehicle,
            0x1B => Self::Character,
            0x23 => Self::Physical,
            other => Self::Unknown(other),
        }
    }
}

impl Default for SpecialKind {
    fn default() -> Self {
        Self::Normal
    }
}

/// Light parameters of an object that carries a light subtree.
///
/// Only the fields actually present in the stream end up populated, the rest
/// keep their zero defaults.
#[derive(Debug, Clone, Default)]
pub struct LightProperties {
    pub kind: Option<LightKind>,
    pub colour: Vec3,
    pub power: f32,
    pub range_near: f32,
    pub range_far: f32,
    pub flags: u32,
    /// Two values of unknown meaning that some light subtrees carry.
    pub reserved: [f32; 2],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightKind {
    Point,
    Directional,
    Ambient,
    Fog,
    PointAmbient,
    LayeredFog,
    Unknown(u32),
}

impl LightKind {
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            0x01 => Self::Point,
            0x03 => Self::Directional,
            0x04 => Self::Ambient,
            0x05 => Self::Fog,
            0x06 => Self::PointAmbient,
            0x08 => Self::LayeredFog,
            other => Self::Unknown(other),
        }
    }
}

impl fmt::Display for LightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Point => "point",
            Self::Directional => "directional",
            Self::Ambient => "ambient",
            Self::Fog => "fog",
            Self::PointAmbient => "point ambient",
            Self::LayeredFog => "layered fog",
            Self::Unknown(_) => "unknown",
        })
    }
}

/// Physics parameters of [`SpecialKind::Physical`] objects.
///
/// The engine's interpretation of these is opaque to the decoder; they are
/// read in stream order and passed through untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PhysicalProperties {
    pub movement_1: f32,
    pub movement_2: f32,
    pub weight: f32,
    pub friction: f32,
    pub movement_4: f32,
    /// Reference into the engine's sound bank.
    pub sound: i32,
    pub movement_5: f32,
}
