//! The three tag spaces of the scene chunk hierarchy.
//!
//! Each nesting context interprets raw tags through its own enum, so
//! supporting a new chunk type is an additive change local to one context:
//! a variant here and a match arm in the reader.

/// Tags understood at the stream root and inside world chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldTag {
    World,
    SpecialWorld,
    ViewDistance,
    ClippingPlanes,
    FieldOfView,
    Object,
    SpecialObject,
    Unknown(u16),
}

impl From<u16> for WorldTag {
    fn from(raw: u16) -> Self {
        match raw {
            0x4000 => Self::World,
            0xAE20 => Self::SpecialWorld,
            0x3011 => Self::ViewDistance,
            0x3211 => Self::ClippingPlanes,
            0x3010 => Self::FieldOfView,
            0x4010 => Self::Object,
            0xAE21 => Self::SpecialObject,
            other => Self::Unknown(other),
        }
    }
}

/// Tags understood inside object chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectTag {
    NormalType,
    SpecialType,
    Name,
    SpecialName,
    Model,
    Position,
    Rotation,
    SecondaryPosition,
    Scale,
    Parent,
    LightRoot,
    LightMap,
    SpecialData,
    Unknown(u16),
}

impl From<u16> for ObjectTag {
    fn from(raw: u16) -> Self {
        match raw {
            0x4011 => Self::NormalType,
            0xAE22 => Self::SpecialType,
            0x0010 => Self::Name,
            0xAE23 => Self::SpecialName,
            0x2012 => Self::Model,
            0x0020 => Self::Position,
            0x0022 => Self::Rotation,
            0x002C => Self::SecondaryPosition,
            0x002D => Self::Scale,
            0x4020 => Self::Parent,
            0x4040 => Self::LightRoot,
            0x40A0 => Self::LightMap,
            0xAE24 => Self::SpecialData,
            other => Self::Unknown(other),
        }
    }
}

/// Tags understood inside an object's light subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightTag {
    Kind,
    Colour,
    Power,
    Reserved,
    Range,
    Flags,
    Sectors,
    Unknown(u16),
}

impl From<u16> for LightTag {
    fn from(raw: u16) -> Self {
        match raw {
            0x4041 => Self::Kind,
            0x0026 => Self::Colour,
            0x4042 => Self::Power,
            0x4043 => Self::Reserved,
            0x4044 => Self::Range,
            0x4045 => Self::Flags,
            0x4046 => Self::Sectors,
            other => Self::Unknown(other),
        }
    }
}
