//! The decoding pass that turns a chunk stream into a [`Scene`]

use super::tags::{LightTag, ObjectTag, WorldTag};
use super::{
    LightKind, LightProperties, Object, PhysicalProperties, RenderKind, Scene, SpecialKind,
};
use crate::node::{self, ChunkHeader};
use anyhow::{bail, ensure};
use byteorder::{ReadBytesExt, LE};
use glam::{Quat, Vec2, Vec3};
use log::{trace, warn};
use salieri_utils::{math, ok, AnyResult};
use std::io::{self, Read, Seek, SeekFrom};

impl Scene {
    /// Decodes a whole `scene2.bin` stream.
    ///
    /// The stream is walked front to back in a single pass, re-seeking before
    /// every read. Any I/O or structural failure aborts the decode; there is
    /// no partial result.
    pub fn from_reader<R: Read + Seek>(r: &mut R) -> AnyResult<Self> {
        let mut scene = Scene::default();
        let root = node::read_header_at(r, 0)?;
        read_world_level(r, &root, &mut scene)?;
        Ok(scene)
    }
}

/// Walks one level of world chunks. Used for the stream root, and recursively
/// for world chunks, which share the root's tag space.
fn read_world_level<R: Read + Seek>(
    r: &mut R,
    parent: &ChunkHeader,
    scene: &mut Scene,
) -> AnyResult {
    for child in node::read_children(r, parent)? {
        match WorldTag::from(child.tag) {
            WorldTag::World | WorldTag::SpecialWorld => read_world_level(r, &child, scene)?,
            WorldTag::ViewDistance => {
                child.seek_to_payload(r)?;
                scene.view_distance = r.read_f32::<LE>()?;
            }
            WorldTag::ClippingPlanes => {
                child.seek_to_payload(r)?;
                scene.clipping_planes = read_vec2(r)?;
            }
            WorldTag::FieldOfView => {
                child.seek_to_payload(r)?;
                scene.field_of_view = r.read_f32::<LE>()?;
            }
            WorldTag::Object => {
                let object = read_object_tree(r, &child)?;
                scene.objects.insert(object.name.clone(), object);
            }
            WorldTag::SpecialObject => {
                let overlay = read_object_tree(r, &child)?;
                apply_special_overlay(scene, overlay);
            }
            WorldTag::Unknown(tag) => {
                trace!("skipping unknown world chunk {tag:#06x} at {:#x}", child.position);
            }
        }
    }
    ok()
}

/// Merges a decoded special object chunk onto the plain entry of the same
/// name. Special chunks only ever contribute the special kind and the physics
/// record; without a prior plain definition there is nothing to attach them
/// to and the chunk is dropped.
fn apply_special_overlay(scene: &mut Scene, overlay: Object) {
    match scene.objects.get_mut(&overlay.name) {
        Some(object) => {
            object.special_kind = overlay.special_kind;
            object.physical = overlay.physical;
        }
        None => {
            warn!("special object chunk {:?} has no plain definition, dropping it", overlay.name);
            scene.orphan_specials.push(overlay.name);
        }
    }
}

fn read_object_tree<R: Read + Seek>(r: &mut R, parent: &ChunkHeader) -> AnyResult<Object> {
    let mut object = Object::default();
    for child in node::read_children(r, parent)? {
        read_object_chunk(r, &child, &mut object)?;
    }
    Ok(object)
}

fn read_object_chunk<R: Read + Seek>(
    r: &mut R,
    header: &ChunkHeader,
    object: &mut Object,
) -> AnyResult {
    match ObjectTag::from(header.tag) {
        ObjectTag::NormalType => {
            header.seek_to_payload(r)?;
            object.kind = RenderKind::from_raw(r.read_u32::<LE>()?);
        }
        ObjectTag::SpecialType => {
            header.seek_to_payload(r)?;
            object.special_kind = SpecialKind::from_raw(r.read_u32::<LE>()?);
        }
        ObjectTag::Name | ObjectTag::SpecialName => {
            object.name = node::read_string_payload(r, header)?;
        }
        ObjectTag::Model => {
            object.model = Some(mesh_reference(&node::read_string_payload(r, header)?));
        }
        ObjectTag::Position => {
            header.seek_to_payload(r)?;
            object.position = read_vec3(r)?;
        }
        ObjectTag::SecondaryPosition => {
            header.seek_to_payload(r)?;
            object.secondary_position = read_vec3(r)?;
        }
        ObjectTag::Scale => {
            header.seek_to_payload(r)?;
            object.scale = read_vec3(r)?;
        }
        ObjectTag::Rotation => {
            header.seek_to_payload(r)?;
            object.rotation = read_rotation(r)?;
        }
        ObjectTag::Parent => {
            // The parent chunk wraps a single nested chunk, decoded like any
            // object chunk purely to harvest a name.
            let nested = node::read_header_at(r, header.payload_offset())?;
            let mut throwaway = Object::default();
            read_object_chunk(r, &nested, &mut throwaway)?;
            object.parent_name = Some(throwaway.name);
        }
        ObjectTag::LightRoot => {
            let light = object.light.get_or_insert_with(LightProperties::default);
            for child in node::read_children(r, header)? {
                read_light_chunk(r, &child, light)?;
            }
        }
        ObjectTag::SpecialData => read_special_data(r, header, object)?,
        ObjectTag::LightMap => read_light_map(r, header)?,
        ObjectTag::Unknown(tag) => {
            trace!("skipping unknown object chunk {tag:#06x} at {:#x}", header.position);
        }
    }
    ok()
}

/// Decodes a special data chunk. Its payload shape depends on the special
/// kind read earlier in the same object; only physical objects carry one.
fn read_special_data<R: Read + Seek>(
    r: &mut R,
    header: &ChunkHeader,
    object: &mut Object,
) -> AnyResult {
    if object.special_kind != SpecialKind::Physical {
        return ok();
    }

    header.seek_to_payload(r)?;
    // Two reserved bytes lead the record and one more splits off the final
    // field.
    r.seek(SeekFrom::Current(2))?;
    let movement_1 = r.read_f32::<LE>()?;
    let movement_2 = r.read_f32::<LE>()?;
    let weight = r.read_f32::<LE>()?;
    let friction = r.read_f32::<LE>()?;
    let movement_4 = r.read_f32::<LE>()?;
    let sound = r.read_i32::<LE>()?;
    r.seek(SeekFrom::Current(1))?;
    let movement_5 = r.read_f32::<LE>()?;

    object.physical = Some(PhysicalProperties {
        movement_1,
        movement_2,
        weight,
        friction,
        movement_4,
        sound,
        movement_5,
    });
    ok()
}

fn read_light_chunk<R: Read + Seek>(
    r: &mut R,
    header: &ChunkHeader,
    light: &mut LightProperties,
) -> AnyResult {
    header.seek_to_payload(r)?;
    match LightTag::from(header.tag) {
        LightTag::Kind => light.kind = Some(LightKind::from_raw(r.read_u32::<LE>()?)),
        LightTag::Colour => light.colour = read_vec3(r)?,
        LightTag::Power => light.power = r.read_f32::<LE>()?,
        LightTag::Range => {
            light.range_near = r.read_f32::<LE>()?;
            light.range_far = r.read_f32::<LE>()?;
        }
        LightTag::Flags => light.flags = r.read_u32::<LE>()?,
        LightTag::Reserved => {
            light.reserved[0] = r.read_f32::<LE>()?;
            light.reserved[1] = r.read_f32::<LE>()?;
        }
        // Sector lists are stepped over by size, their layout is not decoded.
        LightTag::Sectors => {}
        LightTag::Unknown(tag) => {
            trace!("skipping unknown light chunk {tag:#06x} at {:#x}", header.position);
        }
    }
    ok()
}

const LIGHT_MAP_VERTEX: u8 = 1;
const LIGHT_MAP_BITMAP: u8 = 2;

/// Best-effort walk of a precomputed lighting chunk.
///
/// The layout is only partially understood. Everything is decoded for trace
/// diagnostics and then thrown away; an error inside the walk ends it early
/// without failing the surrounding object decode.
fn read_light_map<R: Read + Seek>(r: &mut R, header: &ChunkHeader) -> AnyResult {
    header.seek_to_payload(r)?;
    let lod_mask = r.read_u8()?;
    if lod_mask == 0 {
        return ok();
    }

    let levels = lod_mask.count_ones();
    trace!(
        "light map at {:#x}: lod mask {lod_mask:#010b}, {levels} level(s)",
        header.position
    );

    if let Err(e) = trace_light_map_levels(r, levels) {
        trace!("light map walk at {:#x} ended early: {e:#}", header.position);
    }
    ok()
}

fn trace_light_map_levels<R: Read + Seek>(r: &mut R, levels: u32) -> AnyResult {
    for _ in 0..levels {
        let kind = r.read_u8()?;
        let parts = r.read_u8()?;
        let level_id = r.read_u16::<LE>()?;
        let unk_a = r.read_f32::<LE>()?;
        let unk_b = r.read_f32::<LE>()?;
        trace!("level {level_id}: kind {kind}, {parts} part(s), unknowns ({unk_a}, {unk_b})");

        for part in 0..parts {
            let _filler = r.read_u16::<LE>()?;
            match kind {
                LIGHT_MAP_VERTEX => {
                    let vertices = r.read_u32::<LE>()?;
                    trace!(
                        "  part {part} at {:#x}: {vertices} vertex colour(s)",
                        r.stream_position()?
                    );
                    r.seek(SeekFrom::Current(i64::from(vertices) * 4))?;
                }
                LIGHT_MAP_BITMAP => {
                    let vertices = r.read_u16::<LE>()?;
                    let facets = r.read_u16::<LE>()?;
                    let has_dword = r.read_u8()? != 0;
                    if has_dword {
                        let _ = r.read_u32::<LE>()?;
                    }
                    let maps = r.read_u32::<LE>()?;
                    trace!("  part {part}: {vertices} vertices, {facets} facets, {maps} map(s)");

                    for _ in 0..maps {
                        let width = r.read_u32::<LE>()?;
                        let height = r.read_u32::<LE>()?;
                        trace!("    {width}x{height} map at {:#x}", r.stream_position()?);
                        let texels = u64::from(width)
                            .saturating_mul(u64::from(height))
                            .saturating_mul(3);
                        ensure!(texels <= i64::MAX as u64, "bitmap dimensions out of range");
                        r.seek(SeekFrom::Current(texels as i64))?;
                    }

                    let uv_count = r.read_u32::<LE>()?;
                    trace!("  part {part}: {uv_count} uv coordinate(s)");
                }
                other => bail!("unknown light map kind {other}"),
            }
        }
    }
    ok()
}

/// Rewrites a stored model reference into the mesh file it names: the stored
/// extension (always 4 characters) is dropped and the `.4ds` suffix appended.
fn mesh_reference(stored: &str) -> String {
    let stem_len = stored.chars().count().saturating_sub(4);
    let mut name: String = stored.chars().take(stem_len).collect();
    name.push_str(".4ds");
    name
}

fn read_vec2<R: Read>(r: &mut R) -> io::Result<Vec2> {
    Ok(Vec2::new(r.read_f32::<LE>()?, r.read_f32::<LE>()?))
}

fn read_vec3<R: Read>(r: &mut R) -> io::Result<Vec3> {
    Ok(Vec3::new(
        r.read_f32::<LE>()?,
        r.read_f32::<LE>()?,
        r.read_f32::<LE>()?,
    ))
}

fn read_rotation<R: Read>(r: &mut R) -> io::Result<Quat> {
    let stored = [
        r.read_f32::<LE>()?,
        r.read_f32::<LE>()?,
        r.read_f32::<LE>()?,
        r.read_f32::<LE>()?,
    ];
    Ok(math::rotation_from_stored(stored))
}
