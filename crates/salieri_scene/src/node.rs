//! Utilities for dealing with LS3D's scene chunks
//!
//! A `scene2.bin` file is a single tree of chunks. Every chunk starts with a
//! 6 byte header: a `u16` type tag followed by a `u32` length, both little
//! endian. The length spans the header itself and everything nested beneath
//! it, so a parent's children are walked by repeatedly adding each child's
//! declared length to the current offset.
//!
//! The tag space is open. Unknown tags are not an error anywhere, the chunk
//! is simply stepped over using its declared length.

use anyhow::bail;
use byteorder::{ReadBytesExt, LE};
use salieri_utils::AnyResult;
use std::io::{self, Read, Seek, SeekFrom};
use thiserror::Error;

/// Width of a serialized chunk header, constant at every nesting level.
pub const HEADER_BYTES: u64 = 6;

/// Raw header of a single chunk, together with where it was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkHeader {
    /// Absolute offset of the header's first byte.
    pub position: u64,
    pub tag: u16,
    /// Total chunk length, spanning the header and all descendants.
    pub size: u32,
}

impl ChunkHeader {
    pub fn payload_offset(&self) -> u64 {
        self.position + HEADER_BYTES
    }

    /// Number of bytes between the header and the chunk's declared end.
    pub fn payload_len(&self) -> u64 {
        u64::from(self.size).saturating_sub(HEADER_BYTES)
    }

    pub fn seek_to_payload(&self, r: &mut impl Seek) -> io::Result<()> {
        r.seek(SeekFrom::Start(self.payload_offset()))?;
        Ok(())
    }
}

/// Structural errors of the chunk walk itself.
#[derive(Debug, Clone, Copy, Error)]
pub enum ChunkError {
    /// A chunk whose declared length doesn't reach past its own header can
    /// never advance the walk, so it is rejected instead of looping forever.
    #[error("chunk {tag:#06x} at {position:#x} declares size {size} and cannot make progress")]
    Stalled { position: u64, tag: u16, size: u32 },
}

/// Reads one chunk header at the reader's current position.
///
/// Unknown type tags are fine; a header that extends past the end of the
/// stream is not, and surfaces as an I/O error.
pub fn read_header<R: Read + Seek>(r: &mut R) -> io::Result<ChunkHeader> {
    Ok(ChunkHeader {
        position: r.stream_position()?,
        tag: r.read_u16::<LE>()?,
        size: r.read_u32::<LE>()?,
    })
}

/// Wrapper around [`read_header`] that seeks to `position` first.
pub fn read_header_at<R: Read + Seek>(r: &mut R, position: u64) -> io::Result<ChunkHeader> {
    r.seek(SeekFrom::Start(position))?;
    read_header(r)
}

/// Collects the headers of all chunks nested directly under `parent`.
///
/// The walk is driven purely by declared sizes: starting at the parent's
/// payload, each child's size moves the offset to its next sibling until the
/// parent's range runs out. A child that cannot move the offset forward fails
/// the walk with [`ChunkError::Stalled`].
pub fn read_children<R: Read + Seek>(
    r: &mut R,
    parent: &ChunkHeader,
) -> AnyResult<Vec<ChunkHeader>> {
    let mut children = Vec::new();
    let mut position = parent.payload_offset();
    let end = parent.payload_offset() + u64::from(parent.size);

    while position + HEADER_BYTES < end {
        let child = read_header_at(r, position)?;
        if u64::from(child.size) <= HEADER_BYTES {
            bail!(ChunkError::Stalled {
                position,
                tag: child.tag,
                size: child.size,
            });
        }
        position += u64::from(child.size);
        children.push(child);
    }

    Ok(children)
}

/// Reads a chunk's payload as a string.
///
/// String payloads are NUL terminated in-stream, with no separate length
/// field; everything from the first NUL onwards is dropped.
pub fn read_string_payload<R: Read + Seek>(r: &mut R, header: &ChunkHeader) -> AnyResult<String> {
    header.seek_to_payload(r)?;
    let mut raw = vec![0u8; header.payload_len() as usize];
    r.read_exact(&mut raw)?;

    let len = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    raw.truncate(len);
    Ok(String::from_utf8_lossy(&raw).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::{WriteBytesExt, LE};
    use std::io::Cursor;

    fn chunk(tag: u16, payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(payload.len() + HEADER_BYTES as usize);
        out.write_u16::<LE>(tag).unwrap();
        out.write_u32::<LE>(payload.len() as u32 + HEADER_BYTES as u32)
            .unwrap();
        out.extend_from_slice(payload);
        out
    }

    #[test]
    pub fn children_walk_in_file_order() {
        let body = [chunk(0x0010, b"abc\0"), chunk(0x0020, &[0; 12])].concat();
        let root = chunk(0x4C53, &body);

        let mut r = Cursor::new(root);
        let parent = read_header_at(&mut r, 0).unwrap();
        let children = read_children(&mut r, &parent).unwrap();

        assert_eq!(children.len(), 2);
        assert_eq!(children[0].tag, 0x0010);
        assert_eq!(children[0].position, 6);
        assert_eq!(children[1].tag, 0x0020);
        assert_eq!(children[1].position, 16);
        assert!(children[1].position > children[0].position);
    }

    #[test]
    pub fn stalled_chunk_is_rejected() {
        let mut body = chunk(0x0010, b"abc\0");
        // An inner chunk claiming a size of 0, which could never advance the
        // walk past itself.
        body.write_u16::<LE>(0x0020).unwrap();
        body.write_u32::<LE>(0).unwrap();
        body.extend_from_slice(&[0; 32]);
        let root = chunk(0x4C53, &body);

        let mut r = Cursor::new(root);
        let parent = read_header_at(&mut r, 0).unwrap();
        let error = read_children(&mut r, &parent).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<ChunkError>(),
            Some(ChunkError::Stalled { size: 0, .. })
        ));
    }

    #[test]
    pub fn header_past_stream_end_is_fatal() {
        // Declares 64 bytes but the stream ends after the first child.
        let mut root = chunk(0x4C53, &[]);
        root[2] = 64;
        root.extend_from_slice(&chunk(0x0010, b"abc\0"));

        let mut r = Cursor::new(root);
        let parent = read_header_at(&mut r, 0).unwrap();
        assert!(read_children(&mut r, &parent).is_err());
    }

    #[test]
    pub fn string_payload_stops_at_terminator() {
        let data = chunk(0x0010, b"barrel01\0");
        let mut r = Cursor::new(data);
        let header = read_header_at(&mut r, 0).unwrap();
        assert_eq!(read_string_payload(&mut r, &header).unwrap(), "barrel01");
    }
}
