//! Reader for LS3D `scene2.bin` mission files
//!
//! A mission file describes one level: a few world-level settings (view
//! distance, clipping planes, field of view) and a table of named objects
//! arranged in a parent/child hierarchy, each with placement data and
//! optional light, physics and model information.
//!
//! The format is reverse engineered and has no authoritative description, so
//! the reader is deliberately tolerant: chunks with unknown type tags are
//! stepped over using their declared length at every nesting level.
//!
//! Use [`Scene::from_reader`] on any `Read + Seek` stream:
//!
//! ```no_run
//! use salieri_scene::Scene;
//! use std::{fs::File, io::BufReader};
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut reader = BufReader::new(File::open("missions/freeride/scene2.bin")?);
//! let scene = Scene::from_reader(&mut reader)?;
//! println!("{} objects", scene.objects.len());
//! # Ok(())
//! # }
//! ```

pub mod node;
pub mod scene;

pub use node::{ChunkError, ChunkHeader};
pub use scene::*;
