//! This crate provides the sprite archive codecs for the `nornspr-rs` project.
//!
//! # File Formats
//!
//! - **SPR**: Palette-indexed sprites, plus four historical layouts that are decode-only
//! - **C16**: 16-bit sprites with run-length encoded transparency
//! - **S16** / **M16**: Uncompressed 16-bit sprites, little- and big-endian
//! - **BLK**: Backgrounds cut into a grid of 128x128 tiles
//! - **DTA**: Bitmap font charsets in four fixed sizes
//! - **Photo Album**: Palette-indexed photos with timestamps and comments, decode-only
//!
//! Every codec turns bytes into a [`file::SpriteCollection`] and back. Nothing here touches the
//! filesystem; callers read and write the bytes themselves.
//!
//! # Examples
//!
//! Using the prelude (recommended):
//!
//! ```no_run
//! use nornspr_types::prelude::*;
//!
//! let palette = Palette::creatures();
//! let data = std::fs::read("norn.c16").unwrap();
//! let sprites = SpriteFormat::C16.decode(&data, &palette).unwrap();
//! for frame in &sprites {
//!     println!("{frame}");
//! }
//! ```
//!
//! Or use explicit paths:
//!
//! ```no_run
//! use nornspr_types::file::{c16, s16};
//!
//! let sprites = c16::decode(&std::fs::read("norn.c16").unwrap()).unwrap();
//! let bytes = s16::encode(&sprites).unwrap();
//! ```

pub mod file;

/// `use nornspr_types::prelude::*;` to import commonly used items.
pub mod prelude;
