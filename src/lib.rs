#![allow(clippy::single_component_path_imports)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! `nornspr-rs` reads and writes the sprite archives of a classic artificial-life game.
//!
//! Indexed `.spr` sprites (and their historical variants), 16-bit `.s16`/`.m16` sprites,
//! run-length `.c16` sprites, tiled `.blk` backgrounds, `.dta` bitmap fonts and
//! photo albums are all decoded into a [`SpriteCollection`](prelude::SpriteCollection)
//! and encoded back.
//!
pub use nornspr_internal::*;

#[cfg(all(feature = "dynamic_linking", not(target_family = "wasm")))]
#[allow(unused_imports)]
use nornspr_dylib;
