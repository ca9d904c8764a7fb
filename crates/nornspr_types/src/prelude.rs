//! Prelude module for `nornspr_types`.
//!
//! This module provides a convenient way to import commonly used types, traits, and constants.
//!
//! # Examples
//!
//! ```no_run
//! use nornspr_types::prelude::*;
//!
//! // Now you can use all common types directly
//! let palette = Palette::creatures();
//! let tiles = SpriteCollection::background(vec![Frame::new(128, 128); 4], 2, 2);
//! let bytes = SpriteFormat::Blk.encode(&tiles, &palette);
//! ```

// File module types
#[doc(inline)]
pub use crate::file::{
	// Frames and collections
	CollectionInfo,
	Frame,
	Layout,
	SpriteCollection,

	// Colours
	Palette,
	PaletteHandle,
	Pixel,
	PixelFormat,

	// Dispatch and errors
	FormatError,
	SpriteFormat,

	// Format specific types
	FontLayout,
	Photo,
	SheetOrder,
	SprLayout,
};

// Re-export the file module for advanced usage
#[doc(inline)]
pub use crate::file;
