//! This module is separated into its own crate to enable simple dynamic linking for `nornspr`, and should not be used directly.

/// `use nornspr_rs::prelude::*;` to import commonly used items.
pub mod prelude;

// Re-export nornspr_types for convenience
pub use nornspr_types;

// Re-export commonly used types at crate root
pub use nornspr_types::file::{
	FormatError, Frame, Layout, Palette, PaletteHandle, Pixel, PixelFormat, SpriteCollection,
	SpriteFormat,
};
