//! Prelude module for `nornspr_internal`.
//!
//! This module provides a convenient way to import commonly used types and traits.
//!
//! # Examples
//!
//! ```rust
//! use nornspr_internal::prelude::*;
//!
//! // Now you can use all common types directly
//! let palette = Palette::creatures();
//! let mut frame = Frame::new(2, 2);
//! frame.set(0, 0, palette.lookup(11));
//! let sprites = SpriteCollection::from_frames(vec![frame]);
//! let bytes = SpriteFormat::Spr.encode(&sprites, &palette).unwrap();
//! assert_eq!(&bytes[..2], &1u16.to_le_bytes());
//! ```

// Re-export everything from nornspr_types::prelude
#[doc(inline)]
pub use nornspr_types::prelude::*;

// Re-export the entire nornspr_types module for advanced usage
#[doc(inline)]
pub use nornspr_types;
