//! Archive format support for `nornspr-rs`.

mod error;
mod frame;
mod palette;
mod pixel;
mod stream;

pub mod blk;
pub mod c16;
pub mod dta;
pub mod format;
pub mod m16;
pub mod photo_album;
pub mod s16;
pub mod spr;
pub mod spritesheet;

// Re-export unified error type
pub use error::FormatError;

// Re-export the shared building blocks
pub use format::{NAMED_BACKGROUNDS, SpriteFormat, named_background};
pub use frame::{CollectionInfo, Frame, Layout, SpriteCollection};
pub use palette::{
	PALETTE_FILE_SIZE, PALETTE_SIZE, Palette, PaletteHandle, RESERVED_COLORS, RESERVED_START,
};
pub use pixel::{Pixel, PixelFormat, decode_packed16, encode_packed16};
pub use stream::{ByteReader, ByteWriter, Endian};

// Re-export format specific types
pub use dta::FontLayout;
pub use photo_album::{AlbumLayout, Photo};
pub use spr::SprLayout;
pub use spritesheet::Order as SheetOrder;
