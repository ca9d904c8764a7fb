//! `.m16` and `.n16` archives: the `.s16` layout stored big-endian.
//!
//! The header tag is always written as 1 and ignored on read. Pixels use the big-endian
//! 555 layout, and pure black is read back as transparent like `.s16`.

use crate::file::s16::{read_images, write_images};
use crate::file::{ByteReader, Endian, FormatError, PixelFormat, SpriteCollection, SpriteFormat};

/// Tag written to every `.m16` header.
pub const TAG: u32 = 1;

/// Decodes a `.m16` or `.n16` archive.
pub fn decode(data: &[u8]) -> Result<SpriteCollection, FormatError> {
	let mut reader = ByteReader::new(data);
	reader.set_endian(Endian::Big);
	let _tag = reader.read_u32()?;
	read_images(&mut reader, SpriteFormat::M16, PixelFormat::BigEndian555)
}

/// Encodes a collection as a `.m16` archive.
///
/// Pixels are always packed as [`PixelFormat::BigEndian555`], whatever the collection's
/// own pixel format.
pub fn encode(collection: &SpriteCollection) -> Result<Vec<u8>, FormatError> {
	write_images(collection, SpriteFormat::M16, TAG, Endian::Big, PixelFormat::BigEndian555)
}
