//! Historical `.spr` layouts. All of them decode to read-only collections.

use crate::file::spr::{constants, read_at_offset, read_indexed};
use crate::file::{ByteReader, FormatError, Frame, Palette, SpriteCollection, SpriteFormat};

fn read_only(frames: Vec<Frame>) -> SpriteCollection {
	SpriteCollection::from_frames(frames).with_read_only(true)
}

/// Decodes the prototype layout: u16 offsets with u8 dimensions, rows top to bottom.
pub fn decode_prototype(data: &[u8], palette: &Palette) -> Result<SpriteCollection, FormatError> {
	let mut reader = ByteReader::new(data);
	let count = usize::from(reader.read_u16()?);

	let mut entries = Vec::with_capacity(count);
	for _ in 0..count {
		let offset = usize::from(reader.read_u16()?);
		let width = u32::from(reader.read_u8()?);
		let height = u32::from(reader.read_u8()?);
		entries.push((offset, width, height));
	}
	let table_end = reader.position();
	let frames = entries
		.into_iter()
		.map(|(offset, width, height)| {
			read_at_offset(&mut reader, palette, table_end, offset, width, height)
		})
		.collect::<Result<Vec<_>, _>>()?;
	Ok(read_only(frames))
}

/// Decodes the single-width layout.
///
/// After the u16 count and an unused u32, each frame is a u16 width, a u16 height and its
/// index bytes with the bottom row first.
pub fn decode_single_width(data: &[u8], palette: &Palette) -> Result<SpriteCollection, FormatError> {
	let mut reader = ByteReader::new(data);
	let count = reader.read_u16()?;
	reader.seek(constants::LEGACY_HEADER_SIZE)?;

	let mut frames = Vec::with_capacity(usize::from(count));
	for _ in 0..count {
		let width = u32::from(reader.read_u16()?);
		let height = u32::from(reader.read_u16()?);
		frames.push(read_indexed(&mut reader, palette, width, height, width, true)?);
	}
	Ok(read_only(frames))
}

/// Decodes the double-width layout.
///
/// After the u16 count and an unused u32, each frame is a u32 padded row width, a u32
/// height, a u16 visible width and `padded_width * height` index bytes with the bottom row
/// first. Only the first `width` bytes of each row are kept.
pub fn decode_double_width(data: &[u8], palette: &Palette) -> Result<SpriteCollection, FormatError> {
	let mut reader = ByteReader::new(data);
	read_double_width(&mut reader, palette).map(read_only)
}

/// Decodes a multi-sprite container: a u16 count and an unused u32 followed by that many
/// double-width archives, whose frames are concatenated in order.
pub fn decode_multi_sprite(data: &[u8], palette: &Palette) -> Result<SpriteCollection, FormatError> {
	let mut reader = ByteReader::new(data);
	let count = reader.read_u16()?;
	reader.seek(constants::LEGACY_HEADER_SIZE)?;

	let mut frames = Vec::new();
	for _ in 0..count {
		frames.extend(read_double_width(&mut reader, palette)?);
	}
	Ok(read_only(frames))
}

fn read_double_width(
	reader: &mut ByteReader<'_>,
	palette: &Palette,
) -> Result<Vec<Frame>, FormatError> {
	let count = reader.read_u16()?;
	reader.skip(4)?;

	let mut frames = Vec::with_capacity(usize::from(count));
	for _ in 0..count {
		let padded_width = reader.read_u32()?;
		let height = reader.read_u32()?;
		let width = u32::from(reader.read_u16()?);
		if height > u32::from(u16::MAX) {
			return Err(FormatError::invalid(SpriteFormat::Spr, format!("invalid height {height}")));
		}
		frames.push(read_indexed(reader, palette, width, height, padded_width, true)?);
	}
	Ok(frames)
}
