//! `.spr` palette-indexed sprite archives.
//!
//! # File Structure
//!
//! The standard layout is:
//! - **Header:** frame count (u16)
//! - **Frame table:** per frame, data offset (u32), width (u16), height (u16)
//! - **Data:** one palette index byte per pixel, row-major, top to bottom
//!
//! Older tools wrote four more layouts under the same extension. They carry no version tag,
//! so [`decode`] tries every [`SprLayout`] in priority order and keeps the first one that
//! parses. Only the standard layout can be written back; collections decoded through any
//! other layout are flagged read-only.
//!
//! # Examples
//!
//! ```
//! use nornspr_types::file::{spr, Frame, Palette, SpriteCollection};
//!
//! # fn main() -> Result<(), nornspr_types::file::FormatError> {
//! let palette = Palette::creatures();
//! let mut frame = Frame::new(2, 1);
//! frame.set(1, 0, palette.lookup(200));
//!
//! let bytes = spr::encode(&SpriteCollection::from_frames(vec![frame.clone()]), &palette)?;
//! assert_eq!(bytes, [1, 0, 10, 0, 0, 0, 2, 0, 1, 0, 0, 200]);
//!
//! let decoded = spr::decode(&bytes, &palette)?;
//! assert_eq!(decoded.frames, vec![frame]);
//! # Ok(())
//! # }
//! ```

use std::fmt;

use log::debug;

use crate::file::{
	ByteReader, ByteWriter, FormatError, Frame, Palette, SpriteCollection, SpriteFormat,
};

mod legacy;


pub use legacy::{decode_double_width, decode_multi_sprite, decode_prototype, decode_single_width};

/// SPR file constants.
pub mod constants {
	/// Size of the file header (frame count)
	pub const HEADER_SIZE: usize = 2;

	/// Size of a standard frame table entry (offset u32, width u16, height u16)
	pub const ENTRY_SIZE: usize = 8;

	/// Size of a prototype frame table entry (offset u16, width u8, height u8)
	pub const PROTOTYPE_ENTRY_SIZE: usize = 4;

	/// Size of the header shared by the offset-less legacy layouts (count u16, unused u32)
	pub const LEGACY_HEADER_SIZE: usize = 6;
}

/// Header layouts found in `.spr` files, in the order [`decode`] tries them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SprLayout {
	/// Offset table with u32 offsets and u16 dimensions
	Standard,

	/// Offset table with u16 offsets and u8 dimensions
	Prototype,

	/// No offset table; each frame carries its own u16 dimensions and rows are stored
	/// bottom to top
	SingleWidth,

	/// No offset table; each frame carries a u32 padded row width, u32 height and u16
	/// visible width, rows bottom to top
	DoubleWidth,

	/// Several double-width archives back to back
	MultiSprite,
}

impl SprLayout {
	/// All layouts in decode priority order.
	pub const ALL: [SprLayout; 5] = [
		SprLayout::Standard,
		SprLayout::Prototype,
		SprLayout::SingleWidth,
		SprLayout::DoubleWidth,
		SprLayout::MultiSprite,
	];

	/// Short lowercase name used in error reports.
	pub const fn name(self) -> &'static str {
		match self {
			SprLayout::Standard => "standard",
			SprLayout::Prototype => "prototype",
			SprLayout::SingleWidth => "single-width",
			SprLayout::DoubleWidth => "double-width",
			SprLayout::MultiSprite => "multi-sprite",
		}
	}

	/// Decodes `data` assuming this layout.
	pub fn decode(self, data: &[u8], palette: &Palette) -> Result<SpriteCollection, FormatError> {
		match self {
			SprLayout::Standard => decode_standard(data, palette),
			SprLayout::Prototype => decode_prototype(data, palette),
			SprLayout::SingleWidth => decode_single_width(data, palette),
			SprLayout::DoubleWidth => decode_double_width(data, palette),
			SprLayout::MultiSprite => decode_multi_sprite(data, palette),
		}
	}
}

impl fmt::Display for SprLayout {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// Decodes an `.spr` archive, trying every known layout.
///
/// The first layout that parses without error wins. A layout that fails is logged at debug
/// level and the next one is tried.
///
/// # Errors
///
/// Returns [`FormatError::UnrecognizedFormat`] listing every attempt if none succeeds.
pub fn decode(data: &[u8], palette: &Palette) -> Result<SpriteCollection, FormatError> {
	decode_with_layout(data, palette).map(|(collection, _)| collection)
}

/// Like [`decode`], but also reports which layout matched.
pub fn decode_with_layout(
	data: &[u8],
	palette: &Palette,
) -> Result<(SpriteCollection, SprLayout), FormatError> {
	let mut attempts = Vec::with_capacity(SprLayout::ALL.len());
	for layout in SprLayout::ALL {
		match layout.decode(data, palette) {
			Ok(collection) => {
				debug!("decoded {} SPR frames as {layout} layout", collection.len());
				return Ok((collection, layout));
			}
			Err(err) => {
				debug!("SPR {layout} layout rejected: {err}");
				attempts.push((layout.name(), err));
			}
		}
	}
	Err(FormatError::UnrecognizedFormat {
		format: SpriteFormat::Spr,
		attempts,
	})
}

/// Decodes the standard layout only.
///
/// Every offset must point past the frame table and have its whole frame inside the buffer;
/// pixel data is read from the offset.
pub fn decode_standard(data: &[u8], palette: &Palette) -> Result<SpriteCollection, FormatError> {
	let mut reader = ByteReader::new(data);
	let count = usize::from(reader.read_u16()?);

	let mut entries = Vec::with_capacity(count);
	for _ in 0..count {
		let offset = reader.read_u32()? as usize;
		let width = reader.read_u16()?;
		let height = reader.read_u16()?;
		entries.push((offset, u32::from(width), u32::from(height)));
	}

	let table_end = reader.position();
	let frames = entries
		.into_iter()
		.map(|(offset, width, height)| {
			read_at_offset(&mut reader, palette, table_end, offset, width, height)
		})
		.collect::<Result<Vec<_>, _>>()?;

	Ok(SpriteCollection::from_frames(frames))
}

/// Reads one top-down indexed frame from a table offset.
pub(crate) fn read_at_offset(
	reader: &mut ByteReader<'_>,
	palette: &Palette,
	table_end: usize,
	offset: usize,
	width: u32,
	height: u32,
) -> Result<Frame, FormatError> {
	if offset < table_end {
		return Err(FormatError::invalid(
			SpriteFormat::Spr,
			format!("frame offset {offset} points into the header (ends at {table_end})"),
		));
	}
	reader.seek(offset)?;
	read_indexed(reader, palette, width, height, width, false)
}

/// Reads `height` rows of `padded_width` index bytes, keeping the first `width` of each.
pub(crate) fn read_indexed(
	reader: &mut ByteReader<'_>,
	palette: &Palette,
	width: u32,
	height: u32,
	padded_width: u32,
	bottom_up: bool,
) -> Result<Frame, FormatError> {
	if width == 0 || height == 0 {
		return Err(FormatError::invalid(SpriteFormat::Spr, format!("empty {width}x{height} frame")));
	}
	if padded_width < width {
		return Err(FormatError::invalid(
			SpriteFormat::Spr,
			format!("padded width {padded_width} is narrower than width {width}"),
		));
	}

	let row_len = padded_width as usize;
	let data = reader.take(row_len.saturating_mul(height as usize))?;
	let mut frame = Frame::new(width, height);
	for (row_index, row) in data.chunks_exact(row_len).enumerate() {
		let y = if bottom_up {
			height - 1 - row_index as u32
		} else {
			row_index as u32
		};
		for (x, index) in row[..width as usize].iter().enumerate() {
			frame.set(x as u32, y, palette.lookup(*index));
		}
	}
	Ok(frame)
}

/// Encodes a collection in the standard layout.
///
/// Transparent pixels become index 0 and all other pixels the nearest palette colour.
///
/// # Errors
///
/// Fails with [`FormatError::InvalidInput`] for an empty frame or more than 65535 frames,
/// and [`FormatError::UnsupportedSize`] for a frame side above 65535.
pub fn encode(collection: &SpriteCollection, palette: &Palette) -> Result<Vec<u8>, FormatError> {
	let count = collection.count_u16(SpriteFormat::Spr)?;
	let mut sizes = Vec::with_capacity(collection.len());
	for frame in collection {
		sizes.push(frame.dimensions_u16(SpriteFormat::Spr)?);
	}

	let table_size = constants::HEADER_SIZE + constants::ENTRY_SIZE * collection.len();
	let data_size: usize = sizes.iter().map(|(w, h)| usize::from(*w) * usize::from(*h)).sum();
	let total = table_size + data_size;
	if u32::try_from(total).is_err() {
		return Err(FormatError::invalid(SpriteFormat::Spr, "archive exceeds 4 GiB"));
	}

	let mut writer = ByteWriter::with_capacity(total);
	writer.write_u16(count)?;
	let mut offset = table_size;
	for (width, height) in &sizes {
		writer.write_u32(offset as u32)?;
		writer.write_u16(*width)?;
		writer.write_u16(*height)?;
		offset += usize::from(*width) * usize::from(*height);
	}
	for frame in collection {
		for pixel in frame.pixels() {
			writer.write_u8(palette.quantize(*pixel))?;
		}
	}
	writer.finish()
}
