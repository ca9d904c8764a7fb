//! `.dta` bitmap font (charset) archives.
//!
//! # File Structure
//!
//! The file has no header. Its total size selects one of four layouts:
//!
//! | Size  | Cell  | Glyphs | Widths |
//! |-------|-------|--------|--------|
//! | 4096  | 4x8   | 128    | fixed  |
//! | 9472  | 6x12  | 128    | u16    |
//! | 17152 | 11x12 | 128    | u16    |
//! | 18944 | 6x12  | 256    | u16    |
//!
//! - **Glyph data:** one colour index (u8) per cell pixel, row-major, for every glyph
//! - **Widths:** for the variable-width layouts, one u16 per glyph after *all* glyph data
//!
//! Only the left `width` columns of a cell belong to the glyph. Colour indices map to a fixed
//! four-colour table: 0 transparent, 1 white, 2 gray, and 3 and above a dark blue filler.

use crate::file::{ByteReader, ByteWriter, FormatError, Frame, Pixel, SpriteCollection, SpriteFormat};

/// DTA file constants.
pub mod constants {
	use crate::file::Pixel;

	/// Colour of index 1
	pub const WHITE: Pixel = Pixel::rgb(255, 255, 255);

	/// Colour of index 2
	pub const GRAY: Pixel = Pixel::rgb(128, 128, 128);

	/// Colour of every index from 3 up
	pub const FILLER: Pixel = Pixel::rgb(0, 0, 128);
}

/// Geometry of one of the legal charset sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontLayout {
	/// Total file size in bytes
	pub file_size: usize,
	/// Cell width in pixels
	pub cell_width: u32,
	/// Cell height in pixels
	pub cell_height: u32,
	/// Number of glyphs
	pub glyph_count: usize,
	/// Whether a u16 width follows the glyph data for every glyph
	pub variable_width: bool,
}

impl FontLayout {
	/// Every legal layout, smallest file first.
	pub const ALL: [FontLayout; 4] = [
		FontLayout::new(4096, 4, 8),
		FontLayout::new(9472, 6, 12),
		FontLayout::new(17152, 11, 12),
		FontLayout::new(18944, 6, 12),
	];

	const fn new(file_size: usize, cell_width: u32, cell_height: u32) -> Self {
		let cell_len = (cell_width * cell_height) as usize;
		let variable_width = file_size != 4096;
		let glyph_count = if variable_width {
			file_size / (cell_len + 2)
		} else {
			file_size / cell_len
		};
		Self {
			file_size,
			cell_width,
			cell_height,
			glyph_count,
			variable_width,
		}
	}

	/// Looks up the layout for a file size.
	pub fn for_size(size: usize) -> Option<FontLayout> {
		Self::ALL.into_iter().find(|layout| layout.file_size == size)
	}

	/// Bytes of glyph data per glyph.
	pub const fn cell_len(&self) -> usize {
		(self.cell_width * self.cell_height) as usize
	}

	fn fits(&self, frames: &[Frame]) -> bool {
		frames.len() == self.glyph_count
			&& frames.iter().all(|frame| {
				let width_ok = if self.variable_width {
					frame.width() <= self.cell_width
				} else {
					frame.width() == self.cell_width
				};
				width_ok && frame.height() <= self.cell_height
			})
	}
}

/// Maps a charset colour index to its pixel.
pub const fn index_color(index: u8) -> Pixel {
	match index {
		0 => Pixel::transparent(),
		1 => constants::WHITE,
		2 => constants::GRAY,
		_ => constants::FILLER,
	}
}

/// Maps a pixel to the charset colour index it is stored as.
pub fn color_index(pixel: Pixel) -> u8 {
	if pixel.is_transparent() {
		0
	} else if pixel == constants::WHITE {
		1
	} else if pixel == constants::GRAY {
		2
	} else {
		3
	}
}

/// Decodes a `.dta` charset into one frame per glyph.
pub fn decode(data: &[u8]) -> Result<SpriteCollection, FormatError> {
	let layout = FontLayout::for_size(data.len()).ok_or_else(|| {
		FormatError::invalid(SpriteFormat::Dta, format!("{} bytes is not a charset size", data.len()))
	})?;

	let mut reader = ByteReader::new(data);
	let mut cells = Vec::with_capacity(layout.glyph_count);
	for _ in 0..layout.glyph_count {
		cells.push(reader.take(layout.cell_len())?);
	}

	let mut frames = Vec::with_capacity(layout.glyph_count);
	for (glyph, cell) in cells.into_iter().enumerate() {
		let width = if layout.variable_width {
			u32::from(reader.read_u16()?)
		} else {
			layout.cell_width
		};
		if width > layout.cell_width {
			return Err(FormatError::invalid(
				SpriteFormat::Dta,
				format!("glyph {glyph} is {width} wide in a {} wide cell", layout.cell_width),
			));
		}

		let pixels = cell
			.chunks_exact(layout.cell_width as usize)
			.flat_map(|row| row[..width as usize].iter().map(|index| index_color(*index)))
			.collect();
		frames.push(Frame::from_pixels(width, layout.cell_height, pixels)?);
	}

	Ok(SpriteCollection::from_frames(frames))
}

/// Encodes glyph frames as a `.dta` charset.
///
/// The smallest layout whose glyph count matches and whose cell fits every glyph is chosen.
/// The 4096 byte layout stores no widths, so it is only picked when every glyph is exactly
/// four pixels wide. Glyphs shorter than the cell are padded with transparent rows.
pub fn encode(collection: &SpriteCollection) -> Result<Vec<u8>, FormatError> {
	let layout =
		FontLayout::ALL.into_iter().find(|layout| layout.fits(&collection.frames)).ok_or_else(|| {
			FormatError::invalid(
				SpriteFormat::Dta,
				format!("no charset layout holds {} glyphs of these sizes", collection.len()),
			)
		})?;

	let mut writer = ByteWriter::with_capacity(layout.file_size);
	for frame in collection {
		let mut cell = vec![0u8; layout.cell_len()];
		for (y, row) in frame.rows().enumerate() {
			let start = y * layout.cell_width as usize;
			for (slot, pixel) in cell[start..].iter_mut().zip(row) {
				*slot = color_index(*pixel);
			}
		}
		writer.write_bytes(&cell)?;
	}
	if layout.variable_width {
		for frame in collection {
			// fits() bounds every width by the cell width
			writer.write_u16(frame.width() as u16)?;
		}
	}
	writer.finish()
}
