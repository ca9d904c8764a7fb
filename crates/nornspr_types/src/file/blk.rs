//! `.blk` tiled background archives.
//!
//! # File Structure
//!
//! - **Header:** pixel format tag (u32, 0 = 555, 1 = 565), grid columns (u16), grid rows (u16),
//!   tile count (u16)
//! - **Tile headers:** per tile, data offset minus 4 (u32), width (u16), height (u16)
//! - **Data:** 128x128 packed pixels (u16) per tile, row-major
//!
//! Tiles are stored column-major: tile `bx * rows + by` covers the 128x128 block at column
//! `bx`, row `by` of the composite image. A tag above 1 marks a byte-swapped file; swapping the
//! tag back gives its pixel format.

use log::debug;

use crate::file::{
	ByteReader, ByteWriter, Endian, FormatError, Frame, Layout, PixelFormat, SpriteCollection,
	SpriteFormat,
};

/// BLK file constants.
pub mod constants {
	/// Size of the file header (tag u32, cols u16, rows u16, count u16)
	pub const HEADER_SIZE: usize = 10;

	/// Size of a tile header entry (offset u32, width u16, height u16)
	pub const ENTRY_SIZE: usize = 8;

	/// Width and height of every tile
	pub const TILE_SIZE: u32 = 128;

	/// Size of one tile's pixel data
	pub const TILE_BYTES: usize = (TILE_SIZE * TILE_SIZE * 2) as usize;

	/// Difference between a tile's real data offset and the value stored in its header
	pub const OFFSET_BIAS: u32 = 4;

	/// Tag for 555 pixels
	pub const TAG_555: u32 = 0;

	/// Tag for 565 pixels
	pub const TAG_565: u32 = 1;
}

use constants::TILE_SIZE;

/// Decodes a `.blk` archive into a background collection.
///
/// A tile count that disagrees with `cols * rows` is kept as-is; see
/// [`SpriteCollection::is_grid_consistent`].
pub fn decode(data: &[u8]) -> Result<SpriteCollection, FormatError> {
	let mut reader = ByteReader::new(data);
	let mut tag = reader.read_u32()?;
	if tag > constants::TAG_565 {
		reader.set_endian(Endian::Big);
		tag = tag.swap_bytes();
	}
	let pixel_format = match tag {
		constants::TAG_555 => PixelFormat::Rgb555,
		constants::TAG_565 => PixelFormat::Rgb565,
		_ => {
			return Err(FormatError::invalid(SpriteFormat::Blk, format!("unknown pixel format tag {tag:#x}")));
		}
	};
	let cols = reader.read_u16()?;
	let rows = reader.read_u16()?;
	let count = reader.read_u16()?;

	let mut offsets = Vec::with_capacity(usize::from(count));
	for _ in 0..count {
		let offset = reader.read_u32()?.saturating_add(constants::OFFSET_BIAS) as usize;
		let width = u32::from(reader.read_u16()?);
		let height = u32::from(reader.read_u16()?);
		if width != TILE_SIZE || height != TILE_SIZE {
			return Err(FormatError::UnsupportedSize {
				format: SpriteFormat::Blk,
				width,
				height,
			});
		}
		offsets.push(offset);
	}

	let mut frames = Vec::with_capacity(offsets.len());
	for offset in offsets {
		reader.seek(offset)?;
		let mut pixels = Vec::with_capacity((TILE_SIZE * TILE_SIZE) as usize);
		for _ in 0..TILE_SIZE * TILE_SIZE {
			pixels.push(pixel_format.decode(reader.read_u16()?));
		}
		frames.push(Frame::from_pixels(TILE_SIZE, TILE_SIZE, pixels)?);
	}

	let collection = SpriteCollection::background(frames, cols, rows).with_pixel_format(pixel_format);
	if !collection.is_grid_consistent() {
		debug!("BLK grid {cols}x{rows} does not match {} tiles", collection.len());
	}
	Ok(collection)
}

/// Slices one image into a column-major grid of 128x128 tiles.
///
/// The grid is `ceil(width / 128)` by `ceil(height / 128)`; pixels past the image edge are
/// transparent.
pub fn tile_frame(frame: &Frame) -> Result<SpriteCollection, FormatError> {
	if frame.is_empty() {
		return Err(FormatError::invalid(SpriteFormat::Blk, format!("empty {frame}")));
	}
	let too_large = || FormatError::UnsupportedSize {
		format: SpriteFormat::Blk,
		width: frame.width(),
		height: frame.height(),
	};
	let cols = u16::try_from(frame.width().div_ceil(TILE_SIZE)).map_err(|_| too_large())?;
	let rows = u16::try_from(frame.height().div_ceil(TILE_SIZE)).map_err(|_| too_large())?;

	let mut tiles = Vec::with_capacity(usize::from(cols) * usize::from(rows));
	for bx in 0..u32::from(cols) {
		for by in 0..u32::from(rows) {
			tiles.push(frame.crop(bx * TILE_SIZE, by * TILE_SIZE, TILE_SIZE, TILE_SIZE));
		}
	}
	Ok(SpriteCollection::background(tiles, cols, rows))
}

/// Encodes a collection as a little-endian `.blk` archive.
///
/// A collection holding a single frame larger than one tile is sliced with [`tile_frame`]
/// first. A strip holding a single tile is written as a 1x1 grid.
///
/// # Errors
///
/// - [`FormatError::DimensionMismatch`] if the frame count differs from `cols * rows`
/// - [`FormatError::UnsupportedSize`] if any frame is not 128x128
/// - [`FormatError::InvalidInput`] for a multi-frame strip, which has no grid, or a
///   [`PixelFormat::BigEndian555`] collection
pub fn encode(collection: &SpriteCollection) -> Result<Vec<u8>, FormatError> {
	let tag = match collection.pixel_format {
		PixelFormat::Rgb555 => constants::TAG_555,
		PixelFormat::Rgb565 => constants::TAG_565,
		PixelFormat::BigEndian555 => {
			return Err(FormatError::invalid(SpriteFormat::Blk, "only 555 and 565 pixels can be stored"));
		}
	};

	let tiled;
	let (frames, cols, rows) = match (collection.layout, collection.frames.as_slice()) {
		(_, [single]) if single.width() > TILE_SIZE || single.height() > TILE_SIZE => {
			tiled = tile_frame(single)?;
			debug!("tiled {single} into {} BLK tiles", tiled.len());
			let Layout::Background {
				cols,
				rows,
			} = tiled.layout
			else {
				return Err(FormatError::invalid(SpriteFormat::Blk, "tiling produced no grid"));
			};
			(tiled.frames.as_slice(), cols, rows)
		}
		(
			Layout::Background {
				cols,
				rows,
			},
			frames,
		) => (frames, cols, rows),
		(Layout::Strip, frames @ [_]) => (frames, 1, 1),
		(Layout::Strip, frames) => {
			return Err(FormatError::invalid(
				SpriteFormat::Blk,
				format!("{} frames without a background grid", frames.len()),
			));
		}
	};

	let expected = usize::from(cols) * usize::from(rows);
	if frames.len() != expected {
		return Err(FormatError::DimensionMismatch {
			expected,
			actual: frames.len(),
		});
	}
	if let Some(frame) = frames.iter().find(|f| f.width() != TILE_SIZE || f.height() != TILE_SIZE) {
		return Err(FormatError::UnsupportedSize {
			format: SpriteFormat::Blk,
			width: frame.width(),
			height: frame.height(),
		});
	}
	let count = u16::try_from(frames.len())
		.map_err(|_| FormatError::invalid(SpriteFormat::Blk, format!("too many tiles: {}", frames.len())))?;

	let table_size = constants::HEADER_SIZE + constants::ENTRY_SIZE * frames.len();
	let total = table_size + constants::TILE_BYTES * frames.len();

	let mut writer = ByteWriter::with_capacity(total);
	writer.write_u32(tag)?;
	writer.write_u16(cols)?;
	writer.write_u16(rows)?;
	writer.write_u16(count)?;
	for i in 0..frames.len() {
		let offset = table_size + i * constants::TILE_BYTES;
		writer.write_u32(offset as u32 - constants::OFFSET_BIAS)?;
		writer.write_u16(TILE_SIZE as u16)?;
		writer.write_u16(TILE_SIZE as u16)?;
	}
	for pixel in frames.iter().flat_map(Frame::pixels) {
		writer.write_u16(collection.pixel_format.encode(*pixel))?;
	}
	writer.finish()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::file::Pixel;

	fn gradient(width: u32, height: u32) -> Frame {
		let mut frame = Frame::new(width, height);
		for y in 0..height {
			for x in 0..width {
				frame.set(x, y, Pixel::rgb((x % 32 * 8) as u8, (y % 64 * 4) as u8, 0x80));
			}
		}
		frame
	}

	#[test]
	fn test_tile_256x256_gives_2x2_grid() {
		let image = gradient(256, 256);
		let tiled = tile_frame(&image).unwrap();
		assert_eq!(tiled.len(), 4);
		assert_eq!(
			tiled.layout,
			Layout::Background {
				cols: 2,
				rows: 2
			}
		);
		// column-major: tile 1 is column 0, row 1
		assert_eq!(tiled.frames[1].get(0, 0), image.get(0, 128));
		assert_eq!(tiled.frames[2].get(0, 0), image.get(128, 0));
	}

	#[test]
	fn test_tile_pads_with_transparent() {
		let tiled = tile_frame(&gradient(130, 10)).unwrap();
		assert_eq!(
			tiled.layout,
			Layout::Background {
				cols: 2,
				rows: 1
			}
		);
		let edge = &tiled.frames[1];
		assert!(!edge.get(1, 9).unwrap().is_transparent());
		assert!(edge.get(2, 0).unwrap().is_transparent());
		assert!(edge.get(0, 10).unwrap().is_transparent());
	}

	#[test]
	fn test_encode_single_large_frame() {
		let collection = SpriteCollection::from_frames(vec![gradient(256, 256)]);
		let bytes = encode(&collection).unwrap();
		assert_eq!(&bytes[4..10], &[2, 0, 2, 0, 4, 0]);
		assert_eq!(bytes.len(), 10 + 4 * 8 + 4 * constants::TILE_BYTES);

		let decoded = decode(&bytes).unwrap();
		assert_eq!(decoded.len(), 4);
		assert_eq!(
			decoded.layout,
			Layout::Background {
				cols: 2,
				rows: 2
			}
		);
	}

	#[test]
	fn test_header_offsets_are_biased() {
		let collection =
			SpriteCollection::background(vec![Frame::filled(128, 128, Pixel::gray(8)); 2], 1, 2);
		let bytes = encode(&collection).unwrap();
		let table_size = 10 + 2 * 8;
		assert_eq!(&bytes[10..14], &((table_size - 4) as u32).to_le_bytes());
		assert_eq!(&bytes[14..18], &[128, 0, 128, 0]);
		assert_eq!(&bytes[18..22], &((table_size + constants::TILE_BYTES - 4) as u32).to_le_bytes());
	}

	#[test]
	fn test_round_trip() {
		for pixel_format in [PixelFormat::Rgb555, PixelFormat::Rgb565] {
			let tiles = (0..6)
				.map(|i| {
					Frame::filled(128, 128, pixel_format.truncate(Pixel::rgb(i * 40, 255 - i * 40, 0x55)))
				})
				.collect();
			let collection = SpriteCollection::background(tiles, 3, 2).with_pixel_format(pixel_format);
			assert_eq!(decode(&encode(&collection).unwrap()).unwrap(), collection);
		}
	}

	#[test]
	fn test_encode_validation() {
		let tile = Frame::new(128, 128);
		let short = SpriteCollection::background(vec![tile.clone(); 3], 2, 2);
		assert!(matches!(
			encode(&short),
			Err(FormatError::DimensionMismatch {
				expected: 4,
				actual: 3
			})
		));

		let odd = SpriteCollection::background(vec![tile.clone(), Frame::new(64, 128)], 2, 1);
		assert!(matches!(
			encode(&odd),
			Err(FormatError::UnsupportedSize {
				width: 64,
				height: 128,
				..
			})
		));

		let small = SpriteCollection::from_frames(vec![Frame::new(100, 100)]);
		assert!(matches!(encode(&small), Err(FormatError::UnsupportedSize { .. })));

		let strip = SpriteCollection::from_frames(vec![tile.clone(), tile]);
		assert!(matches!(encode(&strip), Err(FormatError::InvalidInput { .. })));
	}

	#[test]
	fn test_decode_keeps_inconsistent_grid() {
		let collection = SpriteCollection::background(vec![Frame::new(128, 128); 2], 2, 1);
		let mut bytes = encode(&collection).unwrap();
		// claim a 3x1 grid
		bytes[4] = 3;
		let decoded = decode(&bytes).unwrap();
		assert_eq!(decoded.len(), 2);
		assert!(!decoded.is_grid_consistent());
	}

	#[test]
	fn test_big_endian_sentinel() {
		let mut bytes = vec![0, 0, 0, 1, 0, 1, 0, 1, 0, 1, 0, 0, 0, 14, 0, 128, 0, 128];
		for _ in 0..TILE_SIZE * TILE_SIZE {
			bytes.extend(0xF800u16.to_be_bytes());
		}
		let decoded = decode(&bytes).unwrap();
		assert_eq!(decoded.pixel_format, PixelFormat::Rgb565);
		assert_eq!(decoded.frames[0].get(127, 127), Some(Pixel::rgb(0xF8, 0, 0)));
	}

	#[test]
	fn test_decode_rejects_non_tile_size() {
		let mut bytes = encode(&SpriteCollection::from_frames(vec![Frame::new(128, 128)])).unwrap();
		bytes[14] = 64;
		assert!(matches!(
			decode(&bytes),
			Err(FormatError::UnsupportedSize {
				width: 64,
				height: 128,
				..
			})
		));
	}
}
