//! `.s16` uncompressed 16-bit archives.
//!
//! # File Structure
//!
//! - **Header:** pixel format tag (u32, 0 = 555, 1 = 565), image count (u16)
//! - **Image headers:** per image, data offset (u32), width (u16), height (u16)
//! - **Data:** one packed pixel (u16) per pixel, row-major, top to bottom
//!
//! There is no transparency channel: pure black is read back as transparent, and transparent
//! pixels are written as black. A tag above 1 marks a byte-swapped file whose pixels use the
//! big-endian 555 layout, the same layout `.m16` files use.

use crate::file::{
	ByteReader, ByteWriter, Endian, FormatError, Frame, Pixel, PixelFormat, SpriteCollection,
	SpriteFormat,
};

/// S16 file constants.
pub mod constants {
	/// Size of the file header (tag u32, count u16)
	pub const HEADER_SIZE: usize = 6;

	/// Size of an image header entry (offset u32, width u16, height u16)
	pub const ENTRY_SIZE: usize = 8;

	/// Tag for 555 pixels
	pub const TAG_555: u32 = 0;

	/// Tag for 565 pixels
	pub const TAG_565: u32 = 1;
}

/// Decodes a `.s16` archive.
pub fn decode(data: &[u8]) -> Result<SpriteCollection, FormatError> {
	let mut reader = ByteReader::new(data);
	let tag = reader.read_u32()?;
	let pixel_format = match tag {
		constants::TAG_555 => PixelFormat::Rgb555,
		constants::TAG_565 => PixelFormat::Rgb565,
		_ => {
			reader.set_endian(Endian::Big);
			PixelFormat::BigEndian555
		}
	};
	read_images(&mut reader, SpriteFormat::S16, pixel_format)
}

/// Reads the image count, image headers and pixel data that follow the tag.
pub(crate) fn read_images(
	reader: &mut ByteReader<'_>,
	format: SpriteFormat,
	pixel_format: PixelFormat,
) -> Result<SpriteCollection, FormatError> {
	let count = reader.read_u16()?;
	let mut headers = Vec::with_capacity(usize::from(count));
	for _ in 0..count {
		let offset = reader.read_u32()? as usize;
		let width = u32::from(reader.read_u16()?);
		let height = u32::from(reader.read_u16()?);
		if width == 0 || height == 0 {
			return Err(FormatError::invalid(format, format!("empty {width}x{height} image")));
		}
		headers.push((offset, width, height));
	}

	let mut frames = Vec::with_capacity(headers.len());
	for (offset, width, height) in headers {
		reader.seek(offset)?;
		let area = width as usize * height as usize;
		// the whole pixel block must be present before anything is allocated
		let mut data = ByteReader::new(reader.take(area * 2)?);
		data.set_endian(reader.endian());
		let mut pixels = Vec::with_capacity(area);
		for _ in 0..area {
			let pixel = pixel_format.decode(data.read_u16()?);
			pixels.push(if pixel.is_black() {
				Pixel::transparent()
			} else {
				pixel
			});
		}
		frames.push(Frame::from_pixels(width, height, pixels)?);
	}

	Ok(SpriteCollection::from_frames(frames).with_pixel_format(pixel_format))
}

/// Encodes a collection as a `.s16` archive using its pixel format.
///
/// A [`PixelFormat::BigEndian555`] collection is written byte-swapped with tag 1, which
/// [`decode`] recognizes as big-endian.
///
/// # Errors
///
/// Fails with [`FormatError::InvalidInput`] for an empty frame or more than 65535 frames,
/// and [`FormatError::UnsupportedSize`] for a frame side above 65535.
pub fn encode(collection: &SpriteCollection) -> Result<Vec<u8>, FormatError> {
	let (tag, endian) = match collection.pixel_format {
		PixelFormat::Rgb555 => (constants::TAG_555, Endian::Little),
		PixelFormat::Rgb565 => (constants::TAG_565, Endian::Little),
		PixelFormat::BigEndian555 => (constants::TAG_565, Endian::Big),
	};
	write_images(collection, SpriteFormat::S16, tag, endian, collection.pixel_format)
}

/// Writes the header, image headers and raw pixels packed as `pixel_format`.
pub(crate) fn write_images(
	collection: &SpriteCollection,
	format: SpriteFormat,
	tag: u32,
	endian: Endian,
	pixel_format: PixelFormat,
) -> Result<Vec<u8>, FormatError> {
	let count = collection.count_u16(format)?;
	let mut sizes = Vec::with_capacity(collection.len());
	for frame in collection {
		sizes.push(frame.dimensions_u16(format)?);
	}

	let table_size = constants::HEADER_SIZE + constants::ENTRY_SIZE * collection.len();
	let data_size: usize = sizes.iter().map(|(w, h)| usize::from(*w) * usize::from(*h) * 2).sum();
	let total = table_size + data_size;
	if u32::try_from(total).is_err() {
		return Err(FormatError::invalid(format, "archive exceeds 4 GiB"));
	}

	let mut writer = ByteWriter::with_capacity(total).with_endian(endian);
	writer.write_u32(tag)?;
	writer.write_u16(count)?;
	let mut offset = table_size;
	for (width, height) in &sizes {
		writer.write_u32(offset as u32)?;
		writer.write_u16(*width)?;
		writer.write_u16(*height)?;
		offset += usize::from(*width) * usize::from(*height) * 2;
	}
	for pixel in collection.iter().flat_map(Frame::pixels) {
		let value = if pixel.is_transparent() {
			0
		} else {
			pixel_format.encode(*pixel)
		};
		writer.write_u16(value)?;
	}
	writer.finish()
}
