//! `.c16` run-length encoded 16-bit archives.
//!
//! # File Structure
//!
//! - **Header:** pixel format tag (u32, 2 = 555, 3 = 565, bit 0 set for 565), image count (u16)
//! - **Image headers:** per image, the offset of its first scanline (u32), width (u16),
//!   height (u16), then `height - 1` more scanline offsets (u32). All offsets are absolute.
//! - **Scanlines:** a sequence of run headers, each followed by pixel data for colour runs,
//!   and a zero header ending the line. Every image ends with one more zero u16.
//!
//! A run header is a u16 whose bit 0 is the run type (0 transparent, 1 colour) and whose
//! upper 15 bits are the run length. A tag above 3 means the whole file is byte-swapped.

use crate::file::{
	ByteReader, ByteWriter, Endian, FormatError, Frame, Pixel, PixelFormat, SpriteCollection,
	SpriteFormat,
};

/// C16 file constants.
pub mod constants {
	/// Size of the file header (tag u32, count u16)
	pub const HEADER_SIZE: usize = 6;

	/// Tag for 555 pixels
	pub const TAG_555: u32 = 2;

	/// Tag for 565 pixels
	pub const TAG_565: u32 = 3;

	/// Tag bit set for 565 pixels
	pub const FLAG_565: u32 = 1;

	/// Largest length a single run header can hold
	pub const MAX_RUN: usize = 0x7FFF;

	/// Run type bit for colour runs
	pub const COLOR_RUN: u16 = 1;
}

/// Decodes a `.c16` archive.
pub fn decode(data: &[u8]) -> Result<SpriteCollection, FormatError> {
	let mut reader = ByteReader::new(data);
	let mut tag = reader.read_u32()?;
	if tag > constants::TAG_565 {
		reader.set_endian(Endian::Big);
		tag = tag.swap_bytes();
	}
	if tag > constants::TAG_565 {
		return Err(FormatError::invalid(SpriteFormat::C16, format!("unknown pixel format tag {tag}")));
	}
	// bit 0 picks the pixel layout; tags 0 and 1 come from early tools
	let pixel_format = if tag & constants::FLAG_565 != 0 {
		PixelFormat::Rgb565
	} else {
		PixelFormat::Rgb555
	};

	let count = reader.read_u16()?;
	let mut headers = Vec::with_capacity(usize::from(count));
	for _ in 0..count {
		let first = reader.read_u32()?;
		let width = reader.read_u16()?;
		let height = reader.read_u16()?;
		if width == 0 || height == 0 {
			return Err(FormatError::invalid(SpriteFormat::C16, format!("empty {width}x{height} image")));
		}
		let mut line_offsets = Vec::with_capacity(usize::from(height));
		line_offsets.push(first);
		for _ in 1..height {
			line_offsets.push(reader.read_u32()?);
		}
		headers.push((width, line_offsets));
	}

	let frames = headers
		.iter()
		.map(|(width, line_offsets)| read_image(&mut reader, *width, line_offsets, pixel_format))
		.collect::<Result<Vec<_>, _>>()?;

	Ok(SpriteCollection::from_frames(frames).with_pixel_format(pixel_format))
}

fn read_image(
	reader: &mut ByteReader<'_>,
	width: u16,
	line_offsets: &[u32],
	pixel_format: PixelFormat,
) -> Result<Frame, FormatError> {
	// every line needs at least one run header
	for offset in line_offsets {
		let offset = *offset as usize;
		if offset.saturating_add(2) > reader.len() {
			return Err(FormatError::OutOfBounds {
				offset,
				requested: 2,
				len: reader.len(),
			});
		}
	}

	let width = usize::from(width);
	let mut pixels = Vec::new();
	for offset in line_offsets {
		reader.seek(*offset as usize)?;
		let start = pixels.len();
		pixels.resize(start + width, Pixel::transparent());
		read_scanline(reader, &mut pixels[start..], pixel_format)?;
	}
	Frame::from_pixels(width as u32, line_offsets.len() as u32, pixels)
}

/// Decodes the runs of one scanline into `row`, which starts out transparent.
///
/// Stops once the row is full; the terminating zero header is not consumed.
fn read_scanline(
	reader: &mut ByteReader<'_>,
	row: &mut [Pixel],
	pixel_format: PixelFormat,
) -> Result<(), FormatError> {
	let mut x = 0;
	while x < row.len() {
		let header = reader.read_u16()?;
		let length = usize::from(header >> 1);
		if length == 0 {
			return Err(FormatError::invalid(
				SpriteFormat::C16,
				format!("scanline ends after {x} of {} pixels", row.len()),
			));
		}
		if x + length > row.len() {
			return Err(FormatError::invalid(
				SpriteFormat::C16,
				format!("run of {length} at x={x} overflows width {}", row.len()),
			));
		}
		if header & constants::COLOR_RUN != 0 {
			for pixel in &mut row[x..x + length] {
				*pixel = pixel_format.decode(reader.read_u16()?);
			}
		}
		x += length;
	}
	Ok(())
}

/// Run-length encodes one scanline, including its terminating zero header.
///
/// Transparent pixels accumulate into transparent runs and opaque pixels into colour runs;
/// a change of category flushes the open run. Runs longer than 32767 pixels are split.
pub fn encode_scanline(row: &[Pixel], pixel_format: PixelFormat) -> Vec<u16> {
	let mut words = Vec::with_capacity(row.len() + 2);
	let mut transparent_run = 0usize;
	let mut color_run: Vec<u16> = Vec::new();

	for pixel in row {
		if pixel.is_transparent() {
			flush_color_run(&mut words, &mut color_run);
			transparent_run += 1;
		} else {
			flush_transparent_run(&mut words, &mut transparent_run);
			color_run.push(pixel_format.encode(*pixel));
		}
	}
	if color_run.is_empty() {
		flush_transparent_run(&mut words, &mut transparent_run);
	} else {
		flush_color_run(&mut words, &mut color_run);
	}

	words.push(0);
	words
}

fn flush_transparent_run(words: &mut Vec<u16>, run: &mut usize) {
	while *run > 0 {
		let length = (*run).min(constants::MAX_RUN);
		words.push((length as u16) << 1);
		*run -= length;
	}
}

fn flush_color_run(words: &mut Vec<u16>, run: &mut Vec<u16>) {
	for chunk in run.chunks(constants::MAX_RUN) {
		words.push(((chunk.len() as u16) << 1) | constants::COLOR_RUN);
		words.extend_from_slice(chunk);
	}
	run.clear();
}

/// Encodes a collection as a little-endian `.c16` archive using its pixel format.
///
/// # Errors
///
/// Fails with [`FormatError::InvalidInput`] for an empty frame, more than 65535 frames or
/// a [`PixelFormat::BigEndian555`] collection, and [`FormatError::UnsupportedSize`] for a
/// frame side above 65535.
pub fn encode(collection: &SpriteCollection) -> Result<Vec<u8>, FormatError> {
	let tag = match collection.pixel_format {
		PixelFormat::Rgb555 => constants::TAG_555,
		PixelFormat::Rgb565 => constants::TAG_565,
		PixelFormat::BigEndian555 => {
			return Err(FormatError::invalid(SpriteFormat::C16, "only 555 and 565 pixels can be stored"));
		}
	};
	let count = collection.count_u16(SpriteFormat::C16)?;

	let mut images = Vec::with_capacity(collection.len());
	let mut header_size = constants::HEADER_SIZE;
	for frame in collection {
		let size = frame.dimensions_u16(SpriteFormat::C16)?;
		let lines: Vec<Vec<u16>> =
			frame.rows().map(|row| encode_scanline(row, collection.pixel_format)).collect();
		header_size += 4 + 4 * usize::from(size.1);
		images.push((size, lines));
	}

	let data_size: usize = images
		.iter()
		.map(|(_, lines)| 2 + lines.iter().map(|line| line.len() * 2).sum::<usize>())
		.sum();
	let total = header_size + data_size;
	if u32::try_from(total).is_err() {
		return Err(FormatError::invalid(SpriteFormat::C16, "archive exceeds 4 GiB"));
	}

	let mut writer = ByteWriter::with_capacity(total);
	writer.write_u32(tag)?;
	writer.write_u16(count)?;

	let mut offset = header_size;
	for ((width, height), lines) in &images {
		let mut line_offsets = lines.iter().map(|line| {
			let line_offset = offset;
			offset += line.len() * 2;
			line_offset as u32
		});
		writer.write_u32(line_offsets.next().unwrap_or_default())?;
		writer.write_u16(*width)?;
		writer.write_u16(*height)?;
		for line_offset in line_offsets {
			writer.write_u32(line_offset)?;
		}
		// trailing zero after the last scanline
		offset += 2;
	}

	for (_, lines) in &images {
		for word in lines.iter().flatten() {
			writer.write_u16(*word)?;
		}
		writer.write_u16(0)?;
	}
	writer.finish()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn run_lengths(line: &[u16]) -> Vec<(bool, usize)> {
		let mut runs = Vec::new();
		let mut i = 0;
		while line[i] != 0 {
			let color = line[i] & 1 == 1;
			let length = usize::from(line[i] >> 1);
			runs.push((color, length));
			i += 1 + if color { length } else { 0 };
		}
		assert_eq!(i, line.len() - 1, "terminator must be the last word");
		runs
	}

	fn sample_frame() -> Frame {
		let c = Pixel::rgb(0xF8, 0x80, 0x08);
		let t = Pixel::transparent();
		Frame::from_pixels(4, 3, vec![t, c, c, t, c, c, c, c, t, t, t, t]).unwrap()
	}

	#[test]
	fn test_encode_scanline_runs() {
		let c = Pixel::rgb(8, 8, 8);
		let t = Pixel::transparent();
		let line = encode_scanline(&[t, t, c, c, c, t], PixelFormat::Rgb565);
		assert_eq!(run_lengths(&line), vec![(false, 2), (true, 3), (false, 1)]);

		let line = encode_scanline(&[c, t, c], PixelFormat::Rgb565);
		assert_eq!(run_lengths(&line), vec![(true, 1), (false, 1), (true, 1)]);

		let line = encode_scanline(&[], PixelFormat::Rgb565);
		assert_eq!(line, vec![0]);
	}

	#[test]
	fn test_run_lengths_sum_to_width() {
		let frame = sample_frame();
		for row in frame.rows() {
			let line = encode_scanline(row, PixelFormat::Rgb555);
			let total: usize = run_lengths(&line).iter().map(|(_, len)| len).sum();
			assert_eq!(total, frame.width() as usize);
		}
	}

	#[test]
	fn test_long_runs_are_split() {
		let row = vec![Pixel::transparent(); constants::MAX_RUN + 5];
		let line = encode_scanline(&row, PixelFormat::Rgb565);
		assert_eq!(run_lengths(&line), vec![(false, constants::MAX_RUN), (false, 5)]);
	}

	#[test]
	fn test_header_layout() {
		let collection = SpriteCollection::from_frames(vec![sample_frame()]);
		let bytes = encode(&collection).unwrap();
		assert_eq!(&bytes[0..4], &3u32.to_le_bytes());
		assert_eq!(&bytes[4..6], &1u16.to_le_bytes());
		let header_size = 6 + 4 + 4 * 3;
		assert_eq!(&bytes[6..10], &(header_size as u32).to_le_bytes());
		assert_eq!(&bytes[10..14], &[4, 0, 3, 0]);
		// line 0: [t1][c2 + 2 pixels][t1][0] = 6 words
		assert_eq!(&bytes[14..18], &((header_size + 12) as u32).to_le_bytes());
		// line 1: [c4 + 4 pixels][0] = 6 words
		assert_eq!(&bytes[18..22], &((header_size + 24) as u32).to_le_bytes());
		// line 2: [t4][0], then the image terminator
		assert_eq!(bytes.len(), header_size + 24 + 4 + 2);
		assert_eq!(&bytes[bytes.len() - 4..], &[0, 0, 0, 0]);
	}

	#[test]
	fn test_round_trip() {
		for pixel_format in [PixelFormat::Rgb555, PixelFormat::Rgb565] {
			let a = sample_frame().map_pixels(|p| pixel_format.truncate(p));
			let b = Frame::filled(2, 5, pixel_format.truncate(Pixel::rgb(10, 200, 30)));
			let collection =
				SpriteCollection::from_frames(vec![a, b]).with_pixel_format(pixel_format);
			let decoded = decode(&encode(&collection).unwrap()).unwrap();
			assert_eq!(decoded, collection);
		}
	}

	#[test]
	fn test_opaque_black_survives() {
		let collection =
			SpriteCollection::from_frames(vec![Frame::filled(1, 1, Pixel::rgb(0, 0, 0))]);
		let decoded = decode(&encode(&collection).unwrap()).unwrap();
		assert_eq!(decoded.frames[0].get(0, 0), Some(Pixel::rgb(0, 0, 0)));
	}

	#[test]
	fn test_big_endian_tag() {
		let mut bytes = Vec::new();
		bytes.extend(2u32.to_be_bytes());
		bytes.extend(1u16.to_be_bytes());
		bytes.extend(14u32.to_be_bytes());
		bytes.extend(1u16.to_be_bytes());
		bytes.extend(1u16.to_be_bytes());
		bytes.extend(((1u16 << 1) | 1).to_be_bytes());
		bytes.extend(0x7C00u16.to_be_bytes());
		bytes.extend(0u16.to_be_bytes());
		bytes.extend(0u16.to_be_bytes());

		let decoded = decode(&bytes).unwrap();
		assert_eq!(decoded.pixel_format, PixelFormat::Rgb555);
		assert_eq!(decoded.frames[0].get(0, 0), Some(Pixel::rgb(0xF8, 0, 0)));
	}

	#[test]
	fn test_early_tags() {
		for (tag, pixel_format) in [(0u32, PixelFormat::Rgb555), (1, PixelFormat::Rgb565)] {
			let collection = SpriteCollection::from_frames(vec![sample_frame()])
				.with_pixel_format(pixel_format);
			let mut bytes = encode(&collection).unwrap();
			bytes[0..4].copy_from_slice(&tag.to_le_bytes());
			let decoded = decode(&bytes).unwrap();
			assert_eq!(decoded.pixel_format, pixel_format);
			assert_eq!(decoded.len(), 1);
		}
	}

	#[test]
	fn test_oversized_header_is_out_of_bounds() {
		// one 65535x65535 image, every line offset pointing at the end of the file
		let height = u16::MAX;
		let len = 6 + 8 + 4 * (usize::from(height) - 1);
		let mut bytes = Vec::with_capacity(len);
		bytes.extend(3u32.to_le_bytes());
		bytes.extend(1u16.to_le_bytes());
		bytes.extend((len as u32).to_le_bytes());
		bytes.extend(u16::MAX.to_le_bytes());
		bytes.extend(height.to_le_bytes());
		for _ in 1..height {
			bytes.extend((len as u32).to_le_bytes());
		}
		assert_eq!(bytes.len(), len);
		assert!(matches!(decode(&bytes), Err(FormatError::OutOfBounds { .. })));

		// cut off before the second scanline
		let collection = SpriteCollection::from_frames(vec![sample_frame()]);
		let mut bytes = encode(&collection).unwrap();
		bytes.truncate(6 + 4 + 4 * 3 + 5);
		assert!(matches!(decode(&bytes), Err(FormatError::OutOfBounds { .. })));
	}

	#[test]
	fn test_rejects_bad_data() {
		assert!(matches!(decode(&[9, 0, 0, 0, 0, 0]), Err(FormatError::InvalidInput { .. })));
		assert!(matches!(decode(&[0, 0, 0, 9, 0, 0]), Err(FormatError::InvalidInput { .. })));
		assert!(matches!(decode(&[3, 0, 0]), Err(FormatError::OutOfBounds { .. })));

		// 2 pixels wide, but the only run covers 3
		let mut bytes = Vec::new();
		bytes.extend(3u32.to_le_bytes());
		bytes.extend(1u16.to_le_bytes());
		bytes.extend(14u32.to_le_bytes());
		bytes.extend(2u16.to_le_bytes());
		bytes.extend(1u16.to_le_bytes());
		bytes.extend((3u16 << 1).to_le_bytes());
		bytes.extend(0u16.to_le_bytes());
		assert!(matches!(decode(&bytes), Err(FormatError::InvalidInput { .. })));

		let collection = SpriteCollection::from_frames(vec![Frame::new(1, 1)])
			.with_pixel_format(PixelFormat::BigEndian555);
		assert!(encode(&collection).is_err());
	}
}
