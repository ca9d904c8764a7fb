//! Photo album archives from the first game generation.
//!
//! # File Structure
//!
//! - **Header:** photo count (u16)
//! - **Records:** per photo
//!   - timestamp string
//!   - width (u32), height (u32), reserved (u32)
//!   - one palette index (u8) per pixel, rows stored bottom to top
//!   - comment string, whose read starts *inside* the pixel data
//!
//! Two string encodings exist in the wild, see [`AlbumLayout`]. Neither carries a marker,
//! so [`decode_records`] tries them in order like the `.spr` decoder does. Strings are
//! Windows-1252.
//!
//! Photo albums are decode-only.

use std::fmt;

use encoding_rs::WINDOWS_1252;
use log::debug;

use crate::file::{ByteReader, FormatError, Frame, Palette, SpriteCollection, SpriteFormat};

/// Marker length byte announcing a u16 length in length-prefixed strings.
pub const LONG_STRING: u8 = 0xFF;

/// String layouts found in photo albums, in the order [`decode_records`] tries them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlbumLayout {
	/// NUL-terminated strings; the comment read starts 2 bytes before the end of the pixels
	Terminated,

	/// A u8 length (or 0xFF then a u16 length) before each string; the last pixel byte is
	/// the comment's length byte
	LengthPrefixed,
}

impl AlbumLayout {
	/// All layouts in decode priority order.
	pub const ALL: [AlbumLayout; 2] = [AlbumLayout::Terminated, AlbumLayout::LengthPrefixed];

	/// Short lowercase name used in error reports.
	pub const fn name(self) -> &'static str {
		match self {
			AlbumLayout::Terminated => "terminated",
			AlbumLayout::LengthPrefixed => "length-prefixed",
		}
	}

	/// Bytes the cursor steps back from the end of the pixel data before reading a comment.
	pub const fn comment_rewind(self) -> usize {
		match self {
			AlbumLayout::Terminated => 2,
			AlbumLayout::LengthPrefixed => 1,
		}
	}

	fn read_string<'a>(self, reader: &mut ByteReader<'a>) -> Result<&'a [u8], FormatError> {
		match self {
			AlbumLayout::Terminated => reader.read_cstring(),
			AlbumLayout::LengthPrefixed => {
				let len = match reader.read_u8()? {
					LONG_STRING => usize::from(reader.read_u16()?),
					short => usize::from(short),
				};
				reader.take(len)
			}
		}
	}

	/// Decodes every record using this layout only.
	pub fn decode_records(self, data: &[u8], palette: &Palette) -> Result<Vec<Photo>, FormatError> {
		let mut reader = ByteReader::new(data);
		let count = reader.read_u16()?;

		let mut photos = Vec::with_capacity(usize::from(count));
		for _ in 0..count {
			let timestamp = decode_string(self.read_string(&mut reader)?);
			let width = reader.read_u32()?;
			let height = reader.read_u32()?;
			let _reserved = reader.read_u32()?;
			if width == 0 || height == 0 {
				return Err(FormatError::invalid(
					SpriteFormat::PhotoAlbum,
					format!("empty {width}x{height} photo"),
				));
			}

			let len = (width as usize)
				.checked_mul(height as usize)
				.ok_or_else(|| FormatError::invalid(SpriteFormat::PhotoAlbum, "photo too large"))?;
			let indices = reader.take(len)?;
			let pixels = indices
				.chunks_exact(width as usize)
				.rev()
				.flatten()
				.map(|index| palette.lookup(*index))
				.collect();
			let frame = Frame::from_pixels(width, height, pixels)?;

			reader.rewind(self.comment_rewind())?;
			let comment = decode_string(self.read_string(&mut reader)?);

			photos.push(Photo {
				timestamp,
				comment,
				frame,
			});
		}
		Ok(photos)
	}
}

impl fmt::Display for AlbumLayout {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// A single decoded photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
	/// When the photo was taken, as stored in the album
	pub timestamp: String,
	/// Free-text comment
	pub comment: String,
	/// The picture itself
	pub frame: Frame,
}

/// Decodes every record of a photo album, strings included.
///
/// Every [`AlbumLayout`] is tried in order; when none parses, the error lists each attempt.
pub fn decode_records(data: &[u8], palette: &Palette) -> Result<Vec<Photo>, FormatError> {
	let mut attempts = Vec::with_capacity(AlbumLayout::ALL.len());
	for layout in AlbumLayout::ALL {
		match layout.decode_records(data, palette) {
			Ok(photos) => {
				debug!("decoded {} photos as {layout} layout", photos.len());
				return Ok(photos);
			}
			Err(err) => {
				debug!("photo album {layout} layout rejected: {err}");
				attempts.push((layout.name(), err));
			}
		}
	}
	Err(FormatError::UnrecognizedFormat {
		format: SpriteFormat::PhotoAlbum,
		attempts,
	})
}

/// Decodes a photo album into a read-only collection.
pub fn decode(data: &[u8], palette: &Palette) -> Result<SpriteCollection, FormatError> {
	let frames = decode_records(data, palette)?.into_iter().map(|photo| photo.frame).collect();
	Ok(SpriteCollection::from_frames(frames).with_read_only(true))
}

/// Always fails: photo albums cannot be written.
pub fn encode(_collection: &SpriteCollection) -> Result<Vec<u8>, FormatError> {
	Err(FormatError::ReadOnly(SpriteFormat::PhotoAlbum))
}

fn decode_string(bytes: &[u8]) -> String {
	let (text, _had_errors) = WINDOWS_1252.decode_without_bom_handling(bytes);
	text.into_owned()
}
