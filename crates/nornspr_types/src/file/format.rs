//! Format dispatch: choosing a codec by file extension or by content.

use std::fmt;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::file::{
	FormatError, Layout, Palette, SpriteCollection, blk, c16, dta, m16, photo_album, s16, spr,
};

/// Room backgrounds that ship as plain sprite archives: file name, tile columns, tile rows.
///
/// The first generation stores its room as `back.spr`, the second as `back.s16`; both are
/// column-major strips of 128x128 tiles.
pub const NAMED_BACKGROUNDS: [(&str, u16, u16); 2] = [("back.spr", 58, 8), ("back.s16", 58, 16)];

/// Returns the tile grid a file name implies, ignoring case and directories.
pub fn named_background(path: impl AsRef<Path>) -> Option<(u16, u16)> {
	let name = path.as_ref().file_name()?.to_str()?;
	NAMED_BACKGROUNDS
		.iter()
		.find(|(known, ..)| name.eq_ignore_ascii_case(known))
		.map(|(_, cols, rows)| (*cols, *rows))
}

/// Every archive format with a codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpriteFormat {
	/// Palette-indexed sprites (`.spr`)
	Spr,
	/// Run-length encoded 16-bit sprites (`.c16`)
	C16,
	/// Uncompressed 16-bit sprites (`.s16`)
	S16,
	/// Big-endian uncompressed 16-bit sprites (`.m16`, `.n16`)
	M16,
	/// Tiled 128x128 backgrounds (`.blk`)
	Blk,
	/// Bitmap font charsets (`.dta`)
	Dta,
	/// First generation photo albums (`.photo album`), decode-only
	PhotoAlbum,
}

impl SpriteFormat {
	/// Every format, in the order [`SpriteFormat::sniff`] tries them.
	pub const ALL: [SpriteFormat; 7] = [
		SpriteFormat::Blk,
		SpriteFormat::C16,
		SpriteFormat::M16,
		SpriteFormat::S16,
		SpriteFormat::Spr,
		SpriteFormat::Dta,
		SpriteFormat::PhotoAlbum,
	];

	/// Display name.
	pub const fn name(self) -> &'static str {
		match self {
			SpriteFormat::Spr => "SPR",
			SpriteFormat::C16 => "C16",
			SpriteFormat::S16 => "S16",
			SpriteFormat::M16 => "M16",
			SpriteFormat::Blk => "BLK",
			SpriteFormat::Dta => "DTA",
			SpriteFormat::PhotoAlbum => "Photo Album",
		}
	}

	/// Canonical lowercase file extension, without the dot.
	pub const fn extension(self) -> &'static str {
		match self {
			SpriteFormat::Spr => "spr",
			SpriteFormat::C16 => "c16",
			SpriteFormat::S16 => "s16",
			SpriteFormat::M16 => "m16",
			SpriteFormat::Blk => "blk",
			SpriteFormat::Dta => "dta",
			SpriteFormat::PhotoAlbum => "photo album",
		}
	}

	/// Whether frames are stored as palette indices, so decoding and encoding need a [`Palette`].
	pub const fn uses_palette(self) -> bool {
		matches!(self, SpriteFormat::Spr | SpriteFormat::PhotoAlbum)
	}

	/// Whether the format can only be decoded.
	pub const fn is_read_only(self) -> bool {
		matches!(self, SpriteFormat::PhotoAlbum)
	}

	/// Maps a file extension to its format, ignoring case and a leading dot.
	pub fn from_extension(extension: &str) -> Result<Self, FormatError> {
		let lower = extension.trim_start_matches('.').to_ascii_lowercase();
		match lower.as_str() {
			"spr" => Ok(SpriteFormat::Spr),
			"c16" => Ok(SpriteFormat::C16),
			"s16" => Ok(SpriteFormat::S16),
			"m16" | "n16" => Ok(SpriteFormat::M16),
			"blk" => Ok(SpriteFormat::Blk),
			"dta" => Ok(SpriteFormat::Dta),
			"photo album" => Ok(SpriteFormat::PhotoAlbum),
			_ => Err(FormatError::UnsupportedExtension(extension.to_string())),
		}
	}

	/// Maps a path to its format by extension.
	///
	/// A file named just `Photo Album` counts as a photo album.
	pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FormatError> {
		let path = path.as_ref();
		if let Some(extension) = path.extension().and_then(|e| e.to_str())
			&& let Ok(format) = Self::from_extension(extension)
		{
			return Ok(format);
		}
		let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
		if name.eq_ignore_ascii_case(SpriteFormat::PhotoAlbum.extension()) {
			return Ok(SpriteFormat::PhotoAlbum);
		}
		let extension = path.extension().map(|e| e.to_string_lossy().into_owned()).unwrap_or_default();
		Err(FormatError::UnsupportedExtension(extension))
	}

	/// Guesses the format from the first bytes and total size of a file.
	///
	/// Checked in order: BLK header consistency, C16 pixel format tags in either byte order,
	/// a big-endian `.m16` header, an `.s16` or `.spr` whose first offset points just past
	/// its header table, a charset file size, then any other `.s16` tag. Photo albums have no
	/// signature and are never guessed.
	pub fn sniff(data: &[u8]) -> Option<Self> {
		let u16_at = |at: usize| data.get(at..at + 2).map(|b| u16::from_le_bytes([b[0], b[1]]));
		let u32_at =
			|at: usize| data.get(at..at + 4).map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]));
		let tag = u32_at(0);

		if let (Some(0..=1), Some(cols), Some(rows), Some(count)) = (tag, u16_at(4), u16_at(6), u16_at(8))
			&& count > 0
			&& u32::from(cols) * u32::from(rows) == u32::from(count)
			&& u16_at(14) == Some(128)
			&& u16_at(16) == Some(128)
		{
			return Some(SpriteFormat::Blk);
		}
		if let Some(tag) = tag
			&& (matches!(tag, 2..=3) || matches!(tag.swap_bytes(), 2..=3))
		{
			return Some(SpriteFormat::C16);
		}
		if tag == Some(m16::TAG.swap_bytes()) {
			return Some(SpriteFormat::M16);
		}
		if let (Some(0..=1), Some(count)) = (tag, u16_at(4))
			&& count > 0
			&& u32_at(6) == Some(6 + 8 * u32::from(count))
		{
			return Some(SpriteFormat::S16);
		}
		if let Some(count) = u16_at(0)
			&& ((count == 0 && data.len() == 2) || u32_at(2) == Some(2 + 8 * u32::from(count)))
		{
			return Some(SpriteFormat::Spr);
		}
		if dta::FontLayout::for_size(data.len()).is_some() {
			return Some(SpriteFormat::Dta);
		}
		if matches!(tag, Some(0..=1)) {
			return Some(SpriteFormat::S16);
		}
		None
	}

	/// Decodes `data` with this format's codec.
	///
	/// `palette` is only read by the palette-indexed formats.
	pub fn decode(self, data: &[u8], palette: &Palette) -> Result<SpriteCollection, FormatError> {
		debug!("decoding {} bytes as {self}", data.len());
		match self {
			SpriteFormat::Spr => spr::decode(data, palette),
			SpriteFormat::C16 => c16::decode(data),
			SpriteFormat::S16 => s16::decode(data),
			SpriteFormat::M16 => m16::decode(data),
			SpriteFormat::Blk => blk::decode(data),
			SpriteFormat::Dta => dta::decode(data),
			SpriteFormat::PhotoAlbum => photo_album::decode(data, palette),
		}
	}

	/// Decodes the contents of the file at `path` with this format's codec.
	///
	/// A strip read from a file listed in [`NAMED_BACKGROUNDS`] comes back as a background
	/// when its frame count fills that grid exactly; otherwise this is [`Self::decode`].
	pub fn decode_path(
		self,
		path: impl AsRef<Path>,
		data: &[u8],
		palette: &Palette,
	) -> Result<SpriteCollection, FormatError> {
		let mut collection = self.decode(data, palette)?;
		if collection.layout == Layout::Strip
			&& let Some((cols, rows)) = named_background(&path)
		{
			let layout = Layout::Background {
				cols,
				rows,
			};
			if layout.expected_frames() == Some(collection.len()) {
				debug!("{} opened as a {cols}x{rows} background", path.as_ref().display());
				collection.layout = layout;
			} else {
				debug!(
					"{} has {} frames, not a {cols}x{rows} background",
					path.as_ref().display(),
					collection.len()
				);
			}
		}
		Ok(collection)
	}

	/// Encodes `collection` with this format's codec.
	pub fn encode(self, collection: &SpriteCollection, palette: &Palette) -> Result<Vec<u8>, FormatError> {
		match self {
			SpriteFormat::Spr => spr::encode(collection, palette),
			SpriteFormat::C16 => c16::encode(collection),
			SpriteFormat::S16 => s16::encode(collection),
			SpriteFormat::M16 => m16::encode(collection),
			SpriteFormat::Blk => blk::encode(collection),
			SpriteFormat::Dta => dta::encode(collection),
			SpriteFormat::PhotoAlbum => photo_album::encode(collection),
		}
	}
}

impl fmt::Display for SpriteFormat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}
