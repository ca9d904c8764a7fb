//! 256-entry colour tables for palette-indexed archives.
//!
//! A palette file holds 256 RGB triples in the 6-bit VGA convention, so every stored byte is
//! multiplied by 4 on load. After loading, entries 246-255 are always replaced by the ten
//! reserved colours the game engine installs itself, whatever the file contains at those
//! offsets.
//!
//! Index 0 is the transparency sentinel: [`Palette::lookup`] returns a transparent pixel for
//! it and an opaque pixel for every other index.
//!
//! # Examples
//!
//! ```
//! use nornspr_types::file::{Palette, Pixel};
//!
//! let palette = Palette::creatures();
//! assert!(palette.lookup(0).is_transparent());
//! assert_eq!(palette.lookup(249), Pixel::rgb(255, 0, 0));
//! assert_eq!(palette.find_nearest_index(Pixel::rgb(254, 1, 1)), 249);
//! ```

use std::fmt;
use std::ops::Index;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use crate::file::{ByteReader, ByteWriter, FormatError, Frame, Pixel};

/// Number of entries in a palette.
pub const PALETTE_SIZE: usize = 256;

/// Size of a palette file in bytes (256 RGB triples).
pub const PALETTE_FILE_SIZE: usize = PALETTE_SIZE * 3;

/// First index overwritten by [`RESERVED_COLORS`].
pub const RESERVED_START: usize = 246;

/// Colours installed at indices 246-255 after every palette load.
pub const RESERVED_COLORS: [(u8, u8, u8); 10] = [
	(255, 255, 255),
	(192, 192, 192),
	(128, 128, 128),
	(255, 0, 0),
	(0, 255, 0),
	(255, 255, 0),
	(0, 0, 255),
	(255, 0, 255),
	(0, 255, 255),
	(255, 255, 255),
];

/// The default creature palette shipped with the game.
#[rustfmt::skip]
const CREATURES: [(u8, u8, u8); PALETTE_SIZE] = [
	(0, 0, 0), (252, 252, 252), (252, 252, 252), (252, 252, 252), (252, 252, 252), (252, 252, 252),
	(252, 252, 252), (252, 252, 252), (252, 252, 252), (252, 252, 252), (252, 252, 252), (16, 8, 8),
	(20, 24, 40), (24, 40, 16), (24, 36, 48), (44, 16, 8), (40, 24, 36), (52, 40, 16),
	(48, 44, 48), (24, 28, 68), (20, 52, 84), (24, 60, 96), (36, 28, 68), (44, 52, 72),
	(44, 56, 104), (28, 64, 28), (28, 64, 40), (52, 72, 24), (52, 72, 44), (60, 96, 24),
	(60, 96, 40), (24, 64, 92), (28, 64, 100), (52, 68, 80), (44, 76, 104), (56, 96, 76),
	(60, 96, 112), (72, 24, 8), (72, 28, 36), (80, 44, 16), (72, 52, 44), (104, 24, 12),
	(108, 28, 36), (108, 48, 16), (104, 52, 36), (72, 56, 72), (72, 56, 104), (104, 52, 72),
	(116, 52, 104), (80, 72, 20), (80, 72, 48), (80, 100, 24), (76, 104, 44), (112, 72, 20),
	(108, 76, 44), (112, 100, 20), (116, 100, 48), (76, 76, 76), (76, 84, 108), (84, 100, 80),
	(84, 100, 112), (104, 84, 76), (104, 88, 104), (112, 104, 80), (108, 108, 108), (48, 60, 132),
	(56, 92, 144), (64, 60, 132), (76, 88, 140), (72, 88, 176), (80, 104, 140), (72, 108, 172),
	(100, 88, 136), (100, 92, 172), (108, 112, 140), (108, 116, 168), (76, 92, 196), (80, 116, 200),
	(92, 112, 236), (104, 120, 204), (100, 120, 244), (104, 140, 52), (92, 132, 76), (92, 128, 104),
	(108, 140, 76), (116, 136, 112), (120, 164, 76), (120, 164, 104), (88, 128, 140), (92, 128, 184),
	(112, 132, 148), (116, 136, 172), (124, 164, 140), (120, 164, 176), (88, 132, 204), (88, 144, 228),
	(88, 164, 240), (112, 136, 204), (116, 136, 252), (120, 160, 216), (112, 164, 236), (140, 24, 16),
	(144, 28, 36), (136, 52, 16), (140, 52, 40), (172, 24, 16), (172, 28, 32), (168, 48, 16),
	(172, 48, 40), (152, 52, 72), (140, 76, 20), (140, 80, 40), (144, 104, 20), (144, 104, 48),
	(172, 80, 20), (168, 84, 40), (176, 104, 20), (172, 108, 44), (136, 84, 72), (136, 88, 108),
	(140, 108, 76), (136, 116, 108), (172, 80, 72), (176, 84, 100), (168, 116, 72), (172, 116, 104),
	(208, 44, 28), (212, 52, 72), (200, 84, 20), (200, 84, 40), (204, 104, 20), (204, 112, 44),
	(232, 80, 20), (232, 80, 44), (232, 116, 20), (232, 116, 40), (204, 80, 72), (204, 84, 100),
	(204, 116, 72), (200, 116, 104), (232, 80, 80), (236, 88, 96), (240, 112, 72), (236, 112, 112),
	(144, 60, 132), (140, 80, 132), (132, 120, 144), (132, 120, 168), (168, 120, 136), (164, 124, 164),
	(128, 124, 196), (208, 48, 128), (216, 112, 136), (236, 116, 204), (164, 136, 44), (148, 132, 80),
	(144, 136, 112), (136, 172, 80), (140, 172, 108), (176, 136, 80), (172, 140, 108), (180, 164, 80),
	(180, 168, 112), (156, 196, 60), (164, 208, 92), (208, 136, 24), (208, 136, 48), (212, 168, 20),
	(208, 168, 44), (240, 140, 20), (236, 140, 44), (244, 172, 20), (244, 172, 48), (204, 140, 76),
	(200, 148, 104), (208, 168, 80), (208, 168, 112), (236, 144, 72), (236, 144, 100), (240, 172, 76),
	(236, 176, 108), (208, 196, 56), (244, 204, 12), (248, 204, 48), (252, 240, 12), (252, 236, 44),
	(212, 196, 80), (212, 196, 112), (200, 244, 80), (204, 244, 108), (248, 200, 76), (244, 204, 108),
	(248, 236, 76), (252, 232, 112), (140, 136, 144), (140, 144, 172), (144, 168, 144), (148, 168, 180),
	(168, 144, 140), (164, 152, 176), (176, 168, 144), (172, 168, 180), (136, 148, 204), (132, 152, 248),
	(148, 164, 208), (144, 168, 252), (160, 156, 196), (172, 172, 204), (164, 184, 244), (168, 200, 168),
	(152, 196, 196), (176, 192, 208), (168, 196, 252), (176, 232, 196), (184, 228, 232), (204, 144, 144),
	(200, 152, 164), (204, 176, 140), (200, 176, 176), (236, 144, 140), (236, 144, 164), (232, 180, 136),
	(232, 180, 168), (196, 184, 200), (196, 188, 224), (244, 172, 204), (212, 200, 144), (208, 200, 176),
	(204, 240, 136), (204, 228, 176), (240, 204, 144), (236, 208, 172), (248, 232, 144), (248, 236, 176),
	(212, 200, 204), (200, 200, 232), (212, 228, 204), (216, 232, 228), (228, 212, 208), (224, 208, 224),
	(240, 232, 208), (244, 244, 236), (252, 252, 252), (0, 0, 0), (0, 0, 0), (0, 0, 0),
	(255, 255, 255), (192, 192, 192), (128, 128, 128), (255, 0, 0), (0, 255, 0), (255, 255, 0),
	(0, 0, 255), (255, 0, 255), (0, 255, 255), (255, 255, 255),
];

/// 256-colour lookup table.
#[derive(Clone, PartialEq, Eq)]
pub struct Palette {
	colors: [(u8, u8, u8); PALETTE_SIZE],
}

impl Palette {
	/// Creates a palette from raw RGB triples, without applying the reserved colours.
	pub const fn from_colors(colors: [(u8, u8, u8); PALETTE_SIZE]) -> Self {
		Self {
			colors,
		}
	}

	/// Returns the default creature palette.
	pub const fn creatures() -> Self {
		Self::from_colors(CREATURES)
	}

	/// Returns the creature palette in reverse order, with the reserved colours reapplied.
	pub fn reversed() -> Self {
		let mut colors = CREATURES;
		colors.reverse();
		let mut palette = Self::from_colors(colors);
		palette.apply_reserved();
		palette
	}

	/// Returns the legacy 256-level grayscale table.
	pub fn grayscale() -> Self {
		let mut colors = [(0u8, 0u8, 0u8); PALETTE_SIZE];
		for (i, color) in colors.iter_mut().enumerate() {
			let level = i as u8;
			*color = (level, level, level);
		}
		Self::from_colors(colors)
	}

	/// Loads a palette file.
	///
	/// Each stored byte is scaled by 4, saturating at 255 for values outside the 6-bit range.
	/// Entries 246-255 are then replaced by [`RESERVED_COLORS`]. Bytes past the first 768 are
	/// ignored.
	///
	/// # Errors
	///
	/// Returns [`FormatError::OutOfBounds`] if `data` is shorter than 768 bytes.
	pub fn from_bytes(data: &[u8]) -> Result<Self, FormatError> {
		let mut reader = ByteReader::new(data);
		let mut colors = [(0u8, 0u8, 0u8); PALETTE_SIZE];
		for color in &mut colors {
			let r = reader.read_u8()?.saturating_mul(4);
			let g = reader.read_u8()?.saturating_mul(4);
			let b = reader.read_u8()?.saturating_mul(4);
			*color = (r, g, b);
		}

		let mut palette = Self::from_colors(colors);
		palette.apply_reserved();
		Ok(palette)
	}

	/// Serializes the palette back to the 6-bit file layout (every channel divided by 4).
	///
	/// Loading the result reproduces entries 0-245 exactly when every channel is a multiple
	/// of 4.
	pub fn to_bytes(&self) -> Result<Vec<u8>, FormatError> {
		let mut writer = ByteWriter::with_capacity(PALETTE_FILE_SIZE);
		for &(r, g, b) in &self.colors {
			writer.write_u8(r / 4)?;
			writer.write_u8(g / 4)?;
			writer.write_u8(b / 4)?;
		}
		writer.finish()
	}

	fn apply_reserved(&mut self) {
		self.colors[RESERVED_START..].copy_from_slice(&RESERVED_COLORS);
	}

	/// Returns the raw RGB triples.
	pub fn colors(&self) -> &[(u8, u8, u8); PALETTE_SIZE] {
		&self.colors
	}

	/// Returns the pixel for a palette index.
	///
	/// Index 0 is always transparent; every other index is fully opaque.
	#[inline]
	pub fn lookup(&self, index: u8) -> Pixel {
		let (r, g, b) = self.colors[index as usize];
		Pixel::new(r, g, b, if index == 0 { 0 } else { 255 })
	}

	/// Returns the index of the closest colour by Euclidean RGB distance, ignoring alpha.
	///
	/// An exact match returns immediately; ties keep the lowest index.
	pub fn find_nearest_index(&self, pixel: Pixel) -> u8 {
		let mut best_index = 0u8;
		let mut best_distance = u32::MAX;
		for (i, &(r, g, b)) in self.colors.iter().enumerate() {
			let dr = i32::from(pixel.r) - i32::from(r);
			let dg = i32::from(pixel.g) - i32::from(g);
			let db = i32::from(pixel.b) - i32::from(b);
			let distance = (dr * dr + dg * dg + db * db) as u32;
			if distance < best_distance {
				best_index = i as u8;
				best_distance = distance;
				if distance == 0 {
					break;
				}
			}
		}
		best_index
	}

	/// Maps a pixel to the index an indexed archive stores for it.
	///
	/// Transparent pixels map to index 0; everything else maps to the nearest colour.
	#[inline]
	pub fn quantize(&self, pixel: Pixel) -> u8 {
		if pixel.is_transparent() {
			0
		} else {
			self.find_nearest_index(pixel)
		}
	}

	/// Re-colours a frame decoded under `old` so that it shows the same indices under `new`.
	///
	/// Transparent pixels stay transparent. Pixels whose nearest index under `old` is 0
	/// become transparent too.
	pub fn swap_palette(frame: &Frame, old: &Palette, new: &Palette) -> Frame {
		frame.map_pixels(|pixel| {
			if pixel.is_transparent() {
				return Pixel::transparent();
			}
			match old.find_nearest_index(pixel) {
				0 => Pixel::transparent(),
				index => new.lookup(index),
			}
		})
	}

	/// Re-quantizes a frame to the closest colours of this palette.
	pub fn convert_frame(&self, frame: &Frame) -> Frame {
		frame.map_pixels(|pixel| self.lookup(self.quantize(pixel)))
	}
}

impl Default for Palette {
	fn default() -> Self {
		Self::creatures()
	}
}

impl Index<u8> for Palette {
	type Output = (u8, u8, u8);

	fn index(&self, index: u8) -> &Self::Output {
		&self.colors[index as usize]
	}
}

impl fmt::Debug for Palette {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Palette")
			.field("first", &self.colors[1])
			.field("last", &self.colors[PALETTE_SIZE - 1])
			.finish_non_exhaustive()
	}
}

/// Shared, lockable palette for applications that decode on several threads.
///
/// Decoders take a `&Palette`; holding the read guard from [`PaletteHandle::read`] for the
/// length of a decode keeps a concurrent [`PaletteHandle::load`] from changing the table
/// underneath it.
#[derive(Debug, Clone, Default)]
pub struct PaletteHandle(Arc<RwLock<Palette>>);

impl PaletteHandle {
	/// Wraps a palette.
	pub fn new(palette: Palette) -> Self {
		Self(Arc::new(RwLock::new(palette)))
	}

	/// Replaces the active palette by loading a palette file.
	///
	/// The active palette is left untouched if loading fails.
	pub fn load(&self, data: &[u8]) -> Result<(), FormatError> {
		let palette = Palette::from_bytes(data)?;
		self.set(palette);
		Ok(())
	}

	/// Restores the default creature palette.
	pub fn reset(&self) {
		self.set(Palette::creatures());
	}

	/// Replaces the active palette.
	pub fn set(&self, palette: Palette) {
		let mut guard = self.0.write().unwrap_or_else(PoisonError::into_inner);
		*guard = palette;
	}

	/// Returns a copy of the active palette.
	pub fn snapshot(&self) -> Palette {
		self.read().clone()
	}

	/// Locks the active palette for reading.
	pub fn read(&self) -> RwLockReadGuard<'_, Palette> {
		self.0.read().unwrap_or_else(PoisonError::into_inner)
	}
}
