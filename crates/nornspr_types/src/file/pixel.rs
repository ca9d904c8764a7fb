//! RGBA pixels and packed 16-bit colour conversion.
//!
//! The 16-bit archives store colours in one of three bit layouts:
//!
//! | Mode              | Red      | Green    | Blue     |
//! |-------------------|----------|----------|----------|
//! | `Rgb555`          | `0x7C00` | `0x03E0` | `0x001F` |
//! | `Rgb565`          | `0xF800` | `0x07E0` | `0x001F` |
//! | `BigEndian555`    | `0xF800` | `0x07C0` | `0x003E` |
//!
//! Decoding shifts each field into the high bits of a byte; encoding truncates the low bits.
//! Neither direction rounds or dithers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// RGBA colour of a single pixel.
///
/// A pixel with `a == 0` is transparent for run-length coding and palette index 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Pixel {
	/// Red component (0-255)
	pub r: u8,
	/// Green component (0-255)
	pub g: u8,
	/// Blue component (0-255)
	pub b: u8,
	/// Alpha component (0-255)
	pub a: u8,
}

impl Pixel {
	/// Creates a new RGBA pixel.
	pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
		Self {
			r,
			g,
			b,
			a,
		}
	}

	/// Creates an opaque pixel.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self::new(r, g, b, 255)
	}

	/// Creates an opaque gray pixel.
	pub const fn gray(value: u8) -> Self {
		Self::rgb(value, value, value)
	}

	/// Creates a transparent black pixel.
	pub const fn transparent() -> Self {
		Self::new(0, 0, 0, 0)
	}

	/// Returns `true` if the alpha channel is zero.
	#[inline]
	pub const fn is_transparent(&self) -> bool {
		self.a == 0
	}

	/// Returns `true` if all colour channels are zero, regardless of alpha.
	#[inline]
	pub const fn is_black(&self) -> bool {
		self.r == 0 && self.g == 0 && self.b == 0
	}

	/// Returns the pixel as `[r, g, b, a]`.
	pub const fn to_array(self) -> [u8; 4] {
		[self.r, self.g, self.b, self.a]
	}

	/// Creates a pixel from `[r, g, b, a]`.
	pub const fn from_array(rgba: [u8; 4]) -> Self {
		Self::new(rgba[0], rgba[1], rgba[2], rgba[3])
	}
}

impl From<[u8; 4]> for Pixel {
	fn from(rgba: [u8; 4]) -> Self {
		Self::from_array(rgba)
	}
}

impl From<Pixel> for [u8; 4] {
	fn from(pixel: Pixel) -> Self {
		pixel.to_array()
	}
}

impl fmt::Display for Pixel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "RGBA({}, {}, {}, {})", self.r, self.g, self.b, self.a)
	}
}

/// Packed 16-bit colour layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PixelFormat {
	/// 5 bits each of red, green and blue, top bit unused
	Rgb555,

	/// 5 bits red, 6 bits green, 5 bits blue
	#[default]
	Rgb565,

	/// 5 bits each of red, green and blue, bottom bit unused (the `.m16`/`.n16` layout)
	BigEndian555,
}

impl PixelFormat {
	/// Unpacks a 16-bit value into an opaque pixel.
	pub const fn decode(self, value: u16) -> Pixel {
		match self {
			PixelFormat::Rgb555 => Pixel::rgb(
				((value & 0x7C00) >> 7) as u8,
				((value & 0x03E0) >> 2) as u8,
				((value & 0x001F) << 3) as u8,
			),
			PixelFormat::Rgb565 => Pixel::rgb(
				((value & 0xF800) >> 8) as u8,
				((value & 0x07E0) >> 3) as u8,
				((value & 0x001F) << 3) as u8,
			),
			PixelFormat::BigEndian555 => Pixel::rgb(
				((value & 0xF800) >> 8) as u8,
				((value & 0x07C0) >> 3) as u8,
				((value & 0x003E) << 2) as u8,
			),
		}
	}

	/// Packs the colour channels of a pixel, ignoring alpha.
	pub const fn encode(self, pixel: Pixel) -> u16 {
		let (r, g, b) = (pixel.r as u16, pixel.g as u16, pixel.b as u16);
		match self {
			PixelFormat::Rgb555 => ((r << 7) & 0x7C00) | ((g << 2) & 0x03E0) | ((b >> 3) & 0x001F),
			PixelFormat::Rgb565 => ((r << 8) & 0xF800) | ((g << 3) & 0x07E0) | ((b >> 3) & 0x001F),
			PixelFormat::BigEndian555 => {
				((r << 8) & 0xF800) | ((g << 3) & 0x07C0) | ((b >> 2) & 0x003E)
			}
		}
	}

	/// Returns `pixel` with the bits the format cannot represent cleared.
	///
	/// `decode(encode(p))` equals `p` with every channel passed through this.
	pub const fn truncate(self, pixel: Pixel) -> Pixel {
		self.decode(self.encode(pixel))
	}
}

impl fmt::Display for PixelFormat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			PixelFormat::Rgb555 => write!(f, "555"),
			PixelFormat::Rgb565 => write!(f, "565"),
			PixelFormat::BigEndian555 => write!(f, "555 (big-endian)"),
		}
	}
}

/// Decodes a packed 16-bit value in the given mode.
#[inline]
pub fn decode_packed16(value: u16, format: PixelFormat) -> Pixel {
	format.decode(value)
}

/// Encodes a pixel into a packed 16-bit value in the given mode.
#[inline]
pub fn encode_packed16(pixel: Pixel, format: PixelFormat) -> u16 {
	format.encode(pixel)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_decode_555() {
		assert_eq!(PixelFormat::Rgb555.decode(0x7C00), Pixel::rgb(0xF8, 0, 0));
		assert_eq!(PixelFormat::Rgb555.decode(0x03E0), Pixel::rgb(0, 0xF8, 0));
		assert_eq!(PixelFormat::Rgb555.decode(0x001F), Pixel::rgb(0, 0, 0xF8));
		// top bit is ignored
		assert_eq!(PixelFormat::Rgb555.decode(0x8000), Pixel::rgb(0, 0, 0));
	}

	#[test]
	fn test_decode_565() {
		assert_eq!(PixelFormat::Rgb565.decode(0xF800), Pixel::rgb(0xF8, 0, 0));
		assert_eq!(PixelFormat::Rgb565.decode(0x07E0), Pixel::rgb(0, 0xFC, 0));
		assert_eq!(PixelFormat::Rgb565.decode(0x001F), Pixel::rgb(0, 0, 0xF8));
	}

	#[test]
	fn test_decode_big_endian_555() {
		assert_eq!(PixelFormat::BigEndian555.decode(0xF800), Pixel::rgb(0xF8, 0, 0));
		assert_eq!(PixelFormat::BigEndian555.decode(0x07C0), Pixel::rgb(0, 0xF8, 0));
		assert_eq!(PixelFormat::BigEndian555.decode(0x003E), Pixel::rgb(0, 0, 0xF8));
		assert_eq!(PixelFormat::BigEndian555.decode(0x0001), Pixel::rgb(0, 0, 0));
	}

	#[test]
	fn test_decoded_pixels_are_opaque() {
		for format in [PixelFormat::Rgb555, PixelFormat::Rgb565, PixelFormat::BigEndian555] {
			assert_eq!(format.decode(0).a, 255);
		}
	}

	#[test]
	fn test_565_exactness_all_channel_values() {
		for v in 0..=255u8 {
			let p = Pixel::rgb(v, v, v);
			let back = decode_packed16(encode_packed16(p, PixelFormat::Rgb565), PixelFormat::Rgb565);
			assert_eq!(back, Pixel::rgb(v & 0xF8, v & 0xFC, v & 0xF8));
		}
	}

	#[test]
	fn test_555_exactness_all_channel_values() {
		for v in 0..=255u8 {
			let p = Pixel::rgb(v, 255 - v, v / 2);
			let back = PixelFormat::Rgb555.truncate(p);
			assert_eq!(back, Pixel::rgb(v & 0xF8, (255 - v) & 0xF8, (v / 2) & 0xF8));
		}
	}

	#[test]
	fn test_big_endian_encode_inverts_decode() {
		for value in [0x0000u16, 0xF83E, 0x07C0, 0x1234, 0xFFFE] {
			let pixel = PixelFormat::BigEndian555.decode(value);
			assert_eq!(PixelFormat::BigEndian555.encode(pixel), value);
		}
	}

	#[test]
	fn test_encode_ignores_alpha() {
		let opaque = Pixel::rgb(200, 100, 50);
		let clear = Pixel::new(200, 100, 50, 0);
		assert_eq!(PixelFormat::Rgb565.encode(opaque), PixelFormat::Rgb565.encode(clear));
	}
}
