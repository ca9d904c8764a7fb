//! Benchmark helper utilities for nornspr-rs
//!
//! This module generates synthetic sprites for the codec benchmarks. The frames mimic real
//! creature sprites: a transparent border around an opaque body, with colours that change every
//! few pixels so run-length encoding has mixed run types to deal with.

use nornspr_types::file::{Frame, Palette, Pixel, SpriteCollection};

/// Generates a single creature-like frame of the given size.
///
/// The outer quarter on each side is transparent; the body is a diagonal gradient.
pub fn generate_sprite_frame(width: u32, height: u32) -> Frame {
	let mut frame = Frame::new(width, height);
	let (left, right) = (width / 4, width - width / 4);
	let (top, bottom) = (height / 4, height - height / 4);
	for y in top..bottom {
		for x in left..right {
			let shade = ((x + y) / 3 % 256) as u8;
			frame.set(x, y, Pixel::rgb(shade, shade.wrapping_mul(2), 255 - shade));
		}
	}
	frame
}

/// Generates a collection of `count` frames of the given size.
pub fn generate_sprite_collection(count: usize, (width, height): (u32, u32)) -> SpriteCollection {
	(0..count).map(|_| generate_sprite_frame(width, height)).collect()
}

/// Generates a frame whose pixels all come from `palette`, so palette encoding is lossless.
pub fn generate_indexed_frame(width: u32, height: u32, palette: &Palette) -> Frame {
	let pixels = (0..width * height)
		.map(|i| palette.lookup((i % 256) as u8))
		.collect();
	// the pixel count always matches
	Frame::from_pixels(width, height, pixels).unwrap_or_else(|_| Frame::new(width, height))
}

/// Common benchmark sizes for synthetic test data
pub mod sizes {
	/// Small sprite: 32x32 (1,024 pixels)
	pub const SMALL: (u32, u32) = (32, 32);
	/// Typical creature body part: 64x64 (4,096 pixels)
	pub const MEDIUM: (u32, u32) = (64, 64);
	/// Large object sprite: 256x256 (65,536 pixels)
	pub const LARGE: (u32, u32) = (256, 256);
	/// Full room background: 1024x768 (786,432 pixels), a 8x6 grid of tiles
	pub const BACKGROUND: (u32, u32) = (1024, 768);
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_generate_sprite_frame() {
		let frame = generate_sprite_frame(16, 8);
		assert_eq!((frame.width(), frame.height()), (16, 8));
		assert!(frame.get(0, 0).unwrap().is_transparent());
		assert!(!frame.get(8, 4).unwrap().is_transparent());
	}

	#[test]
	fn test_generate_indexed_frame() {
		let palette = Palette::creatures();
		let frame = generate_indexed_frame(4, 4, &palette);
		assert_eq!(frame.get(1, 0), Some(palette.lookup(1)));
		assert_eq!(generate_sprite_collection(3, sizes::SMALL).len(), 3);
	}

	#[test]
	fn test_sizes_constants() {
		assert_eq!(sizes::SMALL, (32, 32));
		assert_eq!(sizes::BACKGROUND.0 % 128, 0);
		assert_eq!(sizes::BACKGROUND.1 % 128, 0);
	}
}
