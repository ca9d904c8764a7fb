//! Sprite archive round trips through the public facade

use nornspr_rs::prelude::file::{c16, m16, s16, spr};
use nornspr_rs::prelude::*;

fn walk_cycle(pixel_format: PixelFormat) -> SpriteCollection {
	(0..4u8)
		.map(|step| {
			let mut frame = Frame::new(6, 5);
			for y in 0..5 {
				// a moving opaque bar with transparent gaps either side
				for x in u32::from(step)..u32::from(step) + 2 {
					frame.set(x, y, pixel_format.truncate(Pixel::rgb(40 * step, 200, 8 * y as u8)));
				}
			}
			frame
		})
		.collect::<SpriteCollection>()
		.with_pixel_format(pixel_format)
}

#[test]
fn test_c16_and_s16_round_trip() {
	for pixel_format in [PixelFormat::Rgb555, PixelFormat::Rgb565] {
		let sprites = walk_cycle(pixel_format);
		assert_eq!(c16::decode(&c16::encode(&sprites).unwrap()).unwrap(), sprites);
		assert_eq!(s16::decode(&s16::encode(&sprites).unwrap()).unwrap(), sprites);
	}
}

#[test]
fn test_m16_round_trip() {
	let sprites = walk_cycle(PixelFormat::BigEndian555);
	assert_eq!(m16::decode(&m16::encode(&sprites).unwrap()).unwrap(), sprites);
}

#[test]
fn test_c16_scanlines_cover_width() {
	let sprites = walk_cycle(PixelFormat::Rgb565);
	for frame in &sprites {
		for row in frame.rows() {
			let runs = c16::encode_scanline(row, PixelFormat::Rgb565);
			let mut covered = 0;
			let mut i = 0;
			while runs[i] != 0 {
				let length = usize::from(runs[i] >> 1);
				covered += length;
				i += if runs[i] & 1 == 1 { 1 + length } else { 1 };
			}
			assert_eq!(covered, frame.width() as usize);
		}
	}
}

#[test]
fn test_spr_converts_through_palette() {
	let palette = Palette::creatures();
	let sprites = walk_cycle(PixelFormat::Rgb565);
	let bytes = spr::encode(&sprites, &palette).unwrap();
	let decoded = spr::decode(&bytes, &palette).unwrap();
	assert_eq!(decoded.len(), sprites.len());
	for (original, decoded) in sprites.iter().zip(&decoded) {
		assert_eq!(decoded, &palette.convert_frame(original));
	}
}

#[test]
fn test_s16_black_is_transparent_only_on_load() {
	let black = SpriteCollection::from_frames(vec![Frame::filled(2, 1, Pixel::rgb(0, 0, 0))]);
	let s16_frames = s16::decode(&s16::encode(&black).unwrap()).unwrap();
	assert!(s16_frames.frames[0].pixels().iter().all(Pixel::is_transparent));

	let c16_frames = c16::decode(&c16::encode(&black).unwrap()).unwrap();
	assert_eq!(c16_frames, black);
}
