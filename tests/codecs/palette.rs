//! Palette files and shared palette state

use std::thread;

use nornspr_rs::prelude::file::{PALETTE_FILE_SIZE, spr};
use nornspr_rs::prelude::*;

#[test]
fn test_palette_file_overrides_reserved_colors() {
	let mut data = vec![0u8; PALETTE_FILE_SIZE];
	for (i, byte) in data.iter_mut().enumerate() {
		*byte = (i % 64) as u8;
	}
	let palette = Palette::from_bytes(&data).unwrap();
	assert_eq!(palette[249], (255, 0, 0));
	assert_eq!(palette[255], (255, 255, 255));
	assert_eq!(palette.lookup(0).a, 0);
	assert!((1..=255).all(|i| palette.lookup(i).a == 255));
}

#[test]
fn test_decode_reads_active_palette() {
	let handle = PaletteHandle::default();
	let frame = Frame::filled(1, 1, Palette::creatures().lookup(20));
	let bytes = spr::encode(&SpriteCollection::from_frames(vec![frame]), &handle.read()).unwrap();

	handle.set(Palette::grayscale());
	let reader = handle.clone();
	let decoded = thread::spawn(move || spr::decode(&bytes, &reader.read()).unwrap())
		.join()
		.unwrap();
	assert_eq!(decoded.frames[0].get(0, 0), Some(Palette::grayscale().lookup(20)));

	handle.reset();
	assert_eq!(handle.snapshot(), Palette::creatures());
}

#[test]
fn test_swap_palette_keeps_indices() {
	let creatures = Palette::creatures();
	let reversed = Palette::reversed();
	let mut frame = Frame::new(2, 1);
	frame.set(1, 0, creatures.lookup(100));
	let swapped = Palette::swap_palette(&frame, &creatures, &reversed);
	assert!(swapped.get(0, 0).unwrap().is_transparent());
	assert_eq!(swapped.get(1, 0), Some(reversed.lookup(creatures.find_nearest_index(creatures.lookup(100)))));
}
