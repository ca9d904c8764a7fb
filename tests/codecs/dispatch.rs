//! Format detection and the legacy SPR fallback chain

use nornspr_rs::prelude::*;

#[test]
fn test_every_writable_format_round_trips_by_extension() {
	let palette = Palette::creatures();
	let indexed = SpriteCollection::from_frames(vec![Frame::filled(4, 3, palette.lookup(57)); 2]);
	let strip = SpriteCollection::from_frames(vec![Frame::filled(4, 3, Pixel::rgb(248, 8, 16)); 2]);
	let glyphs = SpriteCollection::from_frames(vec![Frame::new(4, 8); 128]);
	let tiles = SpriteCollection::background(vec![Frame::filled(128, 128, Pixel::rgb(8, 8, 8)); 2], 2, 1);

	for (name, collection) in [
		("a.spr", &indexed),
		("a.C16", &strip),
		("a.s16", &strip),
		("a.blk", &tiles),
		("a.dta", &glyphs),
	] {
		let format = SpriteFormat::from_path(name).unwrap();
		let bytes = format.encode(collection, &palette).unwrap();
		assert_eq!(SpriteFormat::sniff(&bytes), Some(format), "{name}");
		assert_eq!(&format.decode(&bytes, &palette).unwrap(), collection, "{name}");
	}
}

#[test_log::test]
fn test_spr_falls_back_to_single_width() {
	let palette = Palette::creatures();
	let mut bytes = Vec::new();
	bytes.extend(1u16.to_le_bytes());
	bytes.extend(0u32.to_le_bytes());
	bytes.extend(1u16.to_le_bytes());
	bytes.extend(2u16.to_le_bytes());
	bytes.extend([11, 12]);

	let sprites = SpriteFormat::Spr.decode(&bytes, &palette).unwrap();
	assert!(sprites.read_only);
	assert_eq!(sprites.frames[0].get(0, 0), Some(palette.lookup(12)));
	assert_eq!(sprites.frames[0].get(0, 1), Some(palette.lookup(11)));
}

#[test_log::test]
fn test_garbage_reports_every_attempt() {
	let palette = Palette::creatures();
	match SpriteFormat::Spr.decode(&[9], &palette) {
		Err(FormatError::UnrecognizedFormat {
			attempts,
			..
		}) => assert_eq!(attempts.len(), 5),
		other => panic!("expected UnrecognizedFormat, got {other:?}"),
	}
}

#[test]
fn test_unknown_extension() {
	assert!(matches!(SpriteFormat::from_path("norn.png"), Err(FormatError::UnsupportedExtension(_))));
}
