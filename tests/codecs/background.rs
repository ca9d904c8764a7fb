//! Tiled backgrounds and spritesheets

use nornspr_rs::prelude::file::{blk, spritesheet};
use nornspr_rs::prelude::*;

fn landscape(width: u32, height: u32) -> Frame {
	let mut frame = Frame::new(width, height);
	for y in 0..height {
		for x in 0..width {
			frame.set(x, y, PixelFormat::Rgb565.truncate(Pixel::rgb(x as u8, y as u8, 99)));
		}
	}
	frame
}

#[test]
fn test_single_image_becomes_2x2_grid() {
	let image = landscape(256, 256);
	let bytes = blk::encode(&SpriteCollection::from_frames(vec![image.clone()])).unwrap();
	let background = blk::decode(&bytes).unwrap();

	assert_eq!(background.len(), 4);
	assert_eq!(
		background.layout,
		Layout::Background {
			cols: 2,
			rows: 2
		}
	);
	assert!(background.is_grid_consistent());

	// reassemble column-major tiles into the original image
	let sheet = spritesheet::combine(&background.frames, 2, 2, SheetOrder::ColumnMajor).unwrap();
	assert_eq!(sheet, image);
}

#[test]
fn test_slice_and_retile_agree() {
	let image = landscape(384, 128);
	let tiled = blk::tile_frame(&image).unwrap();
	let sliced = spritesheet::slice(&image, 3, 1, SheetOrder::ColumnMajor).unwrap();
	assert_eq!(tiled.frames, sliced.frames);
}

#[test]
fn test_background_rejects_wrong_tiles() {
	let tiles = vec![Frame::new(128, 128); 5];
	let background = SpriteCollection::background(tiles, 3, 2);
	assert!(matches!(
		blk::encode(&background),
		Err(FormatError::DimensionMismatch {
			expected: 6,
			actual: 5
		})
	));
	assert!(background.check_grid().is_err());
}

#[test]
fn test_divider_sheet_keeps_frames_apart() {
	let frames = vec![landscape(20, 10), landscape(30, 5)];
	let sheet = spritesheet::pack_with_dividers(&frames);
	let divider = spritesheet::divider_color(&frames);
	assert_eq!(sheet.get(25, 5), Some(divider));
	assert_eq!(sheet.get(5, 5), frames[0].get(0, 0));
	assert_eq!(sheet.get(30, 5), frames[1].get(0, 0));
}

#[test]
fn test_room_backgrounds_open_as_grids_by_name() {
	let palette = Palette::creatures();

	let tiles = SpriteCollection::from_frames(vec![Frame::filled(2, 2, palette.lookup(30)); 58 * 8]);
	let bytes = SpriteFormat::Spr.encode(&tiles, &palette).unwrap();
	let path = std::path::Path::new("Images").join("BACK.spr");
	let format = SpriteFormat::from_path(&path).unwrap();
	let room = format.decode_path(&path, &bytes, &palette).unwrap();
	assert_eq!(
		room.layout,
		Layout::Background {
			cols: 58,
			rows: 8
		}
	);
	assert!(room.is_grid_consistent());
	// the same bytes under another name stay a strip
	assert_eq!(format.decode_path("norn.spr", &bytes, &palette).unwrap().layout, Layout::Strip);

	let tiles = SpriteCollection::from_frames(vec![Frame::filled(1, 1, Pixel::rgb(8, 8, 8)); 58 * 16]);
	let bytes = SpriteFormat::S16.encode(&tiles, &palette).unwrap();
	let room = SpriteFormat::S16.decode_path("back.s16", &bytes, &palette).unwrap();
	assert_eq!(room.layout.expected_frames(), Some(928));
}
