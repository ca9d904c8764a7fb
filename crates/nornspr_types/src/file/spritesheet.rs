//! Conversion between frame collections and single-image spritesheets.
//!
//! Spritesheets are plain images, so this module only works on [`Frame`]s; reading and writing
//! the image file itself is up to the caller.

use crate::file::{FormatError, Frame, Pixel, PixelFormat, SpriteCollection};

/// Gap around and between frames in [`pack_with_dividers`].
pub const MARGIN: u32 = 5;

/// Narrowest row [`pack_with_dividers`] lays frames out in, margins excluded.
pub const MIN_ROW_WIDTH: u32 = 640;

/// Divider used when every 555 colour already appears in the frames.
const FALLBACK_DIVIDER: Pixel = Pixel::rgb(0, 255, 255);

/// Order in which frames are assigned to grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Order {
	/// Fill each row left to right, then move down
	#[default]
	RowMajor,
	/// Fill each column top to bottom, then move right
	ColumnMajor,
}

impl Order {
	/// Returns the `(column, row)` of the cell holding frame `index`.
	pub const fn cell(self, index: usize, cols: usize, rows: usize) -> (usize, usize) {
		match self {
			Order::RowMajor => (index % cols, index / cols),
			Order::ColumnMajor => (index / rows, index % rows),
		}
	}
}

/// Cuts `image` into `cols * rows` equally sized frames.
///
/// Tiles are `width / cols` by `height / rows`; leftover pixels on the right and bottom edges
/// are dropped.
///
/// # Errors
///
/// Returns [`FormatError::InvalidGrid`] when the grid is empty or has more columns or rows
/// than the image has pixels.
pub fn slice(image: &Frame, cols: u32, rows: u32, order: Order) -> Result<SpriteCollection, FormatError> {
	let invalid = || FormatError::InvalidGrid {
		cols,
		rows,
		width: image.width(),
		height: image.height(),
	};
	let tile_width = image.width().checked_div(cols).filter(|w| *w > 0).ok_or_else(invalid)?;
	let tile_height = image.height().checked_div(rows).filter(|h| *h > 0).ok_or_else(invalid)?;

	let count = cols as usize * rows as usize;
	let frames = (0..count)
		.map(|i| {
			let (col, row) = order.cell(i, cols as usize, rows as usize);
			image.crop(col as u32 * tile_width, row as u32 * tile_height, tile_width, tile_height)
		})
		.collect();
	Ok(SpriteCollection::from_frames(frames))
}

/// Draws `frames` into one image of `cols * rows` cells.
///
/// Every cell is as large as the largest frame; smaller frames sit in the top-left corner of
/// their cell and unused space is transparent.
///
/// # Errors
///
/// Returns [`FormatError::DimensionMismatch`] if there are more frames than cells.
pub fn combine(frames: &[Frame], cols: u32, rows: u32, order: Order) -> Result<Frame, FormatError> {
	let cells = cols as usize * rows as usize;
	if frames.len() > cells {
		return Err(FormatError::DimensionMismatch {
			expected: cells,
			actual: frames.len(),
		});
	}

	let cell_width = frames.iter().map(Frame::width).max().unwrap_or(0);
	let cell_height = frames.iter().map(Frame::height).max().unwrap_or(0);
	let mut sheet = Frame::new(cell_width.saturating_mul(cols), cell_height.saturating_mul(rows));
	for (i, frame) in frames.iter().enumerate() {
		let (col, row) = order.cell(i, cols as usize, rows as usize);
		sheet.blit(frame, col as u32 * cell_width, row as u32 * cell_height);
	}
	Ok(sheet)
}

/// Picks the most square `(cols, rows)` grid that holds exactly `count` frames, wider than tall.
pub fn square_grid(count: usize) -> (u32, u32) {
	if count == 0 {
		return (0, 0);
	}
	let cols = (1..=count).find(|c| count % c == 0 && c * c >= count).unwrap_or(count);
	(cols as u32, (count / cols) as u32)
}

/// Returns the first 555 colour that none of the frames use.
///
/// Transparent pixels count as black.
pub fn divider_color(frames: &[Frame]) -> Pixel {
	let mut used = vec![false; 0x8000];
	for pixel in frames.iter().flat_map(Frame::pixels) {
		used[usize::from(PixelFormat::Rgb555.encode(*pixel))] = true;
	}
	used.iter()
		.position(|u| !u)
		.map_or(FALLBACK_DIVIDER, |value| PixelFormat::Rgb555.decode(value as u16))
}

/// Lays frames out left to right in rows, separated by [`MARGIN`] pixels of a divider colour.
///
/// A row is at most `max(640, widest frame)` wide plus margins; a frame that would overflow it
/// starts a new row. The divider comes from [`divider_color`], so tools can find frame edges by
/// colour alone. No frames give an empty image.
pub fn pack_with_dividers(frames: &[Frame]) -> Frame {
	if frames.is_empty() {
		return Frame::new(0, 0);
	}

	let widest = frames.iter().map(Frame::width).max().unwrap_or(0);
	let row_limit = widest.max(MIN_ROW_WIDTH) + MARGIN * 2;

	let mut positions = Vec::with_capacity(frames.len());
	let (mut x, mut y) = (MARGIN, MARGIN);
	let (mut row_height, mut sheet_width) = (0, 0);
	for frame in frames {
		if x + frame.width() + MARGIN > row_limit {
			x = MARGIN;
			y += row_height + MARGIN;
			row_height = 0;
		}
		positions.push((x, y));
		x += frame.width() + MARGIN;
		sheet_width = sheet_width.max(x);
		row_height = row_height.max(frame.height());
	}
	let sheet_height = y + row_height + MARGIN;

	let mut sheet = Frame::filled(sheet_width, sheet_height, divider_color(frames));
	for (frame, (x, y)) in frames.iter().zip(positions) {
		sheet.blit(frame, x, y);
	}
	sheet
}
