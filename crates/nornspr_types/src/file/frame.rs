//! In-memory frames and the collections every codec decodes into and encodes from.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::file::{FormatError, Pixel, PixelFormat, SpriteFormat};

/// A single RGBA bitmap stored row-major, top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
	width: u32,
	height: u32,
	pixels: Vec<Pixel>,
}

impl Frame {
	/// Creates a fully transparent frame.
	pub fn new(width: u32, height: u32) -> Self {
		Self::filled(width, height, Pixel::transparent())
	}

	/// Creates a frame with every pixel set to `pixel`.
	pub fn filled(width: u32, height: u32, pixel: Pixel) -> Self {
		Self {
			width,
			height,
			pixels: vec![pixel; width as usize * height as usize],
		}
	}

	/// Creates a frame from row-major pixels.
	///
	/// # Errors
	///
	/// Returns [`FormatError::DimensionMismatch`] if `pixels.len() != width * height`.
	pub fn from_pixels(width: u32, height: u32, pixels: Vec<Pixel>) -> Result<Self, FormatError> {
		let expected = width as usize * height as usize;
		if pixels.len() != expected {
			return Err(FormatError::DimensionMismatch {
				expected,
				actual: pixels.len(),
			});
		}
		Ok(Self {
			width,
			height,
			pixels,
		})
	}

	/// Creates a frame from tightly packed RGBA bytes.
	///
	/// # Errors
	///
	/// Returns [`FormatError::DimensionMismatch`] if `rgba.len() != width * height * 4`.
	pub fn from_rgba_bytes(width: u32, height: u32, rgba: &[u8]) -> Result<Self, FormatError> {
		let expected = width as usize * height as usize * 4;
		if rgba.len() != expected {
			return Err(FormatError::DimensionMismatch {
				expected,
				actual: rgba.len(),
			});
		}
		let pixels = rgba.chunks_exact(4).map(|c| Pixel::new(c[0], c[1], c[2], c[3])).collect();
		Self::from_pixels(width, height, pixels)
	}

	/// Returns the pixels as tightly packed RGBA bytes.
	pub fn to_rgba_bytes(&self) -> Vec<u8> {
		self.pixels.iter().flat_map(|p| p.to_array()).collect()
	}

	/// Frame width in pixels.
	#[inline]
	pub fn width(&self) -> u32 {
		self.width
	}

	/// Frame height in pixels.
	#[inline]
	pub fn height(&self) -> u32 {
		self.height
	}

	/// Returns `true` if either dimension is zero.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.pixels.is_empty()
	}

	/// Row-major pixel slice.
	#[inline]
	pub fn pixels(&self) -> &[Pixel] {
		&self.pixels
	}

	/// Mutable row-major pixel slice.
	#[inline]
	pub fn pixels_mut(&mut self) -> &mut [Pixel] {
		&mut self.pixels
	}

	/// Consumes the frame and returns its pixels.
	pub fn into_pixels(self) -> Vec<Pixel> {
		self.pixels
	}

	fn index_of(&self, x: u32, y: u32) -> Option<usize> {
		(x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
	}

	/// Returns the pixel at `(x, y)`, or `None` outside the frame.
	pub fn get(&self, x: u32, y: u32) -> Option<Pixel> {
		self.index_of(x, y).map(|i| self.pixels[i])
	}

	/// Sets the pixel at `(x, y)`.
	///
	/// Returns `false` and changes nothing if the position is outside the frame.
	pub fn set(&mut self, x: u32, y: u32, pixel: Pixel) -> bool {
		match self.index_of(x, y) {
			Some(i) => {
				self.pixels[i] = pixel;
				true
			}
			None => false,
		}
	}

	/// Iterates over rows from top to bottom.
	pub fn rows(&self) -> impl DoubleEndedIterator<Item = &[Pixel]> + ExactSizeIterator {
		self.pixels.chunks_exact(self.width.max(1) as usize)
	}

	/// Returns a new frame with `f` applied to every pixel.
	pub fn map_pixels(&self, f: impl FnMut(Pixel) -> Pixel) -> Self {
		Self {
			width: self.width,
			height: self.height,
			pixels: self.pixels.iter().copied().map(f).collect(),
		}
	}

	/// Copies a `width` x `height` region starting at `(x, y)`.
	///
	/// Parts of the region outside this frame are transparent.
	pub fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> Self {
		let mut out = Self::new(width, height);
		for dy in 0..height {
			for dx in 0..width {
				if let Some(pixel) = self.get(x.saturating_add(dx), y.saturating_add(dy)) {
					out.set(dx, dy, pixel);
				}
			}
		}
		out
	}

	/// Returns the dimensions as stored in a 16-bit header field.
	///
	/// Fails with [`FormatError::InvalidInput`] for an empty frame and
	/// [`FormatError::UnsupportedSize`] if either side exceeds `u16::MAX`.
	pub(crate) fn dimensions_u16(&self, format: SpriteFormat) -> Result<(u16, u16), FormatError> {
		if self.width == 0 || self.height == 0 {
			return Err(FormatError::invalid(format, format!("empty {self}")));
		}
		match (u16::try_from(self.width), u16::try_from(self.height)) {
			(Ok(width), Ok(height)) => Ok((width, height)),
			_ => Err(FormatError::UnsupportedSize {
				format,
				width: self.width,
				height: self.height,
			}),
		}
	}

	/// Draws `source` with its top-left corner at `(x, y)`, clipping at the edges.
	pub fn blit(&mut self, source: &Frame, x: u32, y: u32) {
		for (sy, row) in source.rows().enumerate() {
			for (sx, pixel) in row.iter().enumerate() {
				self.set(x.saturating_add(sx as u32), y.saturating_add(sy as u32), *pixel);
			}
		}
	}
}

impl fmt::Display for Frame {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Frame {}x{}", self.width, self.height)
	}
}

/// How the frames of a collection are meant to be laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Layout {
	/// Independent frames addressed by index
	#[default]
	Strip,

	/// Tiles of one composite image, stored column-major
	Background {
		/// Number of tile columns
		cols: u16,
		/// Number of tile rows
		rows: u16,
	},
}

impl Layout {
	/// Returns the number of frames the layout expects, if it constrains the count.
	pub fn expected_frames(&self) -> Option<usize> {
		match self {
			Layout::Strip => None,
			Layout::Background {
				cols,
				rows,
			} => Some(usize::from(*cols) * usize::from(*rows)),
		}
	}
}

/// Ordered frames plus the metadata a format carries alongside them.
///
/// The frame index is the addressing key for most formats, so order is significant.
/// A background whose frame count differs from `cols * rows` is representable; encoders
/// that care reject it with [`FormatError::DimensionMismatch`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpriteCollection {
	/// Frames in archive order
	pub frames: Vec<Frame>,
	/// Strip or background grid
	pub layout: Layout,
	/// Packed colour mode of the source archive, or the mode to encode 16-bit archives with
	pub pixel_format: PixelFormat,
	/// Set when the data came from a layout the encoders cannot reproduce
	pub read_only: bool,
}

impl SpriteCollection {
	/// Creates an empty strip.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a strip from frames.
	pub fn from_frames(frames: Vec<Frame>) -> Self {
		Self {
			frames,
			..Self::default()
		}
	}

	/// Creates a background from column-major tiles.
	pub fn background(frames: Vec<Frame>, cols: u16, rows: u16) -> Self {
		Self {
			frames,
			layout: Layout::Background {
				cols,
				rows,
			},
			..Self::default()
		}
	}

	/// Sets the packed colour mode, builder style.
	pub fn with_pixel_format(mut self, pixel_format: PixelFormat) -> Self {
		self.pixel_format = pixel_format;
		self
	}

	/// Marks the collection read-only, builder style.
	pub fn with_read_only(mut self, read_only: bool) -> Self {
		self.read_only = read_only;
		self
	}

	/// Number of frames.
	#[inline]
	pub fn len(&self) -> usize {
		self.frames.len()
	}

	/// Returns `true` if there are no frames.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.frames.is_empty()
	}

	/// Returns the frame at `index`.
	pub fn get(&self, index: usize) -> Option<&Frame> {
		self.frames.get(index)
	}

	/// Iterates over the frames in order.
	pub fn iter(&self) -> std::slice::Iter<'_, Frame> {
		self.frames.iter()
	}

	/// Appends a frame.
	pub fn push(&mut self, frame: Frame) {
		self.frames.push(frame);
	}

	/// Returns `true` unless the layout is a background whose grid disagrees with the frame
	/// count.
	pub fn is_grid_consistent(&self) -> bool {
		self.layout.expected_frames().is_none_or(|expected| expected == self.frames.len())
	}

	/// Checks the grid against the frame count.
	///
	/// # Errors
	///
	/// Returns [`FormatError::DimensionMismatch`] when [`Self::is_grid_consistent`] is false.
	pub fn check_grid(&self) -> Result<(), FormatError> {
		match self.layout.expected_frames() {
			Some(expected) if expected != self.frames.len() => Err(FormatError::DimensionMismatch {
				expected,
				actual: self.frames.len(),
			}),
			_ => Ok(()),
		}
	}

	/// Returns the frame count as stored in a 16-bit header field.
	pub(crate) fn count_u16(&self, format: SpriteFormat) -> Result<u16, FormatError> {
		u16::try_from(self.frames.len())
			.map_err(|_| FormatError::invalid(format, format!("too many frames: {}", self.frames.len())))
	}

	/// Summarizes the collection for display or serialization.
	pub fn info(&self) -> CollectionInfo {
		CollectionInfo {
			frame_count: self.frames.len(),
			layout: self.layout,
			pixel_format: self.pixel_format,
			read_only: self.read_only,
			frame_sizes: self.frames.iter().map(|f| (f.width(), f.height())).collect(),
		}
	}
}

impl<'a> IntoIterator for &'a SpriteCollection {
	type Item = &'a Frame;
	type IntoIter = std::slice::Iter<'a, Frame>;

	fn into_iter(self) -> Self::IntoIter {
		self.frames.iter()
	}
}

impl IntoIterator for SpriteCollection {
	type Item = Frame;
	type IntoIter = std::vec::IntoIter<Frame>;

	fn into_iter(self) -> Self::IntoIter {
		self.frames.into_iter()
	}
}

impl FromIterator<Frame> for SpriteCollection {
	fn from_iter<T: IntoIterator<Item = Frame>>(iter: T) -> Self {
		Self::from_frames(iter.into_iter().collect())
	}
}

/// Serializable summary of a collection's metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionInfo {
	/// Number of frames
	pub frame_count: usize,
	/// Strip or background grid
	pub layout: Layout,
	/// Packed colour mode
	pub pixel_format: PixelFormat,
	/// Whether the collection can be encoded back
	pub read_only: bool,
	/// `(width, height)` of every frame, in order
	pub frame_sizes: Vec<(u32, u32)>,
}
