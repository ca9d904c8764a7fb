//! Error types for archive parsing and encoding.

use std::fmt;

use thiserror::Error;

use crate::file::SpriteFormat;

/// Errors that can occur when decoding or encoding a sprite archive.
///
/// A failed call never hands back a partial collection or a partial byte buffer.
#[derive(Debug, Error)]
pub enum FormatError {
	/// A read or write went past the end of the buffer
	#[error("Out of bounds: {requested} bytes at offset {offset}, buffer holds {len} bytes")]
	OutOfBounds {
		/// Cursor position at the time of the access
		offset: usize,
		/// Number of bytes requested
		requested: usize,
		/// Total size of the buffer
		len: usize,
	},

	/// None of the candidate layouts could decode the data
	#[error("Unrecognized {format} data: {}", Attempts(.attempts))]
	UnrecognizedFormat {
		/// Format family that was attempted
		format: SpriteFormat,
		/// Every discarded attempt, in the order it was tried
		attempts: Vec<(&'static str, FormatError)>,
	},

	/// A count does not agree with the declared grid or dimensions
	///
	/// Raised for a background whose frame count differs from `cols * rows`, and for a pixel
	/// buffer whose length differs from `width * height`.
	#[error("Dimension mismatch: expected {expected}, got {actual}")]
	DimensionMismatch {
		/// Count the grid or dimensions require
		expected: usize,
		/// Count present
		actual: usize,
	},

	/// A frame violates the fixed size contract of a format
	#[error("Unsupported frame size for {format}: {width}x{height}")]
	UnsupportedSize {
		/// Format with the size contract
		format: SpriteFormat,
		/// Offending frame width
		width: u32,
		/// Offending frame height
		height: u32,
	},

	/// A spritesheet grid leaves no room for a tile
	#[error("Grid of {cols}x{rows} tiles does not fit a {width}x{height} image")]
	InvalidGrid {
		/// Requested columns
		cols: u32,
		/// Requested rows
		rows: u32,
		/// Sheet width
		width: u32,
		/// Sheet height
		height: u32,
	},

	/// Structurally malformed data for a specific format
	#[error("Invalid {format} data: {reason}")]
	InvalidInput {
		/// Format whose structural checks failed
		format: SpriteFormat,
		/// Human readable description
		reason: String,
	},

	/// The format can only be decoded
	#[error("{0} files are read-only and cannot be encoded")]
	ReadOnly(SpriteFormat),

	/// No codec is associated with the file extension
	#[error("Unsupported file extension: {0:?}")]
	UnsupportedExtension(String),
}

impl FormatError {
	/// Shorthand for an [`FormatError::InvalidInput`] error.
	pub fn invalid(format: SpriteFormat, reason: impl Into<String>) -> Self {
		Self::InvalidInput {
			format,
			reason: reason.into(),
		}
	}
}

struct Attempts<'a>(&'a [(&'static str, FormatError)]);

impl fmt::Display for Attempts<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.0.is_empty() {
			return write!(f, "no layouts attempted");
		}
		for (i, (layout, err)) in self.0.iter().enumerate() {
			if i > 0 {
				write!(f, "; ")?;
			}
			write!(f, "{layout}: {err}")?;
		}
		Ok(())
	}
}
