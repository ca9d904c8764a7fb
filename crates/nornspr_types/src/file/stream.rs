//! Cursor-based binary reader and writer shared by every codec.
//!
//! Both sides carry an [`Endian`] flag that defaults to little-endian and may be
//! switched at any point, typically right after a header tag reveals a byte-swapped file.
//! The writer never grows: its capacity comes from a size-accounting pass done by the
//! codec before any byte is written.

use bytes::{Buf, BufMut, BytesMut};

use crate::file::FormatError;

/// Byte order used for multi-byte reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Endian {
	/// Least significant byte first (the native order of the archives)
	#[default]
	Little,

	/// Most significant byte first
	Big,
}

impl Endian {
	/// Returns the opposite byte order.
	pub fn swapped(self) -> Self {
		match self {
			Endian::Little => Endian::Big,
			Endian::Big => Endian::Little,
		}
	}
}

/// Read cursor over a borrowed byte buffer.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
	data: &'a [u8],
	offset: usize,
	endian: Endian,
}

impl<'a> ByteReader<'a> {
	/// Creates a little-endian reader positioned at the start of `data`.
	pub fn new(data: &'a [u8]) -> Self {
		Self {
			data,
			offset: 0,
			endian: Endian::Little,
		}
	}

	/// Returns the current byte order.
	#[inline]
	pub fn endian(&self) -> Endian {
		self.endian
	}

	/// Switches the byte order for all subsequent reads.
	#[inline]
	pub fn set_endian(&mut self, endian: Endian) {
		self.endian = endian;
	}

	/// Returns the cursor position.
	#[inline]
	pub fn position(&self) -> usize {
		self.offset
	}

	/// Returns the total buffer length.
	#[inline]
	pub fn len(&self) -> usize {
		self.data.len()
	}

	/// Returns `true` if the underlying buffer is empty.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}

	/// Returns the number of bytes left after the cursor.
	#[inline]
	pub fn remaining(&self) -> usize {
		self.data.len().saturating_sub(self.offset)
	}

	/// Returns the unread part of the buffer.
	pub fn rest(&self) -> &'a [u8] {
		let data = self.data;
		&data[self.offset.min(data.len())..]
	}

	/// Moves the cursor to an absolute position.
	///
	/// Seeking to exactly the end of the buffer is allowed.
	pub fn seek(&mut self, offset: usize) -> Result<(), FormatError> {
		if offset > self.data.len() {
			return Err(FormatError::OutOfBounds {
				offset,
				requested: 0,
				len: self.data.len(),
			});
		}
		self.offset = offset;
		Ok(())
	}

	/// Advances the cursor without reading.
	pub fn skip(&mut self, count: usize) -> Result<(), FormatError> {
		self.take(count).map(|_| ())
	}

	/// Moves the cursor back by `count` bytes.
	pub fn rewind(&mut self, count: usize) -> Result<(), FormatError> {
		let Some(offset) = self.offset.checked_sub(count) else {
			return Err(FormatError::OutOfBounds {
				offset: self.offset,
				requested: count,
				len: self.data.len(),
			});
		};
		self.offset = offset;
		Ok(())
	}

	/// Reads `count` raw bytes.
	pub fn take(&mut self, count: usize) -> Result<&'a [u8], FormatError> {
		let end = self.offset.checked_add(count).filter(|end| *end <= self.data.len()).ok_or(
			FormatError::OutOfBounds {
				offset: self.offset,
				requested: count,
				len: self.data.len(),
			},
		)?;
		let data = self.data;
		let bytes = &data[self.offset..end];
		self.offset = end;
		Ok(bytes)
	}

	/// Reads one byte.
	pub fn read_u8(&mut self) -> Result<u8, FormatError> {
		Ok(self.take(1)?.get_u8())
	}

	/// Reads a 16-bit value in the current byte order.
	pub fn read_u16(&mut self) -> Result<u16, FormatError> {
		let mut buf = self.take(2)?;
		Ok(match self.endian {
			Endian::Little => buf.get_u16_le(),
			Endian::Big => buf.get_u16(),
		})
	}

	/// Reads a 32-bit value in the current byte order.
	pub fn read_u32(&mut self) -> Result<u32, FormatError> {
		let mut buf = self.take(4)?;
		Ok(match self.endian {
			Endian::Little => buf.get_u32_le(),
			Endian::Big => buf.get_u32(),
		})
	}

	/// Reads a NUL-terminated string and returns its bytes without the terminator.
	///
	/// The cursor ends up just past the terminator.
	pub fn read_cstring(&mut self) -> Result<&'a [u8], FormatError> {
		let rest = self.rest();
		let Some(len) = rest.iter().position(|b| *b == 0) else {
			return Err(FormatError::OutOfBounds {
				offset: self.offset,
				requested: rest.len() + 1,
				len: self.data.len(),
			});
		};
		let bytes = self.take(len)?;
		self.offset += 1;
		Ok(bytes)
	}
}

/// Write cursor over a fixed-capacity buffer.
#[derive(Debug, Clone)]
pub struct ByteWriter {
	buf: BytesMut,
	capacity: usize,
	endian: Endian,
}

impl ByteWriter {
	/// Creates a little-endian writer that accepts exactly `capacity` bytes.
	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			buf: BytesMut::with_capacity(capacity),
			capacity,
			endian: Endian::Little,
		}
	}

	/// Sets the byte order, builder style.
	pub fn with_endian(mut self, endian: Endian) -> Self {
		self.endian = endian;
		self
	}

	/// Returns the current byte order.
	#[inline]
	pub fn endian(&self) -> Endian {
		self.endian
	}

	/// Switches the byte order for all subsequent writes.
	#[inline]
	pub fn set_endian(&mut self, endian: Endian) {
		self.endian = endian;
	}

	/// Returns the number of bytes written so far.
	#[inline]
	pub fn position(&self) -> usize {
		self.buf.len()
	}

	/// Returns the number of bytes that can still be written.
	#[inline]
	pub fn remaining(&self) -> usize {
		self.capacity - self.buf.len()
	}

	/// Writes raw bytes.
	pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), FormatError> {
		self.reserve(bytes.len())?;
		self.buf.put_slice(bytes);
		Ok(())
	}

	fn reserve(&self, requested: usize) -> Result<(), FormatError> {
		if requested > self.remaining() {
			return Err(FormatError::OutOfBounds {
				offset: self.buf.len(),
				requested,
				len: self.capacity,
			});
		}
		Ok(())
	}

	/// Writes one byte.
	pub fn write_u8(&mut self, value: u8) -> Result<(), FormatError> {
		self.reserve(1)?;
		self.buf.put_u8(value);
		Ok(())
	}

	/// Writes a 16-bit value in the current byte order.
	pub fn write_u16(&mut self, value: u16) -> Result<(), FormatError> {
		self.reserve(2)?;
		match self.endian {
			Endian::Little => self.buf.put_u16_le(value),
			Endian::Big => self.buf.put_u16(value),
		}
		Ok(())
	}

	/// Writes a 32-bit value in the current byte order.
	pub fn write_u32(&mut self, value: u32) -> Result<(), FormatError> {
		self.reserve(4)?;
		match self.endian {
			Endian::Little => self.buf.put_u32_le(value),
			Endian::Big => self.buf.put_u32(value),
		}
		Ok(())
	}

	/// Returns the written buffer.
	///
	/// Fails if fewer bytes were written than the writer was sized for, which means the
	/// size-accounting pass and the write pass disagree.
	pub fn finish(self) -> Result<Vec<u8>, FormatError> {
		if self.buf.len() != self.capacity {
			return Err(FormatError::OutOfBounds {
				offset: self.buf.len(),
				requested: self.capacity - self.buf.len(),
				len: self.capacity,
			});
		}
		Ok(self.buf.freeze().into())
	}
}
