// Copyright 2017 Brian Langenberger
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A byte accessor over a large seekable stream.
//!
//! Single-byte lookups are answered from an in-memory window
//! of the stream which is re-centered around the requested offset
//! whenever a lookup misses it.
//! Slices bypass the window, and writes go straight through
//! to the stream while keeping the window in sync.
//!
//! ## Example
//! ```
//! use std::io::Cursor;
//! use seekbits::{BitStream, BufferedStreamByteAccessor};
//!
//! let data: Vec<u8> = (0..=255).cycle().take(10_000).collect();
//! let mut accessor = BufferedStreamByteAccessor::with_window_size(Cursor::new(data), 1024);
//! {
//!     let mut stream = BitStream::new(&mut accessor);
//!     stream.seek(9_000, 4).unwrap();
//!     assert_eq!(stream.read_bits(8).unwrap(), 0x82);
//! }
//! // the window was re-centered half a window before the lookup
//! assert_eq!(accessor.window_range(), 8_488..9_512);
//! ```

use core::ops::Range;

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use tracing::{debug, warn};

use crate::io::{self, Read, Seek, SeekFrom, Write};
use crate::{ByteAccessor, Error};

/// Window size used by [`BufferedStreamByteAccessor::new`]
pub const DEFAULT_WINDOW_SIZE: usize = 4096;

/// An accessor mirroring a bounded window of a
/// random-access read/write stream.
///
/// The stream is the source of truth; the window is a
/// read-through, write-through cache of it.
/// If the stream is modified by anything other than this accessor,
/// call [`BufferedStreamByteAccessor::reset`] before the next access.
pub struct BufferedStreamByteAccessor<S> {
    stream: S,
    window: Vec<u8>,
    window_start: u64,
    window_size: usize,
}

impl<S: Read + Write + Seek> BufferedStreamByteAccessor<S> {
    /// Wraps an accessor around a stream using a
    /// window of [`DEFAULT_WINDOW_SIZE`] bytes.
    #[inline]
    pub fn new(stream: S) -> Self {
        Self::with_window_size(stream, DEFAULT_WINDOW_SIZE)
    }

    /// Wraps an accessor around a stream using a window
    /// of the given number of bytes, at least 1.
    pub fn with_window_size(stream: S, window_size: usize) -> Self {
        let window_size = window_size.max(1);
        BufferedStreamByteAccessor {
            stream,
            window: Vec::with_capacity(window_size),
            window_start: 0,
            window_size,
        }
    }

    /// Returns a reference to the underlying stream
    #[inline]
    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    /// Returns a mutable reference to the underlying stream.
    ///
    /// Writing through this reference bypasses the window,
    /// so [`BufferedStreamByteAccessor::reset`] must be called afterward.
    #[inline]
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    /// Consumes the accessor, returning the underlying stream
    #[inline]
    pub fn into_inner(self) -> S {
        self.stream
    }

    /// Maximum number of bytes mirrored at once
    #[inline]
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Stream offsets currently mirrored in memory
    #[inline]
    pub fn window_range(&self) -> Range<u64> {
        self.window_start..self.window_end()
    }

    /// Drops the window so the next lookup reloads it from the stream.
    pub fn reset(&mut self) {
        debug!(window_start = self.window_start, "resetting stream window");
        self.window.clear();
        self.window_start = 0;
    }

    #[inline]
    fn window_end(&self) -> u64 {
        self.window_start + self.window.len() as u64
    }

    #[inline]
    fn window_index(&self, offset: u64) -> Option<usize> {
        offset
            .checked_sub(self.window_start)
            .and_then(|index| usize::try_from(index).ok())
            .filter(|index| *index < self.window.len())
    }

    fn recenter(&mut self, offset: u64) -> Result<(), Error> {
        let start = offset.saturating_sub((self.window_size / 2) as u64);

        /*drop the old window first so a failed reload leaves nothing stale*/
        self.window.clear();
        self.window_start = self.stream.seek(SeekFrom::Start(start))?;
        match read_up_to(&mut self.stream, self.window_size, &mut self.window) {
            Ok(filled) => {
                debug!(
                    offset,
                    window_start = self.window_start,
                    window_len = filled,
                    "re-centered stream window"
                );
                Ok(())
            }
            Err(err) => {
                self.window.clear();
                Err(err.into())
            }
        }
    }

    fn sync_window(&mut self, bytes: &[u8], offset: u64) {
        let end = offset.saturating_add(bytes.len() as u64);
        if self.window.is_empty() || end <= self.window_start || offset >= self.window_end() {
            return;
        }

        if offset >= self.window_start && end <= self.window_end() {
            let index = (offset - self.window_start) as usize;
            self.window[index..index + bytes.len()].copy_from_slice(bytes);
        } else {
            debug!(
                offset,
                len = bytes.len(),
                window_start = self.window_start,
                "write crosses window edge, dropping window"
            );
            self.window.clear();
        }
    }
}

impl<S: Read + Write + Seek> ByteAccessor for BufferedStreamByteAccessor<S> {
    fn at(&mut self, offset: u64) -> Result<u8, Error> {
        if self.window_index(offset).is_none() {
            self.recenter(offset)?;
        }
        self.window_index(offset)
            .map(|index| self.window[index])
            .ok_or(Error::InsufficientData)
    }

    fn slice(&mut self, offset: u64, length: usize) -> Vec<u8> {
        if length == 0 {
            return Vec::new();
        }

        /*the buffer only grows as far as the stream has bytes*/
        let mut bytes = Vec::new();
        let read = self
            .stream
            .seek(SeekFrom::Start(offset))
            .and_then(|_| read_up_to(&mut self.stream, length, &mut bytes));
        match read {
            Ok(_) => bytes,
            Err(err) => {
                warn!(offset, length, %err, "stream slice failed");
                Vec::new()
            }
        }
    }

    fn put(&mut self, bytes: &[u8], offset: u64) -> Result<(), Error> {
        if bytes.is_empty() {
            return Ok(());
        }

        let written = self
            .stream
            .seek(SeekFrom::Start(offset))
            .and_then(|_| self.stream.write_all(bytes));
        if let Err(err) = written {
            /*some prefix may have reached the stream*/
            self.window.clear();
            return Err(err.into());
        }

        self.sync_window(bytes, offset);
        Ok(())
    }

    #[inline]
    fn length(&mut self) -> Result<u64, Error> {
        Ok(self.stream.seek(SeekFrom::End(0))?)
    }
}

/// Appends at most `limit` bytes from the stream to `buf`,
/// stopping early at the end of the stream.
/// Returns the number of bytes appended.
#[cfg(feature = "std")]
fn read_up_to<R: Read>(reader: &mut R, limit: usize, buf: &mut Vec<u8>) -> io::Result<usize> {
    reader.by_ref().take(limit as u64).read_to_end(buf)
}

/// Appends at most `limit` bytes from the stream to `buf`,
/// stopping early at the end of the stream.
/// Returns the number of bytes appended.
#[cfg(not(feature = "std"))]
fn read_up_to<R: Read>(reader: &mut R, limit: usize, buf: &mut Vec<u8>) -> io::Result<usize> {
    let mut chunk = [0; 512];
    let mut filled = 0;
    while filled < limit {
        let wanted = chunk.len().min(limit - filled);
        match reader.read(&mut chunk[..wanted]) {
            Ok(0) => break,
            Ok(read) => {
                buf.extend_from_slice(&chunk[..read]);
                filled += read;
            }
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err) => return Err(err),
        }
    }
    Ok(filled)
}
