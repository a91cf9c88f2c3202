// Copyright 2017 Brian Langenberger
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A fixed-capacity in-memory byte accessor.
//!
//! ## Example
//! ```
//! use seekbits::{ByteAccessor, SliceByteAccessor};
//!
//! let mut buf = [1u8, 2, 3, 4, 5];
//! let mut accessor = SliceByteAccessor::new(&mut buf[..]);
//! assert_eq!(accessor.at(4).unwrap(), 5);
//! assert!(accessor.at(5).is_err());
//! assert_eq!(accessor.slice(3, 10), vec![4, 5]);
//!
//! accessor.put(&[10, 20], 3).unwrap();
//! // the capacity never grows
//! assert!(accessor.put(&[30, 40], 4).is_err());
//! assert_eq!(buf, [1, 2, 3, 10, 20]);
//! ```

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::{ByteAccessor, Error};

/// An accessor over a caller-supplied byte buffer whose
/// length is fixed for the accessor's whole lifetime.
///
/// Any buffer that can be viewed as a mutable byte slice works:
/// `Vec<u8>`, `Box<[u8]>`, `[u8; N]` or a borrowed `&mut [u8]`.
#[derive(Clone, Debug)]
pub struct SliceByteAccessor<B> {
    bytes: B,
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> SliceByteAccessor<B> {
    /// Wraps an accessor around the given buffer.
    #[inline]
    pub fn new(bytes: B) -> Self {
        SliceByteAccessor { bytes }
    }

    /// Returns the buffer's current contents
    #[inline]
    pub fn get_ref(&self) -> &[u8] {
        self.bytes.as_ref()
    }

    /// Consumes the accessor, returning its buffer
    #[inline]
    pub fn into_inner(self) -> B {
        self.bytes
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> ByteAccessor for SliceByteAccessor<B> {
    #[inline]
    fn at(&mut self, offset: u64) -> Result<u8, Error> {
        usize::try_from(offset)
            .ok()
            .and_then(|offset| self.bytes.as_ref().get(offset))
            .copied()
            .ok_or(Error::InsufficientData)
    }

    fn slice(&mut self, offset: u64, length: usize) -> Vec<u8> {
        let bytes = self.bytes.as_ref();
        match usize::try_from(offset) {
            Ok(start) if start < bytes.len() => {
                let end = start + length.min(bytes.len() - start);
                bytes[start..end].to_vec()
            }
            _ => Vec::new(),
        }
    }

    fn put(&mut self, bytes: &[u8], offset: u64) -> Result<(), Error> {
        if bytes.is_empty() {
            return Ok(());
        }

        let buf = self.bytes.as_mut();
        let start = usize::try_from(offset).map_err(|_| Error::InsufficientData)?;
        let end = start
            .checked_add(bytes.len())
            .filter(|end| *end <= buf.len())
            .ok_or(Error::InsufficientData)?;
        buf[start..end].copy_from_slice(bytes);
        Ok(())
    }

    #[inline]
    fn length(&mut self) -> Result<u64, Error> {
        Ok(self.bytes.as_ref().len() as u64)
    }
}
