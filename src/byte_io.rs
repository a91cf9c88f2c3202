// Copyright 2017 Brian Langenberger
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::Error;

/// A linear, byte-addressable store that a [`crate::BitStream`] walks over.
///
/// Implementations borrow or own their backing memory or stream;
/// they never call back into the bitstream.
/// Methods take `&mut self` because an accessor may refresh
/// a cache even when only reading.
pub trait ByteAccessor {
    /// Returns the byte at `offset`.
    ///
    /// Fails with [`Error::InsufficientData`] if `offset`
    /// is outside `0..length()`.
    fn at(&mut self, offset: u64) -> Result<u8, Error>;

    /// Returns up to `length` bytes starting at `offset`.
    ///
    /// Never fails: a request reaching past the end of the store
    /// yields a shorter, possibly empty, vector.
    fn slice(&mut self, offset: u64, length: usize) -> Vec<u8>;

    /// Stores all of `bytes` starting at `offset`.
    ///
    /// Writing an empty slice always succeeds.
    fn put(&mut self, bytes: &[u8], offset: u64) -> Result<(), Error>;

    /// Current size of the addressable space, in bytes
    fn length(&mut self) -> Result<u64, Error>;
}

impl<A: ByteAccessor + ?Sized> ByteAccessor for &mut A {
    #[inline]
    fn at(&mut self, offset: u64) -> Result<u8, Error> {
        (**self).at(offset)
    }

    #[inline]
    fn slice(&mut self, offset: u64, length: usize) -> Vec<u8> {
        (**self).slice(offset, length)
    }

    #[inline]
    fn put(&mut self, bytes: &[u8], offset: u64) -> Result<(), Error> {
        (**self).put(bytes, offset)
    }

    #[inline]
    fn length(&mut self) -> Result<u64, Error> {
        (**self).length()
    }
}
