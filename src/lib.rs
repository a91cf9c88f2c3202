// Copyright 2017 Brian Langenberger
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Traits and implementations for addressing byte stores at bit precision.
//!
//! A [`BitStream`] is a cursor over any [`ByteAccessor`].
//! Two accessors are provided: [`SliceByteAccessor`], a fixed-capacity
//! in-memory buffer, and [`BufferedStreamByteAccessor`], which mirrors
//! a bounded window of a large seekable stream in memory.
//!
//! Bits are always read and written most-significant-bit first.
//! Byte order only matters for the fixed-width integer helpers,
//! which take either a [`BigEndian`] or [`LittleEndian`] marker
//! or a run-time [`ByteOrder`].
//!
//! Every operation is atomic with respect to the cursor:
//! a call that fails leaves the position exactly as it found it.
//!
//! ## Example
//! ```
//! use seekbits::{BigEndian, BitStream, SliceByteAccessor};
//!
//! let mut stream = BitStream::new(SliceByteAccessor::new(vec![0u8; 4]));
//! stream.write_bits(0b101, 3).unwrap();
//! stream.write_exp_golomb(4).unwrap();
//! stream.write_u16(0xBEEF, BigEndian).unwrap();
//!
//! stream.reset_pos();
//! assert_eq!(stream.read_bits(3).unwrap(), 0b101);
//! assert_eq!(stream.read_exp_golomb().unwrap(), 4);
//! assert_eq!(stream.read_u16(BigEndian).unwrap(), 0xBEEF);
//!
//! // only 8 bits remain, so this fails and the cursor stays put
//! let before = stream.save_pos();
//! assert!(stream.read_bits(9).is_err());
//! assert_eq!(stream.save_pos(), before);
//! ```

#![warn(missing_docs)]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(all(not(feature = "std"), not(feature = "alloc")))]
compile_error!("either the \"std\" or the \"alloc\" feature must be enabled");

#[cfg(not(feature = "std"))]
use core2::io;

#[cfg(feature = "std")]
use std::io;

use core::fmt::Debug;

mod bitstream;
mod buffered;
mod byte_io;
mod error;
mod read;
mod slice;
mod write;

pub use bitstream::{BitStream, Position};
pub use buffered::{BufferedStreamByteAccessor, DEFAULT_WINDOW_SIZE};
pub use byte_io::ByteAccessor;
pub use error::Error;
pub use slice::SliceByteAccessor;

/// An unsigned integer type that can be moved through a bitstream
/// as a fixed-width field.
pub trait Numeric: Sized + Copy + Default + Debug + PartialEq {
    /// Size of this type in bits
    const BITS_SIZE: u32;

    /// Truncates a value to this type
    fn from_u64(value: u64) -> Self;

    /// Widens this value to a `u64`
    fn to_u64(self) -> u64;

    /// Reverses the order of bytes in this value
    fn swap_bytes(self) -> Self;
}

macro_rules! define_numeric {
    ($t:ty) => {
        impl Numeric for $t {
            const BITS_SIZE: u32 = <$t>::BITS;

            #[inline(always)]
            fn from_u64(value: u64) -> Self {
                value as $t
            }

            #[inline(always)]
            fn to_u64(self) -> u64 {
                self as u64
            }

            #[inline(always)]
            fn swap_bytes(self) -> Self {
                <$t>::swap_bytes(self)
            }
        }
    };
}

define_numeric!(u8);
define_numeric!(u16);
define_numeric!(u32);
define_numeric!(u64);

/// A byte order for fixed-width integer fields.
///
/// Internal bit arithmetic is MSB-first no matter which
/// order is chosen; the order only decides how the bytes
/// of an assembled field are interpreted.
pub trait Endianness: Sized + Copy {
    /// Converts a value assembled most-significant byte first
    /// into this byte order, or back again.
    fn reorder<U: Numeric>(self, value: U) -> U;
}

/// Big-endian, or most significant byte first
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BigEndian;

/// Little-endian, or least significant byte first
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LittleEndian;

/// A byte order picked at run time
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ByteOrder {
    /// Most significant byte first
    Big,
    /// Least significant byte first
    Little,
}

impl Endianness for BigEndian {
    #[inline(always)]
    fn reorder<U: Numeric>(self, value: U) -> U {
        value
    }
}

impl Endianness for LittleEndian {
    #[inline(always)]
    fn reorder<U: Numeric>(self, value: U) -> U {
        value.swap_bytes()
    }
}

impl Endianness for ByteOrder {
    #[inline]
    fn reorder<U: Numeric>(self, value: U) -> U {
        match self {
            ByteOrder::Big => BigEndian.reorder(value),
            ByteOrder::Little => LittleEndian.reorder(value),
        }
    }
}
