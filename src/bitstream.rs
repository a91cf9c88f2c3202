// Copyright 2017 Brian Langenberger
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::{ByteAccessor, Error};

/// One bit within a byte-addressable space.
///
/// Used both as a [`BitStream`]'s cursor and as the snapshot
/// returned by [`BitStream::save_pos`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    byte_offset: u64,
    bit_offset: u8,
}

impl Position {
    /// Builds a position, failing if `bit_offset` is 8 or more.
    pub fn new(byte_offset: u64, bit_offset: u8) -> Result<Self, Error> {
        if bit_offset < 8 {
            Ok(Position {
                byte_offset,
                bit_offset,
            })
        } else {
            Err(Error::InvalidArgument("bit offset must be less than 8"))
        }
    }

    /// Offset of the addressed byte
    #[inline]
    pub fn byte_offset(&self) -> u64 {
        self.byte_offset
    }

    /// Offset of the addressed bit within its byte,
    /// counting from the most significant bit
    #[inline]
    pub fn bit_offset(&self) -> u8 {
        self.bit_offset
    }

    /// Absolute bit number, or `None` if it does not fit in a `u64`
    #[inline]
    pub fn bit_index(&self) -> Option<u64> {
        self.byte_offset
            .checked_mul(8)
            .and_then(|bits| bits.checked_add(u64::from(self.bit_offset)))
    }

    /// The position `bits` bits further on
    #[inline]
    pub(crate) fn advanced(self, bits: u64) -> Option<Self> {
        let total = bits.checked_add(u64::from(self.bit_offset))?;
        Some(Position {
            byte_offset: self.byte_offset.checked_add(total / 8)?,
            bit_offset: (total % 8) as u8,
        })
    }
}

/// A cursor addressing a [`ByteAccessor`] at bit precision.
///
/// The stream holds nothing but the accessor and its position,
/// so creating or dropping one never affects the accessor's contents.
/// Every method that fails leaves the position untouched.
pub struct BitStream<A> {
    pub(crate) accessor: A,
    pub(crate) pos: Position,
}

impl<A: ByteAccessor> BitStream<A> {
    /// Wraps a bitstream around an accessor, positioned at its first bit.
    ///
    /// Since `&mut A` is also an accessor, a stream may
    /// borrow an accessor the caller keeps.
    #[inline]
    pub fn new(accessor: A) -> Self {
        BitStream {
            accessor,
            pos: Position::default(),
        }
    }

    /// Returns a reference to the underlying accessor
    #[inline]
    pub fn accessor(&self) -> &A {
        &self.accessor
    }

    /// Returns a mutable reference to the underlying accessor
    #[inline]
    pub fn accessor_mut(&mut self) -> &mut A {
        &mut self.accessor
    }

    /// Consumes the stream, returning its accessor
    #[inline]
    pub fn into_inner(self) -> A {
        self.accessor
    }

    /// The current cursor position
    #[inline]
    pub fn position(&self) -> Position {
        self.pos
    }

    /// Returns true if at least `bits` more bits are
    /// addressable from the cursor onward.
    ///
    /// The cursor itself is never moved.
    pub fn remaining_bits(&mut self, bits: u64) -> bool {
        if bits == 0 {
            return true;
        }
        /*the space is linear, so the last byte needed decides*/
        let last_byte = u64::from(self.pos.bit_offset)
            .checked_add(bits - 1)
            .and_then(|last_bit| self.pos.byte_offset.checked_add(last_bit / 8));
        let Some(last_byte) = last_byte else {
            return false;
        };
        match self.accessor.at(last_byte) {
            Ok(_) => true,
            Err(Error::Io(err)) => {
                tracing::warn!(last_byte, %err, "backing stream failed while probing");
                false
            }
            Err(_) => false,
        }
    }

    /// Moves the cursor forward by the given number of bits.
    pub fn consume_bits(&mut self, bits: u64) -> Result<(), Error> {
        if !self.remaining_bits(bits) {
            return Err(Error::InsufficientData);
        }
        self.pos = self.pos.advanced(bits).ok_or(Error::InsufficientData)?;
        Ok(())
    }

    /// Moves the cursor forward by the given number of whole bytes.
    pub fn consume_bytes(&mut self, bytes: u64) -> Result<(), Error> {
        let bits = bytes
            .checked_mul(8)
            .ok_or(Error::InvalidArgument("byte count overflows bit count"))?;
        self.consume_bits(bits)
    }

    /// Moves the cursor to an absolute position.
    ///
    /// `byte_offset` must address a byte the accessor holds
    /// and `bit_offset` must be less than 8.
    pub fn seek(&mut self, byte_offset: u64, bit_offset: u8) -> Result<(), Error> {
        let pos = Position::new(byte_offset, bit_offset)?;
        self.accessor.at(byte_offset)?;
        self.pos = pos;
        Ok(())
    }

    /// Returns a snapshot of the cursor
    #[inline]
    pub fn save_pos(&self) -> Position {
        self.pos
    }

    /// Returns the cursor to a snapshot taken by [`BitStream::save_pos`]
    #[inline]
    pub fn restore_pos(&mut self, pos: Position) {
        self.pos = pos;
    }

    /// Returns the cursor to the first bit
    #[inline]
    pub fn reset_pos(&mut self) {
        self.pos = Position::default();
    }

    /// Returns true if the cursor sits on a whole byte
    #[inline]
    pub fn byte_aligned(&self) -> bool {
        self.pos.bit_offset == 0
    }

    /// Skips the unread bits of the current byte.
    /// Does nothing if the cursor is already aligned.
    pub fn byte_align(&mut self) -> Result<(), Error> {
        if self.byte_aligned() {
            Ok(())
        } else {
            self.consume_bits(u64::from(8 - self.pos.bit_offset))
        }
    }

    /// Runs `f`, putting the cursor back where it was if `f` fails.
    pub(crate) fn atomically<T, F>(&mut self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&mut Self) -> Result<T, Error>,
    {
        let start = self.pos;
        let result = f(self);
        if result.is_err() && self.pos != start {
            tracing::trace!(
                byte_offset = start.byte_offset,
                bit_offset = start.bit_offset,
                "rolling back bitstream cursor"
            );
            self.pos = start;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SliceByteAccessor;

    #[cfg(not(feature = "std"))]
    use alloc::vec;

    fn position(byte_offset: u64, bit_offset: u8) -> Position {
        Position::new(byte_offset, bit_offset).unwrap()
    }

    #[test]
    fn test_position() {
        assert!(Position::new(0, 8).is_err());
        assert_eq!(position(2, 4).bit_index(), Some(20));
        assert_eq!(position(u64::MAX, 0).bit_index(), None);
        assert_eq!(position(2, 4).advanced(4), Some(position(3, 0)));
        assert_eq!(position(2, 4).advanced(13), Some(position(4, 1)));
        assert_eq!(position(u64::MAX, 7).advanced(1), None);
    }

    #[test]
    fn test_consume_bits() {
        let mut s = BitStream::new(SliceByteAccessor::new(vec![1u8, 2, 3, 4, 5]));

        assert!(s.consume_bits(20).is_ok());
        assert_eq!(s.pos, position(2, 4));
        assert!(s.consume_bits(19).is_ok());
        assert_eq!(s.pos, position(4, 7));
        assert!(s.consume_bits(1).is_ok());
        assert_eq!(s.pos, position(5, 0));

        assert!(s.consume_bits(0).is_ok());
        assert!(matches!(s.consume_bits(1), Err(Error::InsufficientData)));
        assert_eq!(s.pos, position(5, 0));
    }

    #[test]
    fn test_consume_bytes() {
        let mut s = BitStream::new(SliceByteAccessor::new(vec![1u8, 2, 3, 4, 5]));

        assert!(s.consume_bytes(2).is_ok());
        assert_eq!(s.pos, position(2, 0));
        assert!(s.consume_bytes(2).is_ok());
        assert_eq!(s.pos, position(4, 0));
        assert!(s.consume_bytes(2).is_err());
        assert_eq!(s.pos, position(4, 0));
        assert!(s.consume_bytes(1).is_ok());
        assert_eq!(s.pos, position(5, 0));

        assert!(matches!(
            s.consume_bytes(u64::MAX),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_remaining_bits_overflow() {
        let mut s = BitStream::new(SliceByteAccessor::new(vec![0u8; 2]));
        s.consume_bits(3).unwrap();
        assert!(!s.remaining_bits(u64::MAX));
        assert_eq!(s.pos, position(0, 3));
    }

    #[test]
    fn test_atomically_rolls_back() {
        let mut s = BitStream::new(SliceByteAccessor::new(vec![0u8; 2]));
        let result: Result<(), Error> = s.atomically(|s| {
            s.consume_bits(9)?;
            s.consume_bits(9)
        });
        assert!(result.is_err());
        assert_eq!(s.pos, position(0, 0));
    }
}
