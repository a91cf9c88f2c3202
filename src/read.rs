// Copyright 2017 Brian Langenberger
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Reading values from a bitstream.
//!
//! ## Example
//! ```
//! use seekbits::{BitStream, LittleEndian, SliceByteAccessor};
//!
//! let data = [0xA6u8, 0x42, 0x98, 0xE2, 0x04, 0x8A, 0x34, 0x12];
//! let mut stream = BitStream::new(SliceByteAccessor::new(data));
//!
//! // the first 48 bits hold the Exp-Golomb codes for 0 through 9
//! for expected in 0..10 {
//!     assert_eq!(stream.read_exp_golomb().unwrap(), expected);
//! }
//! assert_eq!(stream.read_u16(LittleEndian).unwrap(), 0x1234);
//! assert!(stream.read_exp_golomb().is_err());
//! ```

use crate::{BitStream, ByteAccessor, Endianness, Error, Numeric};

impl<A: ByteAccessor> BitStream<A> {
    /// Returns the next `bits` bits, most significant bit first,
    /// without moving the cursor.
    ///
    /// At most 64 bits may be peeked at once.
    pub fn peek_bits(&mut self, bits: u32) -> Result<u64, Error> {
        if bits > 64 {
            return Err(Error::InvalidArgument("cannot read more than 64 bits"));
        } else if bits == 0 {
            return Ok(0);
        } else if !self.remaining_bits(u64::from(bits)) {
            return Err(Error::InsufficientData);
        }

        /*unread bits of the current byte*/
        let mut offset = self.pos.byte_offset();
        let available = 8 - u32::from(self.pos.bit_offset());
        let first = self.accessor.at(offset)? & (0xFFu8 >> self.pos.bit_offset());
        if bits <= available {
            return Ok(u64::from(first >> (available - bits)));
        }

        let mut acc = u64::from(first);
        let mut bits = bits - available;

        /*whole bytes*/
        while bits >= 8 {
            offset += 1;
            acc = (acc << 8) | u64::from(self.accessor.at(offset)?);
            bits -= 8;
        }

        /*leading bits of the final byte*/
        if bits > 0 {
            offset += 1;
            acc = (acc << bits) | u64::from(self.accessor.at(offset)? >> (8 - bits));
        }

        Ok(acc)
    }

    /// Reads an unsigned value with the given number of bits,
    /// at most 64.
    pub fn read_bits(&mut self, bits: u32) -> Result<u64, Error> {
        let value = self.peek_bits(bits)?;
        self.consume_bits(u64::from(bits))?;
        Ok(value)
    }

    /// Reads a single bit.
    #[inline]
    pub fn read_bit(&mut self) -> Result<bool, Error> {
        self.read_bits(1).map(|bit| bit == 1)
    }

    /// Reads a twos-complement signed value with the given
    /// number of bits, from 1 to 64.
    pub fn read_signed_bits(&mut self, bits: u32) -> Result<i64, Error> {
        if bits == 0 {
            return Err(Error::InvalidArgument("signed values need at least 1 bit"));
        }
        let unsigned = self.read_bits(bits)?;
        let shift = 64 - bits;
        Ok(((unsigned << shift) as i64) >> shift)
    }

    /// Reads a fixed-width unsigned value as wide as `U`,
    /// interpreting its bytes in the given order.
    ///
    /// ## Example
    /// ```
    /// use seekbits::{BigEndian, BitStream, ByteOrder, SliceByteAccessor};
    ///
    /// let mut stream = BitStream::new(SliceByteAccessor::new([0x11u8, 0x22, 0x11, 0x22]));
    /// assert_eq!(stream.read_uint::<u16, _>(BigEndian).unwrap(), 0x1122);
    /// assert_eq!(stream.read_uint::<u16, _>(ByteOrder::Little).unwrap(), 0x2211);
    /// ```
    pub fn read_uint<U, E>(&mut self, endian: E) -> Result<U, Error>
    where
        U: Numeric,
        E: Endianness,
    {
        self.read_bits(U::BITS_SIZE)
            .map(|value| endian.reorder(U::from_u64(value)))
    }

    /// Reads an 8-bit unsigned value.
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8, Error> {
        self.read_bits(8).map(|value| value as u8)
    }

    /// Reads a 16-bit unsigned value in the given byte order.
    #[inline]
    pub fn read_u16<E: Endianness>(&mut self, endian: E) -> Result<u16, Error> {
        self.read_uint(endian)
    }

    /// Reads a 32-bit unsigned value in the given byte order.
    #[inline]
    pub fn read_u32<E: Endianness>(&mut self, endian: E) -> Result<u32, Error> {
        self.read_uint(endian)
    }

    /// Reads a 64-bit unsigned value in the given byte order.
    #[inline]
    pub fn read_u64<E: Endianness>(&mut self, endian: E) -> Result<u64, Error> {
        self.read_uint(endian)
    }

    /// Completely fills the given buffer with whole bytes.
    /// If the stream is byte-aligned, the bytes are fetched
    /// as a single slice of the accessor.
    pub fn read_bytes(&mut self, buf: &mut [u8]) -> Result<(), Error> {
        let bits = (buf.len() as u64)
            .checked_mul(8)
            .ok_or(Error::InvalidArgument("byte count overflows bit count"))?;
        if !self.remaining_bits(bits) {
            return Err(Error::InsufficientData);
        }

        if self.byte_aligned() {
            let bytes = self.accessor.slice(self.pos.byte_offset(), buf.len());
            if bytes.len() != buf.len() {
                return Err(Error::InsufficientData);
            }
            buf.copy_from_slice(&bytes);
            self.consume_bits(bits)
        } else {
            self.atomically(|s| {
                for b in buf.iter_mut() {
                    *b = s.read_bits(8)? as u8;
                }
                Ok(())
            })
        }
    }

    /// Reads an unsigned Exp-Golomb code.
    ///
    /// Codes whose value part would exceed 64 bits are rejected.
    /// On failure, any leading zero bits already consumed are
    /// put back.
    pub fn read_exp_golomb(&mut self) -> Result<u64, Error> {
        self.atomically(|s| {
            let mut zeros = 0;
            while s.peek_bits(1)? == 0 {
                zeros += 1;
                if zeros >= 64 {
                    return Err(Error::InvalidArgument("exp-golomb code exceeds 64 bits"));
                }
                s.consume_bits(1)?;
            }
            Ok(s.read_bits(zeros + 1)? - 1)
        })
    }

    /// Reads a signed Exp-Golomb code,
    /// mapping codes 0, 1, 2, 3, 4... to 0, 1, -1, 2, -2...
    pub fn read_signed_exp_golomb(&mut self) -> Result<i64, Error> {
        let code = self.read_exp_golomb()?;
        Ok(if code & 1 == 0 {
            -((code / 2) as i64)
        } else {
            (code / 2 + 1) as i64
        })
    }
}
