//! Writing values to a bitstream.
//!
//! Writes overwrite bits in place; the accessor's size never changes,
//! so there must be room for every bit ahead of the cursor.
//! Bits of partially covered bytes outside the written range
//! are preserved.
//!
//! ## Example
//! ```
//! use seekbits::{BitStream, SliceByteAccessor};
//!
//! let mut stream = BitStream::new(SliceByteAccessor::new([0xFFu8; 2]));
//! stream.consume_bits(3).unwrap();
//! stream.write_bits(0, 6).unwrap();
//! assert_eq!(stream.into_inner().into_inner(), [0b1110_0000, 0b0111_1111]);
//! ```

use crate::{BitStream, ByteAccessor, Endianness, Error, Numeric};

impl<A: ByteAccessor> BitStream<A> {
    /// Writes the low `bits` bits of `value`, most significant
    /// bit first, at most 64.
    ///
    /// All affected bytes are stored through a single
    /// [`ByteAccessor::put`] before the cursor advances.
    pub fn write_bits(&mut self, value: u64, bits: u32) -> Result<(), Error> {
        if bits > 64 {
            return Err(Error::InvalidArgument("cannot write more than 64 bits"));
        } else if bits == 0 {
            return Ok(());
        } else if !self.remaining_bits(u64::from(bits)) {
            return Err(Error::InsufficientData);
        }

        self.write_fields(&[(value, bits)])
    }

    /// Writes a single bit.
    #[inline]
    pub fn write_bit(&mut self, bit: bool) -> Result<(), Error> {
        self.write_bits(u64::from(bit), 1)
    }

    /// Writes a twos-complement signed value using the given
    /// number of bits, from 1 to 64.
    /// The value must fit in that many bits.
    pub fn write_signed_bits(&mut self, value: i64, bits: u32) -> Result<(), Error> {
        if bits == 0 || bits > 64 {
            return Err(Error::InvalidArgument("signed values need 1 to 64 bits"));
        }
        if bits < 64 {
            let limit = 1i64 << (bits - 1);
            if value < -limit || value >= limit {
                return Err(Error::InvalidArgument("value does not fit in bit width"));
            }
        }
        self.write_bits(value as u64, bits)
    }

    /// Writes a fixed-width unsigned value as wide as `U`,
    /// ordering its bytes as given.
    pub fn write_uint<U, E>(&mut self, value: U, endian: E) -> Result<(), Error>
    where
        U: Numeric,
        E: Endianness,
    {
        self.write_bits(endian.reorder(value).to_u64(), U::BITS_SIZE)
    }

    /// Writes an 8-bit unsigned value.
    #[inline]
    pub fn write_u8(&mut self, value: u8) -> Result<(), Error> {
        self.write_bits(u64::from(value), 8)
    }

    /// Writes a 16-bit unsigned value in the given byte order.
    #[inline]
    pub fn write_u16<E: Endianness>(&mut self, value: u16, endian: E) -> Result<(), Error> {
        self.write_uint(value, endian)
    }

    /// Writes a 32-bit unsigned value in the given byte order.
    #[inline]
    pub fn write_u32<E: Endianness>(&mut self, value: u32, endian: E) -> Result<(), Error> {
        self.write_uint(value, endian)
    }

    /// Writes a 64-bit unsigned value in the given byte order.
    #[inline]
    pub fn write_u64<E: Endianness>(&mut self, value: u64, endian: E) -> Result<(), Error> {
        self.write_uint(value, endian)
    }

    /// Writes the entirety of a byte buffer at any alignment.
    /// If the stream is byte-aligned, the buffer is stored
    /// with a single [`ByteAccessor::put`].
    pub fn write_bytes(&mut self, buf: &[u8]) -> Result<(), Error> {
        let bits = (buf.len() as u64)
            .checked_mul(8)
            .ok_or(Error::InvalidArgument("byte count overflows bit count"))?;
        if !self.remaining_bits(bits) {
            return Err(Error::InsufficientData);
        }

        if self.byte_aligned() {
            self.accessor.put(buf, self.pos.byte_offset())?;
            self.consume_bits(bits)
        } else {
            self.atomically(|s| {
                for b in buf {
                    s.write_bits(u64::from(*b), 8)?;
                }
                Ok(())
            })
        }
    }

    /// Writes an unsigned Exp-Golomb code.
    ///
    /// Every value but `u64::MAX` can be written;
    /// its code would need a 65-bit value part.
    pub fn write_exp_golomb(&mut self, value: u64) -> Result<(), Error> {
        if value == u64::MAX {
            return Err(Error::InvalidArgument("value too large for exp-golomb code"));
        }

        let code = value + 1;
        let width = u64::BITS - code.leading_zeros();
        let bits = 2 * width - 1;
        if bits <= 64 {
            /*the leading zeros come from the field width*/
            return self.write_bits(code, bits);
        }

        if !self.remaining_bits(u64::from(bits)) {
            return Err(Error::InsufficientData);
        }
        self.write_fields(&[(0, width - 1), (code, width)])
    }

    /// Stores the fields back to back at the cursor through a
    /// single [`ByteAccessor::put`], then advances past them.
    ///
    /// Each field is at most 64 bits and all of them together at most 127;
    /// the caller has already checked that they fit.
    fn write_fields(&mut self, fields: &[(u64, u32)]) -> Result<(), Error> {
        let bits: u32 = fields.iter().map(|(_, bits)| bits).sum();
        let start = self.pos.byte_offset();
        let lead = u32::from(self.pos.bit_offset());
        let len = ((lead + bits + 7) / 8) as usize;
        let tail = len as u32 * 8 - (lead + bits);

        /*only the edge bytes keep any of their old bits*/
        let mut buf = [0; 17];
        let span = &mut buf[..len];
        if lead != 0 {
            span[0] = self.accessor.at(start)?;
        }
        if tail != 0 {
            span[len - 1] = self.accessor.at(start + len as u64 - 1)?;
        }

        let mut bit = lead;
        for &(value, width) in fields {
            if width > 0 {
                merge_bits(span, bit, value, width);
            }
            bit += width;
        }
        self.accessor.put(span, start)?;

        self.pos = self
            .pos
            .advanced(u64::from(bits))
            .ok_or(Error::InsufficientData)?;
        Ok(())
    }

    /// Writes a signed Exp-Golomb code,
    /// mapping 0, 1, -1, 2, -2... to codes 0, 1, 2, 3, 4...
    pub fn write_signed_exp_golomb(&mut self, value: i64) -> Result<(), Error> {
        let code = match value {
            0 => 0,
            i64::MIN => {
                return Err(Error::InvalidArgument(
                    "value too small for signed exp-golomb code",
                ))
            }
            v if v > 0 => v as u64 * 2 - 1,
            v => v.unsigned_abs() * 2,
        };
        self.write_exp_golomb(code)
    }
}

/// Overwrites `bits` bits of `span`, starting `bit` bits in,
/// with the low bits of `value`, leaving every other bit alone.
fn merge_bits(span: &mut [u8], bit: u32, value: u64, bits: u32) {
    let first = (bit / 8) as usize;
    let lead = bit % 8;
    let len = ((lead + bits + 7) / 8) as usize;
    let tail = len as u32 * 8 - (lead + bits);

    /*at most 9 bytes, so they fit in a u128*/
    let bytes = &mut span[first..first + len];
    let mask = (u128::MAX >> (128 - bits)) << tail;
    let payload = (u128::from(value) << tail) & mask;
    let existing = bytes
        .iter()
        .fold(0u128, |acc, byte| (acc << 8) | u128::from(*byte));
    let merged = (existing & !mask) | payload;

    for (i, byte) in bytes.iter_mut().enumerate() {
        *byte = (merged >> ((len - 1 - i) * 8)) as u8;
    }
}
