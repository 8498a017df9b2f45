//! Byte-order conversion for samples leaving or entering the process.
//!
//! The generator works on host-native samples. Anything written to a file or
//! socket goes through here so the byte order on the wire is explicit.

use rustfft::num_complex::Complex32;
use thiserror::Error;

use crate::generator::SAMPLE_BYTES;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    Little,
    Big,
}

impl Endianness {
    #[cfg(target_endian = "little")]
    pub const HOST: Endianness = Endianness::Little;
    #[cfg(target_endian = "big")]
    pub const HOST: Endianness = Endianness::Big;

    pub const NETWORK: Endianness = Endianness::Big;
}

/// Values whose byte representation can be reversed.
pub trait SwapBytes: Copy {
    fn swap_bytes(self) -> Self;
}

macro_rules! swap_int {
    ($($t:ty),*) => {
        $(impl SwapBytes for $t {
            #[inline]
            fn swap_bytes(self) -> Self {
                <$t>::swap_bytes(self)
            }
        })*
    };
}

swap_int!(u8, i8, u16, i16, u32, i32, u64, i64);

impl SwapBytes for f32 {
    #[inline]
    fn swap_bytes(self) -> Self {
        f32::from_bits(self.to_bits().swap_bytes())
    }
}

impl SwapBytes for f64 {
    #[inline]
    fn swap_bytes(self) -> Self {
        f64::from_bits(self.to_bits().swap_bytes())
    }
}

/// Convert `value` from `from` byte order to `to` byte order.
#[inline]
pub fn byte_swap<T: SwapBytes>(from: Endianness, to: Endianness, value: T) -> T {
    if from == to {
        value
    } else {
        value.swap_bytes()
    }
}

/// Host to network order.
#[inline]
pub fn hton<T: SwapBytes>(value: T) -> T {
    byte_swap(Endianness::HOST, Endianness::NETWORK, value)
}

/// Network to host order.
#[inline]
pub fn ntoh<T: SwapBytes>(value: T) -> T {
    byte_swap(Endianness::NETWORK, Endianness::HOST, value)
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    #[error("{0} bytes is not a whole number of complex samples")]
    Truncated(usize),
}

/// Append `samples` to `out` as interleaved re/im `f32` in `order`.
pub fn encode_samples(samples: &[Complex32], order: Endianness, out: &mut Vec<u8>) {
    out.reserve(samples.len() * SAMPLE_BYTES);
    for sample in samples {
        for part in [sample.re, sample.im] {
            let bytes = match order {
                Endianness::Little => part.to_le_bytes(),
                Endianness::Big => part.to_be_bytes(),
            };
            out.extend_from_slice(&bytes);
        }
    }
}

/// Parse interleaved re/im `f32` in `order` into samples.
pub fn decode_samples(bytes: &[u8], order: Endianness) -> Result<Vec<Complex32>, WireError> {
    if bytes.len() % SAMPLE_BYTES != 0 {
        return Err(WireError::Truncated(bytes.len()));
    }
    let read = |chunk: &[u8]| {
        let mut raw = [0u8; 4];
        raw.copy_from_slice(chunk);
        match order {
            Endianness::Little => f32::from_le_bytes(raw),
            Endianness::Big => f32::from_be_bytes(raw),
        }
    };
    Ok(bytes
        .chunks_exact(SAMPLE_BYTES)
        .map(|pair| Complex32::new(read(&pair[..4]), read(&pair[4..])))
        .collect())
}
