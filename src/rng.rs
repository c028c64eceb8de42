use crate::error::{GameError, Result};

/// Source of 32-bit random words.
pub trait RandomSource {
    fn next_u32(&mut self) -> Result<u32>;
}

/// Browser entropy via `crypto.getRandomValues` (getrandom `js` backend).
#[derive(Debug, Default, Clone, Copy)]
pub struct CryptoRandom;

impl RandomSource for CryptoRandom {
    fn next_u32(&mut self) -> Result<u32> {
        let mut buf = [0u8; 4];
        getrandom::getrandom(&mut buf).map_err(|e| GameError::Js(e.to_string()))?;
        Ok(u32::from_le_bytes(buf))
    }
}

/// Integer uniformly distributed over `min..=max`.
///
/// Uses rejection sampling so small spans (hole counts, delay ranges) carry no
/// modulo bias.
pub fn random_int<R: RandomSource + ?Sized>(rng: &mut R, min: u32, max: u32) -> Result<u32> {
    if min >= max {
        return Ok(min);
    }
    let span = (max - min) as u64 + 1;
    if span > u32::MAX as u64 {
        return Ok(rng.next_u32()?);
    }
    let span = span as u32;
    // Largest multiple of span that fits in u32 space.
    let zone = u32::MAX - (u32::MAX % span + 1) % span;
    loop {
        let r = rng.next_u32()?;
        if r <= zone {
            return Ok(min + r % span);
        }
    }
}
