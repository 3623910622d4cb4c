//! A deterministic, non-cryptographic RNG for tests that need reproducible
//! padding/salt bytes. Never use this for key material.

use rand_core::{CryptoRng, RngCore};

/// Cycles through a fixed byte sequence. `CryptoRng` is implemented only so
/// this type satisfies `CryptoRngCore`-bounded test call sites; it provides
/// no actual cryptographic guarantee.
pub struct DummyRng {
    bytes: &'static [u8],
    pos: usize,
}

impl DummyRng {
    pub fn new(bytes: &'static [u8]) -> Self {
        assert!(!bytes.is_empty());
        DummyRng { bytes, pos: 0 }
    }

    fn next_byte(&mut self) -> u8 {
        let b = self.bytes[self.pos % self.bytes.len()];
        self.pos += 1;
        b
    }
}

impl RngCore for DummyRng {
    fn next_u32(&mut self) -> u32 {
        let mut buf = [0u8; 4];
        self.fill_bytes(&mut buf);
        u32::from_le_bytes(buf)
    }

    fn next_u64(&mut self) -> u64 {
        let mut buf = [0u8; 8];
        self.fill_bytes(&mut buf);
        u64::from_le_bytes(buf)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for b in dest.iter_mut() {
            *b = self.next_byte();
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl CryptoRng for DummyRng {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycles_through_fixed_bytes() {
        let mut rng = DummyRng::new(&[1, 2, 3]);
        let mut buf = [0u8; 7];
        rng.fill_bytes(&mut buf);
        assert_eq!(buf, [1, 2, 3, 1, 2, 3, 1]);
    }
}
