//! DPCM sample memory and addressing.
//!
//! The DMC fetches sample bytes from CPU address space starting at $C000,
//! in 64-byte-aligned chunks. The project keeps a flat byte image of that
//! window; the backend reads it one byte at a time through the
//! [`DmcSource`](crate::apu::DmcSource) callback seam.

use alloc::vec::Vec;

/// CPU address the DMC sample window starts at.
pub const DPCM_BASE_ADDR: u16 = 0xC000;

/// One mapped DPCM sample: where it lives in the memory image and how the
/// DMC should play it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DpcmSample {
    /// Byte offset into the sample memory image (64-byte aligned).
    pub offset: u16,
    /// Length in bytes.
    pub length: u16,
    /// DMC rate index (0-15).
    pub pitch: u8,
    pub looping: bool,
}

impl DpcmSample {
    /// Value for the DMC sample-address register ($4012): offset / 64.
    pub const fn address_reg(self) -> u8 {
        (self.offset >> 6) as u8
    }

    /// Value for the DMC sample-length register ($4013): length / 16.
    pub const fn length_reg(self) -> u8 {
        (self.length >> 4) as u8
    }
}

/// Flat DPCM memory image, filled by appending samples.
#[derive(Clone, Debug, Default)]
pub struct SampleMemory {
    bytes: Vec<u8>,
}

impl SampleMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append sample data, padding to the next 64-byte boundary first.
    /// Returns the byte offset the sample was placed at.
    pub fn append(&mut self, data: &[u8]) -> u16 {
        while self.bytes.len() % 64 != 0 {
            self.bytes.push(0x55);
        }
        let offset = self.bytes.len() as u16;
        self.bytes.extend_from_slice(data);
        offset
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Read one byte by CPU address. Out-of-image reads return the DMC
    /// idle pattern (0x55).
    pub fn byte_at(&self, addr: u16) -> u8 {
        let idx = addr.wrapping_sub(DPCM_BASE_ADDR) as usize;
        self.bytes.get(idx).copied().unwrap_or(0x55)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_aligns_to_64_bytes() {
        let mut mem = SampleMemory::new();
        assert_eq!(mem.append(&[1; 10]), 0);
        assert_eq!(mem.append(&[2; 10]), 64);
        assert_eq!(mem.byte_at(DPCM_BASE_ADDR), 1);
        assert_eq!(mem.byte_at(DPCM_BASE_ADDR + 64), 2);
    }

    #[test]
    fn out_of_image_reads_idle_pattern() {
        let mem = SampleMemory::new();
        assert_eq!(mem.byte_at(0xC123), 0x55);
    }

    #[test]
    fn register_values_are_scaled() {
        let sample = DpcmSample {
            offset: 128,
            length: 256,
            pitch: 15,
            looping: false,
        };
        assert_eq!(sample.address_reg(), 2);
        assert_eq!(sample.length_reg(), 16);
    }
}
