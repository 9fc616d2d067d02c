//! Memory-mapped register access abstraction

/// 32-bit register bus over a fixed memory-mapped window
///
/// Offsets are byte offsets from the start of the device's register
/// block. Implementations must perform every access exactly once and in
/// program order (volatile semantics); reads may have side effects such
/// as clearing a status register.
///
/// All methods take `&self` so a single device handle can be shared
/// between interrupt and thread context.
pub trait MmioBus {
    /// Reads the 32-bit register at `offset`
    fn read32(&self, offset: usize) -> u32;

    /// Writes `value` to the 32-bit register at `offset`
    fn write32(&self, offset: usize, value: u32);

    /// Read-modify-write that sets the bits in `mask`
    fn set_bits(&self, offset: usize, mask: u32) {
        let value = self.read32(offset);
        self.write32(offset, value | mask);
    }

    /// Read-modify-write that clears the bits in `mask`
    fn clear_bits(&self, offset: usize, mask: u32) {
        let value = self.read32(offset);
        self.write32(offset, value & !mask);
    }
}
