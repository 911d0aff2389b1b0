//! UART register access.
//!
//! The same 16550 block shows up behind legacy I/O ports on PCs and
//! memory-mapped (often with a 4-byte stride) on SoCs and PCI serial cards.

/// Byte-wide access to the eight 16550 registers.
///
/// `reg` is the register index (0..8), not a byte offset.
pub trait UartRegisters {
    fn read(&mut self, reg: u8) -> u8;
    fn write(&mut self, reg: u8, value: u8);
}

// ═══════════════════════════════════════════════════════════════════════════
// I/O PORTS
// ═══════════════════════════════════════════════════════════════════════════

/// Legacy COM1 base.
pub const COM1: u16 = 0x3F8;
/// Legacy COM2 base.
pub const COM2: u16 = 0x2F8;

/// Registers in x86 I/O port space.
#[cfg(target_arch = "x86_64")]
#[derive(Debug)]
pub struct IoPortRegisters {
    base: u16,
}

#[cfg(target_arch = "x86_64")]
impl IoPortRegisters {
    /// # Safety
    /// `base` must be the base port of a 16550-compatible UART and the
    /// caller must own it (no other code drives the same ports).
    pub const unsafe fn new(base: u16) -> Self {
        Self { base }
    }

    pub fn base(&self) -> u16 {
        self.base
    }
}

#[cfg(target_arch = "x86_64")]
impl UartRegisters for IoPortRegisters {
    #[inline]
    fn read(&mut self, reg: u8) -> u8 {
        let value: u8;
        // SAFETY: port ownership established in `new`.
        unsafe {
            core::arch::asm!(
                "in al, dx",
                in("dx") self.base + reg as u16,
                out("al") value,
                options(nomem, nostack, preserves_flags)
            );
        }
        value
    }

    #[inline]
    fn write(&mut self, reg: u8, value: u8) {
        // SAFETY: port ownership established in `new`.
        unsafe {
            core::arch::asm!(
                "out dx, al",
                in("dx") self.base + reg as u16,
                in("al") value,
                options(nomem, nostack, preserves_flags)
            );
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// MMIO
// ═══════════════════════════════════════════════════════════════════════════

/// Memory-mapped registers, `1 << shift` bytes apart.
#[derive(Debug)]
pub struct MmioRegisters {
    base: *mut u8,
    shift: u8,
}

// SAFETY: the mapping is owned exclusively by this value (see `new`); moving
// it to another context moves that ownership with it.
unsafe impl Send for MmioRegisters {}

impl MmioRegisters {
    /// # Safety
    /// `base` must map the UART's register block, uncached, with at least
    /// `8 << shift` bytes valid, and must not be aliased by other drivers.
    pub const unsafe fn new(base: *mut u8, shift: u8) -> Self {
        Self { base, shift }
    }

    #[inline]
    fn addr(&self, reg: u8) -> *mut u8 {
        self.base.wrapping_add((reg as usize) << self.shift)
    }
}

impl UartRegisters for MmioRegisters {
    #[inline]
    fn read(&mut self, reg: u8) -> u8 {
        // SAFETY: address lies inside the block validated in `new`.
        unsafe { core::ptr::read_volatile(self.addr(reg)) }
    }

    #[inline]
    fn write(&mut self, reg: u8, value: u8) {
        // SAFETY: address lies inside the block validated in `new`.
        unsafe { core::ptr::write_volatile(self.addr(reg), value) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mmio_stride() {
        let mut block = [0u8; 32];
        let mut regs = unsafe { MmioRegisters::new(block.as_mut_ptr(), 2) };
        regs.write(7, 0x5A);
        regs.write(1, 0x11);
        assert_eq!(regs.read(7), 0x5A);
        drop(regs);
        assert_eq!(block[28], 0x5A);
        assert_eq!(block[4], 0x11);
    }
}
