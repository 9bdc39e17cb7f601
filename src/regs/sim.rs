use core::cell::Cell;

use super::{Field, Reg, Reg16, RegisterFile};

const IO_BASE: u8 = 0x20;
const IO_SIZE: usize = 0x40;

/// Register file kept in RAM.
///
/// Behaves like the I/O space as far as the drivers can tell: `TIFR` and
/// `GIFR` are write-one-to-clear, every other register stores what is
/// written. Hardware events are emulated with [`raise`](SimRegisters::raise).
pub struct SimRegisters {
    cells: [Cell<u8>; IO_SIZE],
}

impl SimRegisters {
    /// Create a register file in its power-on state (all zeroes).
    pub const fn new() -> Self {
        Self {
            cells: [const { Cell::new(0) }; IO_SIZE],
        }
    }

    fn cell(&self, reg: Reg) -> &Cell<u8> {
        &self.cells[usize::from(reg.addr() - IO_BASE)]
    }

    /// Current register value.
    pub fn peek(&self, reg: Reg) -> u8 {
        self.cell(reg).get()
    }

    pub fn peek_wide(&self, reg: Reg16) -> u16 {
        u16::from_le_bytes([self.peek(reg.low), self.peek(reg.high)])
    }

    /// Store a value the way hardware would, bypassing write side effects.
    pub fn poke(&self, reg: Reg, value: u8) {
        self.cell(reg).set(value);
    }

    /// Set a status flag as the peripheral would on an event.
    pub fn raise(&self, flag: Field) {
        let cell = self.cell(flag.reg);
        cell.set(cell.get() | flag.mask());
    }

    /// Advance a counter by `ticks`, as if it had been clocked.
    pub fn count(&self, counter: Reg16, ticks: u16) {
        let value = self.peek_wide(counter).wrapping_add(ticks);
        let [low, high] = value.to_le_bytes();
        self.poke(counter.low, low);
        self.poke(counter.high, high);
    }

    /// True when every register in `regs` reads as zero.
    pub fn all_zero(&self, regs: &[Reg]) -> bool {
        regs.iter().all(|&reg| self.peek(reg) == 0)
    }
}

impl Default for SimRegisters {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterFile for SimRegisters {
    fn read(&self, reg: Reg) -> u8 {
        self.peek(reg)
    }

    fn write(&self, reg: Reg, value: u8) {
        let cell = self.cell(reg);
        if reg == Reg::TIFR || reg == Reg::GIFR {
            cell.set(cell.get() & !value);
        } else {
            cell.set(value);
        }
    }
}
