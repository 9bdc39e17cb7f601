//! Register access for the ATmega32A I/O space.
//!
//! Registers are named by their data-space address. Every register that is
//! shared between several drivers is described by non-overlapping [`Field`]s,
//! so that changing one unit's bits is a field write and never a hand-made
//! mask.
//!
//! On the chip the registers are reached through the `avr-device` register
//! blocks ([`PacRegisters`]). Host builds use [`SimRegisters`].

#[cfg(target_arch = "avr")]
mod pac;
mod sim;

#[cfg(target_arch = "avr")]
pub use pac::PacRegisters;
pub use sim::SimRegisters;

/// An 8-bit I/O register. The discriminant is its data-space address.
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Reg {
    PIND = 0x30,
    DDRD = 0x31,
    PORTD = 0x32,
    PINB = 0x36,
    DDRB = 0x37,
    PORTB = 0x38,
    PINA = 0x39,
    DDRA = 0x3A,
    PORTA = 0x3B,
    OCR2 = 0x43,
    TCNT2 = 0x44,
    TCCR2 = 0x45,
    ICR1L = 0x46,
    ICR1H = 0x47,
    OCR1BL = 0x48,
    OCR1BH = 0x49,
    OCR1AL = 0x4A,
    OCR1AH = 0x4B,
    TCNT1L = 0x4C,
    TCNT1H = 0x4D,
    TCCR1B = 0x4E,
    TCCR1A = 0x4F,
    TCNT0 = 0x52,
    TCCR0 = 0x53,
    MCUCSR = 0x54,
    MCUCR = 0x55,
    TIFR = 0x58,
    TIMSK = 0x59,
    GIFR = 0x5A,
    GICR = 0x5B,
    OCR0 = 0x5C,
}

impl Reg {
    /// Data-space address of the register.
    pub const fn addr(self) -> u8 {
        self as u8
    }
}

/// A 16-bit register made of two adjacent 8-bit halves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reg16 {
    pub low: Reg,
    pub high: Reg,
}

impl Reg16 {
    pub const TCNT1: Reg16 = Reg16::new(Reg::TCNT1L, Reg::TCNT1H);
    pub const OCR1A: Reg16 = Reg16::new(Reg::OCR1AL, Reg::OCR1AH);
    pub const OCR1B: Reg16 = Reg16::new(Reg::OCR1BL, Reg::OCR1BH);
    pub const ICR1: Reg16 = Reg16::new(Reg::ICR1L, Reg::ICR1H);

    const fn new(low: Reg, high: Reg) -> Self {
        Self { low, high }
    }
}

/// A contiguous group of bits inside one register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Field {
    pub reg: Reg,
    pub offset: u8,
    pub width: u8,
}

impl Field {
    pub const fn new(reg: Reg, offset: u8, width: u8) -> Self {
        Self { reg, offset, width }
    }

    /// A single-bit field.
    pub const fn bit(reg: Reg, offset: u8) -> Self {
        Self::new(reg, offset, 1)
    }

    /// Bits of the register covered by this field.
    pub const fn mask(self) -> u8 {
        ((((1u16 << self.width) - 1) << self.offset) & 0xFF) as u8
    }

    /// Position `value` inside the register, dropping bits that do not fit.
    pub const fn encode(self, value: u8) -> u8 {
        ((value as u16) << self.offset) as u8 & self.mask()
    }
}

/// Field tables, one module per register.
pub mod tccr0 {
    use super::{Field, Reg};

    pub const CS0: Field = Field::new(Reg::TCCR0, 0, 3);
    pub const WGM01: Field = Field::bit(Reg::TCCR0, 3);
    pub const COM0: Field = Field::new(Reg::TCCR0, 4, 2);
    pub const WGM00: Field = Field::bit(Reg::TCCR0, 6);
    pub const FOC0: Field = Field::bit(Reg::TCCR0, 7);
}

pub mod tccr1a {
    use super::{Field, Reg};

    /// WGM11:10
    pub const WGM1_LOW: Field = Field::new(Reg::TCCR1A, 0, 2);
    pub const FOC1B: Field = Field::bit(Reg::TCCR1A, 2);
    pub const FOC1A: Field = Field::bit(Reg::TCCR1A, 3);
    pub const COM1B: Field = Field::new(Reg::TCCR1A, 4, 2);
    pub const COM1A: Field = Field::new(Reg::TCCR1A, 6, 2);
}

pub mod tccr1b {
    use super::{Field, Reg};

    pub const CS1: Field = Field::new(Reg::TCCR1B, 0, 3);
    /// WGM13:12
    pub const WGM1_HIGH: Field = Field::new(Reg::TCCR1B, 3, 2);
    pub const ICES1: Field = Field::bit(Reg::TCCR1B, 6);
    pub const ICNC1: Field = Field::bit(Reg::TCCR1B, 7);
}

pub mod tccr2 {
    use super::{Field, Reg};

    pub const CS2: Field = Field::new(Reg::TCCR2, 0, 3);
    pub const WGM21: Field = Field::bit(Reg::TCCR2, 3);
    pub const COM2: Field = Field::new(Reg::TCCR2, 4, 2);
    pub const WGM20: Field = Field::bit(Reg::TCCR2, 6);
    pub const FOC2: Field = Field::bit(Reg::TCCR2, 7);
}

/// Timer interrupt mask, shared by all three timers.
pub mod timsk {
    use super::{Field, Reg};

    pub const TOIE0: Field = Field::bit(Reg::TIMSK, 0);
    pub const OCIE0: Field = Field::bit(Reg::TIMSK, 1);
    pub const TOIE1: Field = Field::bit(Reg::TIMSK, 2);
    pub const OCIE1B: Field = Field::bit(Reg::TIMSK, 3);
    pub const OCIE1A: Field = Field::bit(Reg::TIMSK, 4);
    pub const TICIE1: Field = Field::bit(Reg::TIMSK, 5);
    pub const TOIE2: Field = Field::bit(Reg::TIMSK, 6);
    pub const OCIE2: Field = Field::bit(Reg::TIMSK, 7);
}

/// Timer interrupt flags, shared by all three timers. Write one to clear.
pub mod tifr {
    use super::{Field, Reg};

    pub const TOV0: Field = Field::bit(Reg::TIFR, 0);
    pub const OCF0: Field = Field::bit(Reg::TIFR, 1);
    pub const TOV1: Field = Field::bit(Reg::TIFR, 2);
    pub const OCF1B: Field = Field::bit(Reg::TIFR, 3);
    pub const OCF1A: Field = Field::bit(Reg::TIFR, 4);
    pub const ICF1: Field = Field::bit(Reg::TIFR, 5);
    pub const TOV2: Field = Field::bit(Reg::TIFR, 6);
    pub const OCF2: Field = Field::bit(Reg::TIFR, 7);
}

pub mod gicr {
    use super::{Field, Reg};

    pub const INT2: Field = Field::bit(Reg::GICR, 5);
    pub const INT0: Field = Field::bit(Reg::GICR, 6);
    pub const INT1: Field = Field::bit(Reg::GICR, 7);
}

/// External interrupt flags. Write one to clear.
pub mod gifr {
    use super::{Field, Reg};

    pub const INTF2: Field = Field::bit(Reg::GIFR, 5);
    pub const INTF0: Field = Field::bit(Reg::GIFR, 6);
    pub const INTF1: Field = Field::bit(Reg::GIFR, 7);
}

pub mod mcucr {
    use super::{Field, Reg};

    pub const ISC0: Field = Field::new(Reg::MCUCR, 0, 2);
    pub const ISC1: Field = Field::new(Reg::MCUCR, 2, 2);
    pub const SM: Field = Field::new(Reg::MCUCR, 4, 3);
    pub const SE: Field = Field::bit(Reg::MCUCR, 7);
}

pub mod mcucsr {
    use super::{Field, Reg};

    pub const ISC2: Field = Field::bit(Reg::MCUCSR, 6);
}

/// A GPIO port: data direction, output and input registers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Port {
    ddr: Reg,
    port: Reg,
    pin: Reg,
}

impl Port {
    pub const A: Port = Port::new(Reg::DDRA, Reg::PORTA, Reg::PINA);
    pub const B: Port = Port::new(Reg::DDRB, Reg::PORTB, Reg::PINB);
    pub const D: Port = Port::new(Reg::DDRD, Reg::PORTD, Reg::PIND);

    const fn new(ddr: Reg, port: Reg, pin: Reg) -> Self {
        Self { ddr, port, pin }
    }
}

/// A single GPIO line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pin {
    port: Port,
    bit: u8,
}

impl Pin {
    pub const PA0: Pin = Pin::new(Port::A, 0);
    pub const PA1: Pin = Pin::new(Port::A, 1);
    pub const PB2: Pin = Pin::new(Port::B, 2);
    pub const PB3: Pin = Pin::new(Port::B, 3);
    pub const PD2: Pin = Pin::new(Port::D, 2);
    pub const PD3: Pin = Pin::new(Port::D, 3);
    pub const PD4: Pin = Pin::new(Port::D, 4);
    pub const PD5: Pin = Pin::new(Port::D, 5);
    pub const PD7: Pin = Pin::new(Port::D, 7);

    const fn new(port: Port, bit: u8) -> Self {
        Self { port, bit }
    }

    /// Data direction bit, set for output.
    pub const fn direction(self) -> Field {
        Field::bit(self.port.ddr, self.bit)
    }

    /// Output latch bit, doubles as the pull-up enable for inputs.
    pub const fn output(self) -> Field {
        Field::bit(self.port.port, self.bit)
    }

    /// Input level bit.
    pub const fn input(self) -> Field {
        Field::bit(self.port.pin, self.bit)
    }
}

/// Byte-wide access to the I/O registers.
///
/// Only [`read`](RegisterFile::read) and [`write`](RegisterFile::write) are
/// backend specific, everything else is built on them.
pub trait RegisterFile {
    fn read(&self, reg: Reg) -> u8;

    fn write(&self, reg: Reg, value: u8);

    fn modify<F: FnOnce(u8) -> u8>(&self, reg: Reg, f: F) {
        let value = self.read(reg);
        self.write(reg, f(value));
    }

    fn read_field(&self, field: Field) -> u8 {
        (self.read(field.reg) & field.mask()) >> field.offset
    }

    /// Replace the bits of `field`, preserving the rest of the register.
    fn write_field(&self, field: Field, value: u8) {
        self.modify(field.reg, |r| (r & !field.mask()) | field.encode(value));
    }

    /// Like [`write_field`](RegisterFile::write_field) but safe against an
    /// interrupt handler changing the same register in between the read and
    /// the write.
    fn write_shared_field(&self, field: Field, value: u8) {
        critical_section::with(|_| self.write_field(field, value));
    }

    fn set_bit(&self, bit: Field) {
        self.write_field(bit, 1);
    }

    fn clear_bit(&self, bit: Field) {
        self.write_field(bit, 0);
    }

    fn bit_is_set(&self, bit: Field) -> bool {
        self.read_field(bit) != 0
    }

    /// Read a 16-bit register, low byte first so the high byte is latched.
    ///
    /// The pair runs in a critical section: all 16-bit registers of `TC1`
    /// share one `TEMP` latch.
    fn read_wide(&self, reg: Reg16) -> u16 {
        critical_section::with(|_| {
            let low = self.read(reg.low);
            let high = self.read(reg.high);
            u16::from_le_bytes([low, high])
        })
    }

    /// Write a 16-bit register, high byte first into the shared `TEMP`.
    fn write_wide(&self, reg: Reg16, value: u16) {
        let [low, high] = value.to_le_bytes();
        critical_section::with(|_| {
            self.write(reg.high, high);
            self.write(reg.low, low);
        });
    }

    /// Clear a write-one-to-clear flag without touching its neighbours.
    fn acknowledge(&self, flag: Field) {
        self.write(flag.reg, flag.mask());
    }
}

impl<T: RegisterFile> RegisterFile for &T {
    fn read(&self, reg: Reg) -> u8 {
        (**self).read(reg)
    }

    fn write(&self, reg: Reg, value: u8) {
        (**self).write(reg, value)
    }
}
