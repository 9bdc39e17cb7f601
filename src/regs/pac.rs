use super::{Reg, Reg16, RegisterFile};
use crate::hal::pac;

macro_rules! put {
    ($reg:expr, $value:expr) => {{
        $reg.write(|w| unsafe { w.bits($value) });
    }};
}

/// The chip's I/O registers, reached through the `avr-device` register
/// blocks.
///
/// Owns the timer and external interrupt peripherals. The port registers
/// belong to `atmega-hal`'s pins, so direction and pull-up bits are only
/// changed through field writes inside critical sections.
pub struct PacRegisters {
    tc0: pac::TC0,
    tc1: pac::TC1,
    tc2: pac::TC2,
    exint: pac::EXINT,
}

impl PacRegisters {
    pub fn new(tc0: pac::TC0, tc1: pac::TC1, tc2: pac::TC2, exint: pac::EXINT) -> Self {
        Self {
            tc0,
            tc1,
            tc2,
            exint,
        }
    }

    fn porta(&self) -> &pac::porta::RegisterBlock {
        // SAFETY: Only single field writes inside critical sections, see above.
        unsafe { &*pac::PORTA::ptr() }
    }

    fn portb(&self) -> &pac::portb::RegisterBlock {
        // SAFETY: As for `porta`.
        unsafe { &*pac::PORTB::ptr() }
    }

    fn portd(&self) -> &pac::portd::RegisterBlock {
        // SAFETY: As for `porta`.
        unsafe { &*pac::PORTD::ptr() }
    }

    // Byte access to one half of a TC1 register goes through the 16-bit
    // register, so the TEMP latch is always used in the right order.
    fn tc1_half(reg: Reg) -> Option<(Reg16, bool)> {
        let wide = match reg {
            Reg::TCNT1L | Reg::TCNT1H => Reg16::TCNT1,
            Reg::OCR1AL | Reg::OCR1AH => Reg16::OCR1A,
            Reg::OCR1BL | Reg::OCR1BH => Reg16::OCR1B,
            Reg::ICR1L | Reg::ICR1H => Reg16::ICR1,
            _ => return None,
        };
        Some((wide, reg == wide.high))
    }
}

impl RegisterFile for PacRegisters {
    fn read(&self, reg: Reg) -> u8 {
        if let Some((wide, high)) = Self::tc1_half(reg) {
            let [low_byte, high_byte] = self.read_wide(wide).to_le_bytes();
            return if high { high_byte } else { low_byte };
        }

        match reg {
            Reg::PINA => self.porta().pina.read().bits(),
            Reg::DDRA => self.porta().ddra.read().bits(),
            Reg::PORTA => self.porta().porta.read().bits(),
            Reg::PINB => self.portb().pinb.read().bits(),
            Reg::DDRB => self.portb().ddrb.read().bits(),
            Reg::PORTB => self.portb().portb.read().bits(),
            Reg::PIND => self.portd().pind.read().bits(),
            Reg::DDRD => self.portd().ddrd.read().bits(),
            Reg::PORTD => self.portd().portd.read().bits(),
            Reg::TCCR0 => self.tc0.tccr0.read().bits(),
            Reg::TCNT0 => self.tc0.tcnt0.read().bits(),
            Reg::OCR0 => self.tc0.ocr0.read().bits(),
            Reg::TCCR1A => self.tc1.tccr1a.read().bits(),
            Reg::TCCR1B => self.tc1.tccr1b.read().bits(),
            Reg::TCCR2 => self.tc2.tccr2.read().bits(),
            Reg::TCNT2 => self.tc2.tcnt2.read().bits(),
            Reg::OCR2 => self.tc2.ocr2.read().bits(),
            Reg::TIMSK => self.tc1.timsk.read().bits(),
            Reg::TIFR => self.tc1.tifr.read().bits(),
            Reg::GICR => self.exint.gicr.read().bits(),
            Reg::GIFR => self.exint.gifr.read().bits(),
            Reg::MCUCR => self.exint.mcucr.read().bits(),
            Reg::MCUCSR => self.exint.mcucsr.read().bits(),
            Reg::ICR1L
            | Reg::ICR1H
            | Reg::OCR1BL
            | Reg::OCR1BH
            | Reg::OCR1AL
            | Reg::OCR1AH
            | Reg::TCNT1L
            | Reg::TCNT1H => 0,
        }
    }

    fn write(&self, reg: Reg, value: u8) {
        if let Some((wide, high)) = Self::tc1_half(reg) {
            critical_section::with(|_| {
                let [mut low_byte, mut high_byte] = self.read_wide(wide).to_le_bytes();
                if high {
                    high_byte = value;
                } else {
                    low_byte = value;
                }
                self.write_wide(wide, u16::from_le_bytes([low_byte, high_byte]));
            });
            return;
        }

        match reg {
            Reg::DDRA => put!(self.porta().ddra, value),
            Reg::PORTA => put!(self.porta().porta, value),
            Reg::DDRB => put!(self.portb().ddrb, value),
            Reg::PORTB => put!(self.portb().portb, value),
            Reg::DDRD => put!(self.portd().ddrd, value),
            Reg::PORTD => put!(self.portd().portd, value),
            Reg::TCCR0 => put!(self.tc0.tccr0, value),
            Reg::TCNT0 => put!(self.tc0.tcnt0, value),
            Reg::OCR0 => put!(self.tc0.ocr0, value),
            Reg::TCCR1A => put!(self.tc1.tccr1a, value),
            Reg::TCCR1B => put!(self.tc1.tccr1b, value),
            Reg::TCCR2 => put!(self.tc2.tccr2, value),
            Reg::TCNT2 => put!(self.tc2.tcnt2, value),
            Reg::OCR2 => put!(self.tc2.ocr2, value),
            Reg::TIMSK => put!(self.tc1.timsk, value),
            Reg::TIFR => put!(self.tc1.tifr, value),
            Reg::GICR => put!(self.exint.gicr, value),
            Reg::GIFR => put!(self.exint.gifr, value),
            Reg::MCUCR => put!(self.exint.mcucr, value),
            Reg::MCUCSR => put!(self.exint.mcucsr, value),
            // Input registers are read-only.
            Reg::PINA | Reg::PINB | Reg::PIND => {}
            Reg::ICR1L
            | Reg::ICR1H
            | Reg::OCR1BL
            | Reg::OCR1BH
            | Reg::OCR1AL
            | Reg::OCR1AH
            | Reg::TCNT1L
            | Reg::TCNT1H => {}
        }
    }

    // Every `Reg16` is a TC1 register.
    fn read_wide(&self, reg: Reg16) -> u16 {
        let tc1 = &self.tc1;
        critical_section::with(|_| match reg.low {
            Reg::TCNT1L => tc1.tcnt1.read().bits(),
            Reg::OCR1AL => tc1.ocr1a.read().bits(),
            Reg::OCR1BL => tc1.ocr1b.read().bits(),
            Reg::ICR1L => tc1.icr1.read().bits(),
            _ => 0,
        })
    }

    fn write_wide(&self, reg: Reg16, value: u16) {
        let tc1 = &self.tc1;
        critical_section::with(|_| match reg.low {
            Reg::TCNT1L => put!(tc1.tcnt1, value),
            Reg::OCR1AL => put!(tc1.ocr1a, value),
            Reg::OCR1BL => put!(tc1.ocr1b, value),
            Reg::ICR1L => put!(tc1.icr1, value),
            _ => {}
        });
    }
}
