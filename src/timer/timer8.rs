use core::marker::PhantomData;

use super::{ClockSource, CompareOutputs, Interrupt, Mode8, TimerId};
use crate::callback::Callback;
use crate::regs::{Field, Pin, Reg, RegisterFile, tccr0, tccr2, tifr, timsk};

/// Register layout of an 8-bit timer unit.
pub trait Unit8 {
    const ID: TimerId;

    const TCCR: Reg;
    const TCNT: Reg;
    const OCR: Reg;

    const CS: Field;
    const WGM0: Field;
    const WGM1: Field;
    const COM: Field;
    const FOC: Field;

    const TOIE: Field;
    const OCIE: Field;
    const TOV: Field;
    const OCF: Field;

    /// Output compare pin driven in PWM modes.
    const OC_PIN: Pin;

    /// `CS` field value selecting `clock`.
    fn clock_bits(clock: ClockSource) -> u8 {
        clock.bits()
    }
}

/// Timer/counter 0.
pub enum Tc0 {}

/// Timer/counter 2.
pub enum Tc2 {}

impl Unit8 for Tc0 {
    const ID: TimerId = TimerId::Timer0;

    const TCCR: Reg = Reg::TCCR0;
    const TCNT: Reg = Reg::TCNT0;
    const OCR: Reg = Reg::OCR0;

    const CS: Field = tccr0::CS0;
    const WGM0: Field = tccr0::WGM00;
    const WGM1: Field = tccr0::WGM01;
    const COM: Field = tccr0::COM0;
    const FOC: Field = tccr0::FOC0;

    const TOIE: Field = timsk::TOIE0;
    const OCIE: Field = timsk::OCIE0;
    const TOV: Field = tifr::TOV0;
    const OCF: Field = tifr::OCF0;

    const OC_PIN: Pin = Pin::PB3;
}

impl Unit8 for Tc2 {
    const ID: TimerId = TimerId::Timer2;

    const TCCR: Reg = Reg::TCCR2;
    const TCNT: Reg = Reg::TCNT2;
    const OCR: Reg = Reg::OCR2;

    const CS: Field = tccr2::CS2;
    const WGM0: Field = tccr2::WGM20;
    const WGM1: Field = tccr2::WGM21;
    const COM: Field = tccr2::COM2;
    const FOC: Field = tccr2::FOC2;

    const TOIE: Field = timsk::TOIE2;
    const OCIE: Field = timsk::OCIE2;
    const TOV: Field = tifr::TOV2;
    const OCF: Field = tifr::OCF2;

    const OC_PIN: Pin = Pin::PD7;

    // The TC2 prescaler has extra /32 and /128 taps.
    fn clock_bits(clock: ClockSource) -> u8 {
        match clock {
            ClockSource::Stopped => 0,
            ClockSource::Div1 => 1,
            ClockSource::Div8 => 2,
            ClockSource::Div64 => 4,
            ClockSource::Div256 => 6,
            ClockSource::Div1024 => 7,
        }
    }
}

/// Configuration of `TC0` or `TC2`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timer8Config {
    /// Counter value to start from.
    pub initial_value: u8,
    /// Compare register value; unused in overflow mode.
    pub compare_value: u8,
    pub clock: ClockSource,
    pub mode: Mode8,
    pub outputs: CompareOutputs,
}

impl Timer8Config {
    pub const fn new(mode: Mode8, clock: ClockSource) -> Self {
        Self {
            initial_value: 0,
            compare_value: 0,
            clock,
            mode,
            outputs: CompareOutputs::DISCONNECTED,
        }
    }

    pub const fn with_initial_value(mut self, value: u8) -> Self {
        self.initial_value = value;
        self
    }

    pub const fn with_compare_value(mut self, value: u8) -> Self {
        self.compare_value = value;
        self
    }

    pub const fn with_outputs(mut self, outputs: CompareOutputs) -> Self {
        self.outputs = outputs;
        self
    }
}

/// Driver for an 8-bit timer unit.
pub struct Timer8<U, R> {
    regs: R,
    _unit: PhantomData<U>,
}

pub type Timer0<R> = Timer8<Tc0, R>;
pub type Timer2<R> = Timer8<Tc2, R>;

impl<U: Unit8, R: RegisterFile> Timer8<U, R> {
    pub fn new(regs: R) -> Self {
        Self {
            regs,
            _unit: PhantomData,
        }
    }

    /// Configure the unit and start it with the configured clock.
    pub fn init(&mut self, config: &Timer8Config) {
        let info = config.mode.info();
        let regs = &self.regs;

        regs.write(U::TCNT, config.initial_value);
        regs.write_field(U::CS, U::clock_bits(config.clock));

        regs.write_field(U::WGM0, info.wgm & 1);
        regs.write_field(U::WGM1, info.wgm >> 1);

        if info.family.is_pwm() {
            regs.write_shared_field(U::OC_PIN.direction(), 1);
            regs.clear_bit(U::FOC);
        } else {
            regs.set_bit(U::FOC);
        }

        regs.write_field(U::COM, config.outputs.bits_for(info.family));

        if info.loads_compare {
            regs.write(U::OCR, config.compare_value);
        }

        match info.interrupt {
            Some(Interrupt::Overflow) => regs.write_shared_field(U::TOIE, 1),
            Some(Interrupt::CompareMatch) => regs.write_shared_field(U::OCIE, 1),
            None => {}
        }
    }

    /// Resume counting with `clock`. Only the clock select bits change.
    pub fn start(&mut self, clock: ClockSource) {
        self.regs.write_field(U::CS, U::clock_bits(clock));
    }

    /// Halt the counter, keeping its value and configuration.
    pub fn stop(&mut self) {
        self.start(ClockSource::Stopped);
    }

    pub fn is_running(&self) -> bool {
        self.regs.read_field(U::CS) != 0
    }

    /// Return the unit to its power-on state.
    pub fn deinit(&mut self) {
        let regs = &self.regs;

        regs.write(U::TCCR, 0);
        regs.write(U::TCNT, 0);
        regs.write(U::OCR, 0);

        critical_section::with(|_| {
            regs.clear_bit(U::TOIE);
            regs.clear_bit(U::OCIE);
        });
        regs.acknowledge(U::TOV);
        regs.acknowledge(U::OCF);
    }

    /// Replace the compare value without touching the mode.
    pub fn set_compare_value(&mut self, value: u8) {
        self.regs.write(U::OCR, value);
    }

    pub fn compare_value(&self) -> u8 {
        self.regs.read(U::OCR)
    }

    pub fn counter(&self) -> u8 {
        self.regs.read(U::TCNT)
    }

    /// Set the function called from this unit's interrupts.
    pub fn set_callback(&self, callback: Option<Callback>) {
        super::set_callback(U::ID, callback);
    }

    /// Give back the register handle.
    pub fn free(self) -> R {
        self.regs
    }
}
