//! Drivers for the three timer/counter units.
//!
//! `TC0` and `TC2` are 8-bit, single channel. `TC1` is 16-bit with two
//! output compare channels and an input capture register. Each unit has
//! its own configuration type so that options a unit does not have cannot
//! be expressed.

mod mode;
mod timer16;
mod timer8;

pub use mode::{Family, Interrupt, Mode16, Mode8, ModeInfo, ReservedMode, Top};
pub use timer16::{Timer1, Timer16Config};
pub use timer8::{Tc0, Tc2, Timer0, Timer2, Timer8, Timer8Config, Unit8};

use crate::callback::{Callback, CallbackTable};
use crate::regs::{Field, RegisterFile, tifr};

/// Prescaler selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockSource {
    /// No clock, the counter is halted.
    Stopped,
    Div1,
    Div8,
    Div64,
    Div256,
    Div1024,
}

impl ClockSource {
    /// CPU clock division ratio, zero when stopped.
    pub const fn divisor(self) -> u32 {
        match self {
            ClockSource::Stopped => 0,
            ClockSource::Div1 => 1,
            ClockSource::Div8 => 8,
            ClockSource::Div64 => 64,
            ClockSource::Div256 => 256,
            ClockSource::Div1024 => 1024,
        }
    }

    /// `CSn2:0` value used by `TC0` and `TC1`.
    pub const fn bits(self) -> u8 {
        match self {
            ClockSource::Stopped => 0,
            ClockSource::Div1 => 1,
            ClockSource::Div8 => 2,
            ClockSource::Div64 => 3,
            ClockSource::Div256 => 4,
            ClockSource::Div1024 => 5,
        }
    }
}

/// Output compare channel of `TC1`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Channel {
    #[default]
    A,
    B,
}

/// Compare output action in normal and CTC modes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NonPwmAction {
    #[default]
    Disconnected,
    Toggle,
    Clear,
    Set,
}

/// Compare output action in fast PWM modes.
///
/// `Reserved` is passed to the hardware as-is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FastPwmAction {
    #[default]
    Disconnected,
    Reserved,
    Clear,
    Set,
}

/// Compare output action in phase correct modes.
///
/// `Reserved` is passed to the hardware as-is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PhaseCorrectAction {
    #[default]
    Disconnected,
    Reserved,
    Clear,
    Set,
}

/// Compare output action for each mode family.
///
/// Only the entry matching the configured mode is used.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompareOutputs {
    pub non_pwm: NonPwmAction,
    pub fast_pwm: FastPwmAction,
    pub phase_correct: PhaseCorrectAction,
}

impl CompareOutputs {
    pub const DISCONNECTED: CompareOutputs = CompareOutputs {
        non_pwm: NonPwmAction::Disconnected,
        fast_pwm: FastPwmAction::Disconnected,
        phase_correct: PhaseCorrectAction::Disconnected,
    };

    /// `COMn1:0` bits for a mode of the given family.
    pub const fn bits_for(&self, family: Family) -> u8 {
        match family {
            Family::NonPwm => self.non_pwm as u8,
            Family::FastPwm => self.fast_pwm as u8,
            Family::PhaseCorrect => self.phase_correct as u8,
        }
    }
}

/// One of the three timer units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerId {
    Timer0,
    Timer1,
    Timer2,
}

impl TimerId {
    const fn slot(self) -> usize {
        self as usize
    }
}

/// Hardware event that has an interrupt vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Timer0Overflow,
    Timer0Compare,
    Timer1Overflow,
    Timer1CompareA,
    Timer1CompareB,
    Timer2Overflow,
    Timer2Compare,
}

impl Event {
    pub const fn timer(self) -> TimerId {
        match self {
            Event::Timer0Overflow | Event::Timer0Compare => TimerId::Timer0,
            Event::Timer1Overflow | Event::Timer1CompareA | Event::Timer1CompareB => {
                TimerId::Timer1
            }
            Event::Timer2Overflow | Event::Timer2Compare => TimerId::Timer2,
        }
    }

    /// Status flag in `TIFR` raised by this event.
    pub const fn flag(self) -> Field {
        match self {
            Event::Timer0Overflow => tifr::TOV0,
            Event::Timer0Compare => tifr::OCF0,
            Event::Timer1Overflow => tifr::TOV1,
            Event::Timer1CompareA => tifr::OCF1A,
            Event::Timer1CompareB => tifr::OCF1B,
            Event::Timer2Overflow => tifr::TOV2,
            Event::Timer2Compare => tifr::OCF2,
        }
    }
}

/// One callback slot per timer unit.
pub type TimerCallbacks = CallbackTable<3>;

static CALLBACKS: TimerCallbacks = CallbackTable::new();

/// Set the function called on every interrupt of `timer`.
///
/// `None` leaves the interrupts acknowledged but otherwise ignored.
pub fn set_callback(timer: TimerId, callback: Option<Callback>) {
    CALLBACKS.set(timer.slot(), callback);
}

/// Handle `event` from its interrupt vector.
pub fn dispatch<R: RegisterFile>(regs: R, event: Event) {
    dispatch_with(regs, &CALLBACKS, event);
}

/// Run the callback registered for the event's timer in `callbacks`, then
/// clear the event's flag.
pub fn dispatch_with<R: RegisterFile>(regs: R, callbacks: &TimerCallbacks, event: Event) {
    callbacks.invoke(event.timer().slot());
    regs.acknowledge(event.flag());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regs::{Reg, SimRegisters};
    use core::sync::atomic::{AtomicU8, Ordering};

    static TICKS: AtomicU8 = AtomicU8::new(0);

    fn tick() {
        TICKS.fetch_add(1, Ordering::SeqCst);
    }

    #[test]
    fn compare_output_bits_follow_family() {
        let outputs = CompareOutputs {
            non_pwm: NonPwmAction::Toggle,
            fast_pwm: FastPwmAction::Set,
            phase_correct: PhaseCorrectAction::Clear,
        };
        assert_eq!(outputs.bits_for(Family::NonPwm), 0b01);
        assert_eq!(outputs.bits_for(Family::FastPwm), 0b11);
        assert_eq!(outputs.bits_for(Family::PhaseCorrect), 0b10);
        assert_eq!(CompareOutputs::default(), CompareOutputs::DISCONNECTED);
    }

    #[test]
    fn dispatch_clears_only_its_own_flag() {
        let regs = SimRegisters::new();
        let callbacks = TimerCallbacks::new();
        callbacks.set(TimerId::Timer1.slot(), Some(tick));

        regs.raise(tifr::OCF1A);
        regs.raise(tifr::TOV0);
        regs.raise(tifr::OCF2);

        dispatch_with(&regs, &callbacks, Event::Timer1CompareA);

        assert_eq!(TICKS.load(Ordering::SeqCst), 1);
        assert_eq!(regs.peek(Reg::TIFR), tifr::TOV0.mask() | tifr::OCF2.mask());
    }

    #[test]
    fn dispatch_without_callback_still_acknowledges() {
        let regs = SimRegisters::new();
        let callbacks = TimerCallbacks::new();

        regs.raise(tifr::TOV2);
        dispatch_with(&regs, &callbacks, Event::Timer2Overflow);

        assert_eq!(regs.peek(Reg::TIFR), 0);
    }

    #[test]
    fn events_map_to_units() {
        assert_eq!(Event::Timer0Compare.timer(), TimerId::Timer0);
        assert_eq!(Event::Timer1CompareB.timer(), TimerId::Timer1);
        assert_eq!(Event::Timer2Overflow.timer(), TimerId::Timer2);
        assert_eq!(Event::Timer1CompareB.flag(), tifr::OCF1B);
    }
}
