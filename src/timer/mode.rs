//! Waveform generation modes and what each of them needs from the driver.

use core::fmt;

/// Which compare output action table a mode uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Family {
    /// Normal, overflow and clear-on-compare modes.
    NonPwm,
    FastPwm,
    /// Phase correct and phase and frequency correct PWM.
    PhaseCorrect,
}

impl Family {
    pub const fn is_pwm(self) -> bool {
        !matches!(self, Family::NonPwm)
    }
}

/// Where the counter's TOP value comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Top {
    Fixed(u16),
    /// `OCR0`, `OCR2` or `OCR1A`.
    Compare,
    /// `ICR1`.
    InputCapture,
}

/// Interrupt source a non-PWM mode enables.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interrupt {
    Overflow,
    CompareMatch,
}

/// Register level description of a waveform generation mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModeInfo {
    /// WGM bits, `WGMn0` is bit 0.
    pub wgm: u8,
    pub family: Family,
    pub top: Top,
    pub interrupt: Option<Interrupt>,
    /// Whether the compare value is written to the compare register(s).
    pub loads_compare: bool,
}

impl ModeInfo {
    const fn non_pwm(wgm: u8, top: Top, interrupt: Interrupt, loads_compare: bool) -> Self {
        Self {
            wgm,
            family: Family::NonPwm,
            top,
            interrupt: Some(interrupt),
            loads_compare,
        }
    }

    const fn pwm(wgm: u8, family: Family, top: Top) -> Self {
        Self {
            wgm,
            family,
            top,
            interrupt: None,
            loads_compare: true,
        }
    }
}

/// Modes of the 8-bit timers `TC0` and `TC2`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode8 {
    Overflow,
    PhaseCorrectPwm,
    /// Clear timer on compare match.
    Ctc,
    FastPwm,
}

impl Mode8 {
    pub const ALL: [Mode8; 4] = [
        Mode8::Overflow,
        Mode8::PhaseCorrectPwm,
        Mode8::Ctc,
        Mode8::FastPwm,
    ];

    pub const fn info(self) -> ModeInfo {
        const MAX: Top = Top::Fixed(0xFF);

        match self {
            Mode8::Overflow => ModeInfo::non_pwm(0b00, MAX, Interrupt::Overflow, false),
            Mode8::PhaseCorrectPwm => ModeInfo::pwm(0b01, Family::PhaseCorrect, MAX),
            Mode8::Ctc => ModeInfo::non_pwm(0b10, Top::Compare, Interrupt::CompareMatch, true),
            Mode8::FastPwm => ModeInfo::pwm(0b11, Family::FastPwm, MAX),
        }
    }
}

/// Modes of the 16-bit timer `TC1`.
///
/// WGM pattern `0b1101` is reserved by the hardware and has no variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode16 {
    Normal,
    PhaseCorrect8,
    PhaseCorrect9,
    PhaseCorrect10,
    CtcOcr1a,
    FastPwm8,
    FastPwm9,
    FastPwm10,
    PhaseFrequencyCorrectIcr1,
    PhaseFrequencyCorrectOcr1a,
    PhaseCorrectIcr1,
    PhaseCorrectOcr1a,
    CtcIcr1,
    FastPwmIcr1,
    FastPwmOcr1a,
}

impl Mode16 {
    pub const ALL: [Mode16; 15] = [
        Mode16::Normal,
        Mode16::PhaseCorrect8,
        Mode16::PhaseCorrect9,
        Mode16::PhaseCorrect10,
        Mode16::CtcOcr1a,
        Mode16::FastPwm8,
        Mode16::FastPwm9,
        Mode16::FastPwm10,
        Mode16::PhaseFrequencyCorrectIcr1,
        Mode16::PhaseFrequencyCorrectOcr1a,
        Mode16::PhaseCorrectIcr1,
        Mode16::PhaseCorrectOcr1a,
        Mode16::CtcIcr1,
        Mode16::FastPwmIcr1,
        Mode16::FastPwmOcr1a,
    ];

    pub const fn info(self) -> ModeInfo {
        use Family::{FastPwm, PhaseCorrect};
        use Top::{Compare, Fixed, InputCapture};

        match self {
            Mode16::Normal => ModeInfo::non_pwm(0, Fixed(0xFFFF), Interrupt::Overflow, false),
            Mode16::PhaseCorrect8 => ModeInfo::pwm(1, PhaseCorrect, Fixed(0x00FF)),
            Mode16::PhaseCorrect9 => ModeInfo::pwm(2, PhaseCorrect, Fixed(0x01FF)),
            Mode16::PhaseCorrect10 => ModeInfo::pwm(3, PhaseCorrect, Fixed(0x03FF)),
            Mode16::CtcOcr1a => ModeInfo::non_pwm(4, Compare, Interrupt::CompareMatch, true),
            Mode16::FastPwm8 => ModeInfo::pwm(5, FastPwm, Fixed(0x00FF)),
            Mode16::FastPwm9 => ModeInfo::pwm(6, FastPwm, Fixed(0x01FF)),
            Mode16::FastPwm10 => ModeInfo::pwm(7, FastPwm, Fixed(0x03FF)),
            Mode16::PhaseFrequencyCorrectIcr1 => ModeInfo::pwm(8, PhaseCorrect, InputCapture),
            Mode16::PhaseFrequencyCorrectOcr1a => ModeInfo::pwm(9, PhaseCorrect, Compare),
            Mode16::PhaseCorrectIcr1 => ModeInfo::pwm(10, PhaseCorrect, InputCapture),
            Mode16::PhaseCorrectOcr1a => ModeInfo::pwm(11, PhaseCorrect, Compare),
            Mode16::CtcIcr1 => {
                ModeInfo::non_pwm(12, InputCapture, Interrupt::CompareMatch, true)
            }
            Mode16::FastPwmIcr1 => ModeInfo::pwm(14, FastPwm, InputCapture),
            Mode16::FastPwmOcr1a => ModeInfo::pwm(15, FastPwm, Compare),
        }
    }
}

/// A WGM pattern that does not select a usable mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReservedMode(pub u8);

impl fmt::Display for ReservedMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WGM pattern {:#06b} is not a usable TC1 mode", self.0)
    }
}

impl TryFrom<u8> for Mode16 {
    type Error = ReservedMode;

    fn try_from(wgm: u8) -> Result<Self, Self::Error> {
        Mode16::ALL
            .into_iter()
            .find(|mode| mode.info().wgm == wgm)
            .ok_or(ReservedMode(wgm))
    }
}
