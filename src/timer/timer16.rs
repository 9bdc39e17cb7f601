use super::{Channel, ClockSource, CompareOutputs, Interrupt, Mode16, TimerId, Top};
use crate::callback::Callback;
use crate::regs::{Field, Pin, Reg, Reg16, RegisterFile, tccr1a, tccr1b, tifr, timsk};

/// Configuration of `TC1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timer16Config {
    /// Counter value to start from.
    pub initial_value: u16,
    /// Compare value of the selected channel; unused in normal mode.
    pub compare_value: u16,
    /// `ICR1` value, only used by the ICR1-topped modes.
    pub input_capture: u16,
    pub clock: ClockSource,
    pub mode: Mode16,
    pub channel: Channel,
    pub outputs: CompareOutputs,
}

impl Timer16Config {
    pub const fn new(mode: Mode16, clock: ClockSource) -> Self {
        Self {
            initial_value: 0,
            compare_value: 0,
            input_capture: 0,
            clock,
            mode,
            channel: Channel::A,
            outputs: CompareOutputs::DISCONNECTED,
        }
    }

    pub const fn with_initial_value(mut self, value: u16) -> Self {
        self.initial_value = value;
        self
    }

    pub const fn with_compare_value(mut self, value: u16) -> Self {
        self.compare_value = value;
        self
    }

    pub const fn with_input_capture(mut self, value: u16) -> Self {
        self.input_capture = value;
        self
    }

    pub const fn with_channel(mut self, channel: Channel) -> Self {
        self.channel = channel;
        self
    }

    pub const fn with_outputs(mut self, outputs: CompareOutputs) -> Self {
        self.outputs = outputs;
        self
    }
}

/// Per channel bits of `TC1`.
struct ChannelBits {
    com: Field,
    foc: Field,
    ocie: Field,
    pin: Pin,
}

impl ChannelBits {
    const fn of(channel: Channel) -> Self {
        match channel {
            Channel::A => Self {
                com: tccr1a::COM1A,
                foc: tccr1a::FOC1A,
                ocie: timsk::OCIE1A,
                pin: Pin::PD5,
            },
            Channel::B => Self {
                com: tccr1a::COM1B,
                foc: tccr1a::FOC1B,
                ocie: timsk::OCIE1B,
                pin: Pin::PD4,
            },
        }
    }
}

/// Driver for the 16-bit timer unit `TC1`.
pub struct Timer1<R> {
    regs: R,
}

impl<R: RegisterFile> Timer1<R> {
    pub const ID: TimerId = TimerId::Timer1;

    pub fn new(regs: R) -> Self {
        Self { regs }
    }

    /// Configure the unit and start it with the configured clock.
    pub fn init(&mut self, config: &Timer16Config) {
        let info = config.mode.info();
        let channel = ChannelBits::of(config.channel);
        let regs = &self.regs;

        regs.write_wide(Reg16::TCNT1, config.initial_value);
        regs.write_field(tccr1b::CS1, config.clock.bits());

        regs.write_field(tccr1a::WGM1_LOW, info.wgm & 0b11);
        regs.write_field(tccr1b::WGM1_HIGH, info.wgm >> 2);

        if info.family.is_pwm() {
            regs.write_shared_field(channel.pin.direction(), 1);
            regs.clear_bit(channel.foc);
        } else {
            regs.set_bit(channel.foc);
        }

        regs.write_field(channel.com, config.outputs.bits_for(info.family));

        if info.top == Top::InputCapture {
            regs.write_wide(Reg16::ICR1, config.input_capture);
        }

        if info.loads_compare {
            self.load_compare(config.compare_value, config.channel);
        }

        match info.interrupt {
            Some(Interrupt::Overflow) => regs.write_shared_field(timsk::TOIE1, 1),
            Some(Interrupt::CompareMatch) => regs.write_shared_field(channel.ocie, 1),
            None => {}
        }
    }

    /// Resume counting with `clock`. Only the clock select bits change.
    pub fn start(&mut self, clock: ClockSource) {
        self.regs.write_field(tccr1b::CS1, clock.bits());
    }

    /// Halt the counter, keeping its value and configuration.
    pub fn stop(&mut self) {
        self.start(ClockSource::Stopped);
    }

    pub fn is_running(&self) -> bool {
        self.regs.read_field(tccr1b::CS1) != 0
    }

    /// Return the unit to its power-on state.
    pub fn deinit(&mut self) {
        let regs = &self.regs;

        regs.write(Reg::TCCR1A, 0);
        regs.write(Reg::TCCR1B, 0);
        regs.write_wide(Reg16::TCNT1, 0);
        regs.write_wide(Reg16::OCR1A, 0);
        regs.write_wide(Reg16::OCR1B, 0);
        regs.write_wide(Reg16::ICR1, 0);

        critical_section::with(|_| {
            for enable in [timsk::TOIE1, timsk::OCIE1A, timsk::OCIE1B, timsk::TICIE1] {
                regs.clear_bit(enable);
            }
        });
        for flag in [tifr::TOV1, tifr::OCF1A, tifr::OCF1B, tifr::ICF1] {
            regs.acknowledge(flag);
        }
    }

    /// Replace the compare value of `channel` without touching the mode.
    pub fn set_compare_value(&mut self, value: u16, channel: Channel) {
        self.load_compare(value, channel);
    }

    // Channel B needs OCR1A one count above it.
    fn load_compare(&self, value: u16, channel: Channel) {
        match channel {
            Channel::A => self.regs.write_wide(Reg16::OCR1A, value),
            Channel::B => {
                self.regs.write_wide(Reg16::OCR1A, value.wrapping_add(1));
                self.regs.write_wide(Reg16::OCR1B, value);
            }
        }
    }

    pub fn compare_value(&self, channel: Channel) -> u16 {
        match channel {
            Channel::A => self.regs.read_wide(Reg16::OCR1A),
            Channel::B => self.regs.read_wide(Reg16::OCR1B),
        }
    }

    pub fn counter(&self) -> u16 {
        self.regs.read_wide(Reg16::TCNT1)
    }

    /// Set the function called from this unit's interrupts.
    pub fn set_callback(&self, callback: Option<Callback>) {
        super::set_callback(Self::ID, callback);
    }

    /// Give back the register handle.
    pub fn free(self) -> R {
        self.regs
    }
}
