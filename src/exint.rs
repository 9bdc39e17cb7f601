//! External interrupt lines `INT0`, `INT1` and `INT2`.

use crate::callback::{Callback, CallbackTable};
use crate::regs::{Field, Pin, RegisterFile, gicr, gifr, mcucr, mcucsr};

/// Sense control of `INT0` and `INT1`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Sense {
    LowLevel,
    AnyChange,
    #[default]
    FallingEdge,
    RisingEdge,
}

/// Sense control of `INT2`, which is edge triggered only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Int2Sense {
    #[default]
    FallingEdge,
    RisingEdge,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Line {
    Int0,
    Int1,
    Int2,
}

impl Line {
    pub const ALL: [Line; 3] = [Line::Int0, Line::Int1, Line::Int2];

    const fn slot(self) -> usize {
        self as usize
    }

    pub const fn pin(self) -> Pin {
        match self {
            Line::Int0 => Pin::PD2,
            Line::Int1 => Pin::PD3,
            Line::Int2 => Pin::PB2,
        }
    }

    const fn enable(self) -> Field {
        match self {
            Line::Int0 => gicr::INT0,
            Line::Int1 => gicr::INT1,
            Line::Int2 => gicr::INT2,
        }
    }

    /// Status flag in `GIFR`.
    pub const fn flag(self) -> Field {
        match self {
            Line::Int0 => gifr::INTF0,
            Line::Int1 => gifr::INTF1,
            Line::Int2 => gifr::INTF2,
        }
    }

    const fn sense_field(self) -> Field {
        match self {
            Line::Int0 => mcucr::ISC0,
            Line::Int1 => mcucr::ISC1,
            Line::Int2 => mcucsr::ISC2,
        }
    }
}

/// A line together with a sense setting it supports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    Int0(Sense),
    Int1(Sense),
    Int2(Int2Sense),
}

impl Trigger {
    pub const fn line(self) -> Line {
        match self {
            Trigger::Int0(_) => Line::Int0,
            Trigger::Int1(_) => Line::Int1,
            Trigger::Int2(_) => Line::Int2,
        }
    }

    const fn sense_bits(self) -> u8 {
        match self {
            Trigger::Int0(sense) | Trigger::Int1(sense) => sense as u8,
            Trigger::Int2(sense) => sense as u8,
        }
    }
}

static CALLBACKS: CallbackTable<3> = CallbackTable::new();

/// Driver for the external interrupt lines.
pub struct ExternalInterrupts<R> {
    regs: R,
}

impl<R: RegisterFile> ExternalInterrupts<R> {
    pub fn new(regs: R) -> Self {
        Self { regs }
    }

    /// Make the line's pin an input and enable its interrupt.
    pub fn init(&mut self, trigger: Trigger, pull_up: bool) {
        let line = trigger.line();
        let regs = &self.regs;

        regs.write_shared_field(line.pin().direction(), 0);
        regs.write_shared_field(line.pin().output(), u8::from(pull_up));
        regs.write_shared_field(line.sense_field(), trigger.sense_bits());

        // Changing the sense can raise a spurious flag.
        regs.acknowledge(line.flag());
        regs.write_shared_field(line.enable(), 1);
    }

    /// Disable the line and restore its sense bits. The pin is left as is.
    pub fn deinit(&mut self, line: Line) {
        let regs = &self.regs;

        regs.write_shared_field(line.enable(), 0);
        regs.write_shared_field(line.sense_field(), 0);
        regs.acknowledge(line.flag());
    }

    /// Switch to a different sense without losing the enable state.
    pub fn change_sense(&mut self, trigger: Trigger) {
        let line = trigger.line();
        let regs = &self.regs;

        let enabled = self.is_enabled(line);
        regs.write_shared_field(line.enable(), 0);
        regs.write_shared_field(line.sense_field(), trigger.sense_bits());
        regs.acknowledge(line.flag());
        if enabled {
            regs.write_shared_field(line.enable(), 1);
        }
    }

    pub fn is_enabled(&self, line: Line) -> bool {
        self.regs.bit_is_set(line.enable())
    }

    pub fn set_callback(&self, line: Line, callback: Option<Callback>) {
        set_callback(line, callback);
    }

    pub fn free(self) -> R {
        self.regs
    }
}

/// Set the function called when `line` fires.
pub fn set_callback(line: Line, callback: Option<Callback>) {
    CALLBACKS.set(line.slot(), callback);
}

/// Handle an interrupt of `line` from its vector.
pub fn dispatch<R: RegisterFile>(regs: R, line: Line) {
    dispatch_with(regs, &CALLBACKS, line);
}

pub fn dispatch_with<R: RegisterFile>(regs: R, callbacks: &CallbackTable<3>, line: Line) {
    callbacks.invoke(line.slot());
    regs.acknowledge(line.flag());
}
