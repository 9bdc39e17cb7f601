//! Digital clock state machine.
//!
//! Interrupt handlers only record what happened (`on_tick`, button moves);
//! the main loop calls [`ClockApp::advance`] and redraws.

/// Wall clock time, always a valid 24 hour time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TimeOfDay {
    hours: u8,
    minutes: u8,
    seconds: u8,
}

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay {
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    pub const fn new(hours: u8, minutes: u8, seconds: u8) -> Option<Self> {
        if hours < 24 && minutes < 60 && seconds < 60 {
            Some(Self {
                hours,
                minutes,
                seconds,
            })
        } else {
            None
        }
    }

    pub const fn hours(&self) -> u8 {
        self.hours
    }

    pub const fn minutes(&self) -> u8 {
        self.minutes
    }

    pub const fn seconds(&self) -> u8 {
        self.seconds
    }

    /// Advance by one second.
    pub fn tick(&mut self) {
        self.seconds += 1;
        if self.seconds == 60 {
            self.seconds = 0;
            self.minutes += 1;
        }
        if self.minutes == 60 {
            self.minutes = 0;
            self.hours += 1;
        }
        if self.hours == 24 {
            self.hours = 0;
        }
    }

    pub fn digit(&self, digit: Digit) -> u8 {
        let value = self.field(digit);
        if digit.is_tens() { value / 10 } else { value % 10 }
    }

    fn field(&self, digit: Digit) -> u8 {
        match digit {
            Digit::HourTens | Digit::HourUnits => self.hours,
            Digit::MinuteTens | Digit::MinuteUnits => self.minutes,
            Digit::SecondTens | Digit::SecondUnits => self.seconds,
        }
    }

    fn set_digit(&mut self, digit: Digit, value: u8) {
        let field = match digit {
            Digit::HourTens | Digit::HourUnits => &mut self.hours,
            Digit::MinuteTens | Digit::MinuteUnits => &mut self.minutes,
            Digit::SecondTens | Digit::SecondUnits => &mut self.seconds,
        };
        *field = if digit.is_tens() {
            value * 10 + *field % 10
        } else {
            *field / 10 * 10 + value
        };
    }

    /// Largest value `digit` may take given the other digits.
    fn digit_max(&self, digit: Digit) -> u8 {
        match digit {
            Digit::HourTens => 2,
            Digit::HourUnits if self.hours >= 20 => 3,
            Digit::MinuteTens | Digit::SecondTens => 5,
            _ => 9,
        }
    }
}

/// An editable position of the `HH:MM:SS` line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Digit {
    HourTens,
    HourUnits,
    MinuteTens,
    MinuteUnits,
    SecondTens,
    SecondUnits,
}

impl Digit {
    pub const ALL: [Digit; 6] = [
        Digit::HourTens,
        Digit::HourUnits,
        Digit::MinuteTens,
        Digit::MinuteUnits,
        Digit::SecondTens,
        Digit::SecondUnits,
    ];

    /// Display column, colons sit at 6 and 9.
    pub const fn column(self) -> u8 {
        match self {
            Digit::HourTens => 4,
            Digit::HourUnits => 5,
            Digit::MinuteTens => 7,
            Digit::MinuteUnits => 8,
            Digit::SecondTens => 10,
            Digit::SecondUnits => 11,
        }
    }

    /// Short name shown while the digit is being edited.
    pub const fn label(self) -> &'static str {
        match self {
            Digit::HourTens => "h10",
            Digit::HourUnits => "h1",
            Digit::MinuteTens => "m10",
            Digit::MinuteUnits => "m1",
            Digit::SecondTens => "s10",
            Digit::SecondUnits => "s1",
        }
    }

    const fn is_tens(self) -> bool {
        matches!(
            self,
            Digit::HourTens | Digit::MinuteTens | Digit::SecondTens
        )
    }

    /// Digit to the right, wrapping back to the hours.
    pub const fn next(self) -> Digit {
        match self {
            Digit::HourTens => Digit::HourUnits,
            Digit::HourUnits => Digit::MinuteTens,
            Digit::MinuteTens => Digit::MinuteUnits,
            Digit::MinuteUnits => Digit::SecondTens,
            Digit::SecondTens => Digit::SecondUnits,
            Digit::SecondUnits => Digit::HourTens,
        }
    }

    /// Digit to the left, stopping at the hour tens.
    pub const fn prev(self) -> Digit {
        match self {
            Digit::HourTens | Digit::HourUnits => Digit::HourTens,
            Digit::MinuteTens => Digit::HourUnits,
            Digit::MinuteUnits => Digit::MinuteTens,
            Digit::SecondTens => Digit::MinuteUnits,
            Digit::SecondUnits => Digit::SecondTens,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    Running,
    Editing(Digit),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClockApp {
    time: TimeOfDay,
    state: State,
    /// Set by the timer interrupt, consumed by the main loop.
    tick_pending: bool,
}

impl ClockApp {
    pub const fn new(time: TimeOfDay) -> Self {
        Self {
            time,
            state: State::Running,
            tick_pending: false,
        }
    }

    pub const fn time(&self) -> TimeOfDay {
        self.time
    }

    pub const fn state(&self) -> State {
        self.state
    }

    pub const fn is_running(&self) -> bool {
        matches!(self.state, State::Running)
    }

    /// Record one elapsed second.
    pub fn on_tick(&mut self) {
        self.tick_pending = true;
    }

    /// Apply a pending tick. Returns whether the time changed.
    pub fn advance(&mut self) -> bool {
        let pending = core::mem::replace(&mut self.tick_pending, false);
        if pending && self.is_running() {
            self.time.tick();
            true
        } else {
            false
        }
    }

    pub fn move_right(&mut self) {
        self.state = State::Editing(match self.state {
            State::Running => Digit::HourTens,
            State::Editing(digit) => digit.next(),
        });
    }

    pub fn move_left(&mut self) {
        self.state = State::Editing(match self.state {
            State::Running => Digit::HourTens,
            State::Editing(digit) => digit.prev(),
        });
    }

    /// Leave edit mode and resume counting from the edited time.
    pub fn confirm(&mut self) {
        self.state = State::Running;
        self.tick_pending = false;
    }

    pub fn increment(&mut self) {
        let State::Editing(digit) = self.state else {
            return;
        };

        let value = self.time.digit(digit);
        let value = if value >= self.time.digit_max(digit) {
            0
        } else {
            value + 1
        };
        self.time.set_digit(digit, value);

        if digit == Digit::HourTens && self.time.hours > 23 {
            self.time.hours = 23;
        }
    }

    pub fn decrement(&mut self) {
        if let State::Editing(digit) = self.state {
            let value = self.time.digit(digit).saturating_sub(1);
            self.time.set_digit(digit, value);
        }
    }
}

impl Default for ClockApp {
    fn default() -> Self {
        Self::new(TimeOfDay::MIDNIGHT)
    }
}
