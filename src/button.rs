use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;

/// Time a press has to stay stable to be accepted.
pub const DEBOUNCE_MS: u32 = 25;

/// Active-low push button read by polling.
pub struct Button<P> {
    pin: P,
    /// A press was reported and the button has not been released since.
    held: bool,
}

impl<P: InputPin> Button<P> {
    pub fn new(pin: P) -> Self {
        Self { pin, held: false }
    }

    /// Returns `true` once for every debounced press.
    pub fn poll<D: DelayNs>(&mut self, delay: &mut D) -> Result<bool, P::Error> {
        if self.pin.is_high()? {
            self.held = false;
            return Ok(false);
        }
        if self.held {
            return Ok(false);
        }

        delay.delay_ms(DEBOUNCE_MS);

        if self.pin.is_low()? {
            self.held = true;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn free(self) -> P {
        self.pin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;
    use std::collections::VecDeque;

    /// Pin that plays back a list of levels, `true` meaning pressed.
    struct Script(VecDeque<bool>);

    impl ErrorType for Script {
        type Error = Infallible;
    }

    impl InputPin for Script {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            Ok(!self.is_low()?)
        }

        fn is_low(&mut self) -> Result<bool, Infallible> {
            Ok(self.0.pop_front().expect("pin read past end of script"))
        }
    }

    #[derive(Default)]
    struct Clock {
        elapsed_ns: u64,
    }

    impl DelayNs for Clock {
        fn delay_ns(&mut self, ns: u32) {
            self.elapsed_ns += u64::from(ns);
        }
    }

    fn button(levels: &[bool]) -> Button<Script> {
        Button::new(Script(levels.iter().copied().collect()))
    }

    #[test]
    fn stable_press_is_reported_once() {
        let mut clock = Clock::default();
        // Pressed and still pressed, then held, then released, then pressed.
        let mut b = button(&[true, true, true, false, true, true]);

        assert_eq!(b.poll(&mut clock), Ok(true));
        assert_eq!(clock.elapsed_ns, 25_000_000);
        assert_eq!(b.poll(&mut clock), Ok(false));
        assert_eq!(b.poll(&mut clock), Ok(false));
        assert_eq!(b.poll(&mut clock), Ok(true));
        assert!(b.free().0.is_empty());
    }

    #[test]
    fn bounce_is_ignored() {
        let mut clock = Clock::default();
        let mut b = button(&[true, false]);
        assert_eq!(b.poll(&mut clock), Ok(false));
    }

    #[test]
    fn idle_button_does_not_wait() {
        let mut clock = Clock::default();
        let mut b = button(&[false]);
        assert_eq!(b.poll(&mut clock), Ok(false));
        assert_eq!(clock.elapsed_ns, 0);
    }
}
