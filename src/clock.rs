use crate::timer::ClockSource;

/// CPU clock of the board, internal RC oscillator.
pub const CPU_FREQ_HZ: u32 = 1_000_000;

/// `TC1` compare value giving one compare match per second with `clock`.
///
/// Returns `None` when the period does not fit the 16-bit counter.
pub const fn ticks_per_second(clock: ClockSource) -> Option<u16> {
    let divisor = clock.divisor();
    if divisor == 0 {
        return None;
    }
    let top = CPU_FREQ_HZ / divisor;
    if top == 0 || top > u16::MAX as u32 + 1 {
        None
    } else {
        Some((top - 1) as u16)
    }
}

#[cfg(target_arch = "avr")]
mod board {
    use crate::hal;

    pub use hal::clock::Clock;

    /// Board clock rate.
    pub type BoardClock = hal::clock::MHz1;

    /// Busy-wait delay, used for button debouncing.
    pub type Delay = hal::delay::Delay<BoardClock>;

    const _: () = assert!(<BoardClock as Clock>::FREQ == super::CPU_FREQ_HZ);
}

#[cfg(target_arch = "avr")]
pub use board::{BoardClock, Clock, Delay};
