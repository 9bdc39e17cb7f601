//! Idle sleep that cannot miss its wake-up.
//!
//! The decision to sleep is taken with interrupts disabled and interrupts
//! are only enabled again by the instruction right before `sleep`. An
//! interrupt that arrives after the check therefore wakes the CPU instead
//! of running before it goes to sleep.

use critical_section::CriticalSection;

/// CPU controls used to enter idle sleep.
pub trait IdleSleep {
    fn disable_interrupts(&self);

    /// Select idle mode and set the sleep enable bit.
    fn arm(&self);

    /// Enable interrupts and sleep, with no interrupt taken in between.
    fn enable_interrupts_and_sleep(&self);

    fn enable_interrupts(&self);

    /// Clear the sleep enable bit.
    fn disarm(&self);
}

/// Sleep until the next interrupt if `ready` returns true.
///
/// Interrupts must be enabled on entry and are enabled on return. Returns
/// whether the CPU went to sleep.
pub fn sleep_if<S, F>(cpu: &S, ready: F) -> bool
where
    S: IdleSleep,
    F: FnOnce(CriticalSection<'_>) -> bool,
{
    cpu.disable_interrupts();
    // SAFETY: Interrupts stay disabled until one of the enables below.
    let cs = unsafe { CriticalSection::new() };

    if ready(cs) {
        cpu.arm();
        cpu.enable_interrupts_and_sleep();
        cpu.disarm();
        true
    } else {
        cpu.enable_interrupts();
        false
    }
}

#[cfg(target_arch = "avr")]
impl IdleSleep for crate::hal::pac::CPU {
    fn disable_interrupts(&self) {
        avr_device::interrupt::disable();
    }

    fn arm(&self) {
        // Set sleep mode to IDLE and enable sleep.
        self.mcucr.modify(|_, w| w.sm().idle().se().set_bit());
    }

    fn enable_interrupts_and_sleep(&self) {
        // SAFETY: The instruction after `sei` always runs before a pending
        // interrupt is taken.
        unsafe { core::arch::asm!("sei", "sleep") };
    }

    fn enable_interrupts(&self) {
        // SAFETY: Called at the end of `sleep_if`, outside of any critical
        // section.
        unsafe { avr_device::interrupt::enable() };
    }

    fn disarm(&self) {
        // MCUCR also holds the INT0/INT1 sense bits.
        avr_device::interrupt::free(|_| self.mcucr.modify(|_, w| w.se().clear_bit()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{ClockApp, TimeOfDay};
    use std::cell::RefCell;

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Step {
        Disable,
        Check,
        Arm,
        EnableAndSleep,
        Enable,
        Disarm,
    }

    #[derive(Default)]
    struct Cpu(RefCell<Vec<Step>>);

    impl Cpu {
        fn push(&self, step: Step) {
            self.0.borrow_mut().push(step);
        }
    }

    impl IdleSleep for Cpu {
        fn disable_interrupts(&self) {
            self.push(Step::Disable);
        }

        fn arm(&self) {
            self.push(Step::Arm);
        }

        fn enable_interrupts_and_sleep(&self) {
            self.push(Step::EnableAndSleep);
        }

        fn enable_interrupts(&self) {
            self.push(Step::Enable);
        }

        fn disarm(&self) {
            self.push(Step::Disarm);
        }
    }

    #[test]
    fn sleeps_only_after_checking_with_interrupts_off() {
        let cpu = Cpu::default();
        let app = ClockApp::new(TimeOfDay::MIDNIGHT);

        let slept = sleep_if(&cpu, |_| {
            cpu.push(Step::Check);
            app.is_running()
        });

        assert!(slept);
        assert_eq!(
            *cpu.0.borrow(),
            [
                Step::Disable,
                Step::Check,
                Step::Arm,
                Step::EnableAndSleep,
                Step::Disarm
            ]
        );
    }

    #[test]
    fn stays_awake_once_editing_started() {
        let cpu = Cpu::default();
        let mut app = ClockApp::new(TimeOfDay::MIDNIGHT);
        // A navigation edge arrived before the check.
        app.move_right();

        let slept = sleep_if(&cpu, |_| {
            cpu.push(Step::Check);
            app.is_running()
        });

        assert!(!slept);
        assert_eq!(
            *cpu.0.borrow(),
            [Step::Disable, Step::Check, Step::Enable]
        );
    }
}
