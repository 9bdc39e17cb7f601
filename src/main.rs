#![cfg_attr(target_arch = "avr", no_std)]
#![cfg_attr(target_arch = "avr", no_main)]
#![cfg_attr(target_arch = "avr", feature(abi_avr_interrupt))]

#[cfg(target_arch = "avr")]
mod firmware {
    use core::cell::{OnceCell, RefCell};

    use critical_section::Mutex;
    use nano_fmt::NanoDisplay;
    use panic_halt as _;

    use digiclock::app::{ClockApp, TimeOfDay};
    use digiclock::button::Button;
    use digiclock::callback::Callback;
    use digiclock::clock::{self, Delay};
    use digiclock::display;
    use digiclock::exint::{self, ExternalInterrupts, Int2Sense, Line, Sense, Trigger};
    use digiclock::hal;
    use digiclock::regs::PacRegisters;
    use digiclock::sleep;
    use digiclock::timer::{self, Channel, ClockSource, Event, Mode16, Timer1, Timer16Config};
    use digiclock::usart::Usart0;

    /// UART baud rate.
    const BAUDRATE: u32 = 4800;

    /// Prescaler of the one second tick.
    const TICK_CLOCK: ClockSource = ClockSource::Div1024;

    const TICK_COMPARE: u16 = match clock::ticks_per_second(TICK_CLOCK) {
        Some(top) => top,
        None => panic!("tick period does not fit TC1"),
    };

    static APP: Mutex<RefCell<ClockApp>> =
        Mutex::new(RefCell::new(ClockApp::new(TimeOfDay::MIDNIGHT)));

    /// Timer and external interrupt registers, handed over by `main`.
    static REGS: Mutex<OnceCell<PacRegisters>> = Mutex::new(OnceCell::new());

    fn with_regs(f: impl FnOnce(&PacRegisters)) {
        critical_section::with(|cs| {
            if let Some(regs) = REGS.borrow(cs).get() {
                f(regs);
            }
        });
    }

    /// TC1 compare callback, once a second.
    fn tick() {
        critical_section::with(|cs| APP.borrow_ref_mut(cs).on_tick());
    }

    /// INT0 callback: select the next digit.
    fn right() {
        with_regs(|regs| Timer1::new(regs).stop());
        critical_section::with(|cs| APP.borrow_ref_mut(cs).move_right());
    }

    /// INT1 callback: select the previous digit.
    fn left() {
        with_regs(|regs| Timer1::new(regs).stop());
        critical_section::with(|cs| APP.borrow_ref_mut(cs).move_left());
    }

    /// INT2 callback: leave edit mode.
    fn confirm() {
        critical_section::with(|cs| APP.borrow_ref_mut(cs).confirm());
        with_regs(|regs| Timer1::new(regs).start(TICK_CLOCK));
    }

    #[avr_device::interrupt(atmega32a)]
    fn TIMER0_OVF() {
        with_regs(|regs| timer::dispatch(regs, Event::Timer0Overflow));
    }

    #[avr_device::interrupt(atmega32a)]
    fn TIMER0_COMP() {
        with_regs(|regs| timer::dispatch(regs, Event::Timer0Compare));
    }

    #[avr_device::interrupt(atmega32a)]
    fn TIMER1_OVF() {
        with_regs(|regs| timer::dispatch(regs, Event::Timer1Overflow));
    }

    #[avr_device::interrupt(atmega32a)]
    fn TIMER1_COMPA() {
        with_regs(|regs| timer::dispatch(regs, Event::Timer1CompareA));
    }

    #[avr_device::interrupt(atmega32a)]
    fn TIMER1_COMPB() {
        with_regs(|regs| timer::dispatch(regs, Event::Timer1CompareB));
    }

    #[avr_device::interrupt(atmega32a)]
    fn TIMER2_OVF() {
        with_regs(|regs| timer::dispatch(regs, Event::Timer2Overflow));
    }

    #[avr_device::interrupt(atmega32a)]
    fn TIMER2_COMP() {
        with_regs(|regs| timer::dispatch(regs, Event::Timer2Compare));
    }

    #[avr_device::interrupt(atmega32a)]
    fn INT0() {
        with_regs(|regs| exint::dispatch(regs, Line::Int0));
    }

    #[avr_device::interrupt(atmega32a)]
    fn INT1() {
        with_regs(|regs| exint::dispatch(regs, Line::Int1));
    }

    #[avr_device::interrupt(atmega32a)]
    fn INT2() {
        with_regs(|regs| exint::dispatch(regs, Line::Int2));
    }

    #[hal::entry]
    fn main() -> ! {
        let dp = hal::Peripherals::take().unwrap();
        let pins = hal::pins!(dp);

        let mut serial = Usart0::new(
            dp.USART,
            pins.pd0.into_pull_up_input(),
            pins.pd1.into_output(),
            BAUDRATE,
        );

        "digiclock\r\n".fmt(&mut serial);

        let mut up = Button::new(pins.pa0.into_pull_up_input());
        let mut down = Button::new(pins.pa1.into_pull_up_input());
        let mut delay = Delay::new();

        // Navigation buttons on INT0, INT1 and INT2, all active low.
        let _right = pins.pd2.into_pull_up_input();
        let _left = pins.pd3.into_pull_up_input();
        let _ok = pins.pb2.into_pull_up_input();

        let regs = PacRegisters::new(dp.TC0, dp.TC1, dp.TC2, dp.EXINT);
        {
            let mut exint = ExternalInterrupts::new(&regs);
            let buttons: [(Trigger, Callback); 3] = [
                (Trigger::Int0(Sense::FallingEdge), right),
                (Trigger::Int1(Sense::FallingEdge), left),
                (Trigger::Int2(Int2Sense::FallingEdge), confirm),
            ];
            for (trigger, callback) in buttons {
                exint.set_callback(trigger.line(), Some(callback));
                exint.init(trigger, true);
            }

            // TC1 in CTC mode, one compare match per second.
            let mut tc1 = Timer1::new(&regs);
            tc1.set_callback(Some(tick));
            tc1.init(
                &Timer16Config::new(Mode16::CtcOcr1a, TICK_CLOCK)
                    .with_channel(Channel::A)
                    .with_compare_value(TICK_COMPARE),
            );
        }
        critical_section::with(|cs| {
            let _ = REGS.borrow(cs).set(regs);
        });

        // Enable interrupts.
        unsafe {
            // SAFETY: Not inside a critical section and any non-atomic operations have been completed
            // at this point.
            avr_device::interrupt::enable();
        }

        let mut shown = None;

        loop {
            // Sleep while the clock runs, until the next interrupt.
            let slept = sleep::sleep_if(&dp.CPU, |cs| APP.borrow_ref(cs).is_running());

            if !slept {
                let Ok(raise) = up.poll(&mut delay);
                let Ok(lower) = down.poll(&mut delay);
                critical_section::with(|cs| {
                    let mut app = APP.borrow_ref_mut(cs);
                    if raise {
                        app.increment();
                    }
                    if lower {
                        app.decrement();
                    }
                });
            }

            let app = critical_section::with(|cs| {
                let mut app = APP.borrow_ref_mut(cs);
                app.advance();
                *app
            });

            if shown != Some(app) {
                display::render(&app, &mut serial);
                shown = Some(app);
            }
        }
    }
}

#[cfg(not(target_arch = "avr"))]
fn main() {}
