use std::sync::atomic::{AtomicU32, Ordering};

use digiclock::regs::{
    Pin, Reg, Reg16, RegisterFile, SimRegisters, tccr0, tccr1a, tccr1b, tccr2, tifr, timsk,
};
use digiclock::timer::{
    self, Channel, ClockSource, CompareOutputs, Event, FastPwmAction, Mode16, Mode8,
    NonPwmAction, PhaseCorrectAction, Tc0, Tc2, Timer0, Timer1, Timer16Config, Timer2, Timer8,
    Timer8Config, TimerCallbacks, TimerId, Top, Unit8,
};

const CLOCKS: [ClockSource; 5] = [
    ClockSource::Div1,
    ClockSource::Div8,
    ClockSource::Div64,
    ClockSource::Div256,
    ClockSource::Div1024,
];

const OUTPUTS: CompareOutputs = CompareOutputs {
    non_pwm: NonPwmAction::Toggle,
    fast_pwm: FastPwmAction::Clear,
    phase_correct: PhaseCorrectAction::Set,
};

const TC1_REGS: [Reg; 10] = [
    Reg::TCCR1A,
    Reg::TCCR1B,
    Reg::TCNT1L,
    Reg::TCNT1H,
    Reg::OCR1AL,
    Reg::OCR1AH,
    Reg::OCR1BL,
    Reg::OCR1BH,
    Reg::ICR1L,
    Reg::ICR1H,
];

fn unit8_regs<U: Unit8>() -> [Reg; 3] {
    [U::TCCR, U::TCNT, U::OCR]
}

fn timsk_bits_of<U: Unit8>() -> u8 {
    U::TOIE.mask() | U::OCIE.mask()
}

const TC1_TIMSK: u8 =
    timsk::TOIE1.mask() | timsk::OCIE1A.mask() | timsk::OCIE1B.mask() | timsk::TICIE1.mask();

fn init_then_deinit_8<U: Unit8>() {
    for mode in Mode8::ALL {
        let regs = SimRegisters::new();
        let mut timer = Timer8::<U, _>::new(&regs);
        timer.init(
            &Timer8Config::new(mode, ClockSource::Div64)
                .with_initial_value(0x5A)
                .with_compare_value(0xC3)
                .with_outputs(OUTPUTS),
        );
        regs.raise(U::TOV);
        regs.raise(U::OCF);

        timer.deinit();

        assert!(regs.all_zero(&unit8_regs::<U>()), "{mode:?}");
        assert_eq!(regs.peek(Reg::TIMSK) & timsk_bits_of::<U>(), 0, "{mode:?}");
        assert_eq!(regs.peek(Reg::TIFR), 0, "{mode:?}");
    }
}

#[test]
fn init_then_deinit_restores_power_on_state() {
    init_then_deinit_8::<Tc0>();
    init_then_deinit_8::<Tc2>();

    for mode in Mode16::ALL {
        for channel in [Channel::A, Channel::B] {
            let regs = SimRegisters::new();
            let mut timer = Timer1::new(&regs);
            timer.init(
                &Timer16Config::new(mode, ClockSource::Div8)
                    .with_initial_value(0x1234)
                    .with_compare_value(0x0FFF)
                    .with_input_capture(0x7FFF)
                    .with_channel(channel)
                    .with_outputs(OUTPUTS),
            );
            regs.raise(tifr::OCF1A);
            regs.raise(tifr::ICF1);

            timer.deinit();

            assert!(regs.all_zero(&TC1_REGS), "{mode:?} {channel:?}");
            assert_eq!(regs.peek(Reg::TIMSK) & TC1_TIMSK, 0, "{mode:?} {channel:?}");
            assert_eq!(regs.peek(Reg::TIFR), 0, "{mode:?} {channel:?}");
        }
    }
}

#[test]
fn deinit_leaves_other_units_alone() {
    let regs = SimRegisters::new();
    let mut tc0 = Timer0::new(&regs);
    let mut tc1 = Timer1::new(&regs);
    let mut tc2 = Timer2::new(&regs);

    tc0.init(&Timer8Config::new(Mode8::Overflow, ClockSource::Div8));
    tc1.init(&Timer16Config::new(Mode16::CtcOcr1a, ClockSource::Div8).with_compare_value(99));
    tc2.init(&Timer8Config::new(Mode8::Ctc, ClockSource::Div8).with_compare_value(9));
    regs.raise(tifr::TOV0);
    regs.raise(tifr::OCF2);

    tc1.deinit();

    assert_eq!(
        regs.peek(Reg::TIMSK),
        timsk::TOIE0.mask() | timsk::OCIE2.mask()
    );
    assert_eq!(regs.peek(Reg::TIFR), tifr::TOV0.mask() | tifr::OCF2.mask());
    assert_eq!(regs.peek(Reg::OCR2), 9);
    assert_eq!(regs.read_field(tccr0::CS0), ClockSource::Div8.bits());
}

#[test]
fn channel_b_keeps_ocr1a_one_above() {
    let loading_modes = Mode16::ALL
        .into_iter()
        .filter(|mode| mode.info().loads_compare);

    for mode in loading_modes {
        for value in [0, 1, 977, 0x7FFF, 0xFFFE, 0xFFFF] {
            let regs = SimRegisters::new();
            let mut timer = Timer1::new(&regs);
            timer.init(
                &Timer16Config::new(mode, ClockSource::Div1)
                    .with_channel(Channel::B)
                    .with_compare_value(value),
            );
            assert_eq!(regs.peek_wide(Reg16::OCR1A), value.wrapping_add(1), "{mode:?}");
            assert_eq!(regs.peek_wide(Reg16::OCR1B), value, "{mode:?}");

            let updated = value.wrapping_mul(3);
            timer.set_compare_value(updated, Channel::B);
            assert_eq!(timer.compare_value(Channel::A), updated.wrapping_add(1));
            assert_eq!(timer.compare_value(Channel::B), updated);
        }
    }
}

#[test]
fn channel_a_update_touches_only_ocr1a() {
    let regs = SimRegisters::new();
    let mut timer = Timer1::new(&regs);
    timer.init(
        &Timer16Config::new(Mode16::FastPwmOcr1a, ClockSource::Div1).with_compare_value(400),
    );
    regs.write_wide(Reg16::OCR1B, 55);

    timer.set_compare_value(800, Channel::A);

    assert_eq!(regs.peek_wide(Reg16::OCR1A), 800);
    assert_eq!(regs.peek_wide(Reg16::OCR1B), 55);
}

#[test]
fn stop_then_start_resumes_from_held_count() {
    let regs = SimRegisters::new();
    let mut tc1 = Timer1::new(&regs);
    tc1.init(&Timer16Config::new(Mode16::Normal, ClockSource::Div64));

    regs.count(Reg16::TCNT1, 1500);
    tc1.stop();
    assert!(!tc1.is_running());
    assert_eq!(tc1.counter(), 1500);

    tc1.start(ClockSource::Div64);
    assert!(tc1.is_running());
    assert_eq!(tc1.counter(), 1500);

    let mut tc0 = Timer0::new(&regs);
    tc0.init(&Timer8Config::new(Mode8::Overflow, ClockSource::Div8).with_initial_value(42));
    tc0.stop();
    tc0.start(ClockSource::Div8);
    assert_eq!(tc0.counter(), 42);
}

#[test]
fn start_and_stop_change_only_clock_select() {
    for mode in Mode8::ALL {
        let regs = SimRegisters::new();
        let mut timer = Timer2::new(&regs);
        timer.init(&Timer8Config::new(mode, ClockSource::Div1).with_outputs(OUTPUTS));
        let others = regs.peek(Reg::TCCR2) & !tccr2::CS2.mask();

        for clock in CLOCKS {
            timer.start(clock);
            assert_eq!(regs.peek(Reg::TCCR2) & !tccr2::CS2.mask(), others, "{mode:?}");
            timer.stop();
            assert_eq!(regs.peek(Reg::TCCR2), others, "{mode:?}");
        }
    }

    for mode in Mode16::ALL {
        let regs = SimRegisters::new();
        let mut timer = Timer1::new(&regs);
        timer.init(&Timer16Config::new(mode, ClockSource::Div1).with_outputs(OUTPUTS));
        let control_a = regs.peek(Reg::TCCR1A);
        let others_b = regs.peek(Reg::TCCR1B) & !tccr1b::CS1.mask();

        for clock in CLOCKS {
            timer.start(clock);
            assert_eq!(regs.read_field(tccr1b::CS1), clock.bits());
            timer.stop();
            assert_eq!(regs.peek(Reg::TCCR1A), control_a, "{mode:?}");
            assert_eq!(regs.peek(Reg::TCCR1B), others_b, "{mode:?}");
        }
    }
}

static FIRST: AtomicU32 = AtomicU32::new(0);
static SECOND: AtomicU32 = AtomicU32::new(0);

fn first() {
    FIRST.fetch_add(1, Ordering::SeqCst);
}

fn second() {
    SECOND.fetch_add(1, Ordering::SeqCst);
}

#[test]
fn callback_runs_once_per_event_until_replaced() {
    let regs = SimRegisters::new();

    timer::set_callback(TimerId::Timer1, Some(first));

    regs.raise(tifr::OCF1A);
    timer::dispatch(&regs, Event::Timer1CompareA);
    assert_eq!(FIRST.load(Ordering::SeqCst), 1);
    assert!(!regs.bit_is_set(tifr::OCF1A));

    // Events of other units do not reach this callback.
    timer::dispatch(&regs, Event::Timer0Overflow);
    timer::dispatch(&regs, Event::Timer2Compare);
    assert_eq!(FIRST.load(Ordering::SeqCst), 1);

    Timer1::new(&regs).set_callback(Some(second));
    timer::dispatch(&regs, Event::Timer1Overflow);
    assert_eq!(FIRST.load(Ordering::SeqCst), 1);
    assert_eq!(SECOND.load(Ordering::SeqCst), 1);

    timer::set_callback(TimerId::Timer1, None);
    timer::dispatch(&regs, Event::Timer1CompareB);
    assert_eq!(SECOND.load(Ordering::SeqCst), 1);
}

#[test]
fn private_callback_table() {
    static HITS: AtomicU32 = AtomicU32::new(0);
    fn hit() {
        HITS.fetch_add(1, Ordering::SeqCst);
    }

    let regs = SimRegisters::new();
    let table = TimerCallbacks::new();
    table.set(0, Some(hit));

    for _ in 0..3 {
        regs.raise(tifr::TOV0);
        timer::dispatch_with(&regs, &table, Event::Timer0Overflow);
    }
    assert_eq!(HITS.load(Ordering::SeqCst), 3);
    assert_eq!(regs.peek(Reg::TIFR), 0);
}

#[test]
fn ctc_on_ocr1a_for_one_second_tick() {
    let regs = SimRegisters::new();
    regs.poke(Reg::TIMSK, timsk::TOIE0.mask() | timsk::TICIE1.mask());

    Timer1::new(&regs).init(
        &Timer16Config::new(Mode16::CtcOcr1a, ClockSource::Div1024)
            .with_channel(Channel::A)
            .with_compare_value(977),
    );

    let wgm = regs.read_field(tccr1a::WGM1_LOW) | regs.read_field(tccr1b::WGM1_HIGH) << 2;
    assert_eq!(wgm, 0b0100);
    assert_eq!(Mode16::CtcOcr1a.info().top, Top::Compare);
    assert_eq!(regs.read_field(tccr1b::CS1), 0b101);
    assert_eq!(regs.peek_wide(Reg16::OCR1A), 977);

    assert!(regs.bit_is_set(timsk::OCIE1A));
    assert!(!regs.bit_is_set(timsk::TOIE1));
    assert!(!regs.bit_is_set(timsk::OCIE1B));
    assert!(regs.bit_is_set(timsk::TICIE1));
    assert!(regs.bit_is_set(timsk::TOIE0));
}

#[test]
fn fast_pwm_set_on_8_bit_unit() {
    let regs = SimRegisters::new();
    regs.poke(Reg::TCCR0, tccr0::FOC0.mask());

    let outputs = CompareOutputs {
        fast_pwm: FastPwmAction::Set,
        ..CompareOutputs::DISCONNECTED
    };
    Timer0::new(&regs).init(
        &Timer8Config::new(Mode8::FastPwm, ClockSource::Div8)
            .with_compare_value(128)
            .with_outputs(outputs),
    );

    assert!(regs.bit_is_set(Pin::PB3.direction()));
    assert!(!regs.bit_is_set(tccr0::FOC0));
    assert_eq!(regs.read_field(tccr0::COM0), 0b11);
    assert_eq!(regs.peek(Reg::TCCR0) & tccr0::COM0.mask(), 0b0011_0000);
    assert_eq!(regs.peek(Reg::OCR0), 128);
    assert_eq!(regs.peek(Reg::TIMSK), 0);
}
