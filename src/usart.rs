use nano_fmt::NanoWrite;

use crate::clock::BoardClock;
use crate::hal::pac;
use crate::hal::port::{self, PD0, PD1};

/// Wrapper around USART that can be used for output formatting.
pub struct Usart0 {
    p: pac::USART,
}

type Baudrate = avr_hal_generic::usart::Baudrate<BoardClock>;

impl Usart0 {
    /// Create new instance from raw hardware.
    ///
    /// The frame format is left at its reset value, 8N1.
    #[must_use]
    pub fn new<IMODE: port::mode::InputMode>(
        p: pac::USART,
        _rx: port::Pin<port::mode::Input<IMODE>, PD0>,
        _tx: port::Pin<port::mode::Output, PD1>,
        baudrate: u32,
    ) -> Self {
        let baudrate = Baudrate::new(baudrate);
        // URSEL shares the address with UBRRH and must be written as zero.
        p.ubrrh
            .write(|w| unsafe { w.bits((baudrate.ubrr >> 8) as u8 & 0x0F) });
        p.ubrrl.write(|w| unsafe { w.bits(baudrate.ubrr as u8) });
        p.ucsra.write(|w| w.u2x().bit(baudrate.u2x));

        // Enable receiver and transmitter.
        p.ucsrb.write(|w| w.txen().set_bit().rxen().set_bit());

        Self { p }
    }
}

impl NanoWrite for Usart0 {
    fn write_byte(&mut self, b: u8) {
        while self.p.ucsra.read().udre().bit_is_clear() {}

        self.p.udr.write(|w| unsafe { w.bits(b) });
    }
}
