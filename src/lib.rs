#![cfg_attr(not(test), no_std)]
#![cfg_attr(target_arch = "avr", feature(asm_experimental_arch))]

pub mod app;
pub mod button;
pub mod callback;
pub mod clock;
pub mod display;
pub mod exint;
pub mod regs;
pub mod sleep;
pub mod timer;
#[cfg(target_arch = "avr")]
pub mod usart;

#[cfg(target_arch = "avr")]
pub use atmega_hal as hal;
