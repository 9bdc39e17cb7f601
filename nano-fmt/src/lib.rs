#![cfg_attr(not(test), no_std)]

/// Writer trait for resource constrained systems.
pub trait NanoWrite {
    /// Write a byte to the writer.
    fn write_byte(&mut self, b: u8);

    /// Write every byte of `s` to the writer.
    fn write_str(&mut self, s: &str) {
        for b in s.bytes() {
            self.write_byte(b);
        }
    }
}

/// Display trait for resource constrained systems.
pub trait NanoDisplay {
    /// Write formatted representation of `self` to `f`.
    fn fmt<F: NanoWrite>(self, f: &mut F);
}

impl NanoDisplay for &str {
    fn fmt<F: NanoWrite>(self, f: &mut F) {
        f.write_str(self);
    }
}

/// Implement NanoDisplay for an unsigned type.
macro_rules! display_unsigned {
    ($ty:ident) => {
        impl $crate::NanoDisplay for $ty {
            fn fmt<F: $crate::NanoWrite>(mut self, f: &mut F) {
                const MAX_POW10: $ty = <$ty>::pow(10, $ty::MAX.ilog10() as u32);

                let mut div = MAX_POW10;
                let mut print = false;

                while div > 0 {
                    let dig = (self / div) as u8;
                    self %= div;
                    div /= 10;

                    if !print && dig > 0 {
                        print = true;
                    }

                    if print || (div == 0) {
                        f.write_byte(b'0' + dig);
                    }
                }
            }
        }
    };
}

display_unsigned!(u8);
display_unsigned!(u16);
display_unsigned!(u32);

/// Unsigned value printed with leading zeroes up to `WIDTH` digits.
///
/// Values wider than `WIDTH` are printed in full.
#[derive(Clone, Copy)]
pub struct ZeroPad<const WIDTH: u8>(pub u32);

impl<const WIDTH: u8> NanoDisplay for ZeroPad<WIDTH> {
    fn fmt<F: NanoWrite>(self, f: &mut F) {
        let digits = self.0.checked_ilog10().unwrap_or(0) + 1;
        for _ in digits..u32::from(WIDTH) {
            f.write_byte(b'0');
        }
        self.0.fmt(f);
    }
}
