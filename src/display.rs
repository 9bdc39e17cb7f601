use nano_fmt::{NanoDisplay, NanoWrite, ZeroPad};

use crate::app::{ClockApp, State};

/// Redraw the clock line in place on a terminal.
///
/// The line always has the same length so that a shorter status overwrites
/// a longer one.
pub fn render<W: NanoWrite>(app: &ClockApp, w: &mut W) {
    let time = app.time();

    "\r".fmt(w);
    ZeroPad::<2>(time.hours().into()).fmt(w);
    ":".fmt(w);
    ZeroPad::<2>(time.minutes().into()).fmt(w);
    ":".fmt(w);
    ZeroPad::<2>(time.seconds().into()).fmt(w);

    match app.state() {
        State::Running => "        ".fmt(w),
        State::Editing(digit) => {
            " set ".fmt(w);
            digit.label().fmt(w);
            for _ in digit.label().len()..3 {
                w.write_byte(b' ');
            }
        }
    }
}
