use core::cell::Cell;

use critical_section::Mutex;

/// Function run from interrupt context when a peripheral event fires.
pub type Callback = fn();

/// Fixed table of callback slots, one per interrupt source owner.
///
/// Written from the main loop, read from interrupt handlers. An empty slot is
/// a valid state: the event is acknowledged and nothing else happens.
pub struct CallbackTable<const N: usize> {
    slots: [Mutex<Cell<Option<Callback>>>; N],
}

impl<const N: usize> CallbackTable<N> {
    pub const fn new() -> Self {
        Self {
            slots: [const { Mutex::new(Cell::new(None)) }; N],
        }
    }

    /// Store `callback` in `slot`, replacing the previous one.
    pub fn set(&self, slot: usize, callback: Option<Callback>) {
        critical_section::with(|cs| self.slots[slot].borrow(cs).set(callback));
    }

    pub fn clear(&self, slot: usize) {
        self.set(slot, None);
    }

    pub fn get(&self, slot: usize) -> Option<Callback> {
        critical_section::with(|cs| self.slots[slot].borrow(cs).get())
    }

    /// Run the callback in `slot`, if any. Returns whether one ran.
    pub fn invoke(&self, slot: usize) -> bool {
        // The callback runs outside of the critical section so that it may
        // replace itself.
        match self.get(slot) {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }
}

impl<const N: usize> Default for CallbackTable<N> {
    fn default() -> Self {
        Self::new()
    }
}
