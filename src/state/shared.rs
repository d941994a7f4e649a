//! Interrupt-safe container for state touched by both the command loop and
//! interrupt handlers.

use core::cell::RefCell;

use critical_section::Mutex;

/// Value shared between foreground code and interrupt handlers.
///
/// Every access runs inside a critical section: the closure executes with
/// interrupts masked and the previous interrupt state is restored on every
/// exit path, including early returns and unwinding on hosted targets.
/// Keep closures to a handful of field copies and register writes, since
/// step timing is not serviced while one runs.
pub struct Shared<T> {
    inner: Mutex<RefCell<T>>,
}

impl<T> Shared<T> {
    /// Wrap a value.
    pub const fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(value)),
        }
    }

    /// Run `f` with exclusive access inside a critical section.
    ///
    /// Must not be called re-entrantly on the same value.
    #[inline]
    pub fn lock<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        critical_section::with(|cs| f(&mut self.inner.borrow_ref_mut(cs)))
    }
}

impl<T: Copy> Shared<T> {
    /// Copy the whole value out atomically.
    #[inline]
    pub fn get(&self) -> T {
        self.lock(|value| *value)
    }
}
