use std::cell::RefCell;

/// Holds the page's single game instance. The first successful
/// `get_or_try_init` creates it; later calls hand back the existing one.
pub struct InstanceSlot<T> {
    cell: RefCell<Option<T>>,
}

impl<T> InstanceSlot<T> {
    pub const fn new() -> Self {
        Self {
            cell: RefCell::new(None),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.borrow().is_some()
    }

    /// Runs `init` only when the slot is empty. Returns `Ok(true)` when a new
    /// instance was stored, `Ok(false)` when one already existed. A failed
    /// `init` leaves the slot empty.
    pub fn get_or_try_init<E>(&self, init: impl FnOnce() -> Result<T, E>) -> Result<bool, E> {
        if self.is_initialized() {
            return Ok(false);
        }
        let value = init()?;
        *self.cell.borrow_mut() = Some(value);
        Ok(true)
    }

    /// Mutable access to the instance; `None` if it does not exist yet or is
    /// already borrowed further up the stack.
    pub fn with_mut<U>(&self, f: impl FnOnce(&mut T) -> U) -> Option<U> {
        let mut guard = self.cell.try_borrow_mut().ok()?;
        guard.as_mut().map(f)
    }

    pub fn with<U>(&self, f: impl FnOnce(&T) -> U) -> Option<U> {
        let guard = self.cell.try_borrow().ok()?;
        guard.as_ref().map(f)
    }
}

impl<T> Default for InstanceSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}
