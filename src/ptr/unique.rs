use super::guarded::GuardedPtr;

/// Single-owner RAII pointer with an optional destructor hook, invoked
/// with the payload by value just before it would otherwise be dropped.
pub struct UniquePtr<T> {
    guard: GuardedPtr<T>,
    dtor: Option<Box<dyn FnOnce(T)>>,
}

impl<T> UniquePtr<T> {
    pub fn new() -> Self {
        Self {
            guard: GuardedPtr::null(),
            dtor: None,
        }
    }

    /// Resets any existing payload, then takes ownership of `value`.
    /// Must be called only once `self` is at its final address, see
    /// [`GuardedPtr`]'s note on relocation.
    pub fn alloc(&mut self, value: T, dtor: Option<Box<dyn FnOnce(T)>>) {
        self.reset();
        let raw = Box::into_raw(Box::new(value));
        self.guard.set(raw);
        self.dtor = dtor;
    }

    pub fn get(&self) -> Option<&T> {
        let raw = self.guard.get();
        if raw.is_null() {
            None
        } else {
            Some(unsafe { &*raw })
        }
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        let raw = self.guard.get();
        if raw.is_null() {
            None
        } else {
            Some(unsafe { &mut *raw })
        }
    }

    pub fn is_null(&self) -> bool {
        self.guard.get().is_null()
    }

    /// Returns the payload and destructor pair without invoking the
    /// destructor, leaving `self` empty.
    pub fn release(&mut self) -> Option<(T, Option<Box<dyn FnOnce(T)>>)> {
        let raw = self.guard.get();
        if raw.is_null() {
            return None;
        }
        self.guard.set(std::ptr::null_mut());
        let value = unsafe { *Box::from_raw(raw) };
        Some((value, self.dtor.take()))
    }

    /// Invokes the destructor on the payload (if any), frees it, and
    /// leaves `self` empty.
    pub fn reset(&mut self) {
        let raw = self.guard.get();
        if raw.is_null() {
            return;
        }
        self.guard.set(std::ptr::null_mut());
        let boxed = unsafe { Box::from_raw(raw) };
        match self.dtor.take() {
            Some(dtor) => dtor(*boxed),
            None => drop(boxed),
        }
    }
}

impl<T> Default for UniquePtr<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for UniquePtr<T> {
    fn drop(&mut self) {
        self.reset();
    }
}
