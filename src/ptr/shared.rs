use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use super::guarded::GuardedPtr;
use super::unique::UniquePtr;

/// `strong` is the number of live [`SharedPtr`]s; `weak` is the number of
/// shared *and* weak pointers, so the control block itself isn't freed
/// until the last weak pointer drops too. `lock` is a spinlock held only
/// during weak-to-shared promotion, to keep two promotions from racing on
/// a transient `strong == 1` each raised.
struct ControlBlock<T> {
    strong: AtomicUsize,
    weak: AtomicUsize,
    lock: AtomicBool,
    inner: UniquePtr<T>,
}

fn spin_lock(lock: &AtomicBool) {
    while lock
        .compare_exchange_weak(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .is_err()
    {
        std::thread::yield_now();
    }
}

fn spin_unlock(lock: &AtomicBool) {
    lock.store(false, Ordering::SeqCst);
}

/// A reference-counted pointer with atomic strong/weak counts.
pub struct SharedPtr<T> {
    guard: GuardedPtr<ControlBlock<T>>,
}

impl<T> SharedPtr<T> {
    pub fn new() -> Self {
        Self {
            guard: GuardedPtr::null(),
        }
    }

    /// Resets any existing payload, then allocates a fresh control block
    /// owning `value`.
    pub fn alloc(&mut self, value: T, dtor: Option<Box<dyn FnOnce(T)>>) {
        self.reset();
        // `inner` must be given its payload only after `block` is heap-placed,
        // since UniquePtr's own guard latches onto its address at that point.
        let mut block = Box::new(ControlBlock {
            strong: AtomicUsize::new(1),
            weak: AtomicUsize::new(1),
            lock: AtomicBool::new(false),
            inner: UniquePtr::new(),
        });
        block.inner.alloc(value, dtor);
        self.guard.set(Box::into_raw(block));
    }

    pub fn get(&self) -> Option<&T> {
        let raw = self.guard.get();
        if raw.is_null() {
            None
        } else {
            unsafe { (*raw).inner.get() }
        }
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        let raw = self.guard.get();
        if raw.is_null() {
            None
        } else {
            unsafe { (*raw).inner.get_mut() }
        }
    }

    pub fn is_null(&self) -> bool {
        self.guard.get().is_null()
    }

    pub fn use_count(&self) -> usize {
        let raw = self.guard.get();
        if raw.is_null() {
            0
        } else {
            unsafe { (*raw).strong.load(Ordering::SeqCst) }
        }
    }

    /// `true` when the control block has no weak pointers outstanding
    /// either. Matches the reference design's `unique`, which checks
    /// the *weak* count rather than `strong`.
    pub fn is_unique(&self) -> bool {
        let raw = self.guard.get();
        raw.is_null() || unsafe { (*raw).weak.load(Ordering::SeqCst) == 1 }
    }

    /// Takes the payload out when this is the sole shared *and* weak
    /// reference (see [`Self::is_unique`]), leaving `self` empty.
    /// Returns `None` without touching `self` otherwise.
    pub fn take(&mut self) -> Option<T> {
        if !self.is_unique() {
            return None;
        }
        let raw = self.guard.get();
        if raw.is_null() {
            return None;
        }
        self.guard.set(std::ptr::null_mut());
        unsafe {
            // is_unique() => weak == 1 => strong == 1 => the payload is
            // still live, so inner.release() cannot be empty.
            let (value, _) = (*raw)
                .inner
                .release()
                .expect("unique shared pointer must still own its payload");
            drop(Box::from_raw(raw));
            Some(value)
        }
    }

    /// Decrements `strong`; if it reaches zero, destroys the payload (the
    /// control block itself is kept alive for any outstanding weak
    /// pointers). Always decrements `weak` too, freeing the control block
    /// if that reaches zero.
    pub fn reset(&mut self) {
        let raw = self.guard.get();
        if raw.is_null() {
            return;
        }
        self.guard.set(std::ptr::null_mut());
        unsafe {
            if (*raw).strong.fetch_sub(1, Ordering::SeqCst) == 1 {
                (*raw).inner.reset();
            }
            if (*raw).weak.fetch_sub(1, Ordering::SeqCst) == 1 {
                drop(Box::from_raw(raw));
            }
        }
    }
}

impl<T> Clone for SharedPtr<T> {
    /// Builds a fresh handle sharing the source's control block,
    /// incrementing both counts.
    fn clone(&self) -> Self {
        let mut out = Self::new();
        GuardedPtr::copy(&mut out.guard, &self.guard);
        let raw = out.guard.get();
        if !raw.is_null() {
            unsafe {
                (*raw).strong.fetch_add(1, Ordering::SeqCst);
                (*raw).weak.fetch_add(1, Ordering::SeqCst);
            }
        }
        out
    }
}

impl<T> Default for SharedPtr<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for SharedPtr<T> {
    fn drop(&mut self) {
        self.reset();
    }
}

/// A non-owning pointer that can attempt to promote itself to a
/// [`SharedPtr`], racing safely against other promotions via the control
/// block's spinlock.
pub struct WeakPtr<T> {
    guard: GuardedPtr<ControlBlock<T>>,
}

impl<T> WeakPtr<T> {
    pub fn new() -> Self {
        Self {
            guard: GuardedPtr::null(),
        }
    }

    pub fn from(sp: &SharedPtr<T>) -> Self {
        let mut wp = Self::new();
        let raw = sp.guard.get();
        wp.guard.set(raw);
        if !raw.is_null() {
            unsafe {
                (*raw).weak.fetch_add(1, Ordering::SeqCst);
            }
        }
        wp
    }

    /// Attempts to promote to a live [`SharedPtr`]. Returns a null shared
    /// pointer if the payload was already destroyed.
    ///
    /// 1. Copy the guarded pointer into the destination.
    /// 2. Acquire the spinlock.
    /// 3. Fetch-add `strong`; if it was already `> 0` the payload is
    ///    live, so fetch-add `weak` too. Otherwise undo the `strong`
    ///    increment and null the destination.
    /// 4. Release the spinlock.
    pub fn lock(&self) -> SharedPtr<T> {
        let mut sp = SharedPtr::new();
        let raw = self.guard.get();
        sp.guard.set(raw);
        if raw.is_null() {
            return sp;
        }
        unsafe {
            let cb = &*raw;
            spin_lock(&cb.lock);
            if cb.strong.fetch_add(1, Ordering::SeqCst) > 0 {
                cb.weak.fetch_add(1, Ordering::SeqCst);
            } else {
                cb.strong.fetch_sub(1, Ordering::SeqCst);
                sp.guard.set(std::ptr::null_mut());
            }
            spin_unlock(&cb.lock);
        }
        sp
    }

    pub fn is_null(&self) -> bool {
        self.guard.get().is_null()
    }

    pub fn reset(&mut self) {
        let raw = self.guard.get();
        if raw.is_null() {
            return;
        }
        self.guard.set(std::ptr::null_mut());
        unsafe {
            if (*raw).weak.fetch_sub(1, Ordering::SeqCst) == 1 {
                drop(Box::from_raw(raw));
            }
        }
    }
}

impl<T> Default for WeakPtr<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for WeakPtr<T> {
    fn drop(&mut self) {
        self.reset();
    }
}
