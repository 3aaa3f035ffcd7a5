// SPDX-License-Identifier: MIT OR Apache-2.0
/*!
A small reader/writer spinlock.

It guards the structures that are touched on every log call but held only for a moment:
a logger's sink list (read on every emit, written during setup) and a sink's pool of idle
buffers.  On the wasm main thread we cannot block, so a spinlock is used instead of
`std::sync::RwLock`.  Critical sections must stay short.
*/

use std::cell::UnsafeCell;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::AtomicU8;
use std::sync::atomic::Ordering::{Acquire, Relaxed, Release};

const UNLOCKED: u8 = 0;
//we allow for 254 readers or 1 writer (val = 255)
const LOCKED_WRITE: u8 = u8::MAX;

pub(crate) struct Spinlock<T> {
    data: UnsafeCell<T>,
    state: AtomicU8,
}

unsafe impl<T: Send> Send for Spinlock<T> {}
unsafe impl<T: Send + Sync> Sync for Spinlock<T> {}

pub(crate) struct ReadGuard<'a, T> {
    lock: &'a Spinlock<T>,
}

pub(crate) struct WriteGuard<'a, T> {
    lock: &'a Spinlock<T>,
}

impl<T> Spinlock<T> {
    pub(crate) const fn new(data: T) -> Self {
        Spinlock {
            data: UnsafeCell::new(data),
            state: AtomicU8::new(UNLOCKED),
        }
    }

    pub(crate) fn read(&self) -> ReadGuard<'_, T> {
        while self
            .state
            .fetch_update(Acquire, Relaxed, |v| {
                if v < LOCKED_WRITE - 1 {
                    Some(v + 1)
                } else {
                    None
                }
            })
            .is_err()
        {
            std::hint::spin_loop();
        }
        ReadGuard { lock: self }
    }

    pub(crate) fn write(&self) -> WriteGuard<'_, T> {
        while self
            .state
            .compare_exchange_weak(UNLOCKED, LOCKED_WRITE, Acquire, Relaxed)
            .is_err()
        {
            std::hint::spin_loop();
        }
        WriteGuard { lock: self }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Spinlock<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Spinlock").field(&*self.read()).finish()
    }
}

impl<T> Deref for ReadGuard<'_, T> {
    type Target = T;
    fn deref(&self) -> &T {
        // SAFETY: the reader count is non-zero, so no writer exists
        unsafe { &*self.lock.data.get() }
    }
}

impl<T> Drop for ReadGuard<'_, T> {
    fn drop(&mut self) {
        self.lock.state.fetch_sub(1, Release);
    }
}

impl<T> Deref for WriteGuard<'_, T> {
    type Target = T;
    fn deref(&self) -> &T {
        // SAFETY: we hold the write lock
        unsafe { &*self.lock.data.get() }
    }
}

impl<T> DerefMut for WriteGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: we hold the write lock exclusively
        unsafe { &mut *self.lock.data.get() }
    }
}

impl<T> Drop for WriteGuard<'_, T> {
    fn drop(&mut self) {
        self.lock.state.store(UNLOCKED, Release);
    }
}
