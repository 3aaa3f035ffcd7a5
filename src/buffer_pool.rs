// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reusable serialisation buffers.
//!
//! Each log call that passes a [WriterSink](crate::WriterSink)'s level check encodes into a
//! buffer checked out from the sink's [BufferPool].  The checkout is an RAII guard: dropping
//! it, on success or failure, clears the buffer and hands it back, so under sustained
//! throughput the steady state allocates nothing.

use crate::spinlock::Spinlock;
use std::ops::{Deref, DerefMut};
#[cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};

/// Idle buffers kept for reuse.  Beyond this, returned buffers are freed.
const MAX_IDLE_BUFFERS: usize = 64;
/// Buffers that grew past this (a huge record) are freed rather than kept.
const MAX_RETAINED_CAPACITY: usize = 64 * 1024;

#[derive(Debug)]
pub struct BufferPool {
    idle: Spinlock<Vec<Vec<u8>>>,
    #[cfg(test)]
    checkouts: AtomicUsize,
}

impl BufferPool {
    pub const fn new() -> Self {
        BufferPool {
            idle: Spinlock::new(Vec::new()),
            #[cfg(test)]
            checkouts: AtomicUsize::new(0),
        }
    }

    /// Takes an idle buffer, or allocates one if none is available.  The buffer is empty.
    pub fn checkout(&self) -> PooledBuffer<'_> {
        #[cfg(test)]
        self.checkouts.fetch_add(1, Ordering::Relaxed);
        let buf = self.idle.write().pop().unwrap_or_default();
        PooledBuffer { pool: self, buf }
    }

    pub fn idle_buffers(&self) -> usize {
        self.idle.read().len()
    }

    #[cfg(test)]
    pub(crate) fn checkouts(&self) -> usize {
        self.checkouts.load(Ordering::Relaxed)
    }

    fn give_back(&self, mut buf: Vec<u8>) {
        if buf.capacity() > MAX_RETAINED_CAPACITY {
            return;
        }
        buf.clear();
        let mut idle = self.idle.write();
        if idle.len() < MAX_IDLE_BUFFERS {
            idle.push(buf);
        }
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new()
    }
}

/// A buffer on loan from a [BufferPool].
#[derive(Debug)]
pub struct PooledBuffer<'a> {
    pool: &'a BufferPool,
    buf: Vec<u8>,
}

impl Deref for PooledBuffer<'_> {
    type Target = Vec<u8>;
    fn deref(&self) -> &Vec<u8> {
        &self.buf
    }
}

impl DerefMut for PooledBuffer<'_> {
    fn deref_mut(&mut self) -> &mut Vec<u8> {
        &mut self.buf
    }
}

impl Drop for PooledBuffer<'_> {
    fn drop(&mut self) {
        self.pool.give_back(std::mem::take(&mut self.buf));
    }
}
