//! Tile pool contract for the presentation layer
//!
//! The core only tracks logical tiles. Whatever visual object a front end
//! draws for a tile comes from a [`TilePool`]; the front end acquires one when
//! a tile spawns and releases it when the tile is merged away.

/// Source of reusable presentation handles
pub trait TilePool {
    type Handle;

    /// Take a handle and prepare it to show `value`
    fn acquire(&mut self, value: u32) -> Self::Handle;

    /// Return a handle for reuse
    fn release(&mut self, handle: Self::Handle);
}

/// Objects a [`FreeListPool`] can hand out and take back
pub trait Poolable: Default {
    /// Prepare a recycled or fresh object to show `value`
    fn reset(&mut self, value: u32);
}

/// Capacity-bounded free list.
///
/// Pre-warmed with `capacity` objects so a game never allocates on the hot
/// path. Releases beyond capacity are dropped.
#[derive(Debug, Clone)]
pub struct FreeListPool<T> {
    free: Vec<T>,
    capacity: usize,
    outstanding: usize,
}

impl<T: Poolable> FreeListPool<T> {
    pub fn new(capacity: usize) -> Self {
        let mut free = Vec::with_capacity(capacity);
        free.resize_with(capacity, T::default);
        Self {
            free,
            capacity,
            outstanding: 0,
        }
    }

    /// Pool sized for an `n` x `n` grid
    pub fn for_grid(n: u8) -> Self {
        Self::new((n as usize) * (n as usize))
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Handles ready to be acquired without allocating
    pub fn available(&self) -> usize {
        self.free.len()
    }

    /// Handles acquired and not yet released
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }
}

impl<T: Poolable> TilePool for FreeListPool<T> {
    type Handle = T;

    fn acquire(&mut self, value: u32) -> T {
        let mut item = self.free.pop().unwrap_or_default();
        item.reset(value);
        self.outstanding += 1;
        item
    }

    fn release(&mut self, handle: T) {
        self.outstanding = self.outstanding.saturating_sub(1);
        if self.free.len() < self.capacity {
            self.free.push(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Label {
        value: u32,
        resets: u32,
    }

    impl Poolable for Label {
        fn reset(&mut self, value: u32) {
            self.value = value;
            self.resets += 1;
        }
    }

    #[test]
    fn test_prewarmed_for_grid() {
        let pool = FreeListPool::<Label>::for_grid(4);
        assert_eq!(pool.capacity(), 16);
        assert_eq!(pool.available(), 16);
        assert_eq!(pool.outstanding(), 0);
    }

    #[test]
    fn test_acquire_release_recycles() {
        let mut pool = FreeListPool::<Label>::new(1);
        let a = pool.acquire(2);
        assert_eq!(a.value, 2);
        assert_eq!(pool.available(), 0);

        pool.release(a);
        let b = pool.acquire(8);
        assert_eq!(b.value, 8);
        assert_eq!(b.resets, 2, "handle should have been recycled");
    }

    #[test]
    fn test_overflow_is_dropped() {
        let mut pool = FreeListPool::<Label>::new(1);
        let a = pool.acquire(2);
        let b = pool.acquire(4);
        assert_eq!(pool.outstanding(), 2);
        pool.release(a);
        pool.release(b);
        assert_eq!(pool.available(), 1);
        assert_eq!(pool.outstanding(), 0);
    }
}
