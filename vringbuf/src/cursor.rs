use crate::common::unlikely;

/// Write and read offsets of a [`VirtualRingBuf`](crate::VirtualRingBuf).
///
/// The offsets only move through [`advance_write`](Cursors::advance_write)
/// and [`advance_read`](Cursors::advance_read). Neither checks the amount
/// against the data actually buffered: committing more than the free space
/// overwrites unread bytes, decommitting more than `size()` leaves the read
/// offset ahead of the write offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursors {
    write: usize,
    read: usize,
    capacity: usize,
}

impl Cursors {
    pub(crate) fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0 && capacity <= isize::MAX as usize);
        Cursors {
            write: 0,
            read: 0,
            capacity,
        }
    }

    pub fn write_offset(&self) -> usize {
        self.write
    }

    pub fn read_offset(&self) -> usize {
        self.read
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline(always)]
    pub(crate) fn advance_write(&mut self, count: usize) {
        self.write = self.write.wrapping_add(count);
    }

    /// Moves the read offset forward, shifting both offsets down by one
    /// capacity once the read offset crosses it.
    #[inline(always)]
    pub(crate) fn advance_read(&mut self, count: usize) {
        self.read = self.read.wrapping_add(count);

        if self.read >= self.capacity {
            self.read = self.read.wrapping_sub(self.capacity);
            self.write = self.write.wrapping_sub(self.capacity);
        }
    }

    /// Committed-but-unread byte count, normalized into `0..=capacity`.
    #[inline]
    pub fn size(&self) -> usize {
        let capacity = self.capacity as isize;
        let mut amount = self.write.wrapping_sub(self.read) as isize;

        if amount < 0 {
            amount += capacity;
        } else if amount > capacity {
            amount -= capacity;
        }

        if unlikely(amount < 0 || amount > capacity) {
            amount = amount.clamp(0, capacity);
        }

        amount as usize
    }

    /// Position of the write offset within the first half of the mapping.
    #[inline(always)]
    pub(crate) fn write_index(&self) -> usize {
        self.index_of(self.write)
    }

    /// Position of the read offset within the first half of the mapping.
    #[inline(always)]
    pub(crate) fn read_index(&self) -> usize {
        self.index_of(self.read)
    }

    #[inline(always)]
    fn index_of(&self, offset: usize) -> usize {
        if offset < self.capacity {
            offset
        } else {
            (offset as isize).rem_euclid(self.capacity as isize) as usize
        }
    }

    pub(crate) fn reset(&mut self) {
        self.write = 0;
        self.read = 0;
    }
}
