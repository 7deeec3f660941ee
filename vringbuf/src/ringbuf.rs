use crate::{config::Config, cursor::Cursors, memory::MirroredMemory, VRingBufError};

/// Single-producer single-consumer byte ring buffer backed by mirrored memory.
///
/// [`reserve`](VirtualRingBuf::reserve) and [`take`](VirtualRingBuf::take)
/// always hand out one contiguous slice, even when the logical window wraps
/// past the end of the buffer.
///
/// Capacity is policed by the caller. `commit` and `decommit` accept any
/// count: over-committing overwrites the oldest unread bytes and
/// over-decommitting discards bytes that were never written. Both are memory
/// safe, they only corrupt the buffered data.
pub struct VirtualRingBuf {
    memory: MirroredMemory,
    cursors: Cursors,
    page_size: usize,
}

impl VirtualRingBuf {
    /// Creates a buffer of at least `capacity` bytes, rounded up to the
    /// system page size. A capacity of `0` yields one page.
    pub fn new(capacity: usize) -> Result<Self, VRingBufError> {
        Self::with_config(&Config::new(capacity))
    }

    pub fn with_config(config: &Config) -> Result<Self, VRingBufError> {
        let page_size = config.resolved_page_size()?;
        let name = config.memfd_name()?;
        let memory = MirroredMemory::new(config.capacity, page_size, &name)?;

        Ok(VirtualRingBuf {
            cursors: Cursors::new(memory.size()),
            memory,
            page_size,
        })
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.memory.size()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Bytes committed and not yet decommitted.
    #[inline]
    pub fn size(&self) -> usize {
        self.cursors.size()
    }

    /// Bytes that can be committed without overwriting unread data.
    #[inline]
    pub fn available(&self) -> usize {
        self.capacity() - self.size()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    pub fn is_full(&self) -> bool {
        self.size() == self.capacity()
    }

    pub fn cursors(&self) -> Cursors {
        self.cursors
    }

    /// Returns the write window: `capacity()` contiguous bytes starting at the
    /// write offset.
    ///
    /// Only the first [`available`](VirtualRingBuf::available) bytes are free.
    /// Anything written past that lands on unread data.
    #[inline]
    pub fn reserve(&mut self) -> &mut [u8] {
        let index = self.cursors.write_index();
        unsafe {
            std::slice::from_raw_parts_mut(
                self.memory.as_ptr().as_ptr().add(index),
                self.capacity(),
            )
        }
    }

    /// Publishes `count` bytes written through [`reserve`](VirtualRingBuf::reserve).
    #[inline]
    pub fn commit(&mut self, count: usize) {
        self.cursors.advance_write(count);
        vringbuf_trace!(
            count = count,
            write_offset = self.cursors.write_offset(),
            size = self.cursors.size(),
            "commit"
        );
    }

    /// Returns the `size()` oldest unread bytes as one contiguous slice.
    #[inline]
    pub fn take(&self) -> &[u8] {
        let index = self.cursors.read_index();
        unsafe { std::slice::from_raw_parts(self.memory.as_ptr().as_ptr().add(index), self.size()) }
    }

    /// Releases `count` bytes obtained through [`take`](VirtualRingBuf::take).
    #[inline]
    pub fn decommit(&mut self, count: usize) {
        self.cursors.advance_read(count);
        vringbuf_trace!(
            count = count,
            read_offset = self.cursors.read_offset(),
            size = self.cursors.size(),
            "decommit"
        );
    }

    /// Drops all buffered data.
    pub fn clear(&mut self) {
        self.cursors.reset();
    }
}

impl std::fmt::Debug for VirtualRingBuf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VirtualRingBuf")
            .field("capacity", &self.capacity())
            .field("page_size", &self.page_size)
            .field("cursors", &self.cursors)
            .finish()
    }
}
