//! Moving data between a [`VirtualRingBuf`] and byte streams.
//!
//! [`fill_from`](VirtualRingBuf::fill_from) and
//! [`drain_to`](VirtualRingBuf::drain_to) issue exactly one `read` or `write`
//! call against the stream, straight into or out of the mapped memory.
//! [`Reader`] and [`Writer`] go the other way: they borrow the buffer and
//! copy between a caller slice and it through `std::io::Read` and
//! `std::io::Write`.
//!
//! The buffer itself implements neither trait, so `Read::take` never shadows
//! [`VirtualRingBuf::take`].

use crate::VirtualRingBuf;
use std::io::{self, Read, Write};

impl VirtualRingBuf {
    /// Reads at most `count` bytes from `reader` into the free space and
    /// commits what was read.
    ///
    /// Returns `Ok(0)` on end of stream, or without touching `reader` when
    /// `count` is zero or the buffer is full. Errors leave the buffer as it
    /// was. A count beyond what the read slice could hold is not committed.
    pub fn fill_from<R: Read + ?Sized>(
        &mut self,
        reader: &mut R,
        count: usize,
    ) -> io::Result<usize> {
        let len = count.min(self.available());
        if len == 0 {
            return Ok(0);
        }

        let read = reader.read(&mut self.reserve()[..len])?.min(len);
        self.commit(read);

        vringbuf_trace!(requested = count, len = len, read = read, "fill from stream");
        Ok(read)
    }

    /// Writes at most `count` buffered bytes to `writer` and decommits what
    /// was written.
    ///
    /// Returns `Ok(0)` without touching `writer` when `count` is zero or the
    /// buffer is empty. Errors leave the buffer as it was.
    pub fn drain_to<W: Write + ?Sized>(
        &mut self,
        writer: &mut W,
        count: usize,
    ) -> io::Result<usize> {
        let len = count.min(self.size());
        if len == 0 {
            return Ok(0);
        }

        let written = writer.write(&VirtualRingBuf::take(self)[..len])?.min(len);
        self.decommit(written);

        vringbuf_trace!(requested = count, len = len, written = written, "drain to stream");
        Ok(written)
    }

    /// Borrows the buffer as an `io::Read` over its unread bytes.
    pub fn reader(&mut self) -> Reader<'_> {
        Reader { ringbuf: self }
    }

    /// Borrows the buffer as an `io::Write` into its free space.
    pub fn writer(&mut self) -> Writer<'_> {
        Writer { ringbuf: self }
    }
}

/// Copies the oldest buffered bytes out and decommits them. An empty buffer
/// reads as end of stream.
pub struct Reader<'a> {
    ringbuf: &'a mut VirtualRingBuf,
}

impl<'a> Read for Reader<'a> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let len = buf.len().min(self.ringbuf.size());
        buf[..len].copy_from_slice(&VirtualRingBuf::take(&*self.ringbuf)[..len]);
        self.ringbuf.decommit(len);
        Ok(len)
    }
}

/// Copies as much as fits in the free space in and commits it. A full buffer
/// accepts zero bytes.
pub struct Writer<'a> {
    ringbuf: &'a mut VirtualRingBuf,
}

impl<'a> Write for Writer<'a> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let len = buf.len().min(self.ringbuf.available());
        self.ringbuf.reserve()[..len].copy_from_slice(&buf[..len]);
        self.ringbuf.commit(len);
        Ok(len)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
