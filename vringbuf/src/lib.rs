//! # vringbuf - Double-Mapped Ring Buffer
//!
//! Byte ring buffer whose storage is mapped twice, back to back, so the byte
//! at offset `o + capacity` is the byte at offset `o`. The producer and the
//! consumer always get a single contiguous slice, even when their window
//! wraps past the end of the buffer.
//!
//! Uses `memfd` and two fixed `mmap` calls over one reserved address range.
//! No atomics and no locking: one producer and one consumer, serialized by
//! the borrow checker.
//!
//! ## Creating a Buffer
//!
//! ```rust
//! use vringbuf::VirtualRingBuf;
//!
//! let ringbuf = VirtualRingBuf::new(8000)?;
//! assert_eq!(ringbuf.capacity() % ringbuf.page_size(), 0);
//! # Ok::<(), vringbuf::VRingBufError>(())
//! ```
//!
//! The capacity is rounded up to a multiple of the page size (`0` counts as
//! one byte). Use [`Config`] to pick a coarser granularity or to name the
//! backing memory object:
//!
//! ```rust
//! use vringbuf::{Config, VirtualRingBuf};
//!
//! let config = Config::from_toml_str(r#"
//! capacity = 1048576
//! name = "socket-rx"
//! "#)?;
//! let ringbuf = VirtualRingBuf::with_config(&config)?;
//! assert_eq!(ringbuf.capacity(), 1 << 20);
//! # Ok::<(), eyre::Report>(())
//! ```
//!
//! ## Producer Side
//!
//! ```rust
//! # use vringbuf::VirtualRingBuf;
//! # let mut ringbuf = VirtualRingBuf::new(4096)?;
//! let data = b"Hello, world!";
//!
//! let free = ringbuf.available();
//! assert!(data.len() <= free);
//! ringbuf.reserve()[..data.len()].copy_from_slice(data);
//! ringbuf.commit(data.len());
//! # Ok::<(), vringbuf::VRingBufError>(())
//! ```
//!
//! `commit` does not check the count. Committing more than
//! [`available`](VirtualRingBuf::available) overwrites the oldest unread
//! bytes.
//!
//! ## Consumer Side
//!
//! ```rust
//! # use vringbuf::VirtualRingBuf;
//! # let mut ringbuf = VirtualRingBuf::new(4096)?;
//! # ringbuf.reserve()[..5].copy_from_slice(b"hello");
//! # ringbuf.commit(5);
//! let len = ringbuf.take().len();
//! assert_eq!(ringbuf.take(), b"hello");
//! ringbuf.decommit(len);
//! assert!(ringbuf.is_empty());
//! # Ok::<(), vringbuf::VRingBufError>(())
//! ```
//!
//! ## Streams
//!
//! ```rust
//! # use vringbuf::VirtualRingBuf;
//! let mut ringbuf = VirtualRingBuf::new(4096)?;
//! let mut input: &[u8] = b"streamed bytes";
//! let mut output = Vec::new();
//!
//! ringbuf.fill_from(&mut input, usize::MAX)?;
//! ringbuf.drain_to(&mut output, usize::MAX)?;
//! assert_eq!(output, b"streamed bytes");
//! # Ok::<(), eyre::Report>(())
//! ```
//!
//! [`VirtualRingBuf::reader`] and [`VirtualRingBuf::writer`] borrow the
//! buffer as `std::io::Read` / `std::io::Write` for use with `io::copy`.

#[macro_use]
mod trace_macro;

pub use config::Config;
pub use cursor::Cursors;
pub use error::VRingBufError;
pub use ringbuf::VirtualRingBuf;
pub use stream::{Reader, Writer};

pub(crate) mod common;
pub mod config;
pub mod cursor;
pub mod error;
pub(crate) mod memory;
pub(crate) mod ringbuf;
pub(crate) mod stream;
