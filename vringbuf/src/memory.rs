use crate::common::round_up_to_page;
use crate::error::VRingBufError;
use core::ptr::NonNull;
use nix::sys::memfd::{memfd_create, MFdFlags};
use nix::sys::mman::{mmap, mmap_anonymous, munmap, MapFlags, ProtFlags};
use nix::unistd::ftruncate;
use std::ffi::CStr;
use std::num::NonZero;
use std::os::fd::OwnedFd;
use tracing::{debug, warn};

/// A `2 * size` byte mapping whose second half aliases the first.
///
/// Both halves are `MAP_SHARED` views of the same memfd, so the byte at
/// `ptr + o` and the byte at `ptr + o + size` are the same storage for every
/// `o` in `0..size`.
pub(crate) struct MirroredMemory {
    ptr: NonNull<u8>,
    size: usize,
}

impl MirroredMemory {
    /// Maps `capacity` bytes (rounded up to `page_size`, `0` counts as `1`)
    /// twice, back to back.
    ///
    /// `page_size` must be a non-zero multiple of the system page size.
    pub(crate) fn new(
        capacity: usize,
        page_size: usize,
        name: &CStr,
    ) -> Result<Self, VRingBufError> {
        let size = round_up_to_page(capacity, page_size)
            .ok_or(VRingBufError::CapacityOverflow(capacity))?;
        let total_size =
            NonZero::new(size * 2).ok_or(VRingBufError::CapacityOverflow(capacity))?;
        let file_size =
            libc::off_t::try_from(size).map_err(|_| VRingBufError::CapacityOverflow(capacity))?;

        let fd = memfd_create(name, MFdFlags::MFD_CLOEXEC).map_err(VRingBufError::MemfdCreate)?;
        ftruncate(&fd, file_size).map_err(|source| VRingBufError::Truncate { size, source })?;

        let reservation = unsafe {
            mmap_anonymous(
                None,
                total_size,
                ProtFlags::PROT_NONE,
                MapFlags::MAP_PRIVATE | MapFlags::MAP_ANONYMOUS,
            )
            .map_err(|source| VRingBufError::Reserve {
                size: total_size.get(),
                source,
            })?
        };

        // From here on dropping `memory` releases the whole reservation.
        let memory = MirroredMemory {
            ptr: reservation.cast::<u8>(),
            size,
        };
        memory.map_half(&fd, 0, "first")?;
        memory.map_half(&fd, size, "second")?;

        debug!(
            capacity = capacity,
            size = size,
            page_size = page_size,
            base = ?memory.ptr,
            "mapped mirrored ring buffer memory"
        );

        Ok(memory)
    }

    fn map_half(
        &self,
        fd: &OwnedFd,
        offset: usize,
        half: &'static str,
    ) -> Result<(), VRingBufError> {
        let addr = NonZero::new(self.ptr.as_ptr() as usize + offset);
        let len = NonZero::new(self.size).ok_or(VRingBufError::CapacityOverflow(self.size))?;

        unsafe {
            mmap(
                addr,
                len,
                ProtFlags::PROT_READ | ProtFlags::PROT_WRITE,
                MapFlags::MAP_SHARED | MapFlags::MAP_FIXED,
                fd,
                0,
            )
            .map_err(|source| VRingBufError::MapHalf { half, source })?;
        }

        Ok(())
    }

    #[inline]
    pub(crate) fn as_ptr(&self) -> NonNull<u8> {
        self.ptr
    }

    /// Length of one half, i.e. the ring buffer capacity.
    #[inline]
    pub(crate) fn size(&self) -> usize {
        self.size
    }

    pub(crate) fn mapped_len(&self) -> usize {
        self.size * 2
    }
}

impl Drop for MirroredMemory {
    fn drop(&mut self) {
        let result = unsafe { munmap(self.ptr.cast(), self.mapped_len()) };
        if let Err(errno) = result {
            warn!(
                base = ?self.ptr,
                len = self.mapped_len(),
                error = %errno,
                "failed to unmap ring buffer memory"
            );
        }
    }
}

unsafe impl Send for MirroredMemory {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::system_page_size;
    use eyre::Result;
    use rstest::rstest;

    fn map(capacity: usize) -> Result<MirroredMemory> {
        Ok(MirroredMemory::new(capacity, system_page_size(), c"vringbuf-test")?)
    }

    #[test]
    fn test_continuous_mapping() -> Result<()> {
        let size = system_page_size() * 2;
        let memory = map(size)?;
        assert_eq!(memory.size(), size);

        let ptr = memory.as_ptr().as_ptr();

        unsafe {
            for i in 0..size {
                ptr.add(i).write((i % 251) as u8);
            }

            for i in 0..size {
                let expected = (i % 251) as u8;
                assert_eq!(ptr.add(i).read(), expected, "mismatch at position {}", i);
                assert_eq!(
                    ptr.add(i + size).read(),
                    expected,
                    "mismatch at mirrored position {}",
                    i + size
                );
            }
        }

        Ok(())
    }

    #[test]
    fn test_second_half_writes_show_in_first() -> Result<()> {
        let size = system_page_size();
        let memory = map(size)?;
        let ptr = memory.as_ptr().as_ptr();

        unsafe {
            ptr.add(size).write(0x5A);
            ptr.add(2 * size - 1).write(0xA5);

            assert_eq!(ptr.read(), 0x5A);
            assert_eq!(ptr.add(size - 1).read(), 0xA5);
        }

        Ok(())
    }

    #[test]
    fn test_wrap_around_write() -> Result<()> {
        let size = system_page_size() * 2;
        let memory = map(size)?;
        let ptr = memory.as_ptr().as_ptr();
        let pattern = b"ABCDEFGH";

        unsafe {
            let start_pos = size - pattern.len() / 2;
            std::ptr::copy_nonoverlapping(pattern.as_ptr(), ptr.add(start_pos), pattern.len());

            for (i, &expected) in pattern[..pattern.len() / 2].iter().enumerate() {
                assert_eq!(ptr.add(start_pos + i).read(), expected);
            }

            for (i, &expected) in pattern[pattern.len() / 2..].iter().enumerate() {
                assert_eq!(ptr.add(i).read(), expected, "mismatch at wrapped position {}", i);
            }
        }

        Ok(())
    }

    #[test]
    fn test_starts_zeroed() -> Result<()> {
        let memory = map(1)?;
        let bytes =
            unsafe { std::slice::from_raw_parts(memory.as_ptr().as_ptr(), memory.mapped_len()) };
        assert!(bytes.iter().all(|&b| b == 0));
        Ok(())
    }

    #[rstest]
    #[case::zero(0, 0, 1)]
    #[case::one_page(1, 0, 1)]
    #[case::one_page_plus(1, 1, 2)]
    #[case::three_pages(3, 0, 3)]
    fn test_size_rounding(
        #[case] pages: usize,
        #[case] extra: usize,
        #[case] expected_pages: usize,
    ) -> Result<()> {
        let page_size = system_page_size();
        let memory = map(pages * page_size + extra)?;
        assert_eq!(memory.size(), expected_pages * page_size);
        assert_eq!(memory.mapped_len(), 2 * expected_pages * page_size);
        Ok(())
    }

    #[test]
    fn test_capacity_overflow_is_rejected() {
        let result = MirroredMemory::new(usize::MAX, system_page_size(), c"vringbuf-test");
        assert!(matches!(result, Err(VRingBufError::CapacityOverflow(_))));
    }

    #[test]
    fn test_unmappable_size_fails_cleanly() {
        let page_size = system_page_size();
        let result = MirroredMemory::new(usize::MAX / 4, page_size, c"vringbuf-test");
        assert!(result.is_err());
    }

    #[test]
    fn test_repeated_create_and_drop() -> Result<()> {
        for _ in 0..64 {
            let memory = map(system_page_size() * 4)?;
            unsafe { memory.as_ptr().as_ptr().write(1) };
        }
        Ok(())
    }
}
