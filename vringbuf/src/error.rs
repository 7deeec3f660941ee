use thiserror::Error;

#[derive(Error, Debug)]
pub enum VRingBufError {
    #[error("page size {0} must be a non-zero multiple of the system page size ({1} bytes)")]
    InvalidPageSize(usize, usize),

    #[error("capacity {0} overflows the addressable mapping size")]
    CapacityOverflow(usize),

    #[error("invalid memory object name: {0:?}")]
    InvalidName(String),

    #[error("failed to create memory file descriptor: {0}")]
    MemfdCreate(#[source] nix::errno::Errno),

    #[error("failed to set memory file size to {size} bytes: {source}")]
    Truncate {
        size: usize,
        #[source]
        source: nix::errno::Errno,
    },

    #[error("failed to reserve {size} bytes of virtual address space: {source}")]
    Reserve {
        size: usize,
        #[source]
        source: nix::errno::Errno,
    },

    #[error("failed to map {half} half of ring buffer: {source}")]
    MapHalf {
        half: &'static str,
        #[source]
        source: nix::errno::Errno,
    },
}
