// Copyright (C) 2025 Category Labs, Inc.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Common internal helpers for vringbuf.

#[inline]
#[cold]
fn cold() {}

#[inline(always)]
pub(crate) fn unlikely(b: bool) -> bool {
    if b {
        cold();
    }
    b
}

/// Page size reported by the OS, falling back to 4 KiB if `sysconf` fails.
pub(crate) fn system_page_size() -> usize {
    let raw = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    usize::try_from(raw)
        .ok()
        .filter(|&page_size| page_size > 0)
        .unwrap_or(4096)
}

/// Rounds `len` up to a multiple of `page_size`, treating `0` as `1`.
///
/// Returns `None` if the result (or twice the result, which is what gets
/// mapped) does not fit in `usize`.
pub(crate) fn round_up_to_page(len: usize, page_size: usize) -> Option<usize> {
    let len = len.max(1);
    let rounded = len.checked_next_multiple_of(page_size)?;
    rounded.checked_mul(2).map(|_| rounded)
}
