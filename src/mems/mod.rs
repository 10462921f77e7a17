pub mod devmem;
#[cfg(test)]
pub(crate) mod fake;
pub mod window;

pub use devmem::*;
pub use window::*;

use std::io;
use std::path::Path;

/// Access to raw physical memory through the operating system.
///
/// This is the seam between the register access layer and the kernel. The
/// real implementation is [`DevMem`]; tests substitute a recording fake.
pub trait PhysicalMemory {
    /// An open handle on the physical memory device. Dropping it closes it.
    type Channel;

    /// Open the device at `path` for reading and writing.
    fn open(&self, path: &Path) -> io::Result<Self::Channel>;

    /// Map `len` bytes of physical memory starting at `phys_offset` as
    /// shared, read/write memory and return the mapped base address.
    ///
    /// A failed mapping must be reported as an error, never as an address.
    fn map(&self, channel: &Self::Channel, len: usize, phys_offset: u64) -> io::Result<usize>;

    /// Issue a single 32-bit store that is visible to the device.
    ///
    /// # Safety
    ///
    /// `addr` must be 4-byte aligned and lie, together with the following
    /// three bytes, inside a mapping returned by [`PhysicalMemory::map`] that
    /// has not been unmapped yet.
    unsafe fn store_u32(&self, addr: usize, value: u32);

    /// Release a mapping previously returned by [`PhysicalMemory::map`].
    fn unmap(&self, addr: usize, len: usize) -> io::Result<()>;
}
