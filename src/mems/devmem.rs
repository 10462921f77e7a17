//! `/dev/mem` backend built on `mmap(2)`.

use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::AsRawFd;
use std::path::Path;
use std::ptr;

use super::PhysicalMemory;

#[derive(Debug, Default, Clone, Copy)]
pub struct DevMem;

impl PhysicalMemory for DevMem {
    type Channel = File;

    fn open(&self, path: &Path) -> io::Result<File> {
        // O_SYNC keeps the kernel from mapping device memory as cacheable
        OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_SYNC)
            .open(path)
    }

    fn map(&self, channel: &File, len: usize, phys_offset: u64) -> io::Result<usize> {
        let offset = libc::off_t::try_from(phys_offset).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("physical offset 0x{phys_offset:x} does not fit in off_t"),
            )
        })?;

        // SAFETY: no address hint is given, so the kernel picks a fresh range
        // and nothing already owned by this process is replaced.
        let addr = unsafe {
            libc::mmap(
                ptr::null_mut(),
                len,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_SHARED,
                channel.as_raw_fd(),
                offset,
            )
        };

        // mmap signals failure with MAP_FAILED, not null
        if addr == libc::MAP_FAILED {
            return Err(io::Error::last_os_error());
        }

        log::debug!("Mapped 0x{len:x} bytes of physical 0x{phys_offset:x} at {addr:p}");
        Ok(addr as usize)
    }

    unsafe fn store_u32(&self, addr: usize, value: u32) {
        // SAFETY: the caller guarantees addr is aligned and inside a live mapping.
        unsafe { ptr::write_volatile(addr as *mut u32, value) }
    }

    fn unmap(&self, addr: usize, len: usize) -> io::Result<()> {
        // SAFETY: addr/len describe a mapping created by `map` above, and no
        // references into it outlive this call.
        let ret = unsafe { libc::munmap(addr as *mut libc::c_void, len) };
        if ret != 0 {
            return Err(io::Error::last_os_error());
        }
        log::debug!("Unmapped 0x{len:x} bytes at 0x{addr:x}");
        Ok(())
    }
}
