use std::marker::PhantomData;

use crate::err::MmioError;

use super::PhysicalMemory;

/// A live mapping of a device register window.
///
/// The mapping is released when the window is dropped. The window borrows the
/// channel it was mapped through, so it is always unmapped before the channel
/// is closed.
pub struct MappedWindow<'a, M: PhysicalMemory> {
    mem: &'a M,
    base: usize,
    len: usize,
    _channel: PhantomData<&'a M::Channel>,
}

impl<'a, M: PhysicalMemory> MappedWindow<'a, M> {
    pub fn map(
        mem: &'a M,
        channel: &'a M::Channel,
        phys_base: u64,
        len: usize,
    ) -> std::io::Result<Self> {
        let base = mem.map(channel, len, phys_base)?;
        Ok(Self {
            mem,
            base,
            len,
            _channel: PhantomData,
        })
    }

    pub fn base(&self) -> usize {
        self.base
    }

    /// Volatile 32-bit store at `offset` bytes into the window.
    pub fn write_u32(&self, offset: usize, value: u32) -> Result<(), MmioError> {
        const SIZE: usize = size_of::<u32>();

        if offset.checked_add(SIZE).is_none_or(|end| end > self.len) {
            return Err(MmioError::OutOfBounds {
                offset,
                size: SIZE,
                len: self.len,
            });
        }
        if offset % SIZE != 0 {
            return Err(MmioError::InvalidAlignment { offset, size: SIZE });
        }

        log::debug!("Write {value} to window offset {offset:#0x}");
        // SAFETY: offset is aligned and [offset, offset + 4) is inside the
        // mapping, which stays alive for as long as `self` does.
        unsafe { self.mem.store_u32(self.base + offset, value) };
        Ok(())
    }
}

impl<M: PhysicalMemory> Drop for MappedWindow<'_, M> {
    fn drop(&mut self) {
        if let Err(e) = self.mem.unmap(self.base, self.len) {
            log::warn!("Failed to unmap window at 0x{:x}: {e}", self.base);
        }
    }
}
