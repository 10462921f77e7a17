//! Register access for the MLHDLC LED blinking IP core.
//!
//! Every write is a self-contained cycle: open the physical memory device,
//! map the register window, issue one volatile 32-bit store, unmap, close.
//! Nothing is cached between calls.

use crate::config::DeviceConfig;
use crate::devices::{BlinkRegister, Direction, FrequencyIndex};
use crate::err::BlinkError;
use crate::mems::{DevMem, MappedWindow, PhysicalMemory};

pub struct LedBlinker<M: PhysicalMemory = DevMem> {
    config: DeviceConfig,
    mem: M,
}

impl<M: PhysicalMemory> LedBlinker<M> {
    pub fn new(config: DeviceConfig, mem: M) -> Result<Self, BlinkError> {
        config.validate()?;
        Ok(Self { config, mem })
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    pub fn memory(&self) -> &M {
        &self.mem
    }

    /// Write `value` verbatim to the register at `offset` bytes into the
    /// device window.
    ///
    /// No domain checks are applied to `value`. The offset must fit in the
    /// window, otherwise nothing is written. On any failure the write has not
    /// happened and all acquired resources have been released.
    pub fn write_register(&self, offset: usize, value: u32) -> Result<(), BlinkError> {
        let DeviceConfig {
            mem_device,
            base,
            window_len,
            ..
        } = &self.config;

        log::debug!(
            "Write {value} to register {offset:#0x} (physical {:#0x})",
            base.wrapping_add(offset as u64)
        );

        let channel = self
            .mem
            .open(mem_device)
            .map_err(|e| {
                log::warn!("Cannot open {}: {e}", mem_device.display());
                BlinkError::access(mem_device, e)
            })?;

        let window = MappedWindow::map(&self.mem, &channel, *base, *window_len).map_err(|e| {
            log::warn!("Mapping {window_len:#0x} bytes at {base:#0x} failed: {e}");
            BlinkError::mapping(*base, *window_len, e)
        })?;

        window.write_u32(offset, value)?;
        Ok(())
    }

    pub fn write_named(&self, register: BlinkRegister, value: u32) -> Result<(), BlinkError> {
        self.write_register(self.config.offset_of(register), value)
    }

    pub fn set_frequency(&self, index: FrequencyIndex) -> Result<(), BlinkError> {
        log::info!("Setting blink frequency index to {}", index.get());
        self.write_named(BlinkRegister::Frequency, index.into())
    }

    pub fn set_direction(&self, direction: Direction) -> Result<(), BlinkError> {
        log::info!("Setting blink direction to {direction:?}");
        self.write_named(BlinkRegister::Direction, direction.into())
    }
}
