//! Hardware layout of the LED blinking peripheral.

use std::path::PathBuf;

use crate::devices::BlinkRegister;
use crate::err::ConfigError;

pub const DEFAULT_MEM_DEVICE: &str = "/dev/mem";
pub const LED_BLINKING_BASE: u64 = 0x4001_0000;
pub const DEFAULT_WINDOW_LEN: usize = 0x1000;
pub const FREQUENCY_OFFSET: usize = 0x100; // Blink_frequency_1_Data
pub const DIRECTION_OFFSET: usize = 0x104; // Blink_direction_Data

const FALLBACK_PAGE_SIZE: u64 = 0x1000;
const REGISTER_SIZE: usize = 4;

pub const ENV_MEM_DEVICE: &str = "LED_BLINK_MEM";
pub const ENV_BASE: &str = "LED_BLINK_BASE";
pub const ENV_WINDOW_LEN: &str = "LED_BLINK_WINDOW_LEN";
pub const ENV_FREQ_OFFSET: &str = "LED_BLINK_FREQ_OFFSET";
pub const ENV_DIR_OFFSET: &str = "LED_BLINK_DIR_OFFSET";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceConfig {
    pub mem_device: PathBuf,
    pub base: u64,
    pub window_len: usize,
    pub frequency_offset: usize,
    pub direction_offset: usize,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            mem_device: PathBuf::from(DEFAULT_MEM_DEVICE),
            base: LED_BLINKING_BASE,
            window_len: DEFAULT_WINDOW_LEN,
            frequency_offset: FREQUENCY_OFFSET,
            direction_offset: DIRECTION_OFFSET,
        }
    }
}

impl DeviceConfig {
    /// Defaults overlaid with `LED_BLINK_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_MEM_DEVICE) {
            config.mem_device = PathBuf::from(path);
        }
        if let Some(raw) = lookup(ENV_BASE) {
            config.base = parse_number(ENV_BASE, &raw)?;
        }
        if let Some(raw) = lookup(ENV_WINDOW_LEN) {
            config.window_len = parse_usize(ENV_WINDOW_LEN, &raw)?;
        }
        if let Some(raw) = lookup(ENV_FREQ_OFFSET) {
            config.frequency_offset = parse_usize(ENV_FREQ_OFFSET, &raw)?;
        }
        if let Some(raw) = lookup(ENV_DIR_OFFSET) {
            config.direction_offset = parse_usize(ENV_DIR_OFFSET, &raw)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// The window must cover every register and start on a page boundary.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_len == 0 {
            return Err(ConfigError::EmptyWindow);
        }
        let page = page_size();
        if self.base % page != 0 {
            return Err(ConfigError::UnalignedBase {
                base: self.base,
                page,
            });
        }
        for register in [BlinkRegister::Frequency, BlinkRegister::Direction] {
            let offset = self.offset_of(register);
            if offset
                .checked_add(REGISTER_SIZE)
                .is_none_or(|end| end > self.window_len)
            {
                return Err(ConfigError::OffsetOutsideWindow {
                    name: register.name(),
                    offset,
                    len: self.window_len,
                });
            }
        }
        Ok(())
    }

    pub fn offset_of(&self, register: BlinkRegister) -> usize {
        match register {
            BlinkRegister::Frequency => self.frequency_offset,
            BlinkRegister::Direction => self.direction_offset,
        }
    }
}

/// Page size of the running kernel; `mmap` offsets must be a multiple of it.
pub fn page_size() -> u64 {
    // SAFETY: sysconf has no preconditions and only reads system configuration.
    let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    u64::try_from(size)
        .ok()
        .filter(|&size| size > 0)
        .unwrap_or(FALLBACK_PAGE_SIZE)
}

// Accepts `0x`-prefixed hex or plain decimal
fn parse_number(key: &'static str, raw: &str) -> Result<u64, ConfigError> {
    let trimmed = raw.trim();
    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(&hex.replace('_', ""), 16),
        None => trimmed.replace('_', "").parse(),
    };
    parsed.map_err(|_| ConfigError::invalid_value(key, raw))
}

fn parse_usize(key: &'static str, raw: &str) -> Result<usize, ConfigError> {
    let value = parse_number(key, raw)?;
    usize::try_from(value).map_err(|_| ConfigError::invalid_value(key, raw))
}
