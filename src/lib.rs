pub mod config;
pub mod console;
pub mod devices;
pub mod err;
pub mod mems;

pub use config::DeviceConfig;
pub use devices::*;
pub use err::*;
pub use mems::*;
