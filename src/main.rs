use anyhow::{Context, Result};
use led_blink_ctl::console::Console;
use led_blink_ctl::{DevMem, DeviceConfig, LedBlinker};
use std::io;

fn run() -> Result<()> {
    env_logger::init();

    let config = DeviceConfig::from_env().context("Failed to load device configuration")?;
    log::info!(
        "LED blinking core at {:#0x} via {} (window {:#0x} bytes)",
        config.base,
        config.mem_device.display(),
        config.window_len
    );

    let blinker = LedBlinker::new(config, DevMem)?;

    let stdin = io::stdin();
    let mut console = Console::new(stdin.lock(), io::stdout());
    console.run(&blinker).context("Console I/O failed")?;

    Ok(())
}

fn main() {
    match run() {
        Ok(()) => {}
        Err(e) => {
            eprintln!("{e:#}");
            std::process::exit(1);
        }
    }
}
