pub mod led_blink;
pub mod register;

pub use led_blink::*;
pub use register::*;
