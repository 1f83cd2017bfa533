//! Driver library for the Solomon Systech SSD1306 monochrome OLED controller on a two-wire (I2C)
//! bus, sized for 128x64 panels.
//!
//! ```ignore
//! let display = Ssd1306::new_i2c(i2c)?;
//! display.render(&image, luma_threshold(125))?;
//! ```

extern crate embedded_hal as hal;


pub mod command;
pub mod config;
pub mod display;
pub mod error;
pub mod interface;

// Re-exports for primary API.
pub use command::{consts, Command, INIT_SEQUENCE};
pub use config::Config;
pub use display::frame::{luma_nonzero, luma_threshold};
pub use display::Ssd1306;
pub use error::Error;
pub use interface::i2c::I2cTransport;
pub use interface::Transport;
