//! The main API to the display driver. An `Ssd1306` owns the transport to one display, runs the
//! power-up sequence, and renders whole images onto it.

pub mod frame;

use std::sync::{Mutex, MutexGuard, PoisonError};

use image::GenericImageView;
use log::{debug, info, trace, warn};

use crate::command::consts::*;
use crate::command::{Command, INIT_SEQUENCE};
use crate::config::{self, Config};
use crate::error::Error;
use crate::interface::i2c::I2cTransport;
use crate::interface::{self, Transport};

/// A driver session for a 128x64 SSD1306.
///
/// Every operation takes the session's lock for its whole duration, so commands and renders
/// issued from different threads never interleave on the wire. A full render holds the lock for
/// 70 bus writes; callers that cannot block that long should not call it from such contexts.
pub struct Ssd1306<T>
where
    T: Transport,
{
    transport: Mutex<Option<T>>,
    config: Config,
}

impl<T> Ssd1306<T>
where
    T: Transport,
{
    /// Connect to the display and initialize it. `connect` is handed the display's bus address
    /// and must return a transport addressed to it.
    pub fn open<F>(connect: F) -> Result<Self, Error<T::Error>>
    where
        F: FnOnce(u8) -> Result<T, T::Error>,
    {
        Self::open_with_config(connect, Config::default())
    }

    /// Like `open`, additionally applying `config` after the power-up sequence on this and every
    /// later `reset`.
    pub fn open_with_config<F>(connect: F, config: Config) -> Result<Self, Error<T::Error>>
    where
        F: FnOnce(u8) -> Result<T, T::Error>,
    {
        let transport = connect(I2C_ADDRESS).map_err(Error::Connection)?;
        info!("opened SSD1306 at address {:#04x}", I2C_ADDRESS);
        let display = Ssd1306 {
            transport: Mutex::new(Some(transport)),
            config,
        };
        if let Err(e) = display.reset() {
            warn!("power-up sequence failed, releasing transport: {}", e);
            if let Err(close_err) = display.close() {
                warn!("releasing transport after failed open: {}", close_err);
            }
            return Err(e);
        }
        Ok(display)
    }

    /// Run the power-up sequence, then the session's `Config`. Only controller registers are
    /// touched; display RAM keeps whatever it held. Safe to repeat, and the usual way to recover
    /// after a transport error.
    pub fn reset(&self) -> Result<(), Error<T::Error>> {
        let mut guard = self.lock();
        let transport = guard.as_mut().ok_or(Error::Closed)?;
        debug!("sending power-up sequence ({} commands)", INIT_SEQUENCE.len());
        for &(cmd, args) in INIT_SEQUENCE {
            cmd.send(transport, args)?;
        }
        self.config.send(transport)
    }

    /// Send a raw command with its arguments.
    ///
    /// This bypasses everything the higher-level methods keep consistent: a command that changes
    /// addressing or geometry will make later renders come out wrong until the next `reset`. If
    /// this returns a transport error, the controller may have seen only part of the command.
    pub fn send_command(&self, cmd: Command, args: &[u8]) -> Result<(), Error<T::Error>> {
        let mut guard = self.lock();
        let transport = guard.as_mut().ok_or(Error::Closed)?;
        trace!("command {:?} {:02x?}", cmd, args);
        cmd.send(transport, args)
    }

    /// Set the contrast, 0-255.
    pub fn set_contrast(&self, contrast: u8) -> Result<(), Error<T::Error>> {
        self.send_command(Command::SetContrast, &[contrast])
    }

    /// Swap lit and unlit pixels without touching display RAM.
    pub fn set_inverted(&self, inverted: bool) -> Result<(), Error<T::Error>> {
        self.send_command(config::inversion(inverted), &[])
    }

    /// Turn the panel on or off. Display RAM is retained while off.
    pub fn set_display_on(&self, on: bool) -> Result<(), Error<T::Error>> {
        let cmd = match on {
            true => Command::DisplayOn,
            false => Command::DisplayOff,
        };
        self.send_command(cmd, &[])
    }

    /// Start or stop a scroll previously set up with the raw scroll commands.
    pub fn set_scroll_active(&self, active: bool) -> Result<(), Error<T::Error>> {
        self.send_command(config::scrolling(active), &[])
    }

    /// Draw `image` over the whole panel. `lit` decides, for each sampled pixel, whether the
    /// corresponding dot is on.
    ///
    /// The image must be at least 128x64; only its top left 128x64 is shown. Sampling outside a
    /// smaller image fails the way the image type's `get_pixel` does. Every call resends the full
    /// frame. On error, row groups already sent stay on the panel.
    pub fn render<I, F>(&self, image: &I, lit: F) -> Result<(), Error<T::Error>>
    where
        I: GenericImageView,
        F: Fn(I::Pixel) -> bool,
    {
        let mut guard = self.lock();
        let transport = guard.as_mut().ok_or(Error::Closed)?;
        if !frame::covers_display(image) {
            warn!(
                "render: {}x{} source is smaller than the panel",
                image.width(),
                image.height()
            );
        }
        trace!("render: {}x{} source", image.width(), image.height());
        Command::ColumnAddr.send(transport, &[0x00, COLUMN_MAX])?;
        Command::PageAddr.send(transport, &[0x00, PAGE_MAX])?;
        for group in 0..frame::ROW_GROUPS {
            let payload = frame::encode_image_group(image, group, &lit);
            interface::send_data(transport, &payload)?;
        }
        Ok(())
    }

    /// Release the transport. Later operations return `Error::Closed`; closing again is a no-op.
    /// The transport is released even if its own close reports an error.
    pub fn close(&self) -> Result<(), Error<T::Error>> {
        let mut guard = self.lock();
        match guard.take() {
            Some(mut transport) => {
                info!("closing SSD1306 session");
                transport.close().map_err(Error::Transport)
            }
            None => Ok(()),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.lock().is_none()
    }

    /// A panic while holding the lock leaves the transport usable at the byte level, and a
    /// `reset` brings the controller back, so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, Option<T>> {
        self.transport
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<I2C> Ssd1306<I2cTransport<I2C>>
where
    I2C: hal::blocking::i2c::Write,
    I2C::Error: core::fmt::Debug,
{
    /// Open the display on an `embedded-hal` I2C bus at the standard address.
    pub fn new_i2c(i2c: I2C) -> Result<Self, Error<I2C::Error>> {
        Self::open(|address| Ok(I2cTransport::new(i2c, address)))
    }

    /// Open the display on an `embedded-hal` I2C bus with extra settings.
    pub fn new_i2c_with_config(i2c: I2C, config: Config) -> Result<Self, Error<I2C::Error>> {
        Self::open_with_config(|address| Ok(I2cTransport::new(i2c, address)), config)
    }
}
