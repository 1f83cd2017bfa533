//! Optional settings applied on top of the power-up sequence each time the display is reset.

use log::debug;

use crate::command::Command;
use crate::error::Error;
use crate::interface::Transport;

/// A configuration for the display. Builder methods offer a declarative way to either send a
/// setting after the power-up sequence, or to leave it as that sequence configured it. The
/// default configuration sends nothing extra.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Config {
    contrast: Option<u8>,
    inverted: Option<bool>,
    scroll_active: Option<bool>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the contrast (the power-up sequence uses 0xCF). See `Command::SetContrast`.
    pub fn contrast(self, contrast: u8) -> Self {
        Self {
            contrast: Some(contrast),
            ..self
        }
    }

    /// Show lit pixels dark and unlit pixels bright.
    pub fn inverted(self, inverted: bool) -> Self {
        Self {
            inverted: Some(inverted),
            ..self
        }
    }

    /// Explicitly start or stop any scroll left configured on the controller.
    pub fn scroll_active(self, active: bool) -> Self {
        Self {
            scroll_active: Some(active),
            ..self
        }
    }

    /// Transmit the commands needed to put the display at `transport` into the configuration
    /// encoded in `self`.
    pub(crate) fn send<T>(&self, transport: &mut T) -> Result<(), Error<T::Error>>
    where
        T: Transport,
    {
        if let Some(contrast) = self.contrast {
            debug!("config: contrast {:#04x}", contrast);
            Command::SetContrast.send(transport, &[contrast])?;
        }
        if let Some(inverted) = self.inverted {
            debug!("config: inverted {}", inverted);
            inversion(inverted).send(transport, &[])?;
        }
        if let Some(active) = self.scroll_active {
            debug!("config: scroll active {}", active);
            scrolling(active).send(transport, &[])?;
        }
        Ok(())
    }
}

pub(crate) fn inversion(inverted: bool) -> Command {
    match inverted {
        true => Command::InvertDisplay,
        false => Command::NormalDisplay,
    }
}

pub(crate) fn scrolling(active: bool) -> Command {
    match active {
        true => Command::ActivateScroll,
        false => Command::DeactivateScroll,
    }
}
