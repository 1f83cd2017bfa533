//! The command set for the SSD1306.
//!
//! Note 1: Over I2C every byte written to the controller is preceded by a control octet. `0x00`
//! marks the following byte as part of the command stream (an opcode or one of its arguments),
//! and `0x40` marks the rest of the write as display RAM data. This driver sends every command
//! byte in its own two-byte frame, and every run of display data as one write.

use crate::error::Error;
use crate::interface::{self, Transport};

pub mod consts {
    //! Geometry and wire constants for a 128x64 SSD1306 panel.

    /// The 7-bit bus address of the display.
    pub const I2C_ADDRESS: u8 = 0x3C;

    pub const DISPLAY_WIDTH: u32 = 128;
    pub const DISPLAY_HEIGHT: u32 = 64;
    /// Rows per page of display RAM.
    pub const PAGE_HEIGHT: u32 = 8;
    pub const NUM_PAGES: u8 = (DISPLAY_HEIGHT / PAGE_HEIGHT) as u8;
    pub const COLUMN_MAX: u8 = (DISPLAY_WIDTH - 1) as u8;
    pub const PAGE_MAX: u8 = NUM_PAGES - 1;

    /// Control octet announcing a single command-stream byte.
    pub const COMMAND_CONTROL: u8 = 0x00;
    /// Control octet announcing display RAM data. Numerically the same as
    /// `Command::SetStartLine`.
    pub const DATA_MARKER: u8 = 0x40;
}

/// Controller opcodes. Arguments, where an opcode takes any, are sent as separate command-stream
/// bytes after it; see `Ssd1306::send_command`.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Lower nibble of the column start address, page addressing mode only.
    SetLowColumn = 0x00,
    ExternalVcc = 0x01,
    SwitchCapVcc = 0x02,
    /// Upper nibble of the column start address, page addressing mode only.
    SetHighColumn = 0x10,
    /// Select horizontal (0), vertical (1) or page (2) addressing. One argument.
    MemoryMode = 0x20,
    /// Column window for data writes, start and end in 0-127. Two arguments.
    ColumnAddr = 0x21,
    /// Page window for data writes, start and end in 0-7. Two arguments.
    PageAddr = 0x22,
    RightHorizontalScroll = 0x26,
    LeftHorizontalScroll = 0x27,
    VerticalAndRightHorizontalScroll = 0x29,
    VerticalAndLeftHorizontalScroll = 0x2A,
    DeactivateScroll = 0x2E,
    ActivateScroll = 0x2F,
    /// Map display RAM row 0 to the top of the panel.
    SetStartLine = 0x40,
    /// Contrast, 0-255. One argument.
    SetContrast = 0x81,
    /// Enable (0x14) or disable (0x10) the internal charge pump. One argument.
    ChargePump = 0x8D,
    SegRemap = 0xA0,
    /// Column 127 is mapped to SEG0, mirroring the image horizontally.
    SegRemapHigh = 0xA1,
    SetVerticalScrollArea = 0xA3,
    /// Show display RAM contents.
    DisplayAllOnResume = 0xA4,
    /// Light every pixel regardless of RAM contents.
    DisplayAllOn = 0xA5,
    NormalDisplay = 0xA6,
    InvertDisplay = 0xA7,
    /// Multiplex ratio minus one, 15-63. One argument.
    SetMultiplex = 0xA8,
    DisplayOff = 0xAE,
    DisplayOn = 0xAF,
    ComScanInc = 0xC0,
    /// Scan COM lines from the last to COM0, flipping the image vertically.
    ComScanDec = 0xC8,
    SetDisplayOffset = 0xD3,
    SetDisplayClockDiv = 0xD5,
    SetPrecharge = 0xD9,
    SetComPins = 0xDA,
    SetVComDetect = 0xDB,
}

impl From<Command> for u8 {
    fn from(cmd: Command) -> u8 {
        cmd as u8
    }
}

/// The power-up sequence, sent in this order on every reset. The grouping of argument bytes
/// with their opcode follows the byte stream the panel has always been driven with; note that
/// the `SetStartLine` after `SetVComDetect` is the same byte the datasheet would read as that
/// command's level argument.
#[rustfmt::skip]
pub static INIT_SEQUENCE: &[(Command, &[u8])] = &[
    (Command::DisplayOff, &[]),
    (Command::SetDisplayClockDiv, &[0x80]),
    (Command::SetMultiplex, &[0x3F]),
    (Command::SetDisplayOffset, &[0x00]),
    (Command::SetStartLine, &[]),
    (Command::ChargePump, &[0x14]),
    (Command::MemoryMode, &[0x00]),
    (Command::SegRemapHigh, &[]),
    (Command::ComScanDec, &[]),
    (Command::SetComPins, &[0x12]),
    (Command::SetContrast, &[0xCF]),
    (Command::SetPrecharge, &[0xF1]),
    (Command::SetVComDetect, &[]),
    (Command::SetStartLine, &[]),
    (Command::DisplayAllOnResume, &[]),
    (Command::NormalDisplay, &[]),
    (Command::DisplayOn, &[]),
];

impl Command {
    /// Send this opcode followed by `args`, one command frame per byte. Stops at the first byte
    /// that fails to go out.
    pub(crate) fn send<T>(self, transport: &mut T, args: &[u8]) -> Result<(), Error<T::Error>>
    where
        T: Transport,
    {
        interface::send_command_byte(transport, self.into())?;
        for &arg in args {
            interface::send_command_byte(transport, arg)?;
        }
        Ok(())
    }
}
