//! The byte-stream transport the driver talks through, and the control-octet framing that tells
//! the SSD1306 whether the bytes that follow are commands or display data.

use core::fmt::Debug;

use log::warn;

use crate::command::consts::{COMMAND_CONTROL, DATA_MARKER};
use crate::error::Error;

/// A connection to a single device on the bus. Opening and addressing the connection is the
/// responsibility of whoever constructs the transport; see `Ssd1306::open`.
pub trait Transport {
    type Error: Debug;

    /// Write `buf` to the device, returning how many bytes were accepted. Returning fewer than
    /// `buf.len()` is treated by the driver as a failed write.
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error>;

    /// Release the connection.
    fn close(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Write all of `buf` in a single transport call, turning a partial write into an error.
fn write_exact<T>(transport: &mut T, buf: &[u8]) -> Result<(), Error<T::Error>>
where
    T: Transport,
{
    let written = transport.write(buf).map_err(|e| {
        warn!("transport write of {} bytes failed: {:?}", buf.len(), e);
        Error::Transport(e)
    })?;
    if written != buf.len() {
        warn!("short write: sent {} of {} bytes", written, buf.len());
        return Err(Error::ShortWrite {
            written,
            expected: buf.len(),
        });
    }
    Ok(())
}

/// Send one command-stream byte (an opcode or one of its arguments) as its own frame.
pub(crate) fn send_command_byte<T>(transport: &mut T, byte: u8) -> Result<(), Error<T::Error>>
where
    T: Transport,
{
    write_exact(transport, &[COMMAND_CONTROL, byte])
}

/// Send a display data payload. The payload must already begin with the data marker octet.
pub(crate) fn send_data<T>(transport: &mut T, payload: &[u8]) -> Result<(), Error<T::Error>>
where
    T: Transport,
{
    debug_assert_eq!(payload.first(), Some(&DATA_MARKER));
    write_exact(transport, payload)
}

pub mod i2c {
    //! Adapter from any `embedded-hal` blocking I2C bus to a `Transport`. The 7-bit device
    //! address is bound when the adapter is built, so every write is one complete I2C
    //! transaction addressed to the display.

    use hal::blocking::i2c::Write;

    use super::Transport;

    pub struct I2cTransport<I2C> {
        /// The I2C master the SSD1306 is attached to.
        i2c: I2C,
        /// 7-bit address of the SSD1306 on that bus.
        address: u8,
    }

    impl<I2C> I2cTransport<I2C>
    where
        I2C: Write,
    {
        /// Bind `i2c` to the device at `address`.
        pub fn new(i2c: I2C, address: u8) -> Self {
            Self { i2c, address }
        }

        pub fn address(&self) -> u8 {
            self.address
        }

        /// Give the bus back.
        pub fn release(self) -> I2C {
            self.i2c
        }
    }

    impl<I2C> Transport for I2cTransport<I2C>
    where
        I2C: Write,
        I2C::Error: core::fmt::Debug,
    {
        type Error = I2C::Error;

        fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            self.i2c.write(self.address, buf)?;
            Ok(buf.len())
        }
    }

}

#[cfg(test)]
pub mod test_spy {
    //! A transport for use in unit tests to spy on whatever was written to it. Clones share the
    //! same record, so a test can keep one half while the driver owns the other.

    use std::sync::{Arc, Mutex};

    use super::Transport;

    /// One transport write, classified by its leading control octet.
    #[derive(Clone, Debug, PartialEq)]
    pub enum Sent {
        Cmd(u8),
        Data(Vec<u8>),
        /// Anything that is neither a command frame nor a data payload.
        Raw(Vec<u8>),
    }

    #[derive(Debug, PartialEq)]
    pub enum SpyError {
        Refused,
        Closed,
    }

    #[derive(Default)]
    struct State {
        writes: Vec<Vec<u8>>,
        /// Zero-based index of the write that should misbehave.
        fail_at: Option<(usize, Fault)>,
        attempts: usize,
        fail_close: bool,
        closes: usize,
        closed: bool,
    }

    #[derive(Clone, Copy)]
    enum Fault {
        Error,
        Short(usize),
    }

    #[derive(Clone, Default)]
    pub struct SpyTransport {
        state: Arc<Mutex<State>>,
    }

    impl SpyTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// Another handle onto the same record.
        pub fn split(&self) -> Self {
            self.clone()
        }

        /// Make write number `n` (zero-based) fail outright.
        pub fn fail_write(&self, n: usize) {
            self.state.lock().unwrap().fail_at = Some((n, Fault::Error));
        }

        /// Make write number `n` (zero-based) accept only `accepted` bytes.
        pub fn short_write(&self, n: usize, accepted: usize) {
            self.state.lock().unwrap().fail_at = Some((n, Fault::Short(accepted)));
        }

        /// Make `close` report an error. The transport still counts as closed.
        pub fn fail_close(&self) {
            self.state.lock().unwrap().fail_close = true;
        }

        pub fn writes(&self) -> Vec<Vec<u8>> {
            self.state.lock().unwrap().writes.clone()
        }

        pub fn sent(&self) -> Vec<Sent> {
            self.writes()
                .into_iter()
                .map(|w| match w.as_slice() {
                    [0x00, b] => Sent::Cmd(*b),
                    [0x40, rest @ ..] => Sent::Data(rest.to_vec()),
                    _ => Sent::Raw(w),
                })
                .collect()
        }

        pub fn check_multi(&self, expected: &[Sent]) {
            assert_eq!(self.sent(), expected);
        }

        pub fn closes(&self) -> usize {
            self.state.lock().unwrap().closes
        }

        pub fn clear(&mut self) {
            self.state.lock().unwrap().writes.clear()
        }
    }

    impl Transport for SpyTransport {
        type Error = SpyError;

        fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            let mut state = self.state.lock().unwrap();
            if state.closed {
                return Err(SpyError::Closed);
            }
            let attempt = state.attempts;
            state.attempts += 1;
            match state.fail_at {
                Some((n, Fault::Error)) if n == attempt => Err(SpyError::Refused),
                Some((n, Fault::Short(accepted))) if n == attempt => {
                    state.writes.push(buf[..accepted].to_vec());
                    Ok(accepted)
                }
                _ => {
                    state.writes.push(buf.to_vec());
                    Ok(buf.len())
                }
            }
        }

        fn close(&mut self) -> Result<(), Self::Error> {
            let mut state = self.state.lock().unwrap();
            state.closes += 1;
            state.closed = true;
            match state.fail_close {
                true => Err(SpyError::Refused),
                false => Ok(()),
            }
        }
    }
}
