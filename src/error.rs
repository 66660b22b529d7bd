//! Error types for device discovery and the command exchange.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// No enumerated serial port carries the expected USB product ID.
    #[error("no serial device with USB product id {pid:#06x} ({pid}) found")]
    DeviceNotFound { pid: u16 },

    /// Enumeration or open failed at the serialport layer.
    #[error("serial port error: {0}")]
    Port(#[from] serialport::Error),

    /// Read or write failed mid-exchange.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The connection reached end-of-stream before a full response line.
    #[error("device disconnected before a complete response line")]
    Disconnected,

    /// A response deadline was configured and elapsed.
    #[error("no response from device within {after:?}")]
    ReadTimeout { after: Duration },

    /// A command argument failed validation before anything was sent.
    #[error("invalid {what}: {value:?} ({reason})")]
    InvalidArgument {
        what: &'static str,
        value: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
