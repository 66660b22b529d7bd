//! Serial transport: board discovery and the line-based command exchange.

pub mod channel;
pub mod port;

pub use port::{PortConfig, SerialConnection};
