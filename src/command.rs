//! Board commands and their wire encoding.
//!
//! The board speaks a line protocol: one request line per command, one
//! response line back. Requests are `"{name} {argument}"` followed by CRLF.
//! Arguments are validated here, at the boundary; the line builder itself
//! forwards the serialized argument byte-for-byte.

use crate::error::Error;

/// A single command for the board.
///
/// The set is closed: the firmware understands exactly these three.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Switch the user LED on or off.
    SetLed(bool),
    /// Set the red LED blink period in milliseconds.
    RedDelay(u64),
    /// Ask the board to echo a line back.
    Echo(String),
}

impl Command {
    /// Parse a `set-led` switch argument. Accepts `1/0`, `on/off`,
    /// `true/false` (case-insensitive).
    pub fn set_led(arg: &str) -> Result<Self, Error> {
        match arg.to_ascii_lowercase().as_str() {
            "1" | "on" | "true" => Ok(Command::SetLed(true)),
            "0" | "off" | "false" => Ok(Command::SetLed(false)),
            _ => Err(Error::InvalidArgument {
                what: "LED switch",
                value: arg.to_string(),
                reason: "expected 1/0, on/off or true/false".to_string(),
            }),
        }
    }

    /// Parse a `red-delay` argument as a millisecond count.
    pub fn red_delay(arg: &str) -> Result<Self, Error> {
        arg.parse::<u64>()
            .map(Command::RedDelay)
            .map_err(|e| Error::InvalidArgument {
                what: "delay",
                value: arg.to_string(),
                reason: e.to_string(),
            })
    }

    /// An `echo` command. Any text goes, verbatim.
    pub fn echo(text: &str) -> Self {
        Command::Echo(text.to_string())
    }

    /// Command name as sent on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            Command::SetLed(_) => "set-led",
            Command::RedDelay(_) => "red-delay",
            Command::Echo(_) => "echo",
        }
    }

    /// Argument in wire form.
    pub fn argument(&self) -> String {
        match self {
            Command::SetLed(true) => "1".to_string(),
            Command::SetLed(false) => "0".to_string(),
            Command::RedDelay(ms) => ms.to_string(),
            Command::Echo(text) => text.clone(),
        }
    }

    /// Full request line for this command, terminator included.
    pub fn encode(&self) -> Vec<u8> {
        encode_line(self.name(), &self.argument())
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.name(), self.argument())
    }
}

/// Build a request line: `"{name} {argument}\r\n"` as bytes.
///
/// The argument is not escaped or transformed in any way.
pub fn encode_line(name: &str, argument: &str) -> Vec<u8> {
    let mut line = Vec::with_capacity(name.len() + argument.len() + 3);
    line.extend_from_slice(name.as_bytes());
    line.push(b' ');
    line.extend_from_slice(argument.as_bytes());
    line.extend_from_slice(b"\r\n");
    line
}
