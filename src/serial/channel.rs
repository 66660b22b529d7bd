//! Request/response exchange over an open connection.
//!
//! Strictly one exchange at a time: write the full request line, then block
//! until one response line arrives. Without a deadline the read waits
//! forever; with one, timed-out polls are retried until it elapses.

use std::io::{self, Read, Write};
use std::time::{Duration, Instant};

use crate::command::Command;
use crate::error::{Error, Result};

/// Send one command and return the board's single-line response with the
/// trailing CRLF stripped.
///
/// A failed or short write is fatal; no read is attempted after it.
pub fn send<C>(conn: &mut C, command: &Command, deadline: Option<Duration>) -> Result<String>
where
    C: Read + Write,
{
    let line = command.encode();
    log::debug!("-> {:?}", String::from_utf8_lossy(&line));

    conn.write_all(&line)?;
    conn.flush()?;

    let response = read_response(conn, deadline)?;
    log::debug!("<- {:?}", response);
    Ok(response)
}

/// Block until one full response line arrives, then strip the terminator.
fn read_response<C: Read>(conn: &mut C, deadline: Option<Duration>) -> Result<String> {
    let started = Instant::now();
    let mut line = Vec::new();
    let mut byte = [0u8; 1];

    loop {
        match conn.read(&mut byte) {
            Ok(0) => return Err(Error::Disconnected),
            Ok(_) => {
                if byte[0] == b'\n' {
                    break;
                }
                line.push(byte[0]);
            }
            Err(ref e)
                if e.kind() == io::ErrorKind::TimedOut
                    || e.kind() == io::ErrorKind::WouldBlock =>
            {
                match deadline {
                    Some(after) if started.elapsed() >= after => {
                        return Err(Error::ReadTimeout { after });
                    }
                    _ => continue,
                }
            }
            Err(e) => return Err(Error::Io(e)),
        }
    }

    if line.last() == Some(&b'\r') {
        line.pop();
    }

    Ok(String::from_utf8_lossy(&line).into_owned())
}
