//! boardctl
//!
//! Control CLI for the USB demo board. The board enumerates as a USB-CDC
//! serial device (product id 4242) and speaks a line protocol at 115200
//! baud: one request line per command, one response line back.
//!
//! # Usage
//!
//! ```bash
//! # Switch the user LED on
//! boardctl set-led on
//!
//! # Blink the red LED every 500 ms
//! boardctl red-delay 500
//!
//! # Round-trip a line of text
//! boardctl echo hello
//!
//! # List serial ports visible to the host
//! boardctl ports
//!
//! # Talk to an explicit port, give up after 5 seconds
//! boardctl --port /dev/ttyACM1 --timeout 5 echo hello
//! ```

mod command;
mod error;
mod serial;

use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

use command::Command;
use error::Error;
use serial::channel;
use serial::port;
use serial::{PortConfig, SerialConnection};

/// Control the USB demo board over its serial command channel
#[derive(Parser)]
#[command(name = "boardctl")]
#[command(version = "0.1.0")]
#[command(about = "Control the USB demo board over its serial command channel")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Serial port path (skips USB product id discovery)
    #[arg(short, long, global = true)]
    port: Option<String>,

    /// Give up waiting for a response after this many seconds
    #[arg(short, long, global = true, value_name = "SECONDS")]
    timeout: Option<u64>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Switch the user LED on or off
    SetLed {
        /// 1/0, on/off or true/false
        #[arg(value_name = "ENABLE")]
        enable: String,
    },

    /// Set the red LED blink period
    RedDelay {
        /// Period in milliseconds
        #[arg(value_name = "VALUE")]
        value: String,
    },

    /// Send a line of text and print the board's reply
    Echo {
        /// Text to send
        #[arg(value_name = "TEXT")]
        text: String,
    },

    /// List available serial ports
    Ports,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logger; --verbose raises the default filter to debug
    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let command = match cli.command {
        Commands::Ports => {
            port::print_ports()?;
            return Ok(());
        }
        Commands::SetLed { ref enable } => Command::set_led(enable)?,
        Commands::RedDelay { ref value } => Command::red_delay(value)?,
        Commands::Echo { ref text } => Command::echo(text),
    };

    let mut conn = match connect(cli.port.as_deref()) {
        Ok(conn) => conn,
        Err(Error::DeviceNotFound { pid }) => {
            eprintln!(
                "{} Device not found (no serial port with USB product id {})",
                "[ERROR]".red().bold(),
                pid
            );
            eprintln!(
                "Plug the board in, or run {} to see what is attached",
                "boardctl ports".cyan()
            );
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };
    log::debug!("connected to {}", conn.config().path);

    let deadline = cli.timeout.map(Duration::from_secs);
    let response = channel::send(&mut conn, &command, deadline)?;
    println!("{}", response);

    Ok(())
}

/// Open the board's serial port, discovering it by USB product id unless an
/// explicit path was given.
fn connect(port_override: Option<&str>) -> error::Result<SerialConnection> {
    let path = match port_override {
        Some(path) => path.to_string(),
        None => port::find_device()?.path,
    };

    SerialConnection::open(PortConfig::new(&path))
}
