//! Serial port discovery and connection management.
//!
//! The demo board enumerates as a USB-CDC serial device. Discovery filters
//! the host's ports by the board's USB product id and takes the first match
//! in enumeration order.

use std::io::{self, Read, Write};
use std::time::Duration;

use colored::Colorize;
use serialport::{FlowControl, SerialPort, SerialPortType};

use crate::error::{Error, Result};

/// USB product id reported by the board's CDC interface.
pub const BOARD_PID: u16 = 4242;

/// Fixed baud rate of the board's command channel.
pub const BAUD_RATE: u32 = 115_200;

/// Port-level read timeout. Timed-out reads are retried by the channel, so
/// this is a poll tick, not a response deadline.
const POLL_TICK: Duration = Duration::from_millis(100);

/// Configuration for a serial connection to the board.
#[derive(Debug, Clone)]
pub struct PortConfig {
    /// Serial port path (e.g. /dev/ttyACM0, COM3)
    pub path: String,
    /// Baud rate
    pub baud_rate: u32,
}

impl PortConfig {
    /// Configuration for the given port path with the board's fixed settings.
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            baud_rate: BAUD_RATE,
        }
    }
}

/// An open serial connection to the board.
pub struct SerialConnection {
    port: Box<dyn SerialPort>,
    config: PortConfig,
}

impl SerialConnection {
    /// Open and configure a serial connection.
    ///
    /// Asserts DTR after opening: the board is a CDC device and some CDC
    /// stacks hold back transmission until the host raises it.
    pub fn open(config: PortConfig) -> Result<Self> {
        let mut port = serialport::new(&config.path, config.baud_rate)
            .flow_control(FlowControl::None)
            .timeout(POLL_TICK)
            .open()?;

        port.write_data_terminal_ready(true)?;
        log::debug!("opened {} at {} baud", config.path, config.baud_rate);

        Ok(Self { port, config })
    }

    /// Get the port configuration
    pub fn config(&self) -> &PortConfig {
        &self.config
    }
}

impl Read for SerialConnection {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.port.read(buf)
    }
}

impl Write for SerialConnection {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.port.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.port.flush()
    }
}

/// Information about an enumerated serial port
#[derive(Debug, Clone)]
pub struct PortInfo {
    pub path: String,
    pub manufacturer: Option<String>,
    pub product: Option<String>,
    pub serial_number: Option<String>,
    pub vid: Option<u16>,
    pub pid: Option<u16>,
}

/// List all serial ports visible to the host.
pub fn list_ports() -> Result<Vec<PortInfo>> {
    let ports = serialport::available_ports()?;

    let port_infos: Vec<PortInfo> = ports
        .into_iter()
        .map(|p| {
            let (manufacturer, product, serial_number, vid, pid) = match p.port_type {
                SerialPortType::UsbPort(info) => (
                    info.manufacturer,
                    info.product,
                    info.serial_number,
                    Some(info.vid),
                    Some(info.pid),
                ),
                _ => (None, None, None, None, None),
            };

            PortInfo {
                path: p.port_name,
                manufacturer,
                product,
                serial_number,
                vid,
                pid,
            }
        })
        .collect();

    Ok(port_infos)
}

/// Select the first port in enumeration order whose USB product id matches.
///
/// Multiple matches are not tie-broken beyond enumeration order.
pub fn locate(ports: &[PortInfo], pid: u16) -> Result<&PortInfo> {
    ports
        .iter()
        .find(|p| p.pid == Some(pid))
        .ok_or(Error::DeviceNotFound { pid })
}

/// Enumerate ports and find the board by its USB product id.
pub fn find_device() -> Result<PortInfo> {
    let ports = list_ports()?;

    for port in &ports {
        log::debug!(
            "enumerated {} (vid:pid {})",
            port.path,
            match (port.vid, port.pid) {
                (Some(vid), Some(pid)) => format!("{:04x}:{:04x}", vid, pid),
                _ => "n/a".to_string(),
            }
        );
    }

    let device = locate(&ports, BOARD_PID)?;
    log::info!("found board at {}", device.path);
    Ok(device.clone())
}

/// Print formatted list of available serial ports
pub fn print_ports() -> Result<()> {
    let ports = list_ports()?;

    if ports.is_empty() {
        println!("{}", "No serial ports found".yellow());
        println!("\n{}", "Troubleshooting tips:".cyan().bold());
        println!("  1. Connect the board via USB");
        println!("  2. Check if the device is recognized: ls -la /dev/ttyUSB* /dev/ttyACM*");
        println!("  3. Add your user to the 'dialout' group: sudo usermod -aG dialout $USER");
        return Ok(());
    }

    println!("{}", "Available Serial Ports:".green().bold());
    println!("{}", "=".repeat(60));

    for port in ports {
        let board_tag = if port.pid == Some(BOARD_PID) {
            " <- demo board".green().bold().to_string()
        } else {
            String::new()
        };
        println!("\n{}: {}{}", "Port".cyan(), port.path.white().bold(), board_tag);

        if let Some(ref mfg) = port.manufacturer {
            println!("  Manufacturer: {}", mfg);
        }
        if let Some(ref prod) = port.product {
            println!("  Product: {}", prod);
        }
        if let Some(ref sn) = port.serial_number {
            println!("  Serial: {}", sn);
        }
        if let (Some(vid), Some(pid)) = (port.vid, port.pid) {
            println!("  VID:PID: {:04x}:{:04x}", vid, pid);
        }
    }

    println!("\n{}", "=".repeat(60));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usb_port(path: &str, pid: u16) -> PortInfo {
        PortInfo {
            path: path.to_string(),
            manufacturer: None,
            product: None,
            serial_number: None,
            vid: Some(0x0483),
            pid: Some(pid),
        }
    }

    fn native_port(path: &str) -> PortInfo {
        PortInfo {
            path: path.to_string(),
            manufacturer: None,
            product: None,
            serial_number: None,
            vid: None,
            pid: None,
        }
    }

    #[test]
    fn test_default_config() {
        let config = PortConfig::new("/dev/ttyACM0");
        assert_eq!(config.path, "/dev/ttyACM0");
        assert_eq!(config.baud_rate, 115200);
    }

    #[test]
    fn test_locate_first_match() {
        let ports = vec![
            native_port("/dev/ttyS0"),
            usb_port("/dev/ttyACM0", 1234),
            usb_port("/dev/ttyACM1", BOARD_PID),
            usb_port("/dev/ttyACM2", BOARD_PID),
        ];

        let found = locate(&ports, BOARD_PID).unwrap();
        assert_eq!(found.path, "/dev/ttyACM1");
    }

    #[test]
    fn test_locate_preserves_enumeration_order() {
        // Same PID twice in the other order picks the other port.
        let ports = vec![
            usb_port("/dev/ttyACM2", BOARD_PID),
            usb_port("/dev/ttyACM1", BOARD_PID),
        ];

        let found = locate(&ports, BOARD_PID).unwrap();
        assert_eq!(found.path, "/dev/ttyACM2");
    }

    #[test]
    fn test_locate_empty_list() {
        let ports: Vec<PortInfo> = Vec::new();
        assert!(matches!(
            locate(&ports, BOARD_PID),
            Err(Error::DeviceNotFound { pid: BOARD_PID })
        ));
    }

    #[test]
    fn test_locate_no_match() {
        let ports = vec![native_port("/dev/ttyS0"), usb_port("/dev/ttyACM0", 1234)];
        assert!(matches!(
            locate(&ports, BOARD_PID),
            Err(Error::DeviceNotFound { .. })
        ));
    }
}
