//! Byte transports a receiver session runs over

use std::{
    io::{self, Read, Write},
    net::TcpStream,
    str::FromStr,
    time::Duration,
};

use log::debug;

use crate::error::RxError;

/// How long a single read waits for data before reporting none
pub const READ_TIMEOUT: Duration = Duration::from_millis(10);

/// Baud rate used for serial ports opened without one
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// A bidirectional byte stream to the receiver.
///
/// `read` returns `Ok(0)` if no data arrived within a short timeout; end of
/// stream is reported as an error.
pub trait Transport {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    fn write_all(&mut self, data: &[u8]) -> io::Result<()>;

    /// Current baud rate, `None` for transports without one
    fn baud_rate(&self) -> Option<u32> {
        None
    }

    fn set_baud_rate(&mut self, _baud: u32) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "transport has no baud rate",
        ))
    }

    /// Discard data received but not yet read
    fn clear_input(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read(buf)
    }

    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        (**self).write_all(data)
    }

    fn baud_rate(&self) -> Option<u32> {
        (**self).baud_rate()
    }

    fn set_baud_rate(&mut self, baud: u32) -> io::Result<()> {
        (**self).set_baud_rate(baud)
    }

    fn clear_input(&mut self) -> io::Result<()> {
        (**self).clear_input()
    }
}

fn timeout_as_no_data(res: io::Result<usize>) -> io::Result<usize> {
    match res {
        Err(e) if matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock) => Ok(0),
        res => res,
    }
}

/// Serial port transport
#[cfg(feature = "serial")]
pub struct SerialTransport {
    port: Box<dyn serialport::SerialPort>,
}

#[cfg(feature = "serial")]
impl SerialTransport {
    pub fn open(path: &str, baud: u32) -> io::Result<Self> {
        debug!("opening serial port {} at {} baud", path, baud);
        let port = serialport::new(path, baud)
            .timeout(READ_TIMEOUT)
            .flow_control(serialport::FlowControl::None)
            .open()?;
        Ok(Self { port })
    }

    pub fn from_port(port: Box<dyn serialport::SerialPort>) -> Self {
        Self { port }
    }
}

#[cfg(feature = "serial")]
impl Transport for SerialTransport {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        timeout_as_no_data(self.port.read(buf))
    }

    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        self.port.write_all(data)?;
        self.port.flush()
    }

    fn baud_rate(&self) -> Option<u32> {
        self.port.baud_rate().ok()
    }

    fn set_baud_rate(&mut self, baud: u32) -> io::Result<()> {
        Ok(self.port.set_baud_rate(baud)?)
    }

    fn clear_input(&mut self) -> io::Result<()> {
        Ok(self.port.clear(serialport::ClearBuffer::Input)?)
    }
}

/// TCP transport, e.g. to a serial-to-network bridge
pub struct TcpTransport {
    stream: TcpStream,
}

impl TcpTransport {
    pub fn connect(host: &str, port: u16) -> io::Result<Self> {
        debug!("connecting to {}:{}", host, port);
        let stream = TcpStream::connect((host, port))?;
        stream.set_read_timeout(Some(READ_TIMEOUT))?;
        stream.set_nodelay(true)?;
        Ok(Self { stream })
    }
}

impl Transport for TcpTransport {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.stream.read(buf) {
            Ok(0) if !buf.is_empty() => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "connection closed by peer",
            )),
            res => timeout_as_no_data(res),
        }
    }

    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        self.stream.write_all(data)
    }
}

/// Where to find the receiver
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PortSpec {
    /// Serial device, optionally with a fixed baud rate
    Serial { path: String, baud: Option<u32> },
    Tcp { host: String, port: u16 },
}

impl PortSpec {
    /// Open the port
    pub fn open(&self) -> Result<Box<dyn Transport>, RxError> {
        match self {
            #[cfg(feature = "serial")]
            Self::Serial { path, baud } => Ok(Box::new(SerialTransport::open(
                path,
                baud.unwrap_or(DEFAULT_BAUD_RATE),
            )?)),
            #[cfg(not(feature = "serial"))]
            Self::Serial { path, .. } => Err(RxError::InvalidPort(format!(
                "{}: serial support not compiled in",
                path
            ))),
            Self::Tcp { host, port } => Ok(Box::new(TcpTransport::connect(host, *port)?)),
        }
    }

    /// `true` for a serial port with a fixed baud rate
    pub fn has_fixed_baud(&self) -> bool {
        matches!(self, Self::Serial { baud: Some(_), .. })
    }
}

impl FromStr for PortSpec {
    type Err = RxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RxError::InvalidPort(s.to_string());
        if let Some(addr) = s.strip_prefix("tcp://") {
            let (host, port) = addr.rsplit_once(':').ok_or_else(invalid)?;
            let port = port.parse().map_err(|_| invalid())?;
            if host.is_empty() {
                return Err(invalid());
            }
            return Ok(Self::Tcp {
                host: host.to_string(),
                port,
            });
        }
        let dev = s.strip_prefix("ser://").unwrap_or(s);
        let (path, baud) = match dev.rsplit_once('@') {
            Some((path, baud)) => (path, Some(baud.parse().map_err(|_| invalid())?)),
            None => (dev, None),
        };
        if path.is_empty() || path.contains("://") {
            return Err(invalid());
        }
        Ok(Self::Serial {
            path: path.to_string(),
            baud,
        })
    }
}

impl core::fmt::Display for PortSpec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Serial {
                path,
                baud: Some(baud),
            } => write!(f, "ser://{}@{}", path, baud),
            Self::Serial { path, baud: None } => write!(f, "ser://{}", path),
            Self::Tcp { host, port } => write!(f, "tcp://{}:{}", host, port),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_port_specs() {
        assert_eq!(
            "ser:///dev/ttyACM0@921600".parse::<PortSpec>().unwrap(),
            PortSpec::Serial {
                path: "/dev/ttyACM0".into(),
                baud: Some(921_600)
            }
        );
        assert_eq!(
            "/dev/ttyUSB1".parse::<PortSpec>().unwrap(),
            PortSpec::Serial {
                path: "/dev/ttyUSB1".into(),
                baud: None
            }
        );
        assert_eq!(
            "tcp://192.168.1.10:2101".parse::<PortSpec>().unwrap(),
            PortSpec::Tcp {
                host: "192.168.1.10".into(),
                port: 2101
            }
        );
    }

    #[test]
    fn fixed_baud() {
        assert!("/dev/ttyACM0@38400".parse::<PortSpec>().unwrap().has_fixed_baud());
        assert!(!"/dev/ttyACM0".parse::<PortSpec>().unwrap().has_fixed_baud());
        assert!(!"tcp://rx:2000".parse::<PortSpec>().unwrap().has_fixed_baud());
    }

    #[test]
    fn reject_bad_port_specs() {
        for spec in ["", "tcp://host", "tcp://:80", "tcp://host:port", "ser://", "ser:///dev/x@fast", "udp://x:1"] {
            assert!(
                matches!(spec.parse::<PortSpec>(), Err(RxError::InvalidPort(_))),
                "{:?} accepted",
                spec
            );
        }
    }

    #[test]
    fn display_round_trips() {
        for spec in ["ser:///dev/ttyACM0@9600", "ser://COM3", "tcp://localhost:5000"] {
            assert_eq!(spec.parse::<PortSpec>().unwrap().to_string(), spec);
        }
    }
}
