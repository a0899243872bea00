//! # ublox_rx
//!
//! Talking to u-blox positioning receivers using the UBX protocol: building and
//! checking frames, encoding configuration key-value pairs, splitting
//! configuration writes into UBX-CFG-VALSET transactions, naming and
//! describing messages, and a receiver session doing detection, polling and
//! configuration over a serial port or TCP connection.
//!
//! The `ublox-rx-dump` demo in the demos subfolder shows the session in use.
//!
//! Writing Configuration
//! =====================
//!
//! Configuration items are written as key-value pairs. The value width is
//! given by the key, see [`CfgKey::value_size`]:
//! ```
//! use ublox_rx::{keys, split_into_valset, CfgKeyVal, CfgLayerSet, CfgValue, Transaction};
//!
//! let kvs = [
//!     CfgKeyVal::new(keys::UART1_BAUDRATE, CfgValue::Four(115_200)),
//!     CfgKeyVal::new(keys::RATE_MEAS, CfgValue::Two(100)),
//! ];
//! let batch = split_into_valset(&kvs, CfgLayerSet::RAM | CfgLayerSet::FLASH).unwrap();
//! assert_eq!(batch.len(), 1);
//! assert_eq!(batch.messages()[0].transaction, Transaction::None);
//! ```
//! Lists longer than 64 pairs become a transaction of several messages. With
//! a session, [`Receiver::set_config`] splits and sends in one go.
//!
//! Parsing Messages
//! ================
//!
//! The [`Parser`] takes received bytes and returns UBX, NMEA and RTCM3
//! messages. Bytes that are none of these come out as garbage messages:
//! ```
//! use ublox_rx::{build_frame, Parser, Protocol};
//!
//! let mut parser = Parser::new();
//! parser.add(&build_frame(0x05, 0x01, &[0x06, 0x8a]));
//! parser.add(b"noise");
//!
//! let ack = parser.next_message().unwrap();
//! assert_eq!(ack.name(), "UBX-ACK-ACK");
//! assert_eq!(ack.info().unwrap(), "acknowledgement UBX-CFG-VALSET");
//!
//! let noise = parser.next_message().unwrap();
//! assert_eq!(noise.protocol(), Protocol::Garbage);
//! assert!(parser.next_message().is_none());
//! ```

pub mod cfg_val;
pub mod constants;
mod error;
pub mod frame;
pub mod info;
mod message;
pub mod names;
pub mod parser;
pub mod session;
pub mod transport;
pub mod valset;

pub use crate::{
    cfg_val::{keys, CfgKey, CfgKeyVal, CfgValue, StorageSize},
    error::{CodecError, ParserError, Result, RxError, ValsetError},
    frame::{build_frame, parse_frame, ubx_checksum, FrameRef},
    info::describe,
    message::{Message, Protocol},
    names::{message_ids, message_name},
    parser::{Parser, ParserStats, ProtocolStats},
    session::{
        AbortHandle, CfgLayer, DumpOutcome, PollRequest, PollResponse, Receiver, ResetKind,
        RxOptions, SessionState,
    },
    transport::{PortSpec, TcpTransport, Transport},
    valset::{
        split_into_valset, CfgLayerSet, ConfigWriteBatch, Transaction, ValsetMessage,
        ValsetOptions, ValsetSplitter,
    },
};

#[cfg(feature = "serial")]
pub use crate::transport::SerialTransport;
