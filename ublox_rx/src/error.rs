use std::io;

use thiserror::Error;

/// Errors detected while validating a single UBX frame
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParserError {
    #[error("missing UBX sync characters")]
    InvalidSync,
    #[error("not valid packet's checksum, expect {expect:x}, got {got:x}")]
    InvalidChecksum { expect: u16, got: u16 },
    #[error("invalid packet length, expect {expect}, got {got}")]
    InvalidPacketLen { expect: usize, got: usize },
}

/// Errors of the configuration key-value codec
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("encoding needs {required} bytes but only {available} are available")]
    EncodingOverflow { required: usize, available: usize },
    #[error("malformed key 0x{key:08x}: {reason}")]
    MalformedKey { key: u32, reason: &'static str },
}

/// Errors creating a UBX-CFG-VALSET batch. These are raised before any I/O.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValsetError {
    #[error("too many items: {items} key-value pairs need {messages} messages, at most {max_messages} allowed")]
    TooManyItems {
        items: usize,
        messages: usize,
        max_messages: usize,
    },
    #[error("no configuration layer selected")]
    NoLayerSelected,
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Errors reported by a receiver session
#[derive(Debug, Error)]
pub enum RxError {
    #[error("transport error: {0}")]
    Transport(#[from] io::Error),
    #[error("session is not open")]
    NotOpen,
    #[error("no receiver detected on {port}")]
    ReceiverNotFound { port: String },
    #[error("aborted")]
    Aborted,
    #[error("no response to poll of {name} after {attempts} attempts")]
    PollTimeout { name: String, attempts: usize },
    #[error("configuration not acknowledged ({acked} of {expected} messages acknowledged)")]
    ConfigTimeout { acked: usize, expected: usize },
    #[error("configuration rejected by receiver (message {index} of {expected})")]
    ConfigRejected { index: usize, expected: usize },
    #[error("invalid port '{0}'")]
    InvalidPort(String),
    #[error(transparent)]
    Valset(#[from] ValsetError),
    #[error(transparent)]
    Codec(#[from] CodecError),
}

pub type Result<T, E = RxError> = std::result::Result<T, E>;
