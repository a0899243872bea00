//! Splitting configuration writes into UBX-CFG-VALSET messages
//!
//! A single UBX-CFG-VALSET carries at most 64 key-value pairs. Longer lists
//! are sent as a transaction: the first message opens it, the following ones
//! continue it, and the receiver applies all of them once the transaction is
//! ended.

use bitflags::bitflags;
use log::debug;

use crate::{
    cfg_val::{self, CfgKeyVal},
    constants::{UBX_CFG_CLSID, UBX_CFG_VALSET_MSGID},
    error::ValsetError,
    frame::build_frame,
};

/// Maximum number of key-value pairs in one UBX-CFG-VALSET
pub const VALSET_MAX_KV: usize = 64;
/// Maximum number of UBX-CFG-VALSET messages in one transaction
pub const VALSET_MAX_MSGS: usize = 20;
/// Version of the UBX-CFG-VALSET payload with transaction support
pub const VALSET_VERSION: u8 = 0x01;
/// Size of the UBX-CFG-VALSET payload header
pub const VALSET_HEAD_SIZE: usize = 4;
/// Largest cfgData in one message: 64 pairs of 4 byte key and 8 byte value
pub const VALSET_MAX_DATA_SIZE: usize = VALSET_MAX_KV * (4 + 8);

bitflags! {
    /// Layers a configuration write is applied to
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct CfgLayerSet: u8 {
        const RAM = 0b001;
        const BBR = 0b010;
        const FLASH = 0b100;
    }
}

impl CfgLayerSet {
    pub fn from_flags(ram: bool, bbr: bool, flash: bool) -> Self {
        let mut layers = Self::empty();
        layers.set(Self::RAM, ram);
        layers.set(Self::BBR, bbr);
        layers.set(Self::FLASH, flash);
        layers
    }
}

impl Default for CfgLayerSet {
    fn default() -> Self {
        Self::RAM | Self::BBR | Self::FLASH
    }
}

impl core::fmt::Display for CfgLayerSet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let names: Vec<&str> = [
            (Self::RAM, "RAM"),
            (Self::BBR, "BBR"),
            (Self::FLASH, "Flash"),
        ]
        .iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, name)| *name)
        .collect();
        f.write_str(&names.join(","))
    }
}

/// The transaction field of UBX-CFG-VALSET version 1
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transaction {
    None = 0,
    Begin = 1,
    Continue = 2,
    End = 3,
}

impl Transaction {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::None),
            1 => Some(Self::Begin),
            2 => Some(Self::Continue),
            3 => Some(Self::End),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Begin => "begin",
            Self::Continue => "continue",
            Self::End => "end",
        }
    }
}

/// One UBX-CFG-VALSET frame of a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValsetMessage {
    /// The complete frame, ready to be sent
    pub frame: Vec<u8>,
    pub transaction: Transaction,
    /// Number of key-value pairs in this message
    pub num_items: usize,
    /// Human-readable summary, e.g. "64 items: 1..64/100, 784 bytes, RAM,Flash, transaction begin"
    pub info: String,
}

/// The ordered UBX-CFG-VALSET messages for one configuration write
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigWriteBatch {
    messages: Vec<ValsetMessage>,
}

impl ConfigWriteBatch {
    pub fn messages(&self) -> &[ValsetMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValsetMessage> {
        self.messages.iter()
    }
}

impl IntoIterator for ConfigWriteBatch {
    type Item = ValsetMessage;
    type IntoIter = std::vec::IntoIter<ValsetMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.into_iter()
    }
}

/// Limits and quirks of the splitter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValsetOptions {
    pub max_kv_per_msg: usize,
    pub max_msgs: usize,
    /// Receivers ignore the key-value pairs of a message that ends a
    /// transaction. When set, a transaction is always terminated by an
    /// additional message without any pairs.
    pub empty_transaction_end: bool,
}

impl Default for ValsetOptions {
    fn default() -> Self {
        Self {
            max_kv_per_msg: VALSET_MAX_KV,
            max_msgs: VALSET_MAX_MSGS,
            empty_transaction_end: true,
        }
    }
}

impl ValsetOptions {
    /// Most messages that may carry key-value pairs
    pub fn max_content_msgs(&self) -> usize {
        if self.empty_transaction_end {
            self.max_msgs.saturating_sub(1)
        } else {
            self.max_msgs
        }
    }
}

/// Split `kvs` into UBX-CFG-VALSET messages applying them to `layers`, using
/// the default limits. An empty `kvs` gives one header-only message with
/// transaction [`Transaction::None`].
pub fn split_into_valset(
    kvs: &[CfgKeyVal],
    layers: CfgLayerSet,
) -> Result<ConfigWriteBatch, ValsetError> {
    ValsetSplitter::default().split(kvs, layers)
}

/// Builds [ConfigWriteBatch]es
#[derive(Debug, Clone, Copy, Default)]
pub struct ValsetSplitter {
    options: ValsetOptions,
}

impl ValsetSplitter {
    pub fn new(options: ValsetOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ValsetOptions {
        &self.options
    }

    /// Split `kvs` into messages. The order of `kvs` is preserved.
    ///
    /// An empty `kvs` yields exactly one header-only message with transaction
    /// [`Transaction::None`], never the `End` marker, so it neither opens nor
    /// closes a transaction on the receiver.
    pub fn split(
        &self,
        kvs: &[CfgKeyVal],
        layers: CfgLayerSet,
    ) -> Result<ConfigWriteBatch, ValsetError> {
        let per_msg = self.options.max_kv_per_msg.max(1);
        let n_msgs = kvs.len().div_ceil(per_msg);
        let max_msgs = self.options.max_content_msgs();
        if n_msgs > max_msgs {
            return Err(ValsetError::TooManyItems {
                items: kvs.len(),
                messages: n_msgs,
                max_messages: max_msgs,
            });
        }
        if layers.is_empty() {
            return Err(ValsetError::NoLayerSelected);
        }

        if kvs.is_empty() {
            let msg = self.header_only(layers, Transaction::None)?;
            return Ok(ConfigWriteBatch {
                messages: vec![msg],
            });
        }

        let mut messages = Vec::with_capacity(n_msgs + 1);
        for (msg_ix, chunk) in kvs.chunks(per_msg).enumerate() {
            let transaction = if n_msgs == 1 {
                Transaction::None
            } else if msg_ix == 0 {
                Transaction::Begin
            } else if self.options.empty_transaction_end || msg_ix < n_msgs - 1 {
                Transaction::Continue
            } else {
                Transaction::End
            };
            let first = msg_ix * per_msg + 1;
            let frame = valset_frame(layers, transaction, chunk)?;
            let info = format!(
                "{} items: {}..{}/{}, {} bytes, {}, transaction {}",
                chunk.len(),
                first,
                first + chunk.len() - 1,
                kvs.len(),
                frame.len(),
                layers,
                transaction.as_str(),
            );
            debug!("Creating UBX-CFG-VALSET {}", info);
            messages.push(ValsetMessage {
                frame,
                transaction,
                num_items: chunk.len(),
                info,
            });
        }

        if n_msgs > 1 && self.options.empty_transaction_end {
            messages.push(self.empty_transaction_end(layers)?);
        }

        Ok(ConfigWriteBatch { messages })
    }

    /// The message terminating a multi-message transaction
    fn empty_transaction_end(&self, layers: CfgLayerSet) -> Result<ValsetMessage, ValsetError> {
        self.header_only(layers, Transaction::End)
    }

    /// A UBX-CFG-VALSET without key-value pairs, e.g. to explicitly open or
    /// close a transaction
    pub fn header_only(
        &self,
        layers: CfgLayerSet,
        transaction: Transaction,
    ) -> Result<ValsetMessage, ValsetError> {
        if layers.is_empty() {
            return Err(ValsetError::NoLayerSelected);
        }
        let frame = valset_frame(layers, transaction, &[])?;
        let info = format!(
            "no items, {} bytes, {}, transaction {}",
            frame.len(),
            layers,
            transaction.as_str()
        );
        debug!("Creating UBX-CFG-VALSET {}", info);
        Ok(ValsetMessage {
            frame,
            transaction,
            num_items: 0,
            info,
        })
    }
}

fn valset_frame(
    layers: CfgLayerSet,
    transaction: Transaction,
    kvs: &[CfgKeyVal],
) -> Result<Vec<u8>, ValsetError> {
    let mut payload = [0u8; VALSET_HEAD_SIZE + VALSET_MAX_DATA_SIZE];
    payload[0] = VALSET_VERSION;
    payload[1] = layers.bits();
    payload[2] = transaction as u8;
    payload[3] = 0; // reserved
    let data_len = cfg_val::encode_into(kvs, &mut payload[VALSET_HEAD_SIZE..])?;
    Ok(build_frame(
        UBX_CFG_CLSID,
        UBX_CFG_VALSET_MSGID,
        &payload[..VALSET_HEAD_SIZE + data_len],
    ))
}
