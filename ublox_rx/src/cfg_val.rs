//! Configuration key-value codec
//!
//! Every configuration item is addressed by a 32 bit key id. Bits 28..30 of
//! the key give the storage size of the value, so a list of pairs can be
//! encoded as `key (u32 le) | value (1, 2, 4 or 8 bytes le)` without any
//! further framing. This is the `cfgData` of UBX-CFG-VALSET and
//! UBX-CFG-VALGET.

use crate::error::CodecError;

/// Storage size class encoded in bits 28..30 of a key id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageSize {
    OneBit,
    OneByte,
    TwoBytes,
    FourBytes,
    EightBytes,
}

impl StorageSize {
    /// Number of bytes a value of this size occupies on the wire
    pub const fn to_usize(self) -> usize {
        match self {
            Self::OneBit | Self::OneByte => 1,
            Self::TwoBytes => 2,
            Self::FourBytes => 4,
            Self::EightBytes => 8,
        }
    }
}

/// Configuration item key id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CfgKey(pub u32);

impl CfgKey {
    pub(crate) const SIZE: usize = 4;

    /// Size class of the value, `None` for the reserved encodings
    pub const fn value_size(&self) -> Option<StorageSize> {
        match (self.0 >> 28) & 0b111 {
            1 => Some(StorageSize::OneBit),
            2 => Some(StorageSize::OneByte),
            3 => Some(StorageSize::TwoBytes),
            4 => Some(StorageSize::FourBytes),
            5 => Some(StorageSize::EightBytes),
            _ => None,
        }
    }

    pub const fn group_id(&self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn item_id(&self) -> u16 {
        (self.0 & 0x0fff) as u16
    }
}

impl core::fmt::Display for CfgKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

/// Raw value of a configuration item.
///
/// The variant carries the bit pattern as it is found on the wire. Whether a
/// four byte value is a `U4`, `I4`, `X4` or `R4` is only known from the item
/// definition, hence the typed accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CfgValue {
    Bit(bool),
    One(u8),
    Two(u16),
    Four(u32),
    Eight(u64),
}

impl CfgValue {
    pub fn from_i8(v: i8) -> Self {
        Self::One(v as u8)
    }

    pub fn from_i16(v: i16) -> Self {
        Self::Two(v as u16)
    }

    pub fn from_i32(v: i32) -> Self {
        Self::Four(v as u32)
    }

    pub fn from_i64(v: i64) -> Self {
        Self::Eight(v as u64)
    }

    pub fn from_f32(v: f32) -> Self {
        Self::Four(v.to_bits())
    }

    pub fn from_f64(v: f64) -> Self {
        Self::Eight(v.to_bits())
    }

    pub const fn size(&self) -> StorageSize {
        match self {
            Self::Bit(_) => StorageSize::OneBit,
            Self::One(_) => StorageSize::OneByte,
            Self::Two(_) => StorageSize::TwoBytes,
            Self::Four(_) => StorageSize::FourBytes,
            Self::Eight(_) => StorageSize::EightBytes,
        }
    }

    /// Raw bits, zero extended
    pub const fn raw(&self) -> u64 {
        match *self {
            Self::Bit(v) => v as u64,
            Self::One(v) => v as u64,
            Self::Two(v) => v as u64,
            Self::Four(v) => v as u64,
            Self::Eight(v) => v,
        }
    }

    pub const fn as_bool(&self) -> bool {
        self.raw() != 0
    }

    pub const fn as_u8(&self) -> u8 {
        self.raw() as u8
    }

    pub const fn as_u16(&self) -> u16 {
        self.raw() as u16
    }

    pub const fn as_u32(&self) -> u32 {
        self.raw() as u32
    }

    pub const fn as_u64(&self) -> u64 {
        self.raw()
    }

    pub const fn as_i8(&self) -> i8 {
        self.raw() as u8 as i8
    }

    pub const fn as_i16(&self) -> i16 {
        self.raw() as u16 as i16
    }

    pub const fn as_i32(&self) -> i32 {
        self.raw() as u32 as i32
    }

    pub const fn as_i64(&self) -> i64 {
        self.raw() as i64
    }

    pub fn as_f32(&self) -> f32 {
        f32::from_bits(self.as_u32())
    }

    pub fn as_f64(&self) -> f64 {
        f64::from_bits(self.as_u64())
    }

    fn write_le(&self, buf: &mut [u8]) {
        match *self {
            Self::Bit(v) => buf[0] = v as u8,
            Self::One(v) => buf[0] = v,
            Self::Two(v) => buf.copy_from_slice(&v.to_le_bytes()),
            Self::Four(v) => buf.copy_from_slice(&v.to_le_bytes()),
            Self::Eight(v) => buf.copy_from_slice(&v.to_le_bytes()),
        }
    }

    fn read_le(size: StorageSize, buf: &[u8]) -> Self {
        match size {
            StorageSize::OneBit => Self::Bit(buf[0] != 0),
            StorageSize::OneByte => Self::One(buf[0]),
            StorageSize::TwoBytes => Self::Two(u16::from_le_bytes([buf[0], buf[1]])),
            StorageSize::FourBytes => {
                Self::Four(u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]))
            },
            StorageSize::EightBytes => Self::Eight(u64::from_le_bytes([
                buf[0], buf[1], buf[2], buf[3], buf[4], buf[5], buf[6], buf[7],
            ])),
        }
    }
}

/// A configuration item: key id and value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CfgKeyVal {
    pub key: CfgKey,
    pub value: CfgValue,
}

impl CfgKeyVal {
    pub const fn new(key: u32, value: CfgValue) -> Self {
        Self {
            key: CfgKey(key),
            value,
        }
    }

    /// Encoded size, or an error if the key does not describe the value
    pub fn encoded_len(&self) -> Result<usize, CodecError> {
        let size = self.key.value_size().ok_or(CodecError::MalformedKey {
            key: self.key.0,
            reason: "reserved size class",
        })?;
        if size != self.value.size() {
            return Err(CodecError::MalformedKey {
                key: self.key.0,
                reason: "value width does not match key size class",
            });
        }
        Ok(CfgKey::SIZE + size.to_usize())
    }
}

/// Number of bytes `encode_into` needs for `kvs`
pub fn encoded_len(kvs: &[CfgKeyVal]) -> Result<usize, CodecError> {
    kvs.iter().map(CfgKeyVal::encoded_len).sum()
}

/// Encode `kvs` into `buf`, returning the number of bytes written.
///
/// Nothing is written unless the whole list fits.
pub fn encode_into(kvs: &[CfgKeyVal], buf: &mut [u8]) -> Result<usize, CodecError> {
    let required = encoded_len(kvs)?;
    if required > buf.len() {
        return Err(CodecError::EncodingOverflow {
            required,
            available: buf.len(),
        });
    }
    let mut offs = 0;
    for kv in kvs {
        buf[offs..offs + CfgKey::SIZE].copy_from_slice(&kv.key.0.to_le_bytes());
        offs += CfgKey::SIZE;
        let val_len = kv.value.size().to_usize();
        kv.value.write_le(&mut buf[offs..offs + val_len]);
        offs += val_len;
    }
    Ok(offs)
}

/// Encode `kvs` into a new buffer
pub fn encode(kvs: &[CfgKeyVal]) -> Result<Vec<u8>, CodecError> {
    let mut buf = vec![0; encoded_len(kvs)?];
    encode_into(kvs, &mut buf)?;
    Ok(buf)
}

/// Decode a `cfgData` byte sequence, the inverse of [encode]
pub fn decode(data: &[u8]) -> Result<Vec<CfgKeyVal>, CodecError> {
    CfgValIter::new(data).collect()
}

/// Iterator over the key-value pairs of a `cfgData` byte sequence
#[derive(Debug, Clone)]
pub struct CfgValIter<'a> {
    data: &'a [u8],
}

impl<'a> CfgValIter<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }
}

impl Iterator for CfgValIter<'_> {
    type Item = Result<CfgKeyVal, CodecError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.data.is_empty() {
            return None;
        }
        if self.data.len() < CfgKey::SIZE {
            self.data = &[];
            return Some(Err(CodecError::MalformedKey {
                key: 0,
                reason: "truncated key id",
            }));
        }
        let key = CfgKey(u32::from_le_bytes([
            self.data[0],
            self.data[1],
            self.data[2],
            self.data[3],
        ]));
        let Some(size) = key.value_size() else {
            self.data = &[];
            return Some(Err(CodecError::MalformedKey {
                key: key.0,
                reason: "reserved size class",
            }));
        };
        let rest = &self.data[CfgKey::SIZE..];
        if rest.len() < size.to_usize() {
            self.data = &[];
            return Some(Err(CodecError::MalformedKey {
                key: key.0,
                reason: "value truncated",
            }));
        }
        let value = CfgValue::read_le(size, rest);
        self.data = &rest[size.to_usize()..];
        Some(Ok(CfgKeyVal { key, value }))
    }
}

/// Key ids of a few frequently used configuration items
pub mod keys {
    /// CFG-UART1-BAUDRATE (U4)
    pub const UART1_BAUDRATE: u32 = 0x4052_0001;
    /// CFG-UART1-ENABLED (L)
    pub const UART1_ENABLED: u32 = 0x1052_0005;
    /// CFG-UART1OUTPROT-UBX (L)
    pub const UART1OUTPROT_UBX: u32 = 0x1074_0001;
    /// CFG-UART1OUTPROT-NMEA (L)
    pub const UART1OUTPROT_NMEA: u32 = 0x1074_0002;
    /// CFG-RATE-MEAS, measurement period in ms (U2)
    pub const RATE_MEAS: u32 = 0x3021_0001;
    /// CFG-RATE-NAV, measurements per navigation solution (U2)
    pub const RATE_NAV: u32 = 0x3021_0002;
    /// CFG-MSGOUT-UBX_NAV_PVT_UART1 (U1)
    pub const MSGOUT_UBX_NAV_PVT_UART1: u32 = 0x2091_0007;
    /// CFG-MSGOUT-UBX_NAV_SAT_UART1 (U1)
    pub const MSGOUT_UBX_NAV_SAT_UART1: u32 = 0x2091_0016;
    /// CFG-MSGOUT-UBX_RXM_RAWX_UART1 (U1)
    pub const MSGOUT_UBX_RXM_RAWX_UART1: u32 = 0x2091_02a5;
    /// CFG-NAVSPG-DYNMODEL (E1)
    pub const NAVSPG_DYNMODEL: u32 = 0x2011_0021;
    /// CFG-NAVSPG-INFIL_MINELEV, minimum elevation in deg (I1)
    pub const NAVSPG_INFIL_MINELEV: u32 = 0x2011_00a4;
    /// CFG-NAVSPG-CONSTR_ALT, fixed altitude in cm (I4)
    pub const NAVSPG_CONSTR_ALT: u32 = 0x4011_00c1;
    /// CFG-USBOUTPROT-UBX (L)
    pub const USBOUTPROT_UBX: u32 = 0x1078_0001;
}
