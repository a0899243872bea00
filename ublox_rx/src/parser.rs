//! Stream parser splitting received bytes into messages
//!
//! Bytes are fed in with [`Parser::add`] and complete messages taken out with
//! [`Parser::next_message`]. UBX, NMEA and RTCM3 messages are recognised,
//! everything in between is returned as [`Protocol::Garbage`] so that no
//! received byte is silently lost.

use chrono::Utc;
use crc::{Crc, CRC_24_LTE_A};
use log::trace;

use crate::{
    constants::{
        MAX_PAYLOAD_LEN, NMEA_END_CHAR_1, NMEA_END_CHAR_2, NMEA_MAX_SENTENCE_LENGTH,
        NMEA_MIN_SENTENCE_LENGTH, NMEA_SYNC_CHAR, RTCM_CRC_SIZE, RTCM_HEADER_SIZE,
        RTCM_LENGTH_MASK, RTCM_SYNC_CHAR, UBX_CLASS_OFFSET, UBX_FRAME_OVERHEAD, UBX_HEADER_LEN,
        UBX_LENGTH_OFFSET, UBX_SYNC_CHAR_1, UBX_SYNC_CHAR_2,
    },
    frame::verify_checksum,
    message::{Message, Protocol},
};

/// CRC-24Q used by RTCM3, known to the `crc` crate under its LTE name
const CRC24Q: Crc<u32> = Crc::<u32>::new(&CRC_24_LTE_A);

/// Longest run of garbage collected into one message
pub const MAX_GARBAGE_LEN: usize = 1024;

/// Counters for one protocol
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProtocolStats {
    pub count: u32,
    pub bytes: u64,
}

/// Message statistics collected by a [`Parser`]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParserStats {
    pub total: ProtocolStats,
    pub ubx: ProtocolStats,
    pub nmea: ProtocolStats,
    pub rtcm3: ProtocolStats,
    pub garbage: ProtocolStats,
}

impl ParserStats {
    fn account(&mut self, protocol: Protocol, size: usize) {
        let entry = match protocol {
            Protocol::Ubx => &mut self.ubx,
            Protocol::Nmea => &mut self.nmea,
            Protocol::Rtcm3 => &mut self.rtcm3,
            Protocol::Garbage => &mut self.garbage,
        };
        for stats in [entry, &mut self.total] {
            stats.count += 1;
            stats.bytes += size as u64;
        }
    }

    pub fn get(&self, protocol: Protocol) -> ProtocolStats {
        match protocol {
            Protocol::Ubx => self.ubx,
            Protocol::Nmea => self.nmea,
            Protocol::Rtcm3 => self.rtcm3,
            Protocol::Garbage => self.garbage,
        }
    }
}

/// Outcome of looking for a message at the start of a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Detect {
    /// Complete and valid message of the given length
    Frame(Protocol, usize),
    /// Could become a message once more data arrives
    NeedMore,
    /// Definitely not a message starting here
    NoMatch,
}

#[derive(Debug, Default)]
pub struct Parser {
    buf: Vec<u8>,
    seq: u32,
    stats: ParserStats,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append received bytes
    pub fn add(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
    }

    /// Number of bytes waiting for more data
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    pub fn stats(&self) -> &ParserStats {
        &self.stats
    }

    /// Drop buffered bytes, keeping sequence counter and statistics
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Take the next complete message from the buffer.
    ///
    /// Returns `None` when the buffered bytes may still form the start of a
    /// message and more data is required.
    pub fn next_message(&mut self) -> Option<Message> {
        let mut offs = 0;
        while offs < self.buf.len() {
            if offs >= MAX_GARBAGE_LEN {
                return Some(self.emit(Protocol::Garbage, offs));
            }
            match detect(&self.buf[offs..]) {
                Detect::Frame(protocol, len) => {
                    return Some(if offs > 0 {
                        self.emit(Protocol::Garbage, offs)
                    } else {
                        self.emit(protocol, len)
                    });
                },
                Detect::NeedMore => {
                    return (offs > 0).then(|| self.emit(Protocol::Garbage, offs));
                },
                Detect::NoMatch => offs += 1,
            }
        }
        (offs > 0).then(|| self.emit(Protocol::Garbage, offs))
    }

    /// Return whatever is left in the buffer as garbage
    pub fn flush(&mut self) -> Option<Message> {
        let len = self.buf.len().min(MAX_GARBAGE_LEN);
        (len > 0).then(|| self.emit(Protocol::Garbage, len))
    }

    fn emit(&mut self, protocol: Protocol, len: usize) -> Message {
        let data: Vec<u8> = self.buf.drain(..len).collect();
        self.seq = self.seq.wrapping_add(1);
        self.stats.account(protocol, data.len());
        Message::new(protocol, data, self.seq, Utc::now())
    }
}

fn detect(buf: &[u8]) -> Detect {
    match buf[0] {
        UBX_SYNC_CHAR_1 => detect_ubx(buf),
        NMEA_SYNC_CHAR => detect_nmea(buf),
        RTCM_SYNC_CHAR => detect_rtcm3(buf),
        _ => Detect::NoMatch,
    }
}

fn detect_ubx(buf: &[u8]) -> Detect {
    if buf.len() < 2 {
        return Detect::NeedMore;
    }
    if buf[1] != UBX_SYNC_CHAR_2 {
        return Detect::NoMatch;
    }
    if buf.len() < UBX_HEADER_LEN {
        return Detect::NeedMore;
    }
    let pack_len = u16::from_le_bytes([buf[UBX_LENGTH_OFFSET], buf[UBX_LENGTH_OFFSET + 1]]) as usize;
    if pack_len > MAX_PAYLOAD_LEN {
        trace!("ubx: payload length {} too large, false sync", pack_len);
        return Detect::NoMatch;
    }
    let frame_len = pack_len + UBX_FRAME_OVERHEAD;
    if buf.len() < frame_len {
        return Detect::NeedMore;
    }
    let ck_offset = UBX_HEADER_LEN + pack_len;
    match verify_checksum(
        &buf[UBX_CLASS_OFFSET..ck_offset],
        [buf[ck_offset], buf[ck_offset + 1]],
    ) {
        Ok(()) => Detect::Frame(Protocol::Ubx, frame_len),
        Err(err) => {
            trace!("ubx: {}", err);
            Detect::NoMatch
        },
    }
}

fn detect_nmea(buf: &[u8]) -> Detect {
    for (i, &b) in buf.iter().enumerate().skip(1) {
        if i >= NMEA_MAX_SENTENCE_LENGTH {
            return Detect::NoMatch;
        }
        if b == NMEA_END_CHAR_1 {
            let len = i + 2;
            if buf.len() < len {
                return Detect::NeedMore;
            }
            if buf[i + 1] != NMEA_END_CHAR_2 || len < NMEA_MIN_SENTENCE_LENGTH || buf[i - 3] != b'*'
            {
                return Detect::NoMatch;
            }
            let expected = match (hex_value(buf[i - 2]), hex_value(buf[i - 1])) {
                (Some(hi), Some(lo)) => (hi << 4) | lo,
                _ => return Detect::NoMatch,
            };
            let ck = buf[1..i - 3].iter().fold(0u8, |ck, b| ck ^ b);
            if ck != expected {
                trace!("nmea: checksum {:02x} != {:02x}", ck, expected);
                return Detect::NoMatch;
            }
            return Detect::Frame(Protocol::Nmea, len);
        }
        if !(0x20..=0x7e).contains(&b) {
            return Detect::NoMatch;
        }
    }
    Detect::NeedMore
}

fn hex_value(c: u8) -> Option<u8> {
    (c as char).to_digit(16).map(|v| v as u8)
}

fn detect_rtcm3(buf: &[u8]) -> Detect {
    if buf.len() < RTCM_HEADER_SIZE {
        return Detect::NeedMore;
    }
    let header = u16::from_be_bytes([buf[1], buf[2]]);
    if header & !RTCM_LENGTH_MASK != 0 {
        return Detect::NoMatch;
    }
    let body_len = RTCM_HEADER_SIZE + (header & RTCM_LENGTH_MASK) as usize;
    let len = body_len + RTCM_CRC_SIZE;
    if buf.len() < len {
        return Detect::NeedMore;
    }
    let crc = CRC24Q.checksum(&buf[..body_len]);
    let got = u32::from_be_bytes([0, buf[body_len], buf[body_len + 1], buf[body_len + 2]]);
    if crc != got {
        trace!("rtcm3: crc {:06x} != {:06x}", crc, got);
        return Detect::NoMatch;
    }
    Detect::Frame(Protocol::Rtcm3, len)
}
