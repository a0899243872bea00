use std::borrow::Cow;

use chrono::{DateTime, Utc};

use crate::{
    constants::{
        UBX_CHECKSUM_LEN, UBX_CLASS_OFFSET, UBX_HEADER_LEN, UBX_MSG_ID_OFFSET, RTCM_HEADER_SIZE,
    },
    info::describe,
    names::message_name,
};

/// Protocol family a received message was recognised as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Protocol {
    Ubx,
    Nmea,
    Rtcm3,
    /// Bytes that did not form any recognised message
    Garbage,
}

impl Protocol {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ubx => "UBX",
            Self::Nmea => "NMEA",
            Self::Rtcm3 => "RTCM3",
            Self::Garbage => "GARBAGE",
        }
    }
}

/// A message received from the receiver.
///
/// Holds the complete message bytes (for UBX the whole frame including sync
/// characters and checksum) plus the metadata the parser attaches.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Message {
    data: Vec<u8>,
    protocol: Protocol,
    seq: u32,
    received: DateTime<Utc>,
}

impl Message {
    pub(crate) fn new(
        protocol: Protocol,
        data: Vec<u8>,
        seq: u32,
        received: DateTime<Utc>,
    ) -> Self {
        Self {
            data,
            protocol,
            seq,
            received,
        }
    }

    /// Raw message bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    pub fn is_ubx(&self) -> bool {
        self.protocol == Protocol::Ubx
    }

    /// Sequence number, counting all messages the parser produced
    pub fn seq(&self) -> u32 {
        self.seq
    }

    pub fn received(&self) -> DateTime<Utc> {
        self.received
    }

    /// UBX class id
    pub fn class(&self) -> Option<u8> {
        self.ubx_byte(UBX_CLASS_OFFSET)
    }

    /// UBX message id
    pub fn msg_id(&self) -> Option<u8> {
        self.ubx_byte(UBX_MSG_ID_OFFSET)
    }

    fn ubx_byte(&self, offset: usize) -> Option<u8> {
        if self.is_ubx() {
            self.data.get(offset).copied()
        } else {
            None
        }
    }

    /// `true` for the UBX message with the given class and message id
    pub fn is(&self, class: u8, msg_id: u8) -> bool {
        self.class() == Some(class) && self.msg_id() == Some(msg_id)
    }

    /// The UBX payload. Other protocols have no separate payload, for them
    /// this is the whole message.
    pub fn payload(&self) -> &[u8] {
        match self.protocol {
            Protocol::Ubx => {
                let end = self.data.len().saturating_sub(UBX_CHECKSUM_LEN);
                self.data.get(UBX_HEADER_LEN..end).unwrap_or_default()
            },
            _ => &self.data,
        }
    }

    pub fn payload_len(&self) -> usize {
        self.payload().len()
    }

    /// Message name, e.g. `UBX-NAV-PVT`, `NMEA-GN-GGA`, `RTCM3-1005`
    pub fn name(&self) -> Cow<'static, str> {
        match self.protocol {
            Protocol::Ubx => match (self.class(), self.msg_id()) {
                (Some(class), Some(msg_id)) => message_name(class, msg_id),
                _ => Cow::Borrowed("UBX-?"),
            },
            Protocol::Nmea => Cow::Owned(nmea_name(&self.data)),
            Protocol::Rtcm3 => Cow::Owned(rtcm3_name(&self.data)),
            Protocol::Garbage => Cow::Borrowed("GARBAGE"),
        }
    }

    /// One-line summary of the message contents, if the message is known
    pub fn info(&self) -> Option<String> {
        describe(self)
    }
}

fn nmea_name(data: &[u8]) -> String {
    let address: String = data
        .iter()
        .skip(1)
        .take_while(|b| **b != b',' && **b != b'*')
        .map(|b| *b as char)
        .collect();
    if address.starts_with('P') || address.len() < 5 {
        format!("NMEA-{}", address)
    } else {
        let (talker, formatter) = address.split_at(
            address
                .char_indices()
                .nth(2)
                .map_or(address.len(), |(ix, _)| ix),
        );
        format!("NMEA-{}-{}", talker, formatter)
    }
}

fn rtcm3_name(data: &[u8]) -> String {
    match data.get(RTCM_HEADER_SIZE..RTCM_HEADER_SIZE + 2) {
        Some(&[hi, lo]) => format!("RTCM3-{}", u16::from_be_bytes([hi, lo]) >> 4),
        _ => "RTCM3-?".to_string(),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::frame::build_frame;

    #[test]
    fn ubx_fields() {
        let msg = Message::new(
            Protocol::Ubx,
            build_frame(0x01, 0x07, &[1, 2, 3]),
            7,
            Utc::now(),
        );
        assert_eq!(msg.class(), Some(0x01));
        assert_eq!(msg.msg_id(), Some(0x07));
        assert!(msg.is(0x01, 0x07));
        assert_eq!(msg.payload(), &[1, 2, 3]);
        assert_eq!(msg.payload_len(), 3);
        assert_eq!(msg.size(), 11);
        assert_eq!(msg.seq(), 7);
        assert_eq!(msg.name(), "UBX-NAV-PVT");
    }

    #[test]
    fn other_protocol_names() {
        let nmea = Message::new(
            Protocol::Nmea,
            b"$GNGGA,,,,,,0,00,99.99,,,,,,*56\r\n".to_vec(),
            1,
            Utc::now(),
        );
        assert_eq!(nmea.name(), "NMEA-GN-GGA");
        assert_eq!(nmea.class(), None);

        let pubx = Message::new(Protocol::Nmea, b"$PUBX,00*33\r\n".to_vec(), 2, Utc::now());
        assert_eq!(pubx.name(), "NMEA-PUBX");

        let rtcm = Message::new(
            Protocol::Rtcm3,
            vec![0xd3, 0x00, 0x02, 0x3e, 0xd0, 0x00, 0x00, 0x00],
            3,
            Utc::now(),
        );
        assert_eq!(rtcm.name(), "RTCM3-1005");

        let garbage = Message::new(Protocol::Garbage, vec![0x00], 4, Utc::now());
        assert_eq!(garbage.name(), "GARBAGE");
        assert_eq!(garbage.info(), None);
    }

    #[test]
    fn short_data() {
        let ubx = Message::new(Protocol::Ubx, vec![0xb5], 1, Utc::now());
        assert_eq!(ubx.class(), None);
        assert_eq!(ubx.msg_id(), None);
        assert_eq!(ubx.payload(), &[] as &[u8]);
        assert_eq!(ubx.name(), "UBX-?");
        assert_eq!(ubx.info(), None);

        let header_only =
            Message::new(Protocol::Ubx, vec![0xb5, 0x62, 0x01, 0x07], 2, Utc::now());
        assert_eq!(header_only.name(), "UBX-NAV-PVT");
        assert!(header_only.payload().is_empty());

        let rtcm = Message::new(Protocol::Rtcm3, vec![0xd3, 0x00, 0x00, 0x3e], 3, Utc::now());
        assert_eq!(rtcm.name(), "RTCM3-?");

        let nmea = Message::new(Protocol::Nmea, Vec::new(), 4, Utc::now());
        assert_eq!(nmea.name(), "NMEA-");
        let non_ascii = Message::new(Protocol::Nmea, b"$G\xe9GGA,*00".to_vec(), 5, Utc::now());
        assert_eq!(non_ascii.name(), "NMEA-G\u{e9}-GGA");
    }
}
