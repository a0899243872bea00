pub const UBX_SYNC_CHAR_1: u8 = 0xb5;
pub const UBX_SYNC_CHAR_2: u8 = 0x62;
pub(crate) const UBX_SYNC_SIZE: usize = 2;
pub(crate) const UBX_PAYLOAD_SIZE_LEN: usize = 2;
pub(crate) const UBX_CLASS_LEN: usize = 1;
pub(crate) const UBX_ID_LEN: usize = 1;
pub const UBX_HEADER_LEN: usize =
    UBX_SYNC_SIZE + UBX_PAYLOAD_SIZE_LEN + UBX_CLASS_LEN + UBX_ID_LEN;
pub const UBX_CHECKSUM_LEN: usize = 2;
/// Bytes a frame adds around its payload
pub const UBX_FRAME_OVERHEAD: usize = UBX_HEADER_LEN + UBX_CHECKSUM_LEN;

pub(crate) const UBX_CLASS_OFFSET: usize = 2; // After SYNC_CHAR_1, SYNC_CHAR_2
pub(crate) const UBX_MSG_ID_OFFSET: usize = 3; // After CLASS
pub(crate) const UBX_LENGTH_OFFSET: usize = 4; // After MSG_ID

/// Largest payload the stream parser accepts. Anything claiming more is
/// treated as a false sync.
pub const MAX_PAYLOAD_LEN: usize = 4096;

pub const NMEA_SYNC_CHAR: u8 = 0x24; // '$'
pub const NMEA_END_CHAR_1: u8 = 0x0d; // '\r' (<CR>)
pub const NMEA_END_CHAR_2: u8 = 0x0a; // '\n' (<LF>)
pub(crate) const NMEA_MIN_SENTENCE_LENGTH: usize = 11; // $ + address (5) + *hh + <CR><LF>
pub(crate) const NMEA_MAX_SENTENCE_LENGTH: usize = 82;

pub const RTCM_SYNC_CHAR: u8 = 0xd3;
pub(crate) const RTCM_HEADER_SIZE: usize = 3; // sync char (1) + length field (2)
pub(crate) const RTCM_CRC_SIZE: usize = 3;
pub(crate) const RTCM_LENGTH_MASK: u16 = 0x03ff; // 10 bits for length (6 bits reserved)

// Message classes
pub const UBX_NAV_CLSID: u8 = 0x01;
pub const UBX_RXM_CLSID: u8 = 0x02;
pub const UBX_INF_CLSID: u8 = 0x04;
pub const UBX_ACK_CLSID: u8 = 0x05;
pub const UBX_CFG_CLSID: u8 = 0x06;
pub const UBX_UPD_CLSID: u8 = 0x09;
pub const UBX_MON_CLSID: u8 = 0x0a;

// Message ids used by the session
pub const UBX_ACK_NAK_MSGID: u8 = 0x00;
pub const UBX_ACK_ACK_MSGID: u8 = 0x01;
pub const UBX_CFG_RST_MSGID: u8 = 0x04;
pub const UBX_CFG_CFG_MSGID: u8 = 0x09;
pub const UBX_CFG_VALSET_MSGID: u8 = 0x8a;
pub const UBX_CFG_VALGET_MSGID: u8 = 0x8b;
pub const UBX_MON_VER_MSGID: u8 = 0x04;
pub const UBX_UPD_SAFEBOOT_MSGID: u8 = 0x07;
