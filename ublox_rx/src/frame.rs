//! UBX frame construction and validation
//!
//! A frame is `0xb5 0x62 | class | id | length (u16 le) | payload | ck_a | ck_b`,
//! the checksum running over everything from class to the end of the payload.

use crate::{
    constants::{
        UBX_CHECKSUM_LEN, UBX_CLASS_OFFSET, UBX_FRAME_OVERHEAD, UBX_HEADER_LEN, UBX_LENGTH_OFFSET,
        UBX_MSG_ID_OFFSET, UBX_SYNC_CHAR_1, UBX_SYNC_CHAR_2,
    },
    error::ParserError,
};

/// 8 bit Fletcher checksum `[ck_a, ck_b]` over `data`
pub fn ubx_checksum(data: &[u8]) -> [u8; 2] {
    data.iter().fold([0u8; 2], |[a, b], &byte| {
        let a = a.wrapping_add(byte);
        [a, b.wrapping_add(a)]
    })
}

/// Check `body` (class to end of payload) against the two received checksum bytes
pub(crate) fn verify_checksum(body: &[u8], received: [u8; 2]) -> Result<(), ParserError> {
    let computed = ubx_checksum(body);
    if computed == received {
        Ok(())
    } else {
        Err(ParserError::InvalidChecksum {
            expect: u16::from_le_bytes(received),
            got: u16::from_le_bytes(computed),
        })
    }
}

/// Assemble a complete UBX frame.
///
/// The payload must fit the 16 bit length field, at most 65535 bytes. Longer
/// payloads are a caller bug: debug builds panic, release builds write a
/// truncated length and the frame will not parse.
pub fn build_frame(class: u8, msg_id: u8, payload: &[u8]) -> Vec<u8> {
    debug_assert!(
        payload.len() <= usize::from(u16::MAX),
        "UBX payload of {} bytes exceeds the length field",
        payload.len()
    );
    let len = payload.len() as u16;
    let mut frame = Vec::with_capacity(payload.len() + UBX_FRAME_OVERHEAD);
    frame.extend_from_slice(&[UBX_SYNC_CHAR_1, UBX_SYNC_CHAR_2, class, msg_id]);
    frame.extend_from_slice(&len.to_le_bytes());
    frame.extend_from_slice(payload);
    let ck = ubx_checksum(&frame[UBX_CLASS_OFFSET..]);
    frame.extend_from_slice(&ck);
    frame
}

/// Borrowed view of a validated UBX frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRef<'a> {
    pub class: u8,
    pub msg_id: u8,
    pub payload: &'a [u8],
}

/// Validate `data` as exactly one UBX frame and return its fields
pub fn parse_frame(data: &[u8]) -> Result<FrameRef<'_>, ParserError> {
    if data.len() < UBX_FRAME_OVERHEAD {
        return Err(ParserError::InvalidPacketLen {
            expect: UBX_FRAME_OVERHEAD,
            got: data.len(),
        });
    }
    if data[0] != UBX_SYNC_CHAR_1 || data[1] != UBX_SYNC_CHAR_2 {
        return Err(ParserError::InvalidSync);
    }
    let pack_len =
        u16::from_le_bytes([data[UBX_LENGTH_OFFSET], data[UBX_LENGTH_OFFSET + 1]]) as usize;
    if data.len() != pack_len + UBX_FRAME_OVERHEAD {
        return Err(ParserError::InvalidPacketLen {
            expect: pack_len + UBX_FRAME_OVERHEAD,
            got: data.len(),
        });
    }

    let ck_offset = UBX_HEADER_LEN + pack_len;
    verify_checksum(
        &data[UBX_CLASS_OFFSET..ck_offset],
        [data[ck_offset], data[ck_offset + 1]],
    )?;

    Ok(FrameRef {
        class: data[UBX_CLASS_OFFSET],
        msg_id: data[UBX_MSG_ID_OFFSET],
        payload: &data[UBX_HEADER_LEN..data.len() - UBX_CHECKSUM_LEN],
    })
}
