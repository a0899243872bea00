//! Human-readable one-line summaries of UBX messages
//!
//! Each decoder checks the payload size (and the version field where the
//! message format changed over time) and returns `None` for anything it does
//! not recognise. A `None` is not an error, it only means there is nothing
//! more to say about the message than its name.

use std::fmt::Write;

use byteorder::{ByteOrder, LittleEndian};
use num_traits::AsPrimitive;

use crate::{
    message::Message,
    names::{message_name, signal_name, sv_name},
    valset::{CfgLayerSet, Transaction},
};

/// Summary of a received message
pub fn describe(msg: &Message) -> Option<String> {
    match (msg.class(), msg.msg_id()) {
        (Some(class), Some(msg_id)) => describe_ubx(class, msg_id, msg.payload()),
        _ => None,
    }
}

/// Summary of a UBX message given its class, message id and payload
pub fn describe_ubx(class: u8, msg_id: u8, payload: &[u8]) -> Option<String> {
    if payload.is_empty() {
        return Some("empty message / poll request".to_string());
    }
    match (class, msg_id) {
        (0x01, 0x07) => NavPvt::parse(payload).map(|pvt| pvt.to_string()),
        (0x01, 0x01) => nav_posecef(payload),
        (0x01, 0x13) => nav_hpposecef(payload),
        (0x01, 0x3c) => nav_relposned(payload),
        (0x01, 0x03) => nav_status(payload),
        (0x01, 0x12) => nav_velned(payload),
        (0x01, 0x43) => nav_sig(payload),
        (0x01, 0x35) => nav_sat(payload),
        // ORB CLOCK DOP POSLLH VELECEF EOE GEOFENCE TIMEUTC TIMELS TIMEGPS
        // TIMEGLO TIMEBDS TIMEGAL COV
        (0x01, 0x34 | 0x22 | 0x04 | 0x02 | 0x11 | 0x61 | 0x39 | 0x21 | 0x26 | 0x20 | 0x23
        | 0x24 | 0x25 | 0x36) => nav_itow(payload, 0),
        // SVIN ODO HPPOSLLH
        (0x01, 0x3b | 0x09 | 0x14) => nav_itow(payload, 4),
        (0x04, _) => Some(inf_text(payload)),
        (0x02, 0x15) => rxm_rawx(payload),
        (0x0a, 0x04) => mon_ver_version(payload),
        (0x0a, 0x0e) => mon_temp(payload),
        (0x06, 0x8a) => cfg_valset(payload),
        (0x06, 0x8b) => cfg_valget(payload),
        (0x05, 0x01) => ack(payload, true),
        (0x05, 0x00) => ack(payload, false),
        _ => None,
    }
}

fn scaled<T: AsPrimitive<f64>>(raw: T, scale: f64) -> f64 {
    raw.as_() * scale
}

fn itow(raw: u32) -> f64 {
    scaled(raw, 1e-3)
}

/// Round nanoseconds to milliseconds, carrying into the seconds.
///
/// Returns `(sec, msec)` with `msec` in `0..1000`. Any `nano` is accepted, a
/// carry of more than one second included.
pub fn round_to_millis(sec: i32, nano: i32) -> (i32, i32) {
    let msec = (i64::from(nano) + 500_000).div_euclid(1_000_000);
    // |nano| < 2^31 limits the carry to -3..=2
    let carry = msec.div_euclid(1000) as i32;
    (sec.saturating_add(carry), msec.rem_euclid(1000) as i32)
}

fn carr_soln_str(carr_soln: u32) -> &'static str {
    match carr_soln {
        0 => "none",
        1 => "float",
        2 => "fixed",
        _ => "rtk?",
    }
}

fn yn(flag: bool) -> char {
    if flag {
        'Y'
    } else {
        'N'
    }
}

/// UBX-NAV-PVT (version 1)
#[derive(Debug, Clone, Copy, PartialEq)]
struct NavPvt {
    itow: u32,
    year: u16,
    month: u8,
    day: u8,
    hour: u8,
    min: u8,
    sec: u8,
    valid: u8,
    nano: i32,
    fix_type: u8,
    flags: u8,
    flags2: u8,
    num_sv: u8,
    lon: i32,
    lat: i32,
    height: i32,
    h_acc: u32,
    v_acc: u32,
    p_dop: u16,
}

impl NavPvt {
    const SIZE: usize = 92;
    const VALID_DATE: u8 = 0x01;
    const VALID_TIME: u8 = 0x02;
    const FLAGS_GNSS_FIX_OK: u8 = 0x01;
    const FLAGS2_CONF_DATE: u8 = 0x40;
    const FLAGS2_CONF_TIME: u8 = 0x80;

    fn parse(p: &[u8]) -> Option<Self> {
        if p.len() != Self::SIZE {
            return None;
        }
        Some(Self {
            itow: LittleEndian::read_u32(&p[0..]),
            year: LittleEndian::read_u16(&p[4..]),
            month: p[6],
            day: p[7],
            hour: p[8],
            min: p[9],
            sec: p[10],
            valid: p[11],
            nano: LittleEndian::read_i32(&p[16..]),
            fix_type: p[20],
            flags: p[21],
            flags2: p[22],
            num_sv: p[23],
            lon: LittleEndian::read_i32(&p[24..]),
            lat: LittleEndian::read_i32(&p[28..]),
            height: LittleEndian::read_i32(&p[32..]),
            h_acc: LittleEndian::read_u32(&p[40..]),
            v_acc: LittleEndian::read_u32(&p[44..]),
            p_dop: LittleEndian::read_u16(&p[76..]),
        })
    }

    fn validity(&self, valid: u8, confirmed: u8) -> char {
        match (self.valid & valid != 0, self.flags2 & confirmed != 0) {
            (false, _) => 'n',
            (true, false) => 'y',
            (true, true) => 'Y',
        }
    }

    fn fix_type_str(&self) -> &'static str {
        match self.fix_type {
            0 => "nofix",
            1 => "dr",
            2 => "2D",
            3 => "3D",
            4 => "3D+DR",
            5 => "time",
            _ => "?",
        }
    }
}

impl core::fmt::Display for NavPvt {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let (sec, msec) = round_to_millis(self.sec.into(), self.nano);
        write!(
            f,
            "{:010.3} {:04}-{:02}-{:02} ({}) {:02}:{:02}:{:02}.{:03} ({})",
            itow(self.itow),
            self.year,
            self.month,
            self.day,
            self.validity(Self::VALID_DATE, Self::FLAGS2_CONF_DATE),
            self.hour,
            self.min,
            sec,
            msec,
            self.validity(Self::VALID_TIME, Self::FLAGS2_CONF_TIME),
        )?;
        write!(
            f,
            " {} ({}, {}) {:2} {:4.2} {:+11.7} {:+12.7} ({:5.1}) {:+6.0} ({:5.1})",
            self.fix_type_str(),
            if self.flags & Self::FLAGS_GNSS_FIX_OK != 0 {
                "OK"
            } else {
                "masked"
            },
            carr_soln_str(u32::from(self.flags >> 6)),
            self.num_sv,
            scaled(self.p_dop, 1e-2),
            scaled(self.lat, 1e-7),
            scaled(self.lon, 1e-7),
            scaled(self.h_acc, 1e-3),
            scaled(self.height, 1e-3),
            scaled(self.v_acc, 1e-3),
        )
    }
}

fn nav_itow(p: &[u8], offs: usize) -> Option<String> {
    (p.len() >= offs + 4).then(|| format!("{:010.3}", itow(LittleEndian::read_u32(&p[offs..]))))
}

fn nav_posecef(p: &[u8]) -> Option<String> {
    if p.len() != 20 {
        return None;
    }
    Some(format!(
        "{:010.3} {:.2}  {:.2}  {:.2}  {:.2}",
        itow(LittleEndian::read_u32(&p[0..])),
        scaled(LittleEndian::read_i32(&p[4..]), 1e-2),
        scaled(LittleEndian::read_i32(&p[8..]), 1e-2),
        scaled(LittleEndian::read_i32(&p[12..]), 1e-2),
        scaled(LittleEndian::read_u32(&p[16..]), 1e-2),
    ))
}

fn nav_hpposecef(p: &[u8]) -> Option<String> {
    if p.len() != 28 || p[0] != 0x00 {
        return None;
    }
    let tow = itow(LittleEndian::read_u32(&p[4..]));
    if p[23] & 0x01 != 0 {
        return Some(format!("{:010.3} invalid", tow));
    }
    let coord = |i: usize| {
        scaled(LittleEndian::read_i32(&p[8 + 4 * i..]), 1e-2) + scaled(p[20 + i] as i8, 1e-4)
    };
    Some(format!(
        "{:010.3} {:.3} {:.3} {:.3} {:.3}",
        tow,
        coord(0),
        coord(1),
        coord(2),
        scaled(LittleEndian::read_u32(&p[24..]), 1e-4),
    ))
}

fn nav_relposned(p: &[u8]) -> Option<String> {
    if p.len() != 64 || p[0] != 0x01 {
        return None;
    }
    let component = |offs: usize, hp_offs: usize| {
        scaled(LittleEndian::read_i32(&p[offs..]), 1e-2) + scaled(p[hp_offs] as i8, 1e-4)
    };
    let flags = LittleEndian::read_u32(&p[60..]);
    let flag = |mask: u32| flags & mask != 0;
    Some(format!(
        "{:010.3} N {:.3} E {:.3} D {:.3} L {:.3} ({:.3}) H {:.1} ({:.1}) {} {} {} \
         pos:{} head:{} moving:{} posMiss:{} obsMiss:{} norm:{}",
        itow(LittleEndian::read_u32(&p[4..])),
        component(8, 32),
        component(12, 33),
        component(16, 34),
        component(20, 35),
        scaled(LittleEndian::read_u32(&p[48..]), 1e-4),
        scaled(LittleEndian::read_i32(&p[24..]), 1e-5),
        scaled(LittleEndian::read_u32(&p[52..]), 1e-5),
        if flag(0x01) { "OK" } else { "masked" },
        if flag(0x02) { "diff" } else { "(diff)" },
        carr_soln_str((flags >> 3) & 0x03),
        yn(flag(0x004)),
        yn(flag(0x100)),
        yn(flag(0x020)),
        yn(flag(0x040)),
        yn(flag(0x080)),
        yn(flag(0x200)),
    ))
}

fn nav_status(p: &[u8]) -> Option<String> {
    if p.len() != 16 {
        return None;
    }
    Some(format!(
        "{:010.3} ttff={:.3} sss={:.3}",
        itow(LittleEndian::read_u32(&p[0..])),
        scaled(LittleEndian::read_u32(&p[8..]), 1e-3),
        scaled(LittleEndian::read_u32(&p[12..]), 1e-3),
    ))
}

fn nav_velned(p: &[u8]) -> Option<String> {
    if p.len() != 36 {
        return None;
    }
    Some(format!(
        "{:010.3} N {:.2} E {:.2} D {:.2} speed {:.2} ground {:.2} ({:.2}) heading {:.1} ({:.1})",
        itow(LittleEndian::read_u32(&p[0..])),
        scaled(LittleEndian::read_i32(&p[4..]), 1e-2),
        scaled(LittleEndian::read_i32(&p[8..]), 1e-2),
        scaled(LittleEndian::read_i32(&p[12..]), 1e-2),
        scaled(LittleEndian::read_u32(&p[16..]), 1e-2),
        scaled(LittleEndian::read_u32(&p[20..]), 1e-2),
        scaled(LittleEndian::read_u32(&p[28..]), 1e-2),
        scaled(LittleEndian::read_i32(&p[24..]), 1e-5),
        scaled(LittleEndian::read_u32(&p[32..]), 1e-5),
    ))
}

/// Satellite or signal identity used for sorted lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct SvSig {
    gnss: u8,
    sv: u8,
    sig: Option<u8>,
}

impl core::fmt::Display for SvSig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.sig {
            Some(sig) => write!(f, "{}({})", sv_name(self.gnss, self.sv), signal_name(self.gnss, sig)),
            None => f.write_str(&sv_name(self.gnss, self.sv)),
        }
    }
}

/// Append the entries sorted by (gnss, sv, signal)
fn append_sorted(out: &mut String, mut list: Vec<SvSig>) {
    list.sort_unstable();
    for entry in list {
        let _ = write!(out, " {}", entry);
    }
}

/// Repeated blocks of `block_size` starting at `offs`, at most `count` of them
fn blocks(p: &[u8], offs: usize, block_size: usize, count: usize) -> impl Iterator<Item = &[u8]> {
    p.get(offs..)
        .unwrap_or_default()
        .chunks_exact(block_size)
        .take(count)
}

fn nav_sig(p: &[u8]) -> Option<String> {
    if p.len() < 8 || p[4] != 0x00 {
        return None;
    }
    let num_sigs = usize::from(p[5]);
    let mut out = format!("{:010.3} {}", itow(LittleEndian::read_u32(&p[0..])), num_sigs);
    let list = blocks(p, 8, 16, num_sigs)
        .map(|b| SvSig {
            gnss: b[0],
            sv: b[1],
            sig: Some(b[2]),
        })
        .collect();
    append_sorted(&mut out, list);
    Some(out)
}

fn nav_sat(p: &[u8]) -> Option<String> {
    if p.len() < 8 || p[4] != 0x01 {
        return None;
    }
    let num_svs = usize::from(p[5]);
    let mut out = format!("{:010.3} {}", itow(LittleEndian::read_u32(&p[0..])), num_svs);
    let list = blocks(p, 8, 12, num_svs)
        .map(|b| SvSig {
            gnss: b[0],
            sv: b[1],
            sig: None,
        })
        .collect();
    append_sorted(&mut out, list);
    Some(out)
}

fn rxm_rawx(p: &[u8]) -> Option<String> {
    if p.len() < 16 || p[13] != 0x01 {
        return None;
    }
    let num_meas = usize::from(p[11]);
    if p.len() != 16 + 32 * num_meas {
        return None;
    }
    let mut out = format!(
        "{:010.3} {:04} {}",
        LittleEndian::read_f64(&p[0..]),
        LittleEndian::read_u16(&p[8..]),
        num_meas
    );
    let list = blocks(p, 16, 32, num_meas)
        .map(|b| SvSig {
            gnss: b[20],
            sv: b[21],
            sig: Some(b[22]),
        })
        .collect();
    append_sorted(&mut out, list);
    Some(out)
}

fn inf_text(p: &[u8]) -> String {
    p.iter()
        .map(|&b| {
            if b.is_ascii_graphic() || b == b' ' {
                b as char
            } else {
                '.'
            }
        })
        .collect()
}

/// NUL terminated string in a fixed size field
fn fixed_str(field: &[u8]) -> String {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    String::from_utf8_lossy(&field[..end]).trim().to_string()
}

/// Receiver version string from a UBX-MON-VER payload, e.g. `HPG 1.13 (ZED-F9P)`.
///
/// Uses the `FWVER=` extension if present, the software version otherwise,
/// and appends the `MOD=` extension when available.
pub fn mon_ver_version(p: &[u8]) -> Option<String> {
    const SW_VERSION_LEN: usize = 30;
    const HW_VERSION_LEN: usize = 10;
    const EXTENSION_LEN: usize = 30;
    const HEAD_LEN: usize = SW_VERSION_LEN + HW_VERSION_LEN;

    if p.len() < HEAD_LEN || (p.len() - HEAD_LEN) % EXTENSION_LEN != 0 {
        return None;
    }
    let mut version = fixed_str(&p[..SW_VERSION_LEN]);
    let mut module = None;
    for ext in p[HEAD_LEN..].chunks_exact(EXTENSION_LEN).map(fixed_str) {
        if let Some(fw) = ext.strip_prefix("FWVER=") {
            version = fw.to_string();
        } else if let Some(m) = ext.strip_prefix("MOD=") {
            module = Some(m.to_string());
        }
    }
    if version.is_empty() {
        return None;
    }
    Some(match module {
        Some(module) => format!("{} ({})", version, module),
        None => version,
    })
}

fn mon_temp(p: &[u8]) -> Option<String> {
    if p.len() != 12 || p[0] != 0x00 {
        return None;
    }
    Some(format!("{} C, {}", LittleEndian::read_i16(&p[4..]), p[6]))
}

fn cfg_valset(p: &[u8]) -> Option<String> {
    if p.len() < 4 {
        return None;
    }
    let layers = CfgLayerSet::from_bits_truncate(p[1]);
    let data_size = p.len() - 4;
    match p[0] {
        0x00 => Some(format!("set {} bytes, layers {}", data_size, layers)),
        0x01 => Some(format!(
            "set {} bytes, layers {}, transaction {}",
            data_size,
            layers,
            Transaction::from_u8(p[2]).map_or("?", Transaction::as_str)
        )),
        _ => None,
    }
}

fn valget_layer_name(layer: u8) -> &'static str {
    match layer {
        0 => "RAM",
        1 => "BBR",
        2 => "Flash",
        7 => "Default",
        _ => "?",
    }
}

fn cfg_valget(p: &[u8]) -> Option<String> {
    if p.len() < 4 {
        return None;
    }
    let layer = valget_layer_name(p[1]);
    let position = LittleEndian::read_u16(&p[2..]);
    match p[0] {
        0x00 => Some(format!(
            "poll {} items, layer {}, position {}",
            (p.len() - 4) / 4,
            layer,
            position
        )),
        0x01 => Some(format!(
            "response {} bytes, layer {}, position {}",
            p.len() - 4,
            layer,
            position
        )),
        _ => None,
    }
}

fn ack(p: &[u8], ack: bool) -> Option<String> {
    if p.len() < 2 {
        return None;
    }
    Some(format!(
        "{} {}",
        if ack {
            "acknowledgement"
        } else {
            "negative-acknowledgement"
        },
        message_name(p[0], p[1])
    ))
}

#[cfg(test)]
mod test {
    use super::*;
    use byteorder::WriteBytesExt;

    fn pvt_payload() -> Vec<u8> {
        let mut p = vec![0u8; NavPvt::SIZE];
        LittleEndian::write_u32(&mut p[0..], 123_456_789);
        LittleEndian::write_u16(&mut p[4..], 2024);
        p[6] = 3;
        p[7] = 9;
        p[8] = 12;
        p[9] = 34;
        p[10] = 56;
        p[11] = 0x03;
        LittleEndian::write_i32(&mut p[16..], 999_600_000);
        p[20] = 3;
        p[21] = 0x81; // gnssFixOK, carrSoln fixed
        p[22] = 0x40; // date confirmed only
        p[23] = 27;
        LittleEndian::write_i32(&mut p[24..], 85_123_456);
        LittleEndian::write_i32(&mut p[28..], 473_654_321);
        LittleEndian::write_i32(&mut p[32..], 512_345);
        LittleEndian::write_u32(&mut p[40..], 14);
        LittleEndian::write_u32(&mut p[44..], 21);
        LittleEndian::write_u16(&mut p[76..], 123);
        p
    }

    #[test]
    fn nav_pvt() {
        assert_eq!(
            describe_ubx(0x01, 0x07, &pvt_payload()).unwrap(),
            "123456.789 2024-03-09 (Y) 12:34:57.000 (y) 3D (OK, fixed) 27 1.23 \
             +47.3654321   +8.5123456 (  0.0)   +512 (  0.0)"
        );
    }

    #[test]
    fn nav_pvt_wrong_size() {
        let mut p = pvt_payload();
        p.push(0);
        assert_eq!(describe_ubx(0x01, 0x07, &p), None);
    }

    #[test]
    fn millisecond_rounding() {
        assert_eq!(round_to_millis(10, 0), (10, 0));
        assert_eq!(round_to_millis(10, 1_499_999), (10, 1));
        assert_eq!(round_to_millis(10, 999_600_000), (11, 0));
        assert_eq!(round_to_millis(10, -1_000), (10, 0));
        assert_eq!(round_to_millis(10, -600_000), (9, 999));
        assert_eq!(round_to_millis(10, -999_999_999), (9, 0));
        assert_eq!(round_to_millis(10, 1_999_500_000), (12, 0));
        assert_eq!(round_to_millis(10, i32::MAX), (12, 147));
        assert_eq!(round_to_millis(10, i32::MIN), (7, 853));
        assert_eq!(round_to_millis(i32::MAX, i32::MAX), (i32::MAX, 147));
    }

    #[test]
    fn nav_pvt_nano_out_of_range() {
        let mut p = pvt_payload();
        LittleEndian::write_i32(&mut p[16..], i32::MAX);
        assert!(describe_ubx(0x01, 0x07, &p)
            .unwrap()
            .contains(" 12:34:58.147 "));
        LittleEndian::write_i32(&mut p[16..], i32::MIN);
        assert!(describe_ubx(0x01, 0x07, &p)
            .unwrap()
            .contains(" 12:34:53.853 "));
    }

    #[test]
    fn nav_itow_offsets() {
        let mut p = vec![0u8; 20];
        LittleEndian::write_u32(&mut p[0..], 1_000);
        LittleEndian::write_u32(&mut p[4..], 2_500);
        // NAV-DOP has the iTOW first, NAV-ODO after a 4 byte header
        assert_eq!(describe_ubx(0x01, 0x04, &p).unwrap(), "000001.000");
        assert_eq!(describe_ubx(0x01, 0x09, &p).unwrap(), "000002.500");
        assert_eq!(describe_ubx(0x01, 0x09, &p[..6]), None);
    }

    #[test]
    fn hpposecef() {
        let mut p = vec![0u8; 28];
        LittleEndian::write_u32(&mut p[4..], 10_000);
        LittleEndian::write_i32(&mut p[8..], 123_456);
        LittleEndian::write_i32(&mut p[12..], -200);
        LittleEndian::write_i32(&mut p[16..], 0);
        p[20] = 3;
        p[21] = (-3i8) as u8;
        LittleEndian::write_u32(&mut p[24..], 37);
        assert_eq!(
            describe_ubx(0x01, 0x13, &p).unwrap(),
            "000010.000 1234.560 -2.000 0.000 0.004"
        );
        p[23] = 0x01;
        assert_eq!(describe_ubx(0x01, 0x13, &p).unwrap(), "000010.000 invalid");
        p[0] = 1;
        assert_eq!(describe_ubx(0x01, 0x13, &p), None);
    }

    #[test]
    fn relposned_version_checked() {
        let mut p = vec![0u8; 64];
        p[0] = 0x01;
        LittleEndian::write_i32(&mut p[8..], 150);
        LittleEndian::write_u32(&mut p[60..], 0x01 | 0x02 | 0x04 | 0x10 | 0x100);
        let info = describe_ubx(0x01, 0x3c, &p).unwrap();
        assert!(info.starts_with("000000.000 N 1.500 E 0.000 D 0.000"), "{}", info);
        assert!(info.contains("OK diff fixed pos:Y head:Y moving:N"), "{}", info);
        p[0] = 0x00;
        assert_eq!(describe_ubx(0x01, 0x3c, &p), None);
    }

    #[test]
    fn rawx_sorted() {
        let meas = [(2u8, 12u8, 5u8), (0, 5, 0), (2, 12, 0), (0, 2, 3), (0, 5, 3)];
        let mut p = vec![];
        p.write_f64::<LittleEndian>(345_600.25).unwrap();
        p.write_u16::<LittleEndian>(2310).unwrap();
        p.extend_from_slice(&[18, meas.len() as u8, 0, 0x01, 0, 0]);
        for (gnss, sv, sig) in meas {
            let mut block = [0u8; 32];
            block[20] = gnss;
            block[21] = sv;
            block[22] = sig;
            p.extend_from_slice(&block);
        }
        assert_eq!(
            describe_ubx(0x02, 0x15, &p).unwrap(),
            "345600.250 2310 5 G02(L2CL) G05(L1CA) G05(L2CL) E12(E1C) E12(E5BI)"
        );
        p.push(0);
        assert_eq!(describe_ubx(0x02, 0x15, &p), None);
    }

    #[test]
    fn nav_sat_sorted() {
        let mut p = vec![0u8; 8];
        LittleEndian::write_u32(&mut p[0..], 5_000);
        p[4] = 0x01;
        p[5] = 3;
        for (gnss, sv) in [(6u8, 1u8), (0, 30), (0, 4)] {
            let mut block = [0u8; 12];
            block[0] = gnss;
            block[1] = sv;
            p.extend_from_slice(&block);
        }
        assert_eq!(describe_ubx(0x01, 0x35, &p).unwrap(), "000005.000 3 G04 G30 R01");
    }

    #[test]
    fn inf_replaces_unprintable() {
        assert_eq!(describe_ubx(0x04, 0x02, b"hello\r\n\x01world").unwrap(), "hello...world");
    }

    fn mon_ver_payload(extensions: &[&str]) -> Vec<u8> {
        let mut p = vec![0u8; 40];
        p[..12].copy_from_slice(b"EXT CORE 1.0");
        p[30..38].copy_from_slice(b"00190000");
        for ext in extensions {
            let mut field = [0u8; 30];
            field[..ext.len()].copy_from_slice(ext.as_bytes());
            p.extend_from_slice(&field);
        }
        p
    }

    #[test]
    fn mon_ver_strings() {
        let p = mon_ver_payload(&["ROM BASE 0x118B2060", "FWVER=HPG 1.13", "MOD=ZED-F9P"]);
        assert_eq!(mon_ver_version(&p).unwrap(), "HPG 1.13 (ZED-F9P)");
        assert_eq!(describe_ubx(0x0a, 0x04, &p).unwrap(), "HPG 1.13 (ZED-F9P)");

        let p = mon_ver_payload(&[]);
        assert_eq!(mon_ver_version(&p).unwrap(), "EXT CORE 1.0");
        assert_eq!(mon_ver_version(&p[..39]), None);
    }

    #[test]
    fn valset_and_valget() {
        let mut p = vec![0x01, 0x05, 0x01, 0x00];
        p.extend_from_slice(&[0u8; 10]);
        assert_eq!(
            describe_ubx(0x06, 0x8a, &p).unwrap(),
            "set 10 bytes, layers RAM,Flash, transaction begin"
        );
        p[0] = 0x00;
        assert_eq!(describe_ubx(0x06, 0x8a, &p).unwrap(), "set 10 bytes, layers RAM,Flash");

        let poll = [0x00, 0x07, 0x40, 0x00, 1, 0, 0x52, 0x40, 2, 0, 0x52, 0x40];
        assert_eq!(
            describe_ubx(0x06, 0x8b, &poll).unwrap(),
            "poll 2 items, layer Default, position 64"
        );
    }

    #[test]
    fn ack_nak() {
        assert_eq!(
            describe_ubx(0x05, 0x01, &[0x06, 0x8a]).unwrap(),
            "acknowledgement UBX-CFG-VALSET"
        );
        assert_eq!(
            describe_ubx(0x05, 0x00, &[0x0a, 0x04]).unwrap(),
            "negative-acknowledgement UBX-MON-VER"
        );
    }

    #[test]
    fn empty_and_unknown() {
        assert_eq!(
            describe_ubx(0x0a, 0x04, &[]).unwrap(),
            "empty message / poll request"
        );
        assert_eq!(describe_ubx(0x0a, 0x09, &[0u8; 60]), None);
        assert_eq!(describe_ubx(0xf1, 0x00, &[1, 2, 3]), None);
    }
}
