//! Simulated receiver answering the UBX requests a session sends

#![allow(dead_code)]

use std::{
    cell::RefCell,
    collections::{BTreeMap, VecDeque},
    io,
    rc::Rc,
    time::Duration,
};

use byteorder::{LittleEndian, WriteBytesExt};
use ublox_rx::{
    build_frame, cfg_val, parse_frame, CfgKeyVal, Parser, Protocol, RxOptions, Transport,
};

/// What the simulated receiver does with UBX-CFG-VALSET
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValsetReply {
    Ack,
    /// NAK the n-th (1-based) message, ACK the ones before
    NakAt(usize),
    Silent,
}

#[derive(Debug)]
pub struct Inner {
    /// Baud rate the receiver talks at
    pub receiver_baud: u32,
    /// Baud rate of the port, `None` for transports without one
    pub port_baud: Option<u32>,
    pub answer_mon_ver: bool,
    pub valset: ValsetReply,
    pub valget_nak: bool,
    pub config: BTreeMap<u32, CfgKeyVal>,
    pub fail_writes: bool,
    /// Every frame written by the session, in order
    pub written: Vec<Vec<u8>>,
    pub baud_changes: Vec<u32>,
    incoming: VecDeque<u8>,
    rx_parser: Parser,
    valsets_seen: usize,
}

/// Test side of a [`MockReceiver`]
#[derive(Debug, Clone)]
pub struct MockHandle(Rc<RefCell<Inner>>);

/// Transport side, handed to the session
#[derive(Debug)]
pub struct MockReceiver(Rc<RefCell<Inner>>);

pub fn mock_receiver(receiver_baud: u32, port_baud: Option<u32>) -> (MockReceiver, MockHandle) {
    let inner = Rc::new(RefCell::new(Inner {
        receiver_baud,
        port_baud,
        answer_mon_ver: true,
        valset: ValsetReply::Ack,
        valget_nak: false,
        config: BTreeMap::new(),
        fail_writes: false,
        written: Vec::new(),
        baud_changes: Vec::new(),
        incoming: VecDeque::new(),
        rx_parser: Parser::new(),
        valsets_seen: 0,
    }));
    (MockReceiver(inner.clone()), MockHandle(inner))
}

impl MockHandle {
    pub fn with<R>(&self, f: impl FnOnce(&mut Inner) -> R) -> R {
        f(&mut self.0.borrow_mut())
    }

    /// Bytes the receiver sends on its own
    pub fn push_incoming(&self, data: &[u8]) {
        self.0.borrow_mut().incoming.extend(data);
    }

    pub fn written(&self) -> Vec<Vec<u8>> {
        self.0.borrow().written.clone()
    }

    /// (class, id) of every frame written
    pub fn written_ids(&self) -> Vec<(u8, u8)> {
        self.0
            .borrow()
            .written
            .iter()
            .filter_map(|f| parse_frame(f).ok().map(|f| (f.class, f.msg_id)))
            .collect()
    }

    pub fn set_config(&self, kvs: &[CfgKeyVal]) {
        let mut inner = self.0.borrow_mut();
        for kv in kvs {
            inner.config.insert(kv.key.0, *kv);
        }
    }
}

impl Inner {
    fn in_sync(&self) -> bool {
        self.port_baud.is_none_or(|b| b == self.receiver_baud)
    }

    fn reply(&mut self, class: u8, msg_id: u8, payload: &[u8]) {
        let frame = build_frame(class, msg_id, payload);
        self.incoming.extend(frame);
    }

    fn handle_frame(&mut self, class: u8, msg_id: u8, payload: &[u8]) {
        match (class, msg_id) {
            (0x0a, 0x04) if payload.is_empty() && self.answer_mon_ver => {
                let payload = mon_ver_payload();
                self.reply(0x0a, 0x04, &payload);
            },
            (0x06, 0x8a) => {
                self.valsets_seen += 1;
                match self.valset {
                    ValsetReply::Ack => self.reply(0x05, 0x01, &[0x06, 0x8a]),
                    ValsetReply::NakAt(n) if self.valsets_seen == n => {
                        self.reply(0x05, 0x00, &[0x06, 0x8a])
                    },
                    ValsetReply::NakAt(n) if self.valsets_seen < n => {
                        self.reply(0x05, 0x01, &[0x06, 0x8a])
                    },
                    ValsetReply::NakAt(_) | ValsetReply::Silent => {},
                }
            },
            (0x06, 0x8b) if payload.len() >= 4 => {
                if self.valget_nak {
                    self.reply(0x05, 0x00, &[0x06, 0x8b]);
                    return;
                }
                let layer = payload[1];
                let position = u16::from_le_bytes([payload[2], payload[3]]) as usize;
                let keys: Vec<u32> = payload[4..]
                    .chunks_exact(4)
                    .map(|k| u32::from_le_bytes([k[0], k[1], k[2], k[3]]))
                    .collect();
                let matching: Vec<CfgKeyVal> = self
                    .config
                    .values()
                    .filter(|kv| keys.iter().any(|&k| key_matches(k, kv.key.0)))
                    .copied()
                    .collect();
                if matching.is_empty() {
                    self.reply(0x05, 0x00, &[0x06, 0x8b]);
                    return;
                }
                let page: Vec<CfgKeyVal> = matching.into_iter().skip(position).take(64).collect();
                if page.is_empty() {
                    self.reply(0x05, 0x00, &[0x06, 0x8b]);
                    return;
                }
                let mut resp = vec![0x01, layer];
                resp.write_u16::<LittleEndian>(position as u16).unwrap();
                resp.extend(cfg_val::encode(&page).unwrap());
                self.reply(0x06, 0x8b, &resp);
                // the receiver acknowledges every VALGET after the response
                self.reply(0x05, 0x01, &[0x06, 0x8b]);
            },
            _ => {},
        }
    }
}

/// Group wildcard 0x0fff_ffff style matching of UBX-CFG-VALGET
fn key_matches(requested: u32, key: u32) -> bool {
    let group = (requested >> 16) & 0xff;
    let item = requested & 0xffff;
    if item == 0xffff {
        group == 0xff || group == (key >> 16) & 0xff
    } else {
        requested == key
    }
}

pub fn mon_ver_payload() -> Vec<u8> {
    let mut payload = Vec::new();
    payload.extend(fixed(b"ROM CORE 1.00", 30));
    payload.extend(fixed(b"00190000", 10));
    payload.extend(fixed(b"FWVER=HPG 1.32", 30));
    payload.extend(fixed(b"MOD=ZED-F9P", 30));
    payload
}

fn fixed(s: &[u8], len: usize) -> Vec<u8> {
    let mut v = s.to_vec();
    v.resize(len, 0);
    v
}

impl Transport for MockReceiver {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut inner = self.0.borrow_mut();
        if inner.incoming.is_empty() {
            drop(inner);
            std::thread::sleep(Duration::from_millis(1));
            return Ok(0);
        }
        let n = buf.len().min(inner.incoming.len());
        for (dst, src) in buf.iter_mut().zip(inner.incoming.drain(..n)) {
            *dst = src;
        }
        Ok(n)
    }

    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        let mut inner = self.0.borrow_mut();
        if inner.fail_writes {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "unplugged"));
        }
        inner.written.push(data.to_vec());
        if !inner.in_sync() {
            return Ok(());
        }
        inner.rx_parser.add(data);
        while let Some(msg) = inner.rx_parser.next_message() {
            if msg.protocol() != Protocol::Ubx {
                continue;
            }
            if let (Some(class), Some(msg_id)) = (msg.class(), msg.msg_id()) {
                inner.handle_frame(class, msg_id, msg.payload());
            }
        }
        Ok(())
    }

    fn baud_rate(&self) -> Option<u32> {
        self.0.borrow().port_baud
    }

    fn set_baud_rate(&mut self, baud: u32) -> io::Result<()> {
        let mut inner = self.0.borrow_mut();
        match inner.port_baud {
            Some(_) => {
                inner.port_baud = Some(baud);
                inner.baud_changes.push(baud);
                Ok(())
            },
            None => Err(io::Error::new(io::ErrorKind::Unsupported, "no baud rate")),
        }
    }

    fn clear_input(&mut self) -> io::Result<()> {
        let mut inner = self.0.borrow_mut();
        inner.incoming.clear();
        inner.rx_parser.clear();
        Ok(())
    }
}

/// Options with short timeouts
pub fn fast_options() -> RxOptions {
    RxOptions {
        verbose: false,
        detect_timeout: Duration::from_millis(50),
        ack_timeout: Duration::from_millis(100),
        ..RxOptions::default()
    }
}
