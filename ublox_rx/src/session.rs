//! Receiver session: detection, message stream, polling and configuration
//!
//! A [`Receiver`] owns its transport and is driven by a single caller. All
//! operations block at most for their explicit timeouts. Long running loops
//! check an [`AbortHandle`] between reads.

use std::{
    collections::VecDeque,
    io,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

use log::{debug, info, log, trace, warn, Level};

use crate::{
    cfg_val::{self, CfgKeyVal},
    constants::{
        UBX_ACK_ACK_MSGID, UBX_ACK_CLSID, UBX_ACK_NAK_MSGID, UBX_CFG_CFG_MSGID, UBX_CFG_CLSID,
        UBX_CFG_RST_MSGID, UBX_CFG_VALGET_MSGID, UBX_CFG_VALSET_MSGID, UBX_MON_CLSID,
        UBX_MON_VER_MSGID, UBX_UPD_CLSID, UBX_UPD_SAFEBOOT_MSGID,
    },
    error::{Result, RxError},
    frame::build_frame,
    info::mon_ver_version,
    message::Message,
    names::message_name,
    parser::{Parser, ParserStats},
    transport::{PortSpec, Transport},
    valset::{CfgLayerSet, ConfigWriteBatch, ValsetOptions, ValsetSplitter, VALSET_MAX_KV},
};

/// Baud rates tried by autobaud, after the currently configured one
pub const DEFAULT_BAUD_RATES: [u32; 6] = [9_600, 38_400, 115_200, 230_400, 460_800, 921_600];

const READ_CHUNK_SIZE: usize = 4096;

/// Size of the UBX-MON-VER payload without extensions
const MON_VER_MIN_SIZE: usize = 40;

/// Size of the UBX-CFG-VALGET header
const VALGET_HEAD_SIZE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Closed,
    /// Looking for the receiver
    Detecting,
    Ready,
    /// A poll or configuration exchange is in progress
    Busy,
}

/// Session options
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RxOptions {
    /// Search the candidate baud rates for the receiver
    pub autobaud: bool,
    /// Probe for the receiver (UBX-MON-VER poll) when opening
    pub detect: bool,
    /// Log session progress at info instead of debug level
    pub verbose: bool,
    /// Fixed baud rate, disables autobaud
    pub baud_rate: Option<u32>,
    pub baud_rates: Vec<u32>,
    /// Per attempt timeout of the detection poll
    pub detect_timeout: Duration,
    pub detect_retries: usize,
    /// How long to wait for each acknowledgement of a configuration write
    pub ack_timeout: Duration,
    /// Most unrelated messages kept while waiting for responses
    pub max_pending: usize,
    pub valset: ValsetOptions,
}

impl Default for RxOptions {
    fn default() -> Self {
        Self {
            autobaud: true,
            detect: true,
            verbose: true,
            baud_rate: None,
            baud_rates: DEFAULT_BAUD_RATES.to_vec(),
            detect_timeout: Duration::from_millis(1500),
            detect_retries: 1,
            ack_timeout: Duration::from_millis(2500),
            max_pending: 1000,
            valset: ValsetOptions::default(),
        }
    }
}

/// Cooperative cancellation of session operations.
///
/// Once aborted, every blocking session operation fails with
/// [`RxError::Aborted`] until [`AbortHandle::reset`] is called.
#[derive(Debug, Clone, Default)]
pub struct AbortHandle(Arc<AtomicBool>);

impl AbortHandle {
    pub fn abort(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// A UBX poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollRequest {
    pub class: u8,
    pub msg_id: u8,
    /// Poll payload, usually empty
    pub payload: Vec<u8>,
    /// Do not send anything, only wait for the message
    pub wait_only: bool,
    /// Per attempt timeout
    pub timeout: Duration,
    /// Additional attempts after the first one timed out
    pub retries: usize,
    /// Responses with a shorter payload are ignored
    pub min_response_size: usize,
    /// Take a UBX-ACK-ACK for the polled message as the response. Off for
    /// polls whose answer is followed by an ACK-ACK, such as UBX-CFG-VALGET.
    pub ack_is_response: bool,
}

impl PollRequest {
    pub fn new(class: u8, msg_id: u8) -> Self {
        Self {
            class,
            msg_id,
            payload: Vec::new(),
            wait_only: false,
            timeout: Duration::from_millis(2000),
            retries: 2,
            min_response_size: 0,
            ack_is_response: true,
        }
    }

    pub fn payload(mut self, payload: Vec<u8>) -> Self {
        self.payload = payload;
        self
    }

    pub fn wait_only(mut self) -> Self {
        self.wait_only = true;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn retries(mut self, retries: usize) -> Self {
        self.retries = retries;
        self
    }

    pub fn min_response_size(mut self, size: usize) -> Self {
        self.min_response_size = size;
        self
    }

    /// Only the polled message itself (or a NAK) ends the poll
    pub fn response_only(mut self) -> Self {
        self.ack_is_response = false;
        self
    }

    fn matches(&self, msg: &Message) -> Match {
        if msg.is(self.class, self.msg_id) && msg.payload_len() >= self.min_response_size {
            return Match::Response;
        }
        if msg.class() == Some(UBX_ACK_CLSID)
            && msg.payload().get(..2) == Some(&[self.class, self.msg_id][..])
        {
            match msg.msg_id() {
                Some(UBX_ACK_ACK_MSGID) if self.ack_is_response => return Match::Response,
                Some(UBX_ACK_NAK_MSGID) => return Match::Nak,
                _ => {},
            }
        }
        Match::Unrelated
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Match {
    Response,
    Nak,
    Unrelated,
}

/// Result of a successful poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollResponse {
    /// The response, or the UBX-ACK-NAK if the receiver rejected the poll
    pub message: Message,
    pub nak: bool,
}

/// Configuration layer to read from
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CfgLayer {
    Ram = 0,
    Bbr = 1,
    Flash = 2,
    Default = 7,
}

/// UBX-CFG-VALGET poll payload
pub fn valget_poll_payload(layer: CfgLayer, position: u16, keys: &[u32]) -> Vec<u8> {
    let mut payload = Vec::with_capacity(VALGET_HEAD_SIZE + 4 * keys.len());
    payload.extend_from_slice(&[0x00, layer as u8]);
    payload.extend_from_slice(&position.to_le_bytes());
    for key in keys {
        payload.extend_from_slice(&key.to_le_bytes());
    }
    payload
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResetKind {
    None,
    Soft,
    Hard,
    Hot,
    Warm,
    Cold,
    /// Revert the configuration to default, navigation data is kept
    Default,
    /// Revert the configuration to default and coldstart
    Factory,
    GnssStop,
    GnssStart,
    GnssRestart,
    Safeboot,
}

impl ResetKind {
    pub const ALL: [ResetKind; 12] = [
        Self::None,
        Self::Soft,
        Self::Hard,
        Self::Hot,
        Self::Warm,
        Self::Cold,
        Self::Default,
        Self::Factory,
        Self::GnssStop,
        Self::GnssStart,
        Self::GnssRestart,
        Self::Safeboot,
    ];

    pub const fn description(self) -> &'static str {
        match self {
            Self::None => "no reset",
            Self::Soft => "controlled software reset",
            Self::Hard => "controlled hardware reset",
            Self::Hot => "hotstart",
            Self::Warm => "warmstart",
            Self::Cold => "coldstart",
            Self::Default => "revert configuration to default",
            Self::Factory => "revert configuration to default and coldstart",
            Self::GnssStop => "stop navigation",
            Self::GnssStart => "start navigation",
            Self::GnssRestart => "restart navigation",
            Self::Safeboot => "enter safeboot mode",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "none" => Self::None,
            "soft" => Self::Soft,
            "hard" => Self::Hard,
            "hot" => Self::Hot,
            "warm" => Self::Warm,
            "cold" => Self::Cold,
            "default" => Self::Default,
            "factory" => Self::Factory,
            "stop" => Self::GnssStop,
            "start" => Self::GnssStart,
            "restart" => Self::GnssRestart,
            "safeboot" => Self::Safeboot,
            _ => return None,
        })
    }

    /// The frames sent for this reset, in order
    pub fn frames(self) -> Vec<Vec<u8>> {
        let rst = |nav_bbr_mask: u16, reset_mode: u8| {
            let [m0, m1] = nav_bbr_mask.to_le_bytes();
            build_frame(UBX_CFG_CLSID, UBX_CFG_RST_MSGID, &[m0, m1, reset_mode, 0x00])
        };
        match self {
            Self::None => vec![],
            Self::Soft => vec![rst(0x0000, 0x01)],
            Self::Hard => vec![rst(0x0000, 0x04)],
            Self::Hot => vec![rst(0x0000, 0x02)],
            Self::Warm => vec![rst(0x0001, 0x02)],
            Self::Cold => vec![rst(0xffff, 0x02)],
            Self::Default => vec![revert_config_frame(), rst(0x0000, 0x01)],
            Self::Factory => vec![revert_config_frame(), rst(0xffff, 0x01)],
            Self::GnssStop => vec![rst(0x0000, 0x08)],
            Self::GnssStart => vec![rst(0x0000, 0x09)],
            Self::GnssRestart => vec![rst(0x0000, 0x02)],
            Self::Safeboot => vec![build_frame(UBX_UPD_CLSID, UBX_UPD_SAFEBOOT_MSGID, &[])],
        }
    }
}

/// UBX-CFG-CFG clearing the saved configuration and loading the defaults
fn revert_config_frame() -> Vec<u8> {
    let mut payload = Vec::with_capacity(13);
    payload.extend_from_slice(&0xffff_ffffu32.to_le_bytes()); // clear
    payload.extend_from_slice(&0u32.to_le_bytes()); // save
    payload.extend_from_slice(&0xffff_ffffu32.to_le_bytes()); // load
    payload.push(0x17); // BBR, flash, EEPROM, SPI flash
    build_frame(UBX_CFG_CLSID, UBX_CFG_CFG_MSGID, &payload)
}

/// Result of a one-shot command line run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpOutcome {
    /// Receiver found and at least one message received
    Success,
    OtherFailure,
    ReceiverNotFound,
    /// Receiver found but no message received
    NoData,
}

impl DumpOutcome {
    pub const fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::OtherFailure => 1,
            Self::ReceiverNotFound => 2,
            Self::NoData => 3,
        }
    }
}

impl From<DumpOutcome> for std::process::ExitCode {
    fn from(outcome: DumpOutcome) -> Self {
        std::process::ExitCode::from(outcome.code())
    }
}

/// A session with one receiver
pub struct Receiver<T: Transport> {
    name: String,
    transport: Option<T>,
    options: RxOptions,
    parser: Parser,
    pending: VecDeque<Message>,
    state: SessionState,
    version: Option<String>,
    abort: AbortHandle,
}

impl Receiver<Box<dyn Transport>> {
    /// Open the port described by `port` (see [`PortSpec`]) and detect the
    /// receiver on it
    pub fn connect(port: &str, mut options: RxOptions) -> Result<Self> {
        let spec: PortSpec = port.parse()?;
        if let PortSpec::Serial {
            baud: Some(baud), ..
        } = spec
        {
            options.baud_rate = Some(baud);
        }
        let transport = spec.open().map_err(|err| {
            warn!("{}: {}", port, err);
            RxError::ReceiverNotFound {
                port: port.to_string(),
            }
        })?;
        let mut rx = Receiver::new(port, transport, options);
        rx.open()?;
        Ok(rx)
    }
}

impl<T: Transport> Receiver<T> {
    /// Create a session over `transport`. The session is closed until
    /// [`Receiver::open`] succeeded.
    pub fn new(name: &str, transport: T, options: RxOptions) -> Self {
        Self {
            name: name.to_string(),
            transport: Some(transport),
            options,
            parser: Parser::new(),
            pending: VecDeque::new(),
            state: SessionState::Closed,
            version: None,
            abort: AbortHandle::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn options(&self) -> &RxOptions {
        &self.options
    }

    /// Version string reported by the receiver while opening
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn abort_handle(&self) -> AbortHandle {
        self.abort.clone()
    }

    pub fn stats(&self) -> &ParserStats {
        self.parser.stats()
    }

    fn progress_level(&self) -> Level {
        if self.options.verbose {
            Level::Info
        } else {
            Level::Debug
        }
    }

    /// Detect the receiver, searching the baud rates if configured
    pub fn open(&mut self) -> Result<()> {
        if self.transport.is_none() {
            return Err(RxError::NotOpen);
        }
        self.state = SessionState::Detecting;
        match self.detect() {
            Ok(()) => {
                self.state = SessionState::Ready;
                log!(
                    self.progress_level(),
                    "{}: receiver ready{}",
                    self.name,
                    self.version
                        .as_ref()
                        .map(|v| format!(", version {}", v))
                        .unwrap_or_default()
                );
                Ok(())
            },
            Err(err) => {
                self.close();
                Err(err)
            },
        }
    }

    fn detect(&mut self) -> Result<()> {
        if let Some(baud) = self.options.baud_rate {
            if self.baud_rate().is_some() {
                self.switch_baud_rate(baud)?;
            }
        }
        if !self.options.detect {
            return Ok(());
        }

        let current = self.transport()?.baud_rate();
        let candidates: Vec<Option<u32>> = match current {
            Some(current) if self.options.autobaud && self.options.baud_rate.is_none() => {
                std::iter::once(current)
                    .chain(self.options.baud_rates.iter().copied().filter(|b| *b != current))
                    .map(Some)
                    .collect()
            },
            _ => vec![None],
        };

        for baud in candidates {
            if let Some(baud) = baud {
                self.switch_baud_rate(baud)?;
            }
            log!(
                self.progress_level(),
                "{}: probing for receiver{}",
                self.name,
                baud.map(|b| format!(" at {} baud", b)).unwrap_or_default()
            );
            if self.probe()? {
                return Ok(());
            }
        }
        Err(RxError::ReceiverNotFound {
            port: self.name.clone(),
        })
    }

    /// Poll the version. `Ok(false)` if nothing answered.
    fn probe(&mut self) -> Result<bool> {
        let request = PollRequest::new(UBX_MON_CLSID, UBX_MON_VER_MSGID)
            .timeout(self.options.detect_timeout)
            .retries(self.options.detect_retries)
            .min_response_size(MON_VER_MIN_SIZE);
        match self.exchange(&request) {
            Ok(resp) => {
                if !resp.nak {
                    self.version = mon_ver_version(resp.message.payload());
                }
                Ok(true)
            },
            Err(RxError::PollTimeout { .. }) => Ok(false),
            Err(err) => Err(err),
        }
    }

    fn switch_baud_rate(&mut self, baud: u32) -> Result<()> {
        let transport = self.transport()?;
        let res = transport
            .set_baud_rate(baud)
            .and_then(|()| transport.clear_input());
        res.map_err(|err| self.fatal(err))?;
        self.parser.clear();
        Ok(())
    }

    pub fn baud_rate(&self) -> Option<u32> {
        self.transport.as_ref().and_then(|t| t.baud_rate())
    }

    /// Change the baud rate of the transport (not of the receiver)
    pub fn set_baud_rate(&mut self, baud: u32) -> Result<()> {
        self.ensure_open()?;
        if self.baud_rate().is_none() {
            return Err(RxError::Transport(io::Error::new(
                io::ErrorKind::Unsupported,
                "transport has no baud rate",
            )));
        }
        self.switch_baud_rate(baud)?;
        log!(self.progress_level(), "{}: baud rate now {}", self.name, baud);
        Ok(())
    }

    /// Close the session, releasing the transport. Closing twice is fine.
    pub fn close(&mut self) {
        if self.transport.take().is_some() {
            debug!("{}: closing", self.name);
        }
        self.state = SessionState::Closed;
    }

    fn transport(&mut self) -> Result<&mut T> {
        self.transport.as_mut().ok_or(RxError::NotOpen)
    }

    fn ensure_open(&self) -> Result<()> {
        match (self.state, self.transport.is_some()) {
            (SessionState::Closed, _) | (_, false) => Err(RxError::NotOpen),
            _ => Ok(()),
        }
    }

    fn check_abort(&self) -> Result<()> {
        if self.abort.is_aborted() {
            Err(RxError::Aborted)
        } else {
            Ok(())
        }
    }

    /// Transport errors are fatal to the session
    fn fatal(&mut self, err: io::Error) -> RxError {
        warn!("{}: transport error: {}", self.name, err);
        self.close();
        RxError::Transport(err)
    }

    /// Next message from the transport, ignoring the pending queue
    fn receive(&mut self, timeout: Duration) -> Result<Option<Message>> {
        let deadline = Instant::now() + timeout;
        let mut buf = [0u8; READ_CHUNK_SIZE];
        let mut attempted = false;
        loop {
            if let Some(msg) = self.parser.next_message() {
                trace!(
                    "{}: received {} #{} ({} bytes)",
                    self.name,
                    msg.name(),
                    msg.seq(),
                    msg.size()
                );
                return Ok(Some(msg));
            }
            if attempted && Instant::now() >= deadline {
                return Ok(None);
            }
            self.check_abort()?;
            let res = self.transport()?.read(&mut buf);
            match res {
                Ok(n) => self.parser.add(&buf[..n]),
                Err(err) => return Err(self.fatal(err)),
            }
            attempted = true;
        }
    }

    fn queue_pending(&mut self, msg: Message) {
        if self.pending.len() >= self.options.max_pending {
            if let Some(dropped) = self.pending.pop_front() {
                warn!(
                    "{}: message queue full, dropping {} #{}",
                    self.name,
                    dropped.name(),
                    dropped.seq()
                );
            }
        }
        self.pending.push_back(msg);
    }

    /// The next message, or `None` if none arrived within `timeout`
    pub fn get_next_message(&mut self, timeout: Duration) -> Result<Option<Message>> {
        self.ensure_open()?;
        if let Some(msg) = self.pending.pop_front() {
            return Ok(Some(msg));
        }
        self.receive(timeout)
    }

    /// Write raw bytes to the receiver
    pub fn send(&mut self, data: &[u8]) -> Result<()> {
        self.ensure_open()?;
        self.write(data)
    }

    fn write(&mut self, data: &[u8]) -> Result<()> {
        let res = self.transport()?.write_all(data);
        res.map_err(|err| self.fatal(err))
    }

    /// Poll a UBX message and wait for the response
    pub fn poll_ubx(&mut self, request: &PollRequest) -> Result<PollResponse> {
        self.ensure_open()?;
        self.busy(|rx| rx.exchange(request))
    }

    fn busy<R>(&mut self, f: impl FnOnce(&mut Self) -> Result<R>) -> Result<R> {
        self.state = SessionState::Busy;
        let res = f(self);
        if self.state == SessionState::Busy {
            self.state = SessionState::Ready;
        }
        res
    }

    fn exchange(&mut self, request: &PollRequest) -> Result<PollResponse> {
        let name = message_name(request.class, request.msg_id);
        let frame = build_frame(request.class, request.msg_id, &request.payload);
        let attempts = request.retries + 1;
        for attempt in 1..=attempts {
            if !request.wait_only {
                debug!("{}: polling {} (attempt {}/{})", self.name, name, attempt, attempts);
                self.write(&frame)?;
            }
            let deadline = Instant::now() + request.timeout;
            while let Some(remaining) = deadline.checked_duration_since(Instant::now()) {
                let Some(msg) = self.receive(remaining)? else {
                    break;
                };
                match request.matches(&msg) {
                    Match::Response => return Ok(PollResponse { message: msg, nak: false }),
                    Match::Nak => {
                        debug!("{}: poll {} not acknowledged", self.name, name);
                        return Ok(PollResponse { message: msg, nak: true });
                    },
                    Match::Unrelated => self.queue_pending(msg),
                }
            }
            log!(
                self.progress_level(),
                "{}: no response to {} (attempt {}/{})",
                self.name,
                name,
                attempt,
                attempts
            );
        }
        Err(RxError::PollTimeout {
            name: name.into_owned(),
            attempts,
        })
    }

    /// Send all messages of `batch` and wait until each one is acknowledged
    pub fn send_config_batch(&mut self, batch: &ConfigWriteBatch) -> Result<()> {
        self.ensure_open()?;
        self.busy(|rx| rx.apply_batch(batch))
    }

    fn apply_batch(&mut self, batch: &ConfigWriteBatch) -> Result<()> {
        let expected = batch.len();
        for msg in batch.iter() {
            log!(self.progress_level(), "{}: sending UBX-CFG-VALSET {}", self.name, msg.info);
            self.write(&msg.frame)?;
        }

        let mut acked = 0;
        let mut deadline = Instant::now() + self.options.ack_timeout;
        while acked < expected {
            let Some(remaining) = deadline.checked_duration_since(Instant::now()) else {
                break;
            };
            let Some(msg) = self.receive(remaining)? else {
                break;
            };
            let is_valset_ack = msg.class() == Some(UBX_ACK_CLSID)
                && msg.payload().get(..2) == Some(&[UBX_CFG_CLSID, UBX_CFG_VALSET_MSGID][..]);
            match msg.msg_id() {
                Some(UBX_ACK_ACK_MSGID) if is_valset_ack => {
                    acked += 1;
                    deadline = Instant::now() + self.options.ack_timeout;
                },
                Some(UBX_ACK_NAK_MSGID) if is_valset_ack => {
                    warn!(
                        "{}: configuration rejected at message {} of {}",
                        self.name,
                        acked + 1,
                        expected
                    );
                    return Err(RxError::ConfigRejected {
                        index: acked + 1,
                        expected,
                    });
                },
                _ => self.queue_pending(msg),
            }
        }
        if acked < expected {
            return Err(RxError::ConfigTimeout { acked, expected });
        }
        log!(
            self.progress_level(),
            "{}: configuration applied ({} messages)",
            self.name,
            expected
        );
        Ok(())
    }

    /// Write `kvs` to the given layers
    pub fn set_config(&mut self, kvs: &[CfgKeyVal], layers: CfgLayerSet) -> Result<()> {
        let batch = ValsetSplitter::new(self.options.valset).split(kvs, layers)?;
        self.send_config_batch(&batch)
    }

    /// Read the values of `keys` (which may include group wildcards) from
    /// `layer`
    pub fn get_config(&mut self, layer: CfgLayer, keys: &[u32]) -> Result<Vec<CfgKeyVal>> {
        self.ensure_open()?;
        self.busy(|rx| {
            let mut kvs = Vec::new();
            for chunk in keys.chunks(VALSET_MAX_KV) {
                rx.get_config_chunk(layer, chunk, &mut kvs)?;
            }
            Ok(kvs)
        })
    }

    fn get_config_chunk(
        &mut self,
        layer: CfgLayer,
        keys: &[u32],
        kvs: &mut Vec<CfgKeyVal>,
    ) -> Result<()> {
        let mut position: u16 = 0;
        loop {
            let request = PollRequest::new(UBX_CFG_CLSID, UBX_CFG_VALGET_MSGID)
                .payload(valget_poll_payload(layer, position, keys))
                .min_response_size(VALGET_HEAD_SIZE)
                .response_only();
            let resp = self.exchange(&request)?;
            if resp.nak {
                if position == 0 {
                    return Err(RxError::ConfigRejected {
                        index: 1,
                        expected: 1,
                    });
                }
                break;
            }
            let cfg_data = resp.message.payload().get(VALGET_HEAD_SIZE..);
            let items = cfg_val::decode(cfg_data.unwrap_or_default())?;
            let n = items.len();
            debug!(
                "{}: {} items from {:?} layer at position {}",
                self.name, n, layer, position
            );
            kvs.extend(items);
            if n < VALSET_MAX_KV {
                break;
            }
            position = position.saturating_add(VALSET_MAX_KV as u16);
        }
        Ok(())
    }

    /// Reset the receiver. Nothing is acknowledged, success means the reset
    /// was sent.
    pub fn reset(&mut self, kind: ResetKind) -> Result<()> {
        self.ensure_open()?;
        info!("{}: reset: {}", self.name, kind.description());
        for frame in kind.frames() {
            self.write(&frame)?;
        }
        Ok(())
    }
}

impl<T: Transport> Drop for Receiver<T> {
    fn drop(&mut self) {
        self.close();
    }
}
