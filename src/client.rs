// Copyright 2019 Petar Dambovaliev. All rights reserved.
// This software may be modified and distributed under the terms
// of the BSD license. See the LICENSE file for details.

//! ANCP client speaking the access node side of an adjacency
//!
//! The client dials the NAS, runs the three way handshake on a
//! background receive thread and keeps the adjacency alive with
//! periodic SYNs. Once established, subscriber circuits are announced
//! with [`Client::port_up`] and withdrawn with [`Client::port_down`].

use super::constant::{self, Capability, Code, State, TechType};
use super::error::Error;
use super::packet::{self, AdjacencyInfo, Header};
use super::subscriber::Subscriber;
use super::wire;
use byteorder::{BigEndian, ByteOrder};
use log::{debug, error, info, warn};
use socket2::{Domain, Protocol, Socket, Type};
use std::io::Write;
use std::net::{IpAddr, Ipv4Addr, Shutdown, SocketAddr, TcpStream};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Sender name used when no source address is given
const PLACEHOLDER_SENDER_NAME: [u8; 6] = [1, 2, 3, 4, 5, 6];
/// Default 24 bit sender instance
const DEFAULT_SENDER_INSTANCE: u32 = 0x0100_0001;
/// This role never opens switch ports towards the NAS
const SENDER_PORT: u32 = 0;

/// How long connect waits for the adjacency, in slices that also
/// notice a dead receive thread
const ESTABLISH_SLICE: Duration = Duration::from_secs(1);
const ESTABLISH_SLICES: u32 = 6;
/// How long disconnect waits for the receive thread to exit
const READER_JOIN_TIMEOUT: Duration = Duration::from_secs(1);

/// Formats a 6-octet sender or receiver name the way MAC addresses are
/// printed.
///
/// # Examples
///
/// ```
/// assert_eq!(ancp::client::tomac(&[1, 2, 3, 4, 5, 6]), "01:02:03:04:05:06");
/// ```
pub fn tomac(name: &[u8; 6]) -> String {
    format!(
        "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
        name[0], name[1], name[2], name[3], name[4], name[5]
    )
}

/// a set of options for the ANCP session
#[derive(Debug, Clone)]
pub struct Options {
    pub address: IpAddr,
    pub port: u16,
    pub tech_type: TechType,
    /// adjacency timer, carried on the wire in tenths of a second
    pub timer: Duration,
    /// socket read timeout, the clock for all keep-alive behavior
    pub read_timeout: Duration,
    pub connection_timeout: Option<Duration>,
    /// source address to bind; also the first four octets of the
    /// sender name
    pub source_address: Option<Ipv4Addr>,
    pub version: u8,
    pub capabilities: Vec<Capability>,
    pub sender_instance: u32,
}

impl Options {
    pub fn new(address: IpAddr, tech_type: TechType) -> Options {
        Options {
            address,
            port: constant::ANCP_PORT,
            tech_type,
            timer: Duration::from_secs(25),
            read_timeout: Duration::from_secs(1),
            connection_timeout: None,
            source_address: None,
            version: constant::RFC,
            capabilities: vec![Capability::Topology],
            sender_instance: DEFAULT_SENDER_INSTANCE,
        }
    }
}

/// Latching one shot signal, set by the receive thread on the first
/// transition into Estab.
struct Event {
    flag: Mutex<bool>,
    cond: Condvar,
}

impl Event {
    fn new() -> Event {
        Event {
            flag: Mutex::new(false),
            cond: Condvar::new(),
        }
    }

    fn set(&self) {
        let mut flag = self.flag.lock().unwrap_or_else(PoisonError::into_inner);
        *flag = true;
        self.cond.notify_all();
    }

    fn clear(&self) {
        let mut flag = self.flag.lock().unwrap_or_else(PoisonError::into_inner);
        *flag = false;
    }

    fn is_set(&self) -> bool {
        *self.flag.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn wait(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut flag = self.flag.lock().unwrap_or_else(PoisonError::into_inner);
        while !*flag {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            let (guard, _) = self
                .cond
                .wait_timeout(flag, deadline - now)
                .unwrap_or_else(PoisonError::into_inner);
            flag = guard;
        }
        true
    }
}

/// Adjacency side of the session, owned by the receive thread after
/// connect returns.
struct Link {
    state: State,
    receiver_name: [u8; 6],
    receiver_instance: u32,
    receiver_port: u32,
    last_syn_time: Instant,
}

/// State shared between the caller and the receive thread.
struct Shared {
    version: u8,
    timer: Duration,
    capabilities: Vec<Capability>,
    sender_name: [u8; 6],
    sender_instance: u32,
    /// send half of the stream; every transmit goes through this lock
    tx: Mutex<TcpStream>,
    established: Event,
    link: Mutex<Link>,
}

/// Outcome of handling one received frame.
enum Flow {
    Continue,
    Shutdown,
}

impl Shared {
    fn timer_tenths(&self) -> u8 {
        (self.timer.as_millis() / 100).min(255) as u8
    }

    fn send(&self, buf: &[u8]) -> Result<(), Error> {
        let mut stream = match self.tx.lock() {
            Ok(s) => s,
            Err(_) => return Err(Error::Lock),
        };
        stream.write_all(buf)?;
        Ok(())
    }

    fn send_adjacency(&self, link: &Link, code: Code) -> Result<(), Error> {
        debug!("send adjacency message with code {:?}", code);
        let pdu = packet::Adjacency {
            version: self.version,
            timer: self.timer_tenths(),
            m: false,
            code,
            sender_name: self.sender_name,
            receiver_name: link.receiver_name,
            sender_port: SENDER_PORT,
            receiver_port: link.receiver_port,
            sender_instance: self.sender_instance,
            receiver_instance: link.receiver_instance,
            capabilities: &self.capabilities,
        }
        .encode();
        self.send(&pdu)
    }

    fn send_syn(&self, link: &mut Link) -> Result<(), Error> {
        self.send_adjacency(link, Code::Syn)?;
        link.last_syn_time = Instant::now();
        Ok(())
    }

    /// Shuts both stream halves down so the peer and the receive loop
    /// unblock.
    fn shutdown(&self) {
        if let Ok(stream) = self.tx.lock() {
            let _ = stream.shutdown(Shutdown::Both);
        }
    }

    fn handle_timeout(&self) -> Result<(), Error> {
        let mut link = match self.link.lock() {
            Ok(l) => l,
            Err(_) => return Err(Error::Lock),
        };
        match link.state {
            State::SynSent => self.send_syn(&mut link),
            State::Estab => {
                // keep-alive, one SYN per timer interval without
                // leaving Estab
                if link.last_syn_time.elapsed() >= self.timer {
                    self.send_syn(&mut link)
                } else {
                    Ok(())
                }
            }
            _ => Ok(()),
        }
    }

    fn handle_adjacency(&self, info: &AdjacencyInfo) -> Result<Flow, Error> {
        if !info.m {
            error!("peer sent an adjacency message with M=0");
            return Err(Error::Role);
        }
        let mut link = match self.link.lock() {
            Ok(l) => l,
            Err(_) => return Err(Error::Lock),
        };
        link.receiver_name = info.sender_name;
        link.receiver_instance = info.sender_instance;
        let before = link.state;
        let flow = match Code::from_u8(info.code) {
            Some(Code::Syn) => self.on_syn(&mut link)?,
            Some(Code::SynAck) => self.on_synack(&mut link)?,
            Some(Code::Ack) => self.on_ack(&mut link)?,
            Some(Code::RstAck) => self.on_rstack(&mut link)?,
            None => {
                warn!("unknown adjacency code {}", info.code);
                Flow::Continue
            }
        };
        if before != link.state && link.state == State::Estab && !self.established.is_set() {
            self.established.set();
            info!("adjacency established with {}", tomac(&link.receiver_name));
        }
        Ok(flow)
    }

    fn on_syn(&self, link: &mut Link) -> Result<Flow, Error> {
        debug!("SYN received in state {:?}", link.state);
        match link.state {
            State::Idle => {
                self.send_syn(link)?;
                link.state = State::SynSent;
            }
            State::SynSent => {
                self.send_adjacency(link, Code::SynAck)?;
                link.state = State::SynRcvd;
            }
            State::SynRcvd => self.send_adjacency(link, Code::SynAck)?,
            State::Estab => self.send_adjacency(link, Code::Ack)?,
        }
        Ok(Flow::Continue)
    }

    fn on_synack(&self, link: &mut Link) -> Result<Flow, Error> {
        debug!("SYNACK received in state {:?}", link.state);
        match link.state {
            State::SynSent => {
                self.send_adjacency(link, Code::Ack)?;
                link.state = State::Estab;
            }
            State::SynRcvd | State::Estab => self.send_adjacency(link, Code::Ack)?,
            State::Idle => warn!("SYNACK ignored in state {:?}", link.state),
        }
        Ok(Flow::Continue)
    }

    fn on_ack(&self, link: &mut Link) -> Result<Flow, Error> {
        debug!("ACK received in state {:?}", link.state);
        match link.state {
            // a stale ACK from an earlier incarnation of the session
            State::SynSent => self.send_adjacency(link, Code::RstAck)?,
            State::SynRcvd => {
                self.send_adjacency(link, Code::Ack)?;
                link.state = State::Estab;
            }
            State::Estab => {}
            State::Idle => warn!("ACK ignored in state {:?}", link.state),
        }
        Ok(Flow::Continue)
    }

    fn on_rstack(&self, link: &mut Link) -> Result<Flow, Error> {
        debug!("RSTACK received in state {:?}", link.state);
        match link.state {
            State::SynSent | State::Idle => Ok(Flow::Continue),
            State::SynRcvd => {
                self.reset(link);
                Ok(Flow::Shutdown)
            }
            State::Estab => {
                self.send_adjacency(link, Code::Ack)?;
                self.reset(link);
                Ok(Flow::Shutdown)
            }
        }
    }

    fn reset(&self, link: &mut Link) {
        info!("adjacency with {} reset by peer", tomac(&link.receiver_name));
        link.state = State::Idle;
        self.established.clear();
        self.shutdown();
    }
}

/// Client speaking the access node role of ANCP towards one NAS.
///
/// The client is single use: connect once, announce subscribers while
/// the adjacency holds, disconnect.
///
/// # Examples
///
/// ```no_run
/// use ancp::client::{Client, Options};
/// use ancp::constant::TechType;
/// use ancp::subscriber::Subscriber;
/// use std::net::{IpAddr, Ipv4Addr};
///
/// let opts = Options::new(IpAddr::from(Ipv4Addr::new(172, 30, 138, 10)), TechType::Dsl);
/// let mut client = Client::new(opts);
/// client.connect().unwrap();
///
/// let mut sub = Subscriber::new("0.0.0.0 eth 1");
/// sub.up = 1024;
/// sub.down = 16000;
/// client.port_up(&[sub]).unwrap();
/// client.disconnect(false).unwrap();
/// ```
pub struct Client {
    options: Options,
    sender_name: [u8; 6],
    transaction_id: u32,
    shared: Option<Arc<Shared>>,
    reader: Option<JoinHandle<()>>,
}

impl Client {
    pub fn new(options: Options) -> Client {
        let sender_name = match options.source_address {
            Some(source) => {
                let o = source.octets();
                [o[0], o[1], o[2], o[3], 0, 0]
            }
            None => PLACEHOLDER_SENDER_NAME,
        };
        Client {
            options,
            sender_name,
            transaction_id: 1,
            shared: None,
            reader: None,
        }
    }

    /// Opens the stream, sends the initial SYN, spawns the receive
    /// thread and blocks until the adjacency is established.
    pub fn connect(&mut self) -> Result<(), Error> {
        if self.shared.is_some() {
            return Err(Error::Connect("client already connected".to_string()));
        }
        info!("connect to {}:{}", self.options.address, self.options.port);
        let stream = self.dial()?;
        stream.set_read_timeout(Some(self.options.read_timeout))?;

        let shared = Arc::new(Shared {
            version: self.options.version,
            timer: self.options.timer,
            capabilities: self.options.capabilities.clone(),
            sender_name: self.sender_name,
            sender_instance: self.options.sender_instance,
            tx: Mutex::new(stream.try_clone()?),
            established: Event::new(),
            link: Mutex::new(Link {
                state: State::Idle,
                receiver_name: [0u8; 6],
                receiver_instance: 0,
                receiver_port: 0,
                last_syn_time: Instant::now(),
            }),
        });

        {
            let mut link = match shared.link.lock() {
                Ok(l) => l,
                Err(_) => return Err(Error::Lock),
            };
            shared.send_syn(&mut link)?;
            link.state = State::SynSent;
        }

        let reader = {
            let shared = Arc::clone(&shared);
            thread::Builder::new()
                .name("ancp-rx".to_string())
                .spawn(move || run(shared, stream))?
        };
        self.shared = Some(Arc::clone(&shared));
        self.reader = Some(reader);

        for _ in 0..ESTABLISH_SLICES {
            if shared.established.wait(ESTABLISH_SLICE) {
                return Ok(());
            }
            let dead = self.reader.as_ref().map_or(true, |h| h.is_finished());
            if dead {
                return Err(Error::ReaderDead);
            }
        }
        Err(Error::AdjacencyTimeout)
    }

    fn dial(&self) -> Result<TcpStream, Error> {
        let addr = SocketAddr::new(self.options.address, self.options.port);
        let domain = if addr.is_ipv4() {
            Domain::IPV4
        } else {
            Domain::IPV6
        };
        let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
        if let Some(source) = self.options.source_address {
            let bind = SocketAddr::new(IpAddr::V4(source), 0);
            socket
                .bind(&bind.into())
                .map_err(|e| Error::Connect(format!("bind {}: {}", source, e)))?;
        }
        match self.options.connection_timeout {
            Some(timeout) => socket.connect_timeout(&addr.into(), timeout)?,
            None => socket.connect(&addr.into())?,
        }
        Ok(socket.into())
    }

    /// Announces subscriber circuits as in service, one PDU per
    /// subscriber, all in one write.
    pub fn port_up(&mut self, subscribers: &[Subscriber]) -> Result<(), Error> {
        self.port_updown(constant::PORT_UP, subscribers)
    }

    /// Withdraws subscriber circuits from service.
    pub fn port_down(&mut self, subscribers: &[Subscriber]) -> Result<(), Error> {
        self.port_updown(constant::PORT_DOWN, subscribers)
    }

    fn port_updown(&mut self, message_type: u8, subscribers: &[Subscriber]) -> Result<(), Error> {
        if subscribers.is_empty() {
            return Err(Error::NoSubscribers);
        }
        let shared = match &self.shared {
            Some(s) => Arc::clone(s),
            None => return Err(Error::NotEstablished),
        };
        if !shared.established.is_set() {
            return Err(Error::NotEstablished);
        }
        let mut batch = Vec::new();
        for subscriber in subscribers {
            let (num_tlvs, tlvs) = subscriber.tlvs();
            let pdu = packet::Port {
                version: self.options.version,
                message_type,
                tech_type: self.options.tech_type,
                transaction_id: self.transaction_id,
                num_tlvs,
                tlvs: &tlvs,
            }
            .encode();
            self.transaction_id += 1;
            batch.extend_from_slice(&pdu);
        }
        shared.send(&batch)
    }

    /// Tears the session down with a final ACK (graceful, after a peer
    /// initiated reset) or a RSTACK (local teardown).
    pub fn disconnect(&mut self, send_ack: bool) -> Result<(), Error> {
        let shared = match self.shared.take() {
            Some(s) => s,
            None => return Ok(()),
        };
        let sent = {
            match shared.link.lock() {
                Ok(mut link) => {
                    let code = if send_ack { Code::Ack } else { Code::RstAck };
                    let sent = shared.send_adjacency(&link, code);
                    link.state = State::Idle;
                    sent
                }
                Err(_) => Err(Error::Lock),
            }
        };
        shared.established.clear();
        shared.shutdown();
        if let Some(handle) = self.reader.take() {
            let deadline = Instant::now() + READER_JOIN_TIMEOUT;
            while !handle.is_finished() && Instant::now() < deadline {
                thread::sleep(Duration::from_millis(20));
            }
            if handle.is_finished() {
                let _ = handle.join();
            }
        }
        sent
    }

    /// True once the adjacency handshake completed and the session has
    /// not been torn down since. Readable from any thread.
    pub fn is_established(&self) -> bool {
        self.shared
            .as_ref()
            .map_or(false, |s| s.established.is_set())
    }

    /// Snapshot of the adjacency state. Only the receive thread writes
    /// it; [`Client::is_established`] is the authoritative signal.
    pub fn state(&self) -> State {
        match &self.shared {
            Some(shared) => match shared.link.lock() {
                Ok(link) => link.state,
                Err(_) => State::Idle,
            },
            None => State::Idle,
        }
    }
}

/// Receive thread body.
fn run(shared: Arc<Shared>, mut stream: TcpStream) {
    if let Err(e) = recv_loop(&shared, &mut stream) {
        warn!("receive loop ended: {}", e);
    }
    shared.established.clear();
}

fn recv_loop(shared: &Shared, stream: &mut TcpStream) -> Result<(), Error> {
    let mut head = [0u8; 4];
    loop {
        match wire::read_full(stream, &mut head) {
            Ok(4) => {}
            Ok(0) => {
                let name = match shared.link.lock() {
                    Ok(link) => tomac(&link.receiver_name),
                    Err(_) => return Err(Error::Lock),
                };
                warn!("connection lost with {}", name);
                return Ok(());
            }
            Ok(n) => {
                return Err(Error::Frame {
                    reason: format!("short frame header, {} of 4 octets", n),
                })
            }
            Err(ref e) if wire::is_timeout(e) => {
                shared.handle_timeout()?;
                continue;
            }
            Err(e) => return Err(e.into()),
        }
        let header = Header::parse(&head);
        if header.ident != packet::IDENT {
            error!("incorrect ident 0x{:x}", header.ident);
            return Err(Error::Frame {
                reason: format!("incorrect ident 0x{:x}", header.ident),
            });
        }
        let mut body = vec![0u8; header.length as usize];
        let n = wire::read_full(stream, &mut body)?;
        if n != body.len() {
            warn!("short frame body, {} of {} octets", n, body.len());
            return Err(Error::Frame {
                reason: format!("short frame body, {} of {} octets", n, body.len()),
            });
        }
        match dispatch(shared, &body)? {
            Flow::Continue => {}
            Flow::Shutdown => return Ok(()),
        }
    }
}

fn dispatch(shared: &Shared, body: &[u8]) -> Result<Flow, Error> {
    if body.len() < 4 {
        return Err(Error::Frame {
            reason: format!("message body too short, {} octets", body.len()),
        });
    }
    let message_type = body[1];
    let var = BigEndian::read_u16(&body[2..]);
    debug!("received message type {} len {}", message_type, body.len());
    match message_type {
        constant::ADJACENCY => {
            let info = AdjacencyInfo::parse(body).ok_or_else(|| Error::Frame {
                reason: format!("adjacency body too short, {} octets", body.len()),
            })?;
            shared.handle_adjacency(&info)
        }
        constant::ADJACENCY_UPDATE => {
            debug!(
                "adjacency update, result {} code {}",
                var >> 12,
                var & 0xfff
            );
            Ok(Flow::Continue)
        }
        constant::PORT_UP | constant::PORT_DOWN => {
            debug!("port message from peer ignored");
            Ok(Flow::Continue)
        }
        _ => {
            debug!("message type {} ignored", message_type);
            Ok(Flow::Continue)
        }
    }
}
