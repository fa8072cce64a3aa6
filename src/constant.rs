// Copyright 2019 Petar Dambovaliev. All rights reserved.
// This software may be modified and distributed under the terms
// of the BSD license. See the LICENSE file for details.

//! Protocol constants from RFC 6320 and the access extension drafts

/// Protocol version of the published RFC
pub const RFC: u8 = 50;

/// Default ANCP TCP port
pub const ANCP_PORT: u16 = 6068;

// message types
pub const ADJACENCY: u8 = 10;
pub const PORT_MANAGEMENT: u8 = 32;
pub const PORT_UP: u8 = 80;
pub const PORT_DOWN: u8 = 81;
pub const ADJACENCY_UPDATE: u8 = 85;

// result field of general messages; the full registry is listed,
// the access node role only ever sends Nack
pub const RESULT_IGNORE: u8 = 0x00;
pub const RESULT_NACK: u8 = 0x01;
pub const RESULT_ACK_ALL: u8 = 0x02;
pub const RESULT_SUCCESS: u8 = 0x03;
pub const RESULT_FAILURE: u8 = 0x04;

// result code
pub const NO_RESULT: u16 = 0x000;

/// Adjacency protocol state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Idle = 1,
    SynSent = 2,
    SynRcvd = 3,
    Estab = 4,
}

/// Adjacency message code, carried in the low 7 bits of octet 7
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Code {
    Syn = 1,
    SynAck = 2,
    Ack = 3,
    RstAck = 4,
}

impl Code {
    pub fn from_u8(v: u8) -> Option<Code> {
        match v {
            1 => Some(Code::Syn),
            2 => Some(Code::SynAck),
            3 => Some(Code::Ack),
            4 => Some(Code::RstAck),
            _ => None,
        }
    }
}

/// Access technology announced in Port-Up / Port-Down messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TechType {
    Any = 0,
    Pon = 1,
    Dsl = 5,
}

/// Capability advertised in the adjacency capability list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Dynamic topology discovery
    Topology = 1,
    /// DSL line testing (OAM)
    Oam = 4,
}
