// Copyright 2019 Petar Dambovaliev. All rights reserved.
// This software may be modified and distributed under the terms
// of the BSD license. See the LICENSE file for details.

//! PDU builders and frame header parsing
//!
//! Every ANCP frame starts with the GSMP ethertype identifier followed
//! by a 16 bit length covering the rest of the frame. Two families
//! exist: fixed size adjacency PDUs with a trailing capability list,
//! and variable size general PDUs carrying a subscriber TLV tree.

use super::constant::{self, Capability, Code, TechType};
use byteorder::{BigEndian, ByteOrder};

/// Frame identifier of every ANCP message
pub const IDENT: u16 = 0x880C;
/// Sub identifier of the extension block in general messages
pub const SUB_IDENT: u16 = 0x8001;

// the partition field is carved from the high octet of the
// transaction and instance words; this role never partitions
const PARTITION_ID: u32 = 0;

const ADJACENCY_BODY: usize = 36;
const GENERAL_HEADER: usize = 16;
const PORT_BLOCK: usize = 28;

/// Common 4-octet frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub ident: u16,
    pub length: u16,
}

impl Header {
    pub fn parse(b: &[u8; 4]) -> Header {
        Header {
            ident: BigEndian::read_u16(&b[0..]),
            length: BigEndian::read_u16(&b[2..]),
        }
    }
}

/// An adjacency protocol PDU.
///
/// `timer` is carried in tenths of a second. The M bit is cleared when
/// the access node sends and set on everything the NAS sends back.
#[derive(Debug, Clone)]
pub struct Adjacency<'a> {
    pub version: u8,
    pub timer: u8,
    pub m: bool,
    pub code: Code,
    pub sender_name: [u8; 6],
    pub receiver_name: [u8; 6],
    pub sender_port: u32,
    pub receiver_port: u32,
    pub sender_instance: u32,
    pub receiver_instance: u32,
    pub capabilities: &'a [Capability],
}

impl Adjacency<'_> {
    pub fn encode(&self) -> Vec<u8> {
        let caps_len = 4 * self.capabilities.len();
        let mut b = vec![0u8; 4 + ADJACENCY_BODY + caps_len];
        BigEndian::write_u16(&mut b[0..], IDENT);
        BigEndian::write_u16(&mut b[2..], (ADJACENCY_BODY + caps_len) as u16);
        b[4] = self.version;
        b[5] = constant::ADJACENCY;
        b[6] = self.timer;
        b[7] = ((self.m as u8) << 7) | self.code as u8;
        b[8..14].copy_from_slice(&self.sender_name);
        b[14..20].copy_from_slice(&self.receiver_name);
        BigEndian::write_u32(&mut b[20..], self.sender_port);
        BigEndian::write_u32(&mut b[24..], self.receiver_port);
        // the high octet of the instance words is reserved
        BigEndian::write_u32(&mut b[28..], self.sender_instance & 0x00FF_FFFF);
        BigEndian::write_u32(&mut b[32..], self.receiver_instance & 0x00FF_FFFF);
        // b[36] partition id, always zero
        b[37] = self.capabilities.len() as u8;
        BigEndian::write_u16(&mut b[38..], caps_len as u16);
        let mut off = 40;
        for cap in self.capabilities {
            // 16 bit capability code, 16 bits of zero padding
            BigEndian::write_u16(&mut b[off..], *cap as u16);
            off += 4;
        }
        b
    }
}

/// Fields learned from a received adjacency PDU body.
#[derive(Debug, Clone, Copy)]
pub struct AdjacencyInfo {
    pub timer: u8,
    pub m: bool,
    pub code: u8,
    pub sender_name: [u8; 6],
    pub sender_instance: u32,
}

impl AdjacencyInfo {
    /// Parses the body of an adjacency frame, the octets after the
    /// common header.
    pub fn parse(body: &[u8]) -> Option<AdjacencyInfo> {
        if body.len() < ADJACENCY_BODY {
            return None;
        }
        let var = BigEndian::read_u16(&body[2..]);
        let mut sender_name = [0u8; 6];
        sender_name.copy_from_slice(&body[4..10]);
        Some(AdjacencyInfo {
            timer: (var >> 8) as u8,
            m: var & 0x80 != 0,
            code: (var & 0x7f) as u8,
            sender_name,
            sender_instance: BigEndian::read_u32(&body[24..]) & 0x00FF_FFFF,
        })
    }
}

/// A Port-Up or Port-Down PDU wrapping one subscriber's TLV tree.
#[derive(Debug, Clone)]
pub struct Port<'a> {
    pub version: u8,
    pub message_type: u8,
    pub tech_type: TechType,
    pub transaction_id: u32,
    pub num_tlvs: u16,
    pub tlvs: &'a [u8],
}

impl Port<'_> {
    pub fn encode(&self) -> Vec<u8> {
        // length covers everything after the length field
        let length = GENERAL_HEADER - 4 + PORT_BLOCK + self.tlvs.len();
        let mut b = vec![0u8; GENERAL_HEADER + PORT_BLOCK + self.tlvs.len()];
        BigEndian::write_u16(&mut b[0..], IDENT);
        BigEndian::write_u16(&mut b[2..], length as u16);
        b[4] = self.version;
        b[5] = self.message_type;
        BigEndian::write_u16(
            &mut b[6..],
            (u16::from(constant::RESULT_NACK) << 12) | constant::NO_RESULT,
        );
        BigEndian::write_u32(
            &mut b[8..],
            (PARTITION_ID << 24) | (self.transaction_id & 0x00FF_FFFF),
        );
        BigEndian::write_u16(&mut b[12..], SUB_IDENT);
        BigEndian::write_u16(&mut b[14..], length as u16);
        // 28-octet port block, the first 20 octets stay zero
        b[37] = self.message_type;
        b[38] = self.tech_type as u8;
        BigEndian::write_u16(&mut b[40..], self.num_tlvs);
        BigEndian::write_u16(&mut b[42..], self.tlvs.len() as u16);
        b[44..].copy_from_slice(self.tlvs);
        b
    }
}
