// Copyright 2019 Petar Dambovaliev. All rights reserved.
// This software may be modified and distributed under the terms
// of the BSD license. See the LICENSE file for details.

//! TLV tree model and encoder for ANCP general messages
//!
//! Every TLV is a 4-octet header (16 bit type, 16 bit length) followed
//! by the payload, zero padded to the next 4-octet boundary. TLVs nest:
//! the DSL and PON line attribute blocks are composites whose payload
//! is a sequence of sub TLVs.

use super::wire::pad4;
use byteorder::{BigEndian, ByteOrder};

// TLV types (IANA ANCP registry)
pub const ACI: u16 = 0x0001;
pub const ARI: u16 = 0x0002;
pub const AACI_ASCII: u16 = 0x0003;
pub const LINE: u16 = 0x0004;
pub const AACI_BIN: u16 = 0x0006;
pub const PON: u16 = 0x0012;

// line attribute sub TLVs
pub const UP: u16 = 0x0081;
pub const DOWN: u16 = 0x0082;
pub const MIN_UP: u16 = 0x0083;
pub const MIN_DOWN: u16 = 0x0084;
pub const ATT_UP: u16 = 0x0085;
pub const ATT_DOWN: u16 = 0x0086;
pub const MAX_UP: u16 = 0x0087;
pub const MAX_DOWN: u16 = 0x0088;
pub const STATE: u16 = 0x008F;
pub const ACC_LOOP_ENC: u16 = 0x0090;
pub const TYPE: u16 = 0x0091;
pub const PON_TYPE: u16 = 0x0097;

// G.fast extensions
pub const EXP_THROUGHPUT_UP: u16 = 0x009B;
pub const EXP_THROUGHPUT_DOWN: u16 = 0x009C;
pub const ATT_EXP_THROUGHPUT_UP: u16 = 0x009D;
pub const ATT_EXP_THROUGHPUT_DOWN: u16 = 0x009E;
pub const GAMMA_DATA_RATE_UP: u16 = 0x009F;
pub const GAMMA_DATA_RATE_DOWN: u16 = 0x00A0;
pub const ATT_GAMMA_DATA_RATE_UP: u16 = 0x00A1;
pub const ATT_GAMMA_DATA_RATE_DOWN: u16 = 0x00A2;

// PON extensions
pub const ONT_ONU_AVG_DOWN: u16 = 0x00B0;
pub const ONT_ONU_PEAK_DOWN: u16 = 0x00B1;
pub const ONT_ONU_MAX_UP: u16 = 0x00B2;
pub const ONT_ONU_ASS_UP: u16 = 0x00B3;
pub const PON_MAX_UP: u16 = 0x00B4;
pub const PON_MAX_DOWN: u16 = 0x00B5;

/// TLV payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// a single 32 bit word
    Int(u32),
    /// an octet string, padded on the wire
    Bytes(Vec<u8>),
    /// sub TLVs of a composite
    Children(Vec<Tlv>),
    /// a sequence of 32 bit words (binary aggregation circuit id)
    U32Array(Vec<u32>),
    /// the packed access loop encapsulation word; the header
    /// advertises 3 octets, the low octet of the word is padding
    Encap(u32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tlv {
    pub kind: u16,
    pub value: Value,
}

impl Tlv {
    pub fn int(kind: u16, val: u32) -> Tlv {
        Tlv {
            kind,
            value: Value::Int(val),
        }
    }

    pub fn string(kind: u16, val: &str) -> Tlv {
        Tlv {
            kind,
            value: Value::Bytes(val.as_bytes().to_vec()),
        }
    }

    pub fn children(kind: u16, val: Vec<Tlv>) -> Tlv {
        Tlv {
            kind,
            value: Value::Children(val),
        }
    }

    /// Payload length on the wire, excluding padding.
    pub fn len(&self) -> usize {
        match &self.value {
            Value::Int(_) => 4,
            Value::Bytes(s) => s.len(),
            Value::Children(c) => c.iter().map(|t| 4 + t.len()).sum(),
            Value::U32Array(v) => 4 * v.len(),
            Value::Encap(_) => 3,
        }
    }

    /// Payload length including the trailing zero padding, so that the
    /// next sibling header always starts on a 4-octet boundary.
    pub fn padded_len(&self) -> usize {
        match &self.value {
            Value::Bytes(s) => pad4(s.len()),
            Value::Children(c) => c.iter().map(|t| 4 + t.padded_len()).sum(),
            Value::Encap(_) => 4,
            _ => self.len(),
        }
    }
}

/// Serializes a TLV list into one contiguous buffer.
pub fn encode(tlvs: &[Tlv]) -> Vec<u8> {
    let total: usize = tlvs.iter().map(|t| 4 + t.padded_len()).sum();
    let mut b = vec![0u8; total];
    let mut off = 0;
    for t in tlvs {
        off = write_tlv(&mut b, off, t);
    }
    b
}

fn write_tlv(b: &mut [u8], off: usize, t: &Tlv) -> usize {
    BigEndian::write_u16(&mut b[off..], t.kind);
    match &t.value {
        Value::Int(v) => {
            BigEndian::write_u16(&mut b[off + 2..], 4);
            BigEndian::write_u32(&mut b[off + 4..], *v);
        }
        Value::Bytes(s) => {
            BigEndian::write_u16(&mut b[off + 2..], s.len() as u16);
            b[off + 4..off + 4 + s.len()].copy_from_slice(s);
            // the buffer is zeroed, the padding octets are in place
        }
        Value::Children(children) => {
            // the header of a composite advertises the padded total
            BigEndian::write_u16(&mut b[off + 2..], t.padded_len() as u16);
            let mut p = off + 4;
            for child in children {
                p = write_tlv(b, p, child);
            }
        }
        Value::U32Array(vals) => {
            BigEndian::write_u16(&mut b[off + 2..], (4 * vals.len()) as u16);
            let mut p = off + 4;
            for v in vals {
                BigEndian::write_u32(&mut b[p..], *v);
                p += 4;
            }
        }
        Value::Encap(word) => {
            BigEndian::write_u16(&mut b[off + 2..], 3);
            BigEndian::write_u32(&mut b[off + 4..], *word);
        }
    }
    off + 4 + t.padded_len()
}
