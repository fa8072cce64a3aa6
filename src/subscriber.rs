// Copyright 2019 Petar Dambovaliev. All rights reserved.
// This software may be modified and distributed under the terms
// of the BSD license. See the LICENSE file for details.

//! Subscriber access loops and their line attributes
//!
//! A [`Subscriber`] describes one access circuit. The circuit id is
//! mandatory, everything else is optional. Setting [`Subscriber::pon_type`]
//! selects the PON attribute block; otherwise the DSL block is built.
//!
//! # Examples
//!
//! ```
//! use ancp::subscriber::Subscriber;
//!
//! let mut sub = Subscriber::new("0.0.0.0 eth 1");
//! sub.up = 1024;
//! sub.down = 16000;
//! let (num_tlvs, encoded) = sub.tlvs();
//! assert_eq!(num_tlvs, 2);
//! assert_eq!(encoded.len() % 4, 0);
//! ```

use super::tlv::{self, Tlv, Value};

/// DSL line state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineState {
    Showtime = 1,
    Idle = 2,
    Silent = 3,
}

/// DSL transmission system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DslType {
    Other = 0,
    Adsl = 1,
    Adsl2 = 2,
    Adsl2Plus = 3,
    Vdsl1 = 4,
    Vdsl2 = 5,
    Sdsl = 6,
}

/// PON access type from the access extension draft
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PonType {
    Gpon = 1,
    XgPon1 = 2,
    TwdmPon = 3,
    XgsPon = 4,
    WdmPon = 5,
    Other = 7,
}

/// Data link of the access loop encapsulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataLink {
    AtmAal5 = 0,
    Ethernet = 1,
}

/// First encapsulation octet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encap1 {
    Na = 0,
    UntaggedEthernet = 1,
    SingleTaggedEthernet = 2,
    DoubleTaggedEthernet = 3,
}

/// Second encapsulation octet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encap2 {
    PppoaLlc = 1,
    PppoaNull = 2,
    IpoaLlc = 3,
    IpoaNull = 4,
    EoAal5LlcFcs = 5,
    EoAal5Llc = 6,
    EoAal5NullFcs = 7,
    EoAal5Null = 8,
}

/// Binary aggregation circuit id, either a single 32 bit word or a
/// sequence of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AaciBin {
    One(u32),
    Many(Vec<u32>),
}

impl From<u32> for AaciBin {
    fn from(v: u32) -> Self {
        AaciBin::One(v)
    }
}

impl From<Vec<u32>> for AaciBin {
    fn from(v: Vec<u32>) -> Self {
        AaciBin::Many(v)
    }
}

/// Builds the access loop encapsulation TLV.
///
/// The three octets are packed into the high bits of one 32 bit word;
/// the advertised length stays 3 and the low octet is padding.
pub fn access_loop_enc(data_link: DataLink, encap1: Encap1, encap2: Encap2) -> Tlv {
    let word = (data_link as u32) << 24 | (encap1 as u32) << 16 | (encap2 as u32) << 8;
    Tlv {
        kind: tlv::ACC_LOOP_ENC,
        value: Value::Encap(word),
    }
}

/// One subscriber access circuit with its line attributes.
///
/// Immutable once handed to the client; [`Subscriber::tlvs`] projects a
/// fresh TLV tree on every call.
#[derive(Debug, Clone)]
pub struct Subscriber {
    /// access loop circuit id
    pub aci: String,
    /// access loop remote id
    pub ari: Option<String>,
    pub aaci_ascii: Option<String>,
    pub aaci_bin: Option<AaciBin>,
    pub state: LineState,
    // DSL attributes
    pub dsl_type: DslType,
    /// actual upstream rate in kbit/s
    pub up: u32,
    /// actual downstream rate in kbit/s
    pub down: u32,
    pub min_up: Option<u32>,
    pub min_down: Option<u32>,
    pub att_up: Option<u32>,
    pub att_down: Option<u32>,
    pub max_up: Option<u32>,
    pub max_down: Option<u32>,
    // G.fast attributes
    pub expected_throughput_up: Option<u32>,
    pub expected_throughput_down: Option<u32>,
    pub attainable_expected_throughput_up: Option<u32>,
    pub attainable_expected_throughput_down: Option<u32>,
    pub gamma_data_rate_up: Option<u32>,
    pub gamma_data_rate_down: Option<u32>,
    pub attainable_gamma_data_rate_up: Option<u32>,
    pub attainable_gamma_data_rate_down: Option<u32>,
    pub data_link: DataLink,
    pub encap1: Encap1,
    pub encap2: Encap2,
    // PON attributes, pon_type selects the PON block
    pub pon_type: Option<PonType>,
    pub ont_onu_avg_down: Option<u32>,
    pub ont_onu_peak_down: Option<u32>,
    pub ont_onu_max_up: Option<u32>,
    pub ont_onu_ass_up: Option<u32>,
    pub pon_max_up: Option<u32>,
    pub pon_max_down: Option<u32>,
}

impl Subscriber {
    pub fn new(aci: &str) -> Subscriber {
        Subscriber {
            aci: aci.to_string(),
            ari: None,
            aaci_ascii: None,
            aaci_bin: None,
            state: LineState::Showtime,
            dsl_type: DslType::Other,
            up: 0,
            down: 0,
            min_up: None,
            min_down: None,
            att_up: None,
            att_down: None,
            max_up: None,
            max_down: None,
            expected_throughput_up: None,
            expected_throughput_down: None,
            attainable_expected_throughput_up: None,
            attainable_expected_throughput_down: None,
            gamma_data_rate_up: None,
            gamma_data_rate_down: None,
            attainable_gamma_data_rate_up: None,
            attainable_gamma_data_rate_down: None,
            data_link: DataLink::Ethernet,
            encap1: Encap1::DoubleTaggedEthernet,
            encap2: Encap2::EoAal5Llc,
            pon_type: None,
            ont_onu_avg_down: None,
            ont_onu_peak_down: None,
            ont_onu_max_up: None,
            ont_onu_ass_up: None,
            pon_max_up: None,
            pon_max_down: None,
        }
    }

    /// Projects the subscriber to its TLV tree and returns the number
    /// of top level TLVs together with the encoded bytes.
    pub fn tlvs(&self) -> (u16, Vec<u8>) {
        let mut tlvs = vec![Tlv::string(tlv::ACI, &self.aci)];
        if let Some(ari) = &self.ari {
            tlvs.push(Tlv::string(tlv::ARI, ari));
        }
        if let Some(aaci) = &self.aaci_bin {
            let value = match aaci {
                AaciBin::One(v) => Value::Int(*v),
                AaciBin::Many(vals) => Value::U32Array(vals.clone()),
            };
            tlvs.push(Tlv {
                kind: tlv::AACI_BIN,
                value,
            });
        }
        if let Some(aaci) = &self.aaci_ascii {
            tlvs.push(Tlv::string(tlv::AACI_ASCII, aaci));
        }
        if let Some(pon_type) = self.pon_type {
            tlvs.push(Tlv::children(tlv::PON, self.pon_line(pon_type)));
        } else {
            tlvs.push(Tlv::children(tlv::LINE, self.dsl_line()));
        }
        let num = tlvs.len() as u16;
        (num, tlv::encode(&tlvs))
    }

    fn dsl_line(&self) -> Vec<Tlv> {
        let mut line = vec![
            Tlv::int(tlv::TYPE, self.dsl_type as u32),
            Tlv::int(tlv::STATE, self.state as u32),
            Tlv::int(tlv::UP, self.up),
            Tlv::int(tlv::DOWN, self.down),
        ];
        if let Some(v) = self.min_up {
            line.push(Tlv::int(tlv::MIN_UP, v));
        }
        if let Some(v) = self.min_down {
            line.push(Tlv::int(tlv::MIN_DOWN, v));
        }
        if let Some(v) = self.att_up {
            line.push(Tlv::int(tlv::ATT_UP, v));
        }
        if let Some(v) = self.att_down {
            line.push(Tlv::int(tlv::ATT_DOWN, v));
        }
        if let Some(v) = self.max_up {
            line.push(Tlv::int(tlv::MAX_UP, v));
        }
        if let Some(v) = self.max_down {
            line.push(Tlv::int(tlv::MAX_DOWN, v));
        }
        if let Some(v) = self.expected_throughput_up {
            line.push(Tlv::int(tlv::EXP_THROUGHPUT_UP, v));
        }
        if let Some(v) = self.expected_throughput_down {
            line.push(Tlv::int(tlv::EXP_THROUGHPUT_DOWN, v));
        }
        if let Some(v) = self.attainable_expected_throughput_up {
            line.push(Tlv::int(tlv::ATT_EXP_THROUGHPUT_UP, v));
        }
        if let Some(v) = self.attainable_expected_throughput_down {
            line.push(Tlv::int(tlv::ATT_EXP_THROUGHPUT_DOWN, v));
        }
        if let Some(v) = self.gamma_data_rate_up {
            line.push(Tlv::int(tlv::GAMMA_DATA_RATE_UP, v));
        }
        if let Some(v) = self.gamma_data_rate_down {
            line.push(Tlv::int(tlv::GAMMA_DATA_RATE_DOWN, v));
        }
        if let Some(v) = self.attainable_gamma_data_rate_up {
            line.push(Tlv::int(tlv::ATT_GAMMA_DATA_RATE_UP, v));
        }
        if let Some(v) = self.attainable_gamma_data_rate_down {
            line.push(Tlv::int(tlv::ATT_GAMMA_DATA_RATE_DOWN, v));
        }
        line.push(access_loop_enc(self.data_link, self.encap1, self.encap2));
        line
    }

    fn pon_line(&self, pon_type: PonType) -> Vec<Tlv> {
        let mut line = vec![
            Tlv::int(tlv::PON_TYPE, pon_type as u32),
            Tlv::int(tlv::STATE, self.state as u32),
        ];
        if let Some(v) = self.ont_onu_avg_down {
            line.push(Tlv::int(tlv::ONT_ONU_AVG_DOWN, v));
        }
        if let Some(v) = self.ont_onu_peak_down {
            line.push(Tlv::int(tlv::ONT_ONU_PEAK_DOWN, v));
        }
        if let Some(v) = self.ont_onu_max_up {
            line.push(Tlv::int(tlv::ONT_ONU_MAX_UP, v));
        }
        if let Some(v) = self.ont_onu_ass_up {
            line.push(Tlv::int(tlv::ONT_ONU_ASS_UP, v));
        }
        if let Some(v) = self.pon_max_up {
            line.push(Tlv::int(tlv::PON_MAX_UP, v));
        }
        if let Some(v) = self.pon_max_down {
            line.push(Tlv::int(tlv::PON_MAX_DOWN, v));
        }
        line
    }
}
