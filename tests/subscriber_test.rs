extern crate ancp;
use ancp::client::tomac;
use ancp::subscriber::{
    access_loop_enc, AaciBin, DataLink, Encap1, Encap2, PonType, Subscriber,
};
use ancp::tlv::{self, Value};
use byteorder::{BigEndian, ByteOrder};

#[test]
fn test_tomac() {
    assert_eq!(tomac(&[1, 2, 3, 4, 5, 6]), "01:02:03:04:05:06");
}

#[test]
fn test_access_loop_enc() {
    let enc = access_loop_enc(
        DataLink::Ethernet,
        Encap1::DoubleTaggedEthernet,
        Encap2::EoAal5Llc,
    );
    assert_eq!(enc.kind, tlv::ACC_LOOP_ENC);
    assert_eq!(enc.value, Value::Encap(16975360));
    assert_eq!(enc.len(), 3);
    assert_eq!(enc.padded_len(), 4);
}

#[test]
fn test_subscriber_aci() {
    let mut sub = Subscriber::new("0.0.0.0 eth 0");
    sub.up = 1024;
    sub.down = 20148;
    let (num_tlvs, tlvs) = sub.tlvs();
    assert_eq!(num_tlvs, 2);
    assert_eq!(BigEndian::read_u16(&tlvs[0..]), tlv::ACI);
    assert_eq!(BigEndian::read_u16(&tlvs[2..]), 13);
    assert_eq!(&tlvs[4..17], b"0.0.0.0 eth 0");
    // three padding octets up to the next boundary
    assert_eq!(&tlvs[17..20], &[0, 0, 0]);
    // the line attribute block starts on the boundary
    assert_eq!(BigEndian::read_u16(&tlvs[20..]), tlv::LINE);
}

#[test]
fn test_subscriber_dsl_line() {
    let mut sub = Subscriber::new("0.0.0.0 eth 0");
    sub.up = 1024;
    sub.down = 20148;
    let (_, tlvs) = sub.tlvs();
    // TYPE, STATE, UP, DOWN and the encapsulation, 8 octets each
    assert_eq!(BigEndian::read_u16(&tlvs[22..]), 40);
    assert_eq!(tlvs.len(), 20 + 4 + 40);
    let line = &tlvs[24..];
    assert_eq!(BigEndian::read_u16(&line[0..]), tlv::TYPE);
    assert_eq!(BigEndian::read_u32(&line[4..]), 0);
    assert_eq!(BigEndian::read_u16(&line[8..]), tlv::STATE);
    assert_eq!(BigEndian::read_u32(&line[12..]), 1); // showtime
    assert_eq!(BigEndian::read_u16(&line[16..]), tlv::UP);
    assert_eq!(BigEndian::read_u32(&line[20..]), 1024);
    assert_eq!(BigEndian::read_u16(&line[24..]), tlv::DOWN);
    assert_eq!(BigEndian::read_u32(&line[28..]), 20148);
    assert_eq!(BigEndian::read_u16(&line[32..]), tlv::ACC_LOOP_ENC);
    assert_eq!(BigEndian::read_u16(&line[34..]), 3);
    assert_eq!(BigEndian::read_u32(&line[36..]), 16975360);
}

#[test]
fn test_aaci_bin_single() {
    let mut sub = Subscriber::new("0.0.0.0 eth 0");
    sub.aaci_bin = Some(AaciBin::from(128));
    let (num_tlvs, tlvs) = sub.tlvs();
    assert_eq!(num_tlvs, 3);
    assert_eq!(BigEndian::read_u16(&tlvs[20..]), tlv::AACI_BIN);
    assert_eq!(BigEndian::read_u16(&tlvs[22..]), 4);
    assert_eq!(BigEndian::read_u32(&tlvs[24..]), 128);
    assert_eq!(BigEndian::read_u16(&tlvs[28..]), tlv::LINE);
}

#[test]
fn test_aaci_bin_sequence() {
    let mut sub = Subscriber::new("0.0.0.0 eth 0");
    sub.aaci_bin = Some(AaciBin::from(vec![128, 7]));
    let (num_tlvs, tlvs) = sub.tlvs();
    assert_eq!(num_tlvs, 3);
    assert_eq!(BigEndian::read_u16(&tlvs[20..]), tlv::AACI_BIN);
    assert_eq!(BigEndian::read_u16(&tlvs[22..]), 8);
    assert_eq!(BigEndian::read_u32(&tlvs[24..]), 128);
    assert_eq!(BigEndian::read_u32(&tlvs[28..]), 7);
    assert_eq!(BigEndian::read_u16(&tlvs[32..]), tlv::LINE);
}

#[test]
fn test_subscriber_ari_padding() {
    let mut sub = Subscriber::new("0.0.0.0 eth 0");
    sub.ari = Some("DEU.DTAG.0000000060".to_string());
    let (num_tlvs, tlvs) = sub.tlvs();
    assert_eq!(num_tlvs, 3);
    assert_eq!(BigEndian::read_u16(&tlvs[20..]), tlv::ARI);
    assert_eq!(BigEndian::read_u16(&tlvs[22..]), 19);
    assert_eq!(&tlvs[24..43], b"DEU.DTAG.0000000060");
    assert_eq!(tlvs[43], 0);
    // 4 + 20 padded octets to the next sibling
    assert_eq!(BigEndian::read_u16(&tlvs[44..]), tlv::LINE);
}

#[test]
fn test_subscriber_gfast() {
    let mut sub = Subscriber::new("0.0.0.0 eth 0");
    sub.expected_throughput_up = Some(100000);
    sub.expected_throughput_down = Some(200000);
    sub.gamma_data_rate_up = Some(90000);
    let (_, tlvs) = sub.tlvs();
    let line = &tlvs[24..];
    // after TYPE, STATE, UP and DOWN
    assert_eq!(BigEndian::read_u16(&line[32..]), tlv::EXP_THROUGHPUT_UP);
    assert_eq!(BigEndian::read_u32(&line[36..]), 100000);
    assert_eq!(BigEndian::read_u16(&line[40..]), tlv::EXP_THROUGHPUT_DOWN);
    assert_eq!(BigEndian::read_u32(&line[44..]), 200000);
    assert_eq!(BigEndian::read_u16(&line[48..]), tlv::GAMMA_DATA_RATE_UP);
    assert_eq!(BigEndian::read_u32(&line[52..]), 90000);
    assert_eq!(BigEndian::read_u16(&line[56..]), tlv::ACC_LOOP_ENC);
}

#[test]
fn test_subscriber_pon() {
    let mut sub = Subscriber::new("0.0.0.0 eth 0");
    sub.pon_type = Some(PonType::Gpon);
    sub.ont_onu_avg_down = Some(1000000);
    sub.ont_onu_peak_down = Some(1000000);
    sub.ont_onu_max_up = Some(1000000);
    sub.ont_onu_ass_up = Some(1000000);
    sub.pon_max_up = Some(1200000);
    sub.pon_max_down = Some(2400000);
    let (num_tlvs, tlvs) = sub.tlvs();
    assert_eq!(num_tlvs, 2);
    assert_eq!(BigEndian::read_u16(&tlvs[20..]), tlv::PON);
    // PON-TYPE, STATE and six rates, 8 octets each
    assert_eq!(BigEndian::read_u16(&tlvs[22..]), 64);
    assert_eq!(tlvs.len(), 20 + 4 + 64);
    let line = &tlvs[24..];
    assert_eq!(BigEndian::read_u16(&line[0..]), tlv::PON_TYPE);
    assert_eq!(BigEndian::read_u32(&line[4..]), 1);
    assert_eq!(BigEndian::read_u16(&line[8..]), tlv::STATE);
    let expected = [
        (tlv::ONT_ONU_AVG_DOWN, 1000000u32),
        (tlv::ONT_ONU_PEAK_DOWN, 1000000),
        (tlv::ONT_ONU_MAX_UP, 1000000),
        (tlv::ONT_ONU_ASS_UP, 1000000),
        (tlv::PON_MAX_UP, 1200000),
        (tlv::PON_MAX_DOWN, 2400000),
    ];
    for (i, (kind, val)) in expected.iter().enumerate() {
        let off = 16 + 8 * i;
        assert_eq!(BigEndian::read_u16(&line[off..]), *kind);
        assert_eq!(BigEndian::read_u16(&line[off + 2..]), 4);
        assert_eq!(BigEndian::read_u32(&line[off + 4..]), *val);
    }
}
