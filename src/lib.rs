// Copyright 2019 Petar Dambovaliev. All rights reserved.
// This software may be modified and distributed under the terms
// of the BSD license. See the LICENSE file for details.

//! This crate implements the access node side of the Access Node
//! Control Protocol (ANCP, RFC 6320) with the PON and G.fast access
//! extensions. It establishes and maintains an adjacency with a NAS
//! and announces subscriber access loops with Port-Up and Port-Down
//! messages.
//! # Examples
//! ```no_run
//! # extern crate ancp;
//! # use ancp::client::{Client, Options};
//! # use ancp::constant::TechType;
//! # use ancp::subscriber::Subscriber;
//! # use std::net::{IpAddr, Ipv4Addr};
//!
//! # fn main() {
//!     let opts = Options::new(IpAddr::from(Ipv4Addr::new(172, 30, 138, 10)), TechType::Dsl);
//!     let mut client = Client::new(opts);
//!     if let Err(e) = client.connect() {
//!         println!("{}", e.to_string());
//!         return;
//!     }
//!
//!     let mut sub = Subscriber::new("0.0.0.0 eth 1");
//!     sub.up = 1024;
//!     sub.down = 16000;
//!
//!     match client.port_up(&[sub]) {
//!         Ok(()) => {}
//!         Err(e) => println!("{}", e.to_string()),
//!     }
//!     let _ = client.disconnect(false);
//! # }
//! ```
pub mod client;
pub mod constant;
pub mod error;
pub mod packet;
pub mod subscriber;
pub mod tlv;
mod wire;
