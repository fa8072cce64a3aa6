// Copyright 2019 Petar Dambovaliev. All rights reserved.
// This software may be modified and distributed under the terms
// of the BSD license. See the LICENSE file for details.

use std::error;
use std::fmt;
use std::io::{Error as IOError, ErrorKind};

#[derive(Debug)]
pub enum Error {
    /// the stream socket could not be created, bound or connected
    Connect(String),
    /// the transmit mutex was poisoned
    Lock,
    IOError(ErrorKind),
    /// a received frame violated the wire format
    Frame { reason: String },
    /// the peer sent an adjacency message with the M bit cleared;
    /// the NAS side of the handshake must set it
    Role,
    /// a port message was submitted before the adjacency came up
    NotEstablished,
    /// a port message was submitted with no subscribers
    NoSubscribers,
    /// the adjacency did not come up within the connect deadline
    AdjacencyTimeout,
    /// the receive thread exited before the adjacency came up
    ReaderDead,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Connect(s) => write!(f, "connection error: {}", s),
            Error::Lock => write!(f, "Lock error: panicked"),
            Error::IOError(kind) => write!(f, "IO error: {:?}", kind),
            Error::Frame { reason } => write!(f, "framing error: {}", reason),
            Error::Role => write!(f, "adjacency message with M=0 received from peer"),
            Error::NotEstablished => write!(f, "adjacency not established"),
            Error::NoSubscribers => write!(f, "no subscribers given"),
            Error::AdjacencyTimeout => write!(f, "timed out waiting for adjacency"),
            Error::ReaderDead => write!(f, "receive thread exited"),
        }
    }
}

impl From<IOError> for Error {
    fn from(e: IOError) -> Self {
        Error::IOError(e.kind())
    }
}

// This is important for other errors to wrap this one.
impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        None
    }
}
