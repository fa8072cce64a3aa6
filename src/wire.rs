// Copyright 2019 Petar Dambovaliev. All rights reserved.
// This software may be modified and distributed under the terms
// of the BSD license. See the LICENSE file for details.

//! Octet buffer helpers shared by the codecs and the receive loop

use std::io::{Error as IOError, ErrorKind, Read};

/// Rounds a payload length up to the next 4-octet boundary.
pub(crate) fn pad4(len: usize) -> usize {
    (len + 3) & !3
}

/// Reads exactly `buf.len()` octets from the stream.
///
/// Returns the number of octets actually read: `buf.len()` on success,
/// less when the peer closed the stream mid way and 0 when it closed
/// before the first octet. A socket read timeout surfaces as an error,
/// see [`is_timeout`].
pub(crate) fn read_full<R: Read>(stream: &mut R, buf: &mut [u8]) -> Result<usize, IOError> {
    let mut read = 0;
    while read < buf.len() {
        let n = stream.read(&mut buf[read..])?;
        if n == 0 {
            return Ok(read);
        }
        read += n;
    }
    Ok(read)
}

/// A blocking read that hit the socket read timeout.
///
/// Unix reports `WouldBlock`, Windows `TimedOut`.
pub(crate) fn is_timeout(e: &IOError) -> bool {
    matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut)
}
