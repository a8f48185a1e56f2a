// src/utils/io.rs
use std::io::{ErrorKind, Read};

/// Fill `buf` from `reader` until it is full or the stream ends.
///
/// Returns the number of bytes actually read; a short count means end of
/// stream, not an error.
pub fn read_up_to<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
