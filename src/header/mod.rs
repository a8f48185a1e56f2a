// src/header/mod.rs
//! EZView2 file preamble
//!
//! A capture starts with a 32-byte magic tag followed by a fixed structure:
//!
//! | offset | size | field |
//! |---|---|---|
//! | 0 | 32 | `"EZView2"` + 25 zero bytes |
//! | 32 | 4 | header size (bytes after the magic, normally 36) |
//! | 36 | 4 | header version |
//! | 40 | 4 | device type |
//! | 44 | 4 | record count |
//! | 48 | 4 | record size (normally 8) |
//! | 52 | 8 | capture start (FILETIME) |
//! | 60 | 8 | first record time (FILETIME) |
//!
//! All integers are little-endian. Records start at `32 + header size`.

mod capture_header;

pub use capture_header::{read_header, CaptureHeader, HeaderPolicy};
