// src/writer/mod.rs
mod capture_writer;

pub use capture_writer::{CaptureInfo, CaptureWriter};
