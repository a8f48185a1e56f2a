// src/utils/mod.rs
mod io;

pub(crate) use io::*;
