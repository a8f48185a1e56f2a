// src/reader/options.rs
use crate::header::HeaderPolicy;

/// Settings applied when opening a capture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOptions {
    /// `BufReader` capacity used by [`CaptureSequence::open`](crate::CaptureSequence::open)
    pub buffer_capacity: usize,
    pub header_policy: HeaderPolicy,
}

impl Default for ReadOptions {
    fn default() -> Self {
        ReadOptions {
            buffer_capacity: Self::DEFAULT_BUFFER_CAPACITY,
            header_policy: HeaderPolicy::Strict,
        }
    }
}

impl ReadOptions {
    pub const DEFAULT_BUFFER_CAPACITY: usize = 8192;

    pub fn new() -> Self {
        Self::default()
    }

    /// Options that accept extended headers and padded records
    pub fn lenient() -> Self {
        Self::default().header_policy(HeaderPolicy::Lenient)
    }

    pub fn buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    pub fn header_policy(mut self, policy: HeaderPolicy) -> Self {
        self.header_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ReadOptions::default();
        assert_eq!(options.buffer_capacity, 8192);
        assert_eq!(options.header_policy, HeaderPolicy::Strict);
    }

    #[test]
    fn test_builder() {
        let options = ReadOptions::new().buffer_capacity(512);
        assert_eq!(options.buffer_capacity, 512);
        assert_eq!(ReadOptions::lenient().header_policy, HeaderPolicy::Lenient);
    }
}
