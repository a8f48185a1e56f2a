// src/reader/packets.rs
use crate::error::{EzViewError, Result};
use crate::reader::sequence::{CaptureSequence, ReadSeek};
use crate::record::DataPacket;
use std::iter::FusedIterator;

/// Record positions selected by a `start:stop:step` slice.
///
/// Bounds follow standard sequence slicing: negative values count from
/// the end, out-of-range bounds are clamped and an empty selection is not
/// an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceIndices {
    start: i64,
    step: i64,
    len: u64,
}

impl SliceIndices {
    /// Every position of a sequence of `length` records, in order
    pub fn full(length: u64) -> Self {
        SliceIndices {
            start: 0,
            step: 1,
            len: length,
        }
    }

    pub fn resolve(
        length: u64,
        start: Option<i64>,
        stop: Option<i64>,
        step: Option<i64>,
    ) -> Result<Self> {
        let step = step.unwrap_or(1);
        if step == 0 {
            return Err(EzViewError::ZeroSliceStep);
        }

        let n = length as i64;
        let (lower, upper) = if step < 0 { (-1, n - 1) } else { (0, n) };
        let clamp = |bound: i64| {
            if bound < 0 {
                bound.saturating_add(n).max(lower)
            } else {
                bound.min(upper)
            }
        };

        let start = start.map_or(if step < 0 { upper } else { lower }, clamp);
        let stop = stop.map_or(if step < 0 { lower } else { upper }, clamp);

        let stride = step.unsigned_abs();
        let len = if step > 0 && start < stop {
            (stop - start - 1) as u64 / stride + 1
        } else if step < 0 && stop < start {
            (start - stop - 1) as u64 / stride + 1
        } else {
            0
        };

        Ok(SliceIndices { start, step, len })
    }

    /// Number of selected positions
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn step(&self) -> i64 {
        self.step
    }

    /// Record position of the `i`-th selected element; `i` must be below `len()`
    pub fn position(&self, i: u64) -> u64 {
        (self.start + i as i64 * self.step) as u64
    }

    pub fn positions(&self) -> impl Iterator<Item = u64> + '_ {
        (0..self.len).map(move |i| self.position(i))
    }
}

/// Lazy view over selected packets of a [`CaptureSequence`].
///
/// Nothing is read until an element is requested; every element costs one
/// seek and one record read. Iteration stops after the first error.
pub struct Packets<'a, R: ReadSeek> {
    sequence: &'a mut CaptureSequence<R>,
    indices: SliceIndices,
    front: u64,
    back: u64,
}

impl<'a, R: ReadSeek> Packets<'a, R> {
    pub(crate) fn new(sequence: &'a mut CaptureSequence<R>, indices: SliceIndices) -> Self {
        Packets {
            sequence,
            back: indices.len(),
            indices,
            front: 0,
        }
    }

    /// Number of packets in the whole view, consumed or not
    pub fn total_len(&self) -> u64 {
        self.indices.len()
    }

    pub fn indices(&self) -> &SliceIndices {
        &self.indices
    }

    /// Packet at `index` within this view (negative counts from the end)
    pub fn get(&mut self, index: i64) -> Result<DataPacket> {
        let len = self.indices.len();
        let position = normalize_index(index, len)?;
        self.sequence.read_record(self.indices.position(position))
    }

    /// Start iteration over from the first element
    pub fn rewind(&mut self) {
        self.front = 0;
        self.back = self.indices.len();
    }

    fn read_at(&mut self, i: u64) -> Option<Result<DataPacket>> {
        match self.sequence.read_record(self.indices.position(i)) {
            Ok(packet) => Some(Ok(packet)),
            Err(e) => {
                self.front = self.back;
                Some(Err(e))
            }
        }
    }
}

impl<R: ReadSeek> Iterator for Packets<'_, R> {
    type Item = Result<DataPacket>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        let i = self.front;
        self.front += 1;
        self.read_at(i)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.back - self.front) as usize;
        (remaining, Some(remaining))
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.front = self.front.saturating_add(n as u64).min(self.back);
        self.next()
    }
}

impl<R: ReadSeek> DoubleEndedIterator for Packets<'_, R> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        let i = self.back;
        self.read_at(i)
    }
}

impl<R: ReadSeek> ExactSizeIterator for Packets<'_, R> {}

impl<R: ReadSeek> FusedIterator for Packets<'_, R> {}

/// Map a possibly negative index onto `0..len`
pub(crate) fn normalize_index(index: i64, len: u64) -> Result<u64> {
    let signed_len = len as i64;
    let position = if index < 0 { index + signed_len } else { index };
    if position < 0 || position >= signed_len {
        return Err(EzViewError::IndexOutOfRange { index, len });
    }
    Ok(position as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(length: u64, start: Option<i64>, stop: Option<i64>, step: Option<i64>) -> Vec<u64> {
        SliceIndices::resolve(length, start, stop, step)
            .unwrap()
            .positions()
            .collect()
    }

    #[test]
    fn test_default_slice_is_everything() {
        assert_eq!(positions(5, None, None, None), vec![0, 1, 2, 3, 4]);
        assert_eq!(SliceIndices::resolve(5, None, None, None).unwrap(), SliceIndices::full(5));
    }

    #[test]
    fn test_stepped_slices() {
        assert_eq!(positions(12, Some(0), Some(12), Some(3)), vec![0, 3, 6, 9]);
        assert_eq!(positions(10, Some(1), None, Some(4)), vec![1, 5, 9]);
        assert_eq!(positions(2, Some(0), Some(0), None), Vec::<u64>::new());
        assert_eq!(positions(2, Some(0), Some(1), None), vec![0]);
    }

    #[test]
    fn test_negative_bounds_and_steps() {
        assert_eq!(positions(5, None, None, Some(-1)), vec![4, 3, 2, 1, 0]);
        assert_eq!(positions(5, Some(-2), None, None), vec![3, 4]);
        assert_eq!(positions(5, None, Some(-2), None), vec![0, 1, 2]);
        assert_eq!(positions(10, Some(8), Some(1), Some(-3)), vec![8, 5, 2]);
        assert_eq!(positions(5, Some(-1), Some(-6), Some(-2)), vec![4, 2, 0]);
    }

    #[test]
    fn test_out_of_range_bounds_are_clamped() {
        assert_eq!(positions(3, Some(-100), Some(100), None), vec![0, 1, 2]);
        assert_eq!(positions(3, Some(100), None, None), Vec::<u64>::new());
        assert_eq!(positions(3, Some(100), Some(-100), Some(-1)), vec![2, 1, 0]);
        assert_eq!(positions(3, Some(i64::MIN), Some(i64::MAX), Some(i64::MAX)), vec![0]);
        assert_eq!(positions(3, None, None, Some(i64::MIN)), vec![2]);
        assert_eq!(positions(0, None, None, Some(-1)), Vec::<u64>::new());
    }

    #[test]
    fn test_zero_step() {
        assert!(matches!(
            SliceIndices::resolve(3, None, None, Some(0)),
            Err(EzViewError::ZeroSliceStep)
        ));
    }

    #[test]
    fn test_normalize_index() {
        assert_eq!(normalize_index(0, 3).unwrap(), 0);
        assert_eq!(normalize_index(-1, 3).unwrap(), 2);
        assert_eq!(normalize_index(-3, 3).unwrap(), 0);
        assert!(matches!(
            normalize_index(3, 3),
            Err(EzViewError::IndexOutOfRange { index: 3, len: 3 })
        ));
        assert!(normalize_index(-4, 3).is_err());
        assert!(normalize_index(0, 0).is_err());
    }
}
