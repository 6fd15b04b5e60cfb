/// Forces a raw hash value to be non-negative.
///
/// The hash is reinterpreted as a signed 64-bit integer and its magnitude is taken.
/// `i64::MIN` has no positive counterpart in `i64`, so its magnitude `2^63` is returned as
/// an unsigned value instead of wrapping back to a negative number.
#[inline]
#[allow(clippy::cast_possible_wrap)]
pub(crate) const fn fold_hash(raw: u64) -> u64 {
    (raw as i64).unsigned_abs()
}

/// Returns the index the probe sequence of `hash` starts from.
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub(crate) const fn start_index(hash: u64, capacity: usize) -> usize {
    // The remainder is smaller than `capacity` and thus fits in `usize`.
    (hash % capacity as u64) as usize
}

/// Linear probe sequence over a slot array.
///
/// Yields `start, start + 1, ..` wrapping at `capacity`, and ends right before returning to
/// `start`; each slot is therefore visited exactly once.
#[derive(Clone, Debug)]
pub(crate) struct ProbeSeq {
    capacity: usize,
    current: usize,
    remaining: usize,
}

impl ProbeSeq {
    /// Creates a new [`ProbeSeq`] for the given folded hash.
    ///
    /// `capacity` must not be zero.
    #[inline]
    pub(crate) const fn new(hash: u64, capacity: usize) -> Self {
        debug_assert!(capacity != 0);
        Self {
            capacity,
            current: start_index(hash, capacity),
            remaining: capacity,
        }
    }
}

impl Iterator for ProbeSeq {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let index = self.current;
        self.current += 1;
        if self.current == self.capacity {
            self.current = 0;
        }
        Some(index)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for ProbeSeq {}
