//! Error types.

use thiserror::Error;

/// Errors raised while growing or writing into a [`HashTable`](crate::HashTable).
///
/// Neither variant is expected in practice: the table doubles its capacity before the load
/// factor could leave it without a free slot, so both indicate that the growth policy was
/// bypassed or that the address space is exhausted.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum Error {
    /// The probe sequence wrapped around every slot without finding a vacant one.
    #[error("no vacant slot found after probing all {capacity} slots")]
    CapacityExhausted {
        /// Number of slots probed.
        capacity: usize,
    },

    /// The capacity cannot be doubled any further.
    #[error("capacity cannot grow beyond {capacity} slots")]
    CapacityOverflow {
        /// Capacity at the time growth was attempted.
        capacity: usize,
    },
}
