//! Service layer for the accountability clock.
//! - `storage`: the key-value seam the persistent object writes through.
//! - `object`: the single global object holding the counter and demo items.
//! - `calculator`: the static calculator record and accrual arithmetic.

pub mod errors;
pub mod runtime;
pub mod storage;
pub mod object;
pub mod calculator;
#[cfg(test)]
pub mod test_support;
