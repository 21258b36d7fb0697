//! Version identifiers, their ordering, and sources of the current version.
//!
//! A version identifier is a dotted list of non-negative integers. Ordering
//! is numeric per component with missing trailing components read as zero,
//! so `1.9 < 1.10` and `1.4 == 1.4.0`. Anything else is rejected with
//! `ErrorKind::InvalidVersionFormat`; there is no lexicographic fallback.

mod comparator;
mod provider;
mod version;

pub use comparator::*;
pub use provider::*;
pub use version::Version;
