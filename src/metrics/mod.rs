//! Prometheus metrics for the Connect resource reconciler
//!
//! Counters are labelled by resource kind and operation; the embedding process decides
//! how to expose them.

mod prometheus;

pub use self::prometheus::*;
