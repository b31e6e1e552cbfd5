//! Metric normalization: unit heuristics, fallback chains and the
//! canonicalizer that turns any supported payload shape into a
//! [`rtpm_core::CanonicalSample`].

pub mod canonical;
pub mod fallback;
pub mod units;

pub use canonical::Canonicalizer;
