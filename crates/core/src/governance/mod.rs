//! Pre-flight governance for mutating calls

pub mod policy;

pub use policy::GovernancePolicy;
