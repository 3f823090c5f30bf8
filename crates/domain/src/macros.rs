//! Macro for implementing Display and FromStr for domain enums
//!
//! Durability tiers, risk levels, settings classes and the other small
//! enums in this crate round-trip through config files, environment
//! variables and storage keys as lowercase strings. This macro keeps the two
//! directions of that mapping in one place.
//!
//! # Example
//!
//! ```rust
//! use workbase_domain::impl_domain_enum_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Tier {
//!     Ephemeral,
//!     Persistent,
//! }
//!
//! impl_domain_enum_conversions!(Tier {
//!     Ephemeral => "ephemeral",
//!     Persistent => "persistent",
//! });
//! ```

/// Implements Display and FromStr traits for domain enums
///
/// This macro generates:
/// - Display trait: converts enum variants to their lowercase strings
/// - FromStr trait: parses case-insensitive, trimmed strings to variants
#[macro_export]
macro_rules! impl_domain_enum_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => ::std::result::Result::Ok(Self::$variant),)+
                    _ => ::std::result::Result::Err(::std::format!(
                        "Invalid {}: {}",
                        ::std::stringify!($enum_name),
                        s
                    )),
                }
            }
        }
    };
}
