//! Macro for giving small domain enums a stable wire name
//!
//! Enums such as [`SessionSource`](crate::SessionSource) are persisted and
//! typed on the command line using the same strings. The macro keeps the
//! `as_str`, `Display` and `FromStr` renderings in one table.
//!
//! # Example
//!
//! ```rust
//! use lapse_domain::impl_wire_names;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Range {
//!     Day,
//!     Week,
//! }
//!
//! impl_wire_names!(Range {
//!     Day => "day",
//!     Week => "week",
//! });
//!
//! assert_eq!(Range::Week.as_str(), "week");
//! assert_eq!(" DAY ".parse::<Range>(), Ok(Range::Day));
//! ```

/// Implements `as_str`, `Display` and case-insensitive `FromStr` for an enum
///
/// Parsing trims surrounding whitespace and compares against the lowercase
/// form of each wire name, so wire names should be written in lowercase.
#[macro_export]
macro_rules! impl_wire_names {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Stable wire name of this variant
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                let needle = s.trim().to_lowercase();
                $(
                    if needle == $str {
                        return ::core::result::Result::Ok(Self::$variant);
                    }
                )+
                ::core::result::Result::Err(format!("Invalid {}: {}", stringify!($enum_name), s))
            }
        }
    };
}
