//! Type-safe identifier wrappers around the integer keys of the reference
//! dataset.
//!
//! Places and regions are keyed by the integer primary keys of the source
//! tables. Wrapping them prevents a region id from being handed to a
//! place lookup at compile time.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Generates a newtype wrapper around [`i64`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub i64);

        impl $name {
            /// Wrap a raw integer key.
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Return the inner integer value.
            pub const fn into_inner(self) -> i64 {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl FromStr for $name {
            type Err = core::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<i64>().map(Self)
            }
        }
    };
}

define_id! {
    /// Unique identifier for a place of interest.
    PlaceId
}

define_id! {
    /// Unique identifier for a region in the administrative hierarchy.
    RegionId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_parse_with_whitespace() {
        let id: Result<RegionId, _> = " 167330 ".parse();
        assert_eq!(id.ok(), Some(RegionId(167_330)));
    }

    #[test]
    fn ids_reject_garbage() {
        assert!("abc".parse::<PlaceId>().is_err());
        assert!("".parse::<RegionId>().is_err());
    }

    #[test]
    fn ids_serialize_as_bare_integers() {
        let json = serde_json::to_string(&PlaceId::new(17_576_066)).unwrap_or_default();
        assert_eq!(json, "17576066");
    }

    #[test]
    fn ids_order_numerically() {
        assert!(PlaceId(9) < PlaceId(10));
        assert_eq!(i64::from(RegionId(4)), 4);
    }
}
