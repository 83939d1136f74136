use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Returned when a string is not one of an enumeration's wire values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{value}` is not a valid {kind} (expected one of: {allowed})")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
    pub allowed: String,
}

/// Declares a closed enumeration that travels as a fixed set of strings,
/// both on the wire and in the store.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:literal) {
            $($variant:ident => $value:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $value)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $value,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)+
                    other => Err(ParseEnumError {
                        kind: $kind,
                        value: other.to_string(),
                        allowed: Self::ALL
                            .iter()
                            .map(|v| v.as_str())
                            .collect::<Vec<_>>()
                            .join(", "),
                    }),
                }
            }
        }
    };
}

string_enum! {
    /// Negative / sensor format shared by cameras and film stocks.
    Format ("format") {
        Mm35 => "35mm",
        Medium120 => "120",
        Large4x5 => "4x5",
        Large8x10 => "8x10",
        Other => "other",
    }
}

string_enum! {
    FilmType ("film type") {
        Color => "color",
        BlackWhite => "bw",
        Slide => "slide",
    }
}

string_enum! {
    /// Development process a chemical batch is mixed for.
    ChemicalType ("chemical type") {
        C41 => "C41",
        E6 => "E6",
        BlackWhite => "BW",
        Other => "Other",
    }
}

string_enum! {
    BatchStatus ("batch status") {
        InUse => "in-use",
        Exhausted => "exhausted",
        Archived => "archived",
    }
}

string_enum! {
    /// Where a roll is in the shoot → develop → scan workflow.
    RollStatus ("roll status") {
        Loaded => "loaded",
        Shot => "shot",
        Developed => "developed",
        Scanned => "scanned",
    }
}

impl Default for BatchStatus {
    fn default() -> Self {
        BatchStatus::InUse
    }
}

impl Default for RollStatus {
    fn default() -> Self {
        RollStatus::Loaded
    }
}
