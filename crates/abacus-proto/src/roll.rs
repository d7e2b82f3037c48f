//! Positional rolls of the counting machine.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One of the four digit rolls, from least to most significant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Roll {
    Unit,
    Ten,
    Hundred,
    Thousand,
}

impl Roll {
    /// All rolls, most significant first (the order lock commands are sent in).
    pub const ALL: [Roll; 4] = [Roll::Thousand, Roll::Hundred, Roll::Ten, Roll::Unit];

    /// Name used in `Lock<Name>` runtime commands.
    pub fn wire_name(self) -> &'static str {
        match self {
            Roll::Unit => "Unit",
            Roll::Ten => "Ten",
            Roll::Hundred => "Hundred",
            Roll::Thousand => "Thousand",
        }
    }

    /// Place value of the roll (1, 10, 100 or 1000).
    pub fn magnitude(self) -> u16 {
        match self {
            Roll::Unit => 1,
            Roll::Ten => 10,
            Roll::Hundred => 100,
            Roll::Thousand => 1000,
        }
    }
}

impl std::fmt::Display for Roll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for Roll {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unit" | "units" | "1" => Ok(Roll::Unit),
            "ten" | "tens" | "10" => Ok(Roll::Ten),
            "hundred" | "hundreds" | "100" => Ok(Roll::Hundred),
            "thousand" | "thousands" | "1000" => Ok(Roll::Thousand),
            _ => Err(crate::Error::UnknownRoll(s.to_string())),
        }
    }
}
