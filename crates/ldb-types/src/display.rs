use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Heads-up display slot an objective can be bound to.
///
/// At most one objective is bound to a slot at any time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplaySlot {
    #[default]
    Sidebar,
    List,
    BelowName,
}

impl DisplaySlot {
    pub const ALL: [DisplaySlot; 3] = [Self::Sidebar, Self::List, Self::BelowName];

    /// Name the host store uses for this slot.
    pub fn host_name(&self) -> &'static str {
        match self {
            Self::Sidebar => "Sidebar",
            Self::List => "List",
            Self::BelowName => "BelowName",
        }
    }
}

impl fmt::Display for DisplaySlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.host_name())
    }
}

impl FromStr for DisplaySlot {
    type Err = TypeError;

    /// Accepts both host names (`BelowName`) and snake case (`below_name`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "sidebar" => Ok(Self::Sidebar),
            "list" => Ok(Self::List),
            "belowname" => Ok(Self::BelowName),
            _ => Err(TypeError::UnknownDisplaySlot(s.to_string())),
        }
    }
}
