use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Reference to a record given on the command line, either its numeric ID or
/// its label (name, file name or email depending on the resource).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdOrLabel {
    Id(i64),
    Label(String),
}

impl IdOrLabel {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(id) = raw.parse() {
                return IdOrLabel::Id(id);
            }
        }
        IdOrLabel::Label(raw.to_string())
    }

    pub fn id(&self) -> Option<i64> {
        match self {
            IdOrLabel::Id(id) => Some(*id),
            IdOrLabel::Label(_) => None,
        }
    }
}

impl FromStr for IdOrLabel {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<i64> for IdOrLabel {
    fn from(id: i64) -> Self {
        IdOrLabel::Id(id)
    }
}

impl From<&str> for IdOrLabel {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl fmt::Display for IdOrLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdOrLabel::Id(id) => write!(f, "{}", id),
            IdOrLabel::Label(label) => f.write_str(label),
        }
    }
}
