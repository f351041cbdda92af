use anyhow::Error;
use std::{
    fmt::{Display, Formatter, Result},
    str::FromStr,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Fork {
    Ontake,
    Pacaya,
    Shasta,
    Unzen,
}

impl Fork {
    pub fn next(&self) -> Option<Self> {
        match self {
            Fork::Ontake => Some(Fork::Pacaya),
            Fork::Pacaya => Some(Fork::Shasta),
            Fork::Shasta => Some(Fork::Unzen),
            Fork::Unzen => None,
        }
    }
}

impl Display for Fork {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{:?}", self)
    }
}

impl FromStr for Fork {
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ontake" => Ok(Fork::Ontake),
            "pacaya" => Ok(Fork::Pacaya),
            "shasta" => Ok(Fork::Shasta),
            "unzen" => Ok(Fork::Unzen),
            _ => Err(Error::msg(format!("Invalid fork: {}", s))),
        }
    }
}
