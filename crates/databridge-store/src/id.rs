use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Integer identifier of a persisted document.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocId(i64);

impl DocId {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Debug for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DocId({})", self.0)
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for DocId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Parses an optionally signed decimal integer, ignoring surrounding whitespace.
impl FromStr for DocId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| StoreError::InvalidId(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decimal_with_whitespace() {
        assert_eq!(" 6001\n".parse::<DocId>().unwrap(), DocId::new(6001));
        assert_eq!("-12".parse::<DocId>().unwrap().get(), -12);
        assert_eq!("+7".parse::<DocId>().unwrap().get(), 7);
    }

    #[test]
    fn rejects_non_integers() {
        for bad in ["", "abc", "1.5", "0x1F", "99999999999999999999"] {
            assert!(matches!(bad.parse::<DocId>(), Err(StoreError::InvalidId(_))), "{bad}");
        }
    }

    #[test]
    fn display_is_the_plain_number() {
        let id = DocId::new(42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(format!("{id:?}"), "DocId(42)");
    }
}
