//! The `kind{key:val}` identifier codec.
//!
//! Every item is stored under one identifier per index pair it declares, and
//! the same identifiers are used as tags. Producing and consuming sides must
//! agree on this exact grammar:
//!
//! ```text
//! <kind>{<key>:<val>}
//! ```
//!
//! No escaping is performed. A kind containing `{`, or a key containing `:`,
//! moves the split points and does not survive a round-trip; values may
//! contain `:` and `{` but not a trailing `}`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

const CURLY_START: char = '{';
const CURLY_END: char = '}';
const COLON: char = ':';

/// Encode a `(kind, key, val)` triple into an identifier.
///
/// # Examples
///
/// ```
/// use tagdb_types::encode;
///
/// assert_eq!(encode("foo", "id", "1"), "foo{id:1}");
/// ```
pub fn encode(kind: &str, key: &str, val: &str) -> String {
    let mut out = String::with_capacity(kind.len() + key.len() + val.len() + 3);
    out.push_str(kind);
    out.push(CURLY_START);
    out.push_str(key);
    out.push(COLON);
    out.push_str(val);
    out.push(CURLY_END);
    out
}

/// A decoded identifier: the kind of an item plus one of its index pairs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pointer {
    pub kind: String,
    pub key: String,
    pub val: String,
}

impl Pointer {
    pub fn new(kind: impl Into<String>, key: impl Into<String>, val: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            key: key.into(),
            val: val.into(),
        }
    }

    /// Parse an identifier of the form `kind{key:val}`.
    ///
    /// Closing braces are stripped from both ends first, then the input is
    /// split on the first `{` and the remainder on the first `:`.
    pub fn parse(input: &str) -> Result<Self, TypeError> {
        let malformed = || TypeError::MalformedPointer {
            input: input.to_string(),
        };

        let trimmed = input.trim_matches(CURLY_END);
        let (kind, rest) = trimmed.split_once(CURLY_START).ok_or_else(malformed)?;
        let (key, val) = rest.split_once(COLON).ok_or_else(malformed)?;

        Ok(Self::new(kind, key, val))
    }

    /// The encoded identifier.
    pub fn encode(&self) -> String {
        encode(&self.kind, &self.key, &self.val)
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{CURLY_START}{}{COLON}{}{CURLY_END}",
            self.kind, self.key, self.val
        )
    }
}

impl FromStr for Pointer {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
