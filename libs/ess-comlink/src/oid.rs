use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ComLinkError;

/// Dotted object identifier, e.g. `1.3.6.1.4.1.1206.4.2.5.5.2.1.3.1`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectId(Vec<u32>);

impl ObjectId {
    pub fn from_slice(arcs: &[u32]) -> Self {
        Self(arcs.to_vec())
    }

    /// Identifier with one more arc appended
    pub fn child(&self, arc: u32) -> Self {
        let mut arcs = Vec::with_capacity(self.0.len() + 1);
        arcs.extend_from_slice(&self.0);
        arcs.push(arc);
        Self(arcs)
    }

    /// Identifier with several arcs appended
    pub fn extend(&self, arcs: &[u32]) -> Self {
        let mut all = self.0.clone();
        all.extend_from_slice(arcs);
        Self(all)
    }

    pub fn arcs(&self) -> &[u32] {
        &self.0
    }

    pub fn last(&self) -> Option<u32> {
        self.0.last().copied()
    }

    pub fn starts_with(&self, prefix: &ObjectId) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for arc in &self.0 {
            if !first {
                f.write_str(".")?;
            }
            write!(f, "{}", arc)?;
            first = false;
        }
        Ok(())
    }
}

impl FromStr for ObjectId {
    type Err = ComLinkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('.');
        if trimmed.is_empty() {
            return Err(ComLinkError::malformed("empty object identifier"));
        }
        trimmed
            .split('.')
            .map(|arc| {
                arc.parse::<u32>().map_err(|e| {
                    ComLinkError::malformed(format!("invalid OID arc '{}' in '{}': {}", arc, s, e))
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl TryFrom<String> for ObjectId {
    type Error = ComLinkError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ObjectId> for String {
    fn from(oid: ObjectId) -> Self {
        oid.to_string()
    }
}
