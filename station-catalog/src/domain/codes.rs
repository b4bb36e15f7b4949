//! Identifier pair attached to every catalog node.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Provider identifiers for a country, region, settlement or station.
///
/// The primary code is the provider's own identifier and is the identity
/// of the node. The secondary code (the railway ESR code) is carried along
/// when the provider knows it, but takes no part in equality or hashing.
///
/// # Examples
///
/// ```
/// use station_catalog::domain::Codes;
///
/// let a = Codes::new("s9600213", Some("060003".to_string()));
/// let b = Codes::new("s9600213", None);
/// assert_eq!(a, b);
/// assert_eq!(a.primary(), "s9600213");
/// ```
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Codes {
    primary_code: String,
    secondary_code: Option<String>,
}

impl Codes {
    /// Create codes from a primary identifier and an optional secondary one.
    pub fn new(primary: impl Into<String>, secondary: Option<String>) -> Self {
        Self {
            primary_code: primary.into(),
            secondary_code: secondary,
        }
    }

    /// The provider's identifier for this node.
    pub fn primary(&self) -> &str {
        &self.primary_code
    }

    /// The railway (ESR) code, if the provider supplied one.
    pub fn secondary(&self) -> Option<&str> {
        self.secondary_code.as_deref()
    }
}

impl PartialEq for Codes {
    fn eq(&self, other: &Self) -> bool {
        self.primary_code == other.primary_code
    }
}

impl Eq for Codes {}

impl Hash for Codes {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.primary_code.hash(state);
    }
}

impl fmt::Debug for Codes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.secondary_code {
            Some(secondary) => write!(f, "Codes({}/{})", self.primary_code, secondary),
            None => write!(f, "Codes({})", self.primary_code),
        }
    }
}

impl fmt::Display for Codes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.primary_code)
    }
}
