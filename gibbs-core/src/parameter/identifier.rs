use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Possible variants to identify a substance.
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub enum IdentifierOption {
    Cas,
    Name,
    Formula,
}

/// A collection of identifiers for a substance.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Identifier {
    /// CAS number
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cas: Option<String>,
    /// Commonly used english name
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Chemical formula
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
}

impl Identifier {
    /// Create a new identifier.
    ///
    /// # Examples
    ///
    /// ```
    /// # use gibbs_core::parameter::Identifier;
    /// let methane = Identifier::new(Some("74-82-8"), Some("methane"), Some("CH4"));
    /// assert_eq!(methane.name.as_deref(), Some("methane"));
    /// ```
    pub fn new(cas: Option<&str>, name: Option<&str>, formula: Option<&str>) -> Identifier {
        Identifier {
            cas: cas.map(Into::into),
            name: name.map(Into::into),
            formula: formula.map(Into::into),
        }
    }

    pub fn as_string(&self, option: IdentifierOption) -> Option<String> {
        match option {
            IdentifierOption::Cas => self.cas.clone(),
            IdentifierOption::Name => self.name.clone(),
            IdentifierOption::Formula => self.formula.clone(),
        }
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids = Vec::new();
        if let Some(n) = &self.cas {
            ids.push(format!("cas={}", n));
        }
        if let Some(n) = &self.name {
            ids.push(format!("name={}", n));
        }
        if let Some(n) = &self.formula {
            ids.push(format!("formula={}", n));
        }
        write!(f, "Identifier({})", ids.join(", "))
    }
}

impl PartialEq for Identifier {
    fn eq(&self, other: &Self) -> bool {
        self.cas == other.cas && self.name == other.name
    }
}
impl Eq for Identifier {}

impl Hash for Identifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.cas.hash(state);
        self.name.hash(state);
    }
}
