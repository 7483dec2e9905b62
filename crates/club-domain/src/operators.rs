use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ParseError;

/// One of the two people handling the club's money.
/// Each of them keeps a cash box and a bank account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    #[default]
    Primary,
    Secondary,
}

impl Operator {
    pub const ALL: [Operator; 2] = [Operator::Primary, Operator::Secondary];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Primary => "primary",
            Operator::Secondary => "secondary",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "primary" => Ok(Operator::Primary),
            "secondary" => Ok(Operator::Secondary),
            _ => Err(ParseError::new("operator", s)),
        }
    }
}

/// The configured names of the two operators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operators {
    pub primary: String,
    pub secondary: String,
}

impl Operators {
    pub fn new(primary: &str, secondary: &str) -> Self {
        Operators {
            primary: primary.trim().to_string(),
            secondary: secondary.trim().to_string(),
        }
    }

    /// Get the display name of an operator
    pub fn name(&self, operator: Operator) -> &str {
        match operator {
            Operator::Primary => &self.primary,
            Operator::Secondary => &self.secondary,
        }
    }

    /// Match a name given by the session against the configured
    /// operators. Surrounding whitespace and case are ignored.
    pub fn resolve(&self, name: &str) -> Option<Operator> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Operator::ALL
            .into_iter()
            .find(|op| self.name(*op).eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_resolve() {
        let operators = Operators::new("Ana Gomez", " Luis Perez ");
        assert_eq!(operators.resolve("Ana Gomez"), Some(Operator::Primary));
        assert_eq!(operators.resolve("luis perez"), Some(Operator::Secondary));
        assert_eq!(operators.resolve("  LUIS PEREZ"), Some(Operator::Secondary));
        assert_eq!(operators.resolve("Someone Else"), None);
        assert_eq!(operators.resolve(""), None);
        assert_eq!(operators.name(Operator::Secondary), "Luis Perez");
    }

    #[test]
    fn test_operator_parse() {
        assert_eq!("primary".parse::<Operator>(), Ok(Operator::Primary));
        assert_eq!("secondary".parse::<Operator>(), Ok(Operator::Secondary));
        assert!("tertiary".parse::<Operator>().is_err());
    }
}
