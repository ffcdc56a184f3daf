//! Case customization options.
//!
//! A saved configuration picks one value from each option group. The
//! lowercase form is both the wire format (JSON) and the storage form
//! (TEXT columns), so every variant round-trips through `as_str` and
//! `FromStr`.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error parsing a case option from its storage form.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {option} value: {value}")]
pub struct ParseOptionError {
    /// The option group being parsed (e.g., "finish").
    pub option: &'static str,
    /// The rejected input.
    pub value: String,
}

/// Surface finish of a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Finish {
    /// Smooth surface, no surcharge.
    #[default]
    Plain,
    /// Textured grip surface.
    Textured,
}

impl Finish {
    /// The lowercase storage form of this variant.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Textured => "textured",
        }
    }

    /// All known finishes, in display order.
    pub const ALL: [Self; 2] = [Self::Plain, Self::Textured];
}

impl fmt::Display for Finish {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Finish {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plain" => Ok(Self::Plain),
            "textured" => Ok(Self::Textured),
            other => Err(ParseOptionError {
                option: "finish",
                value: other.to_owned(),
            }),
        }
    }
}

/// Shell material of a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Material {
    /// Flexible silicone, no surcharge.
    #[default]
    Silicone,
    /// Rigid polycarbonate shell.
    Polycarbonate,
}

impl Material {
    /// The lowercase storage form of this variant.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Silicone => "silicone",
            Self::Polycarbonate => "polycarbonate",
        }
    }

    /// All known materials, in display order.
    pub const ALL: [Self; 2] = [Self::Silicone, Self::Polycarbonate];
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Material {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "silicone" => Ok(Self::Silicone),
            "polycarbonate" => Ok(Self::Polycarbonate),
            other => Err(ParseOptionError {
                option: "material",
                value: other.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_round_trip() {
        for finish in Finish::ALL {
            assert_eq!(finish.as_str().parse::<Finish>().unwrap(), finish);
        }
    }

    #[test]
    fn test_material_round_trip() {
        for material in Material::ALL {
            assert_eq!(material.as_str().parse::<Material>().unwrap(), material);
        }
    }

    #[test]
    fn test_unknown_value_is_rejected() {
        let err = "chrome".parse::<Finish>().unwrap_err();
        assert_eq!(err.option, "finish");
        assert_eq!(err.value, "chrome");
        assert!("wood".parse::<Material>().is_err());
    }

    #[test]
    fn test_serde_uses_lowercase() {
        assert_eq!(
            serde_json::to_string(&Finish::Textured).unwrap(),
            "\"textured\""
        );
        let material: Material = serde_json::from_str("\"polycarbonate\"").unwrap();
        assert_eq!(material, Material::Polycarbonate);
    }
}
