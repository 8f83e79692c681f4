//! Attribute domains - the element classes an attribute can live on.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Error;

/// Element class an attribute is defined over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttrDomain {
    /// Vertices / control points
    Point,
    /// Mesh edges
    Edge,
    /// Mesh faces
    Face,
    /// Face corners (face-vertex pairs)
    Corner,
    /// Whole curves
    Curve,
    /// Instances
    Instance,
    /// Grease-pencil style layers
    Layer,
}

impl AttrDomain {
    /// All domains in declaration order.
    pub const ALL: [AttrDomain; 7] = [
        Self::Point,
        Self::Edge,
        Self::Face,
        Self::Corner,
        Self::Curve,
        Self::Instance,
        Self::Layer,
    ];

    /// Returns the name of this domain as a string.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Point => "point",
            Self::Edge => "edge",
            Self::Face => "face",
            Self::Corner => "corner",
            Self::Curve => "curve",
            Self::Instance => "instance",
            Self::Layer => "layer",
        }
    }

    /// Parse a domain from its name string.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.name() == name)
    }
}

impl fmt::Display for AttrDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for AttrDomain {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| Error::UnknownDomain(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_names() {
        for domain in AttrDomain::ALL {
            assert_eq!(AttrDomain::from_name(domain.name()), Some(domain));
        }
        assert_eq!("corner".parse::<AttrDomain>().ok(), Some(AttrDomain::Corner));
        assert!(matches!(
            "vertex".parse::<AttrDomain>(),
            Err(Error::UnknownDomain(_))
        ));
    }
}
