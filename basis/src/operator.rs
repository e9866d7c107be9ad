use ederror::EdError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    C,
    Cdagger,
    N,
    Sz,
    Splus,
    Sminus,
}

impl OperatorKind {
    pub fn is_fermionic(&self) -> bool {
        matches!(self, OperatorKind::C | OperatorKind::Cdagger)
    }

    pub fn transpose_conjugate(&self) -> OperatorKind {
        match self {
            OperatorKind::C => OperatorKind::Cdagger,
            OperatorKind::Cdagger => OperatorKind::C,
            OperatorKind::Splus => OperatorKind::Sminus,
            OperatorKind::Sminus => OperatorKind::Splus,
            OperatorKind::N => OperatorKind::N,
            OperatorKind::Sz => OperatorKind::Sz,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            OperatorKind::C => "c",
            OperatorKind::Cdagger => "cdagger",
            OperatorKind::N => "n",
            OperatorKind::Sz => "sz",
            OperatorKind::Splus => "splus",
            OperatorKind::Sminus => "sminus",
        }
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for OperatorKind {
    type Err = EdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "c" => Ok(OperatorKind::C),
            "cdagger" | "c+" => Ok(OperatorKind::Cdagger),
            "n" => Ok(OperatorKind::N),
            "sz" => Ok(OperatorKind::Sz),
            "splus" | "s+" => Ok(OperatorKind::Splus),
            "sminus" | "s-" => Ok(OperatorKind::Sminus),
            other => Err(EdError::UnsupportedOperator {
                operator: other.to_string(),
                context: "operator label".to_string(),
            }),
        }
    }
}

/// Which operator, where, and on which species it acts.
///
/// Spin operators act on the species pair (0, 1) and ignore `species`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperatorDescriptor {
    pub kind: OperatorKind,
    pub site: usize,
    pub orbital: usize,
    pub species: usize,
}

impl OperatorDescriptor {
    pub fn new(kind: OperatorKind, site: usize, species: usize) -> OperatorDescriptor {
        OperatorDescriptor {
            kind,
            site,
            orbital: 0,
            species,
        }
    }

    pub fn with_orbital(mut self, orbital: usize) -> OperatorDescriptor {
        self.orbital = orbital;
        self
    }

    pub fn adjoint(&self) -> OperatorDescriptor {
        OperatorDescriptor {
            kind: self.kind.transpose_conjugate(),
            ..*self
        }
    }
}

impl fmt::Display for OperatorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}(site={}, orb={}, species={})",
            self.kind, self.site, self.orbital, self.species
        )
    }
}
