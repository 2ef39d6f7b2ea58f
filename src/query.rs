//! Attribute queries over drone capabilities.
//!
//! Queries arrive as loosely typed `{ attribute, operator, value }` triples.
//! Anything that cannot be interpreted (unknown attribute or operator, a
//! value that does not parse) simply fails to match.

use serde::{Deserialize, Serialize};

use crate::fleet::Fleet;
use crate::model::Drone;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroneQuery {
    pub attribute: String,
    pub operator: String,
    pub value: String,
}

impl DroneQuery {
    pub fn new(
        attribute: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            attribute: attribute.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }

    /// Equality query, as used for a single attribute/value lookup.
    pub fn equals(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(attribute, "=", value)
    }

    pub fn matches(&self, drone: &Drone) -> bool {
        let Some(attribute) = Attribute::parse(&self.attribute) else {
            return false;
        };
        match attribute {
            Attribute::Flag(flag) => {
                parse_flag(&self.value).is_some_and(|wanted| flag.read(drone) == wanted)
            }
            Attribute::Number(field) => {
                let (Some(operator), Ok(wanted)) = (
                    Operator::parse(&self.operator),
                    self.value.trim().parse::<f64>(),
                ) else {
                    return false;
                };
                operator.compare(field.read(drone), wanted)
            }
        }
    }
}

/// `true`/`false` in any letter case.
fn parse_flag(value: &str) -> Option<bool> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attribute {
    Flag(Flag),
    Number(Numeric),
}

impl Attribute {
    fn parse(name: &str) -> Option<Self> {
        let attribute = match name.trim().to_ascii_lowercase().as_str() {
            "cooling" => Self::Flag(Flag::Cooling),
            "heating" => Self::Flag(Flag::Heating),
            "capacity" => Self::Number(Numeric::Capacity),
            "maxmoves" => Self::Number(Numeric::MaxMoves),
            "costpermove" => Self::Number(Numeric::CostPerMove),
            "costinitial" => Self::Number(Numeric::CostInitial),
            "costfinal" => Self::Number(Numeric::CostFinal),
            _ => return None,
        };
        Some(attribute)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flag {
    Cooling,
    Heating,
}

impl Flag {
    fn read(self, drone: &Drone) -> bool {
        match self {
            Flag::Cooling => drone.capability.cooling,
            Flag::Heating => drone.capability.heating,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Numeric {
    Capacity,
    MaxMoves,
    CostPerMove,
    CostInitial,
    CostFinal,
}

impl Numeric {
    fn read(self, drone: &Drone) -> f64 {
        let capability = &drone.capability;
        match self {
            Numeric::Capacity => capability.capacity,
            Numeric::MaxMoves => f64::from(capability.max_moves),
            Numeric::CostPerMove => capability.cost_per_move,
            Numeric::CostInitial => capability.cost_initial,
            Numeric::CostFinal => capability.cost_final,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

impl Operator {
    fn parse(symbol: &str) -> Option<Self> {
        match symbol.trim() {
            "=" => Some(Self::Eq),
            "!=" => Some(Self::Ne),
            "<" => Some(Self::Lt),
            ">" => Some(Self::Gt),
            "<=" => Some(Self::Le),
            ">=" => Some(Self::Ge),
            _ => None,
        }
    }

    fn compare(self, actual: f64, wanted: f64) -> bool {
        match self {
            Self::Eq => actual == wanted,
            Self::Ne => actual != wanted,
            Self::Lt => actual < wanted,
            Self::Gt => actual > wanted,
            Self::Le => actual <= wanted,
            Self::Ge => actual >= wanted,
        }
    }
}

impl Fleet {
    /// Ids of drones matching every query.
    pub fn query_drones(&self, queries: &[DroneQuery]) -> Vec<&str> {
        self.drones()
            .iter()
            .filter(|drone| queries.iter().all(|query| query.matches(drone)))
            .map(|drone| drone.id.as_str())
            .collect()
    }

    pub fn query_attribute(&self, attribute: &str, value: &str) -> Vec<&str> {
        self.query_drones(&[DroneQuery::equals(attribute, value)])
    }
}
