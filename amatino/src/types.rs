use crate::error::{AmatinoError, AmatinoResult};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MAX_NAME_LENGTH: usize = 1024;
pub const MAX_DESCRIPTION_LENGTH: usize = 1024;

/// Fundamental account type, deciding where an account sits in the
/// accounting equation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum AMType {
    Asset,
    Liability,
    Equity,
    Income,
    Expense,
}

impl AMType {
    pub fn code(self) -> i64 {
        match self {
            AMType::Asset => 1,
            AMType::Liability => 2,
            AMType::Equity => 3,
            AMType::Income => 4,
            AMType::Expense => 5,
        }
    }
}

impl TryFrom<i64> for AMType {
    type Error = String;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(AMType::Asset),
            2 => Ok(AMType::Liability),
            3 => Ok(AMType::Equity),
            4 => Ok(AMType::Income),
            5 => Ok(AMType::Expense),
            other => Err(format!("unknown account type code {}", other)),
        }
    }
}

impl From<AMType> for i64 {
    fn from(am_type: AMType) -> Self {
        am_type.code()
    }
}

impl fmt::Display for AMType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AMType::Asset => write!(f, "asset"),
            AMType::Liability => write!(f, "liability"),
            AMType::Equity => write!(f, "equity"),
            AMType::Income => write!(f, "income"),
            AMType::Expense => write!(f, "expense"),
        }
    }
}

/// The unit an account is denominated in: either a server-wide global unit
/// or a custom unit defined inside one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Denomination {
    Global(i64),
    Custom(i64),
}

impl Denomination {
    pub(crate) fn from_wire(
        global_unit_id: Option<i64>,
        custom_unit_id: Option<i64>,
    ) -> AmatinoResult<Self> {
        match (global_unit_id, custom_unit_id) {
            (Some(id), None) => Ok(Denomination::Global(id)),
            (None, Some(id)) => Ok(Denomination::Custom(id)),
            (global, custom) => Err(AmatinoError::UnexpectedResponse {
                message: format!(
                    "account must have exactly one denomination, got global {:?} and custom {:?}",
                    global, custom
                ),
            }),
        }
    }

    pub(crate) fn global_unit_id(self) -> Option<i64> {
        match self {
            Denomination::Global(id) => Some(id),
            Denomination::Custom(_) => None,
        }
    }

    pub(crate) fn custom_unit_id(self) -> Option<i64> {
        match self {
            Denomination::Global(_) => None,
            Denomination::Custom(id) => Some(id),
        }
    }
}

pub(crate) fn validate_name(name: &str) -> AmatinoResult<()> {
    if name.trim().is_empty() {
        return Err(AmatinoError::invalid_argument("name cannot be empty"));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(AmatinoError::invalid_argument(format!(
            "name exceeds {} characters",
            MAX_NAME_LENGTH
        )));
    }
    Ok(())
}

pub(crate) fn validate_description(description: Option<&str>) -> AmatinoResult<()> {
    match description {
        Some(text) if text.chars().count() > MAX_DESCRIPTION_LENGTH => {
            Err(AmatinoError::invalid_argument(format!(
                "description exceeds {} characters",
                MAX_DESCRIPTION_LENGTH
            )))
        }
        _ => Ok(()),
    }
}

pub(crate) fn validate_colour(colour: Option<&str>) -> AmatinoResult<()> {
    match colour {
        Some(hex) if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) => Err(
            AmatinoError::invalid_argument(format!("colour '{}' is not a 6-digit hex string", hex)),
        ),
        _ => Ok(()),
    }
}

/// The API answers with arrays even when a single object was requested.
pub(crate) fn single<T>(objects: Vec<T>, what: &str) -> AmatinoResult<T> {
    objects
        .into_iter()
        .next()
        .ok_or_else(|| AmatinoError::UnexpectedResponse {
            message: format!("response did not contain {}", what),
        })
}
