//! Domain types for the dragon catalog.
//!
//! The stored document is a JSON array of [`Dragon`] records whose keys carry
//! a `_str` suffix. Field names in Rust drop that suffix; the serde renames
//! keep the wire format.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Query-string parameter that filters by family.
pub const FAMILY_PARAM: &str = "family";

/// Query-string parameter that filters by dragon name.
pub const DRAGON_NAME_PARAM: &str = "dragonName";

/// One catalog entry.
///
/// Every field is optional. `name` is used as a natural key by convention,
/// but nothing in the data layer enforces uniqueness; see
/// [`DragonService::validate`](crate::service::DragonService::validate).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dragon {
    /// Free-form description
    #[serde(
        rename = "description_str",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,

    /// Dragon name
    #[serde(
        rename = "dragon_name_str",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,

    /// Family (e.g. "Red")
    #[serde(rename = "family_str", default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,

    /// City where the dragon was last seen
    #[serde(
        rename = "location_city_str",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub city: Option<String>,

    /// Neighborhood within the city
    #[serde(
        rename = "location_neighborhood_str",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub neighborhood: Option<String>,

    /// State or region
    #[serde(
        rename = "location_state_str",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub state: Option<String>,
}

impl Dragon {
    /// Create a dragon with only a name set.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// The dragon's name, or the empty string if it has none.
    #[must_use]
    pub fn name_or_empty(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }
}

/// Filter for listing dragons.
///
/// A filter with both fields set matches dragons of the family **or** with
/// the name, not both; see [`crate::query::list_expression`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DragonFilter {
    /// Match dragons in this family
    pub family: Option<String>,

    /// Match dragons with this name
    pub dragon_name: Option<String>,
}

impl DragonFilter {
    /// Build a filter from an optional parameter map.
    ///
    /// Only [`FAMILY_PARAM`] and [`DRAGON_NAME_PARAM`] are recognized; other
    /// keys are ignored. A key that is present with an empty value still
    /// produces a clause.
    #[must_use]
    pub fn from_params(params: Option<&HashMap<String, String>>) -> Self {
        match params {
            Some(params) => Self::from_lookup(|name| params.get(name).map(String::as_str)),
            None => Self::default(),
        }
    }

    /// Build a filter from any parameter lookup function.
    pub fn from_lookup<'a>(lookup: impl Fn(&str) -> Option<&'a str>) -> Self {
        Self {
            family: lookup(FAMILY_PARAM).map(str::to_owned),
            dragon_name: lookup(DRAGON_NAME_PARAM).map(str::to_owned),
        }
    }

    /// Returns `true` if no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.family.is_none() && self.dragon_name.is_none()
    }
}
