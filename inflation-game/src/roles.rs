use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Occupation a player can pick at the start of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoleId {
    Worker,
    BusinessOwner,
    Farmer,
    Banker,
    Government,
}

impl RoleId {
    /// Every role in listing order.
    pub const ALL: [Self; 5] = [
        Self::Worker,
        Self::BusinessOwner,
        Self::Farmer,
        Self::Banker,
        Self::Government,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Worker => "worker",
            Self::BusinessOwner => "business-owner",
            Self::Farmer => "farmer",
            Self::Banker => "banker",
            Self::Government => "government",
        }
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub title: String,
    pub description: String,
    /// Currency credited at the end of every completed month.
    pub monthly_income: i64,
    pub starting_money: i64,
    /// Energy consumed per month.
    pub energy_drain: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct RoleNoId {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub monthly_income: u32,
    pub starting_money: u32,
    pub energy_drain: u16,
}

impl Role {
    #[must_use]
    fn with_id(id: RoleId, r: RoleNoId) -> Self {
        Self {
            id,
            title: r.title,
            description: r.description,
            monthly_income: i64::from(r.monthly_income),
            starting_money: i64::from(r.starting_money),
            energy_drain: i32::from(r.energy_drain),
        }
    }
}

/// Role table keyed by [`RoleId`], kept in listing order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RolesList(pub Vec<Role>);

impl<'de> Deserialize<'de> for RolesList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let map: std::collections::HashMap<String, serde_json::Value> =
            std::collections::HashMap::deserialize(deserializer)?;
        let mut roles = Vec::with_capacity(RoleId::ALL.len());
        for id in RoleId::ALL {
            if let Some(value) = map.get(id.as_str()) {
                let entry: RoleNoId =
                    serde_json::from_value(value.clone()).map_err(serde::de::Error::custom)?;
                roles.push(Role::with_id(id, entry));
            }
        }
        Ok(Self(roles))
    }
}

impl RolesList {
    #[must_use]
    pub const fn empty() -> Self {
        Self(vec![])
    }

    /// Load roles from a JSON object keyed by role id.
    ///
    /// Unknown keys are ignored; the result follows [`RoleId::ALL`] order.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into valid role data.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn get(&self, id: RoleId) -> Option<&Role> {
        self.0.iter().find(|r| r.id == id)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Role] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Role> {
        self.0.iter()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a RolesList {
    type Item = &'a Role;
    type IntoIter = std::slice::Iter<'a, Role>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
