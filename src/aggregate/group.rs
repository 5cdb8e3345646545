use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::trial::ResultRow;

/// A row field that results can be grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupField {
    Agent,
    PlayerCount,
    PolicyVariant,
    DeterministicSamples,
}

impl GroupField {
    /// The store column this field is read from.
    pub fn column(&self) -> &'static str {
        match self {
            GroupField::Agent => "agent",
            GroupField::PlayerCount => "player_count",
            GroupField::PolicyVariant => "tree_policy",
            GroupField::DeterministicSamples => "deterministic_samples",
        }
    }

    pub fn value(&self, row: &ResultRow) -> FieldValue {
        match self {
            GroupField::Agent => FieldValue::Text(row.agent_label.clone()),
            GroupField::PlayerCount => FieldValue::Int(row.player_count as u64),
            GroupField::PolicyVariant => row.policy_variant.map(u64::from).into(),
            GroupField::DeterministicSamples => row.deterministic_samples.into(),
        }
    }
}

impl fmt::Display for GroupField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for GroupField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "agent" => Ok(GroupField::Agent),
            "player_count" | "players" => Ok(GroupField::PlayerCount),
            "tree_policy" | "policy_variant" | "policy" => Ok(GroupField::PolicyVariant),
            "deterministic_samples" | "samples" => Ok(GroupField::DeterministicSamples),
            _ => Err(format!("unknown group field `{}`", s)),
        }
    }
}

/// One field of a group key. An absent optional value is a group of its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Int(u64),
    Absent,
}

impl From<Option<u64>> for FieldValue {
    fn from(value: Option<u64>) -> Self {
        value.map_or(FieldValue::Absent, FieldValue::Int)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::Int(n) => write!(f, "{}", n),
            FieldValue::Absent => write!(f, "-"),
        }
    }
}

/// The values of the grouped fields, in group-by order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GroupKey(pub Vec<FieldValue>);

impl GroupKey {
    pub fn of(row: &ResultRow, group_by: &[GroupField]) -> Self {
        GroupKey(group_by.iter().map(|field| field.value(row)).collect())
    }
}
