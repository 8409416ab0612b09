//! Function -> group classification tables.
//!
//! Loads classification policies from TOML and resolves function names to
//! their functional group.

use crate::utils::error::GroupingError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

/// One functional group
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct GroupSpec {
    /// Display color handed to whatever renders the breakdown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Functions rolled up into this group
    #[serde(default)]
    pub functions: Vec<String>,
}

/// On-disk shape of a classification file
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
struct ClassificationFile {
    #[serde(default)]
    groups: BTreeMap<String, GroupSpec>,
}

/// Complete classification: every known function maps to exactly one group
#[derive(Debug, Clone, Default)]
pub struct Classification {
    groups: BTreeMap<String, GroupSpec>,
    lookup: HashMap<String, String>,
}

impl Classification {
    /// Build a classification, rejecting functions listed under two groups
    pub fn from_groups(groups: BTreeMap<String, GroupSpec>) -> Result<Self, GroupingError> {
        let mut lookup: HashMap<String, String> = HashMap::new();

        for (group, spec) in &groups {
            for function in &spec.functions {
                if let Some(first) = lookup.insert(function.clone(), group.clone()) {
                    if &first != group {
                        return Err(GroupingError::DuplicateFunction {
                            function: function.clone(),
                            first,
                            second: group.clone(),
                        });
                    }
                }
            }
        }

        Ok(Self { groups, lookup })
    }

    /// Parse a classification from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, GroupingError> {
        let file: ClassificationFile = toml::from_str(contents)?;
        Self::from_groups(file.groups)
    }

    /// Serialize back to the TOML file format
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(&ClassificationFile {
            groups: self.groups.clone(),
        })
    }

    /// Group a function belongs to
    ///
    /// # Errors
    /// * `GroupingError::Unmapped` - the function is in no group
    pub fn group_of(&self, function: &str) -> Result<&str, GroupingError> {
        self.lookup
            .get(function)
            .map(String::as_str)
            .ok_or_else(|| GroupingError::Unmapped(function.to_string()))
    }

    pub fn color_of(&self, group: &str) -> Option<&str> {
        self.groups.get(group).and_then(|g| g.color.as_deref())
    }

    /// Groups in name order
    pub fn groups(&self) -> impl Iterator<Item = (&str, &GroupSpec)> {
        self.groups.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    pub fn function_count(&self) -> usize {
        self.lookup.len()
    }
}

/// Load a classification from a TOML file
///
/// # Arguments
/// * `path` - Path to the TOML classification file
///
/// # Errors
/// * `GroupingError::IoError` - If file cannot be read
/// * `GroupingError::ParseFailed` - If TOML is invalid
/// * `GroupingError::DuplicateFunction` - If a function is listed twice
///
/// # Example
/// ```ignore
/// let classification = load_classification("groups.toml")?;
/// ```
pub fn load_classification(path: impl AsRef<Path>) -> Result<Classification, GroupingError> {
    let contents = fs::read_to_string(path)?;
    Classification::from_toml_str(&contents)
}
