//! Tool categories and the `--tools` selection.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use rmcp::model::Tool;
use serde::Serialize;
use thiserror::Error;

/// Impact class of a tool, derived from its annotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolCategory {
    Readonly,
    Write,
    Destructive,
}

impl ToolCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            ToolCategory::Readonly => "readonly",
            ToolCategory::Write => "write",
            ToolCategory::Destructive => "destructive",
        }
    }

    /// Destructive when flagged so, readonly when flagged so, otherwise write.
    pub fn of(tool: &Tool) -> Self {
        let annotations = tool.annotations.as_ref();
        if annotations.and_then(|hints| hints.destructive_hint) == Some(true) {
            ToolCategory::Destructive
        } else if annotations.and_then(|hints| hints.read_only_hint) == Some(true) {
            ToolCategory::Readonly
        } else {
            ToolCategory::Write
        }
    }
}

impl fmt::Display for ToolCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CategoryParseError {
    #[error("unknown tool category '{0}', expected readonly, write or destructive")]
    Unknown(String),
    #[error("at least one tool category is required")]
    Empty,
}

/// Enabled categories. Cumulative: write implies readonly, destructive implies both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolCategorySet {
    highest: ToolCategory,
}

impl ToolCategorySet {
    pub const READONLY: Self = Self {
        highest: ToolCategory::Readonly,
    };
    pub const ALL: Self = Self {
        highest: ToolCategory::Destructive,
    };

    pub fn up_to(highest: ToolCategory) -> Self {
        Self { highest }
    }

    pub fn allows(&self, category: ToolCategory) -> bool {
        category <= self.highest
    }

    pub fn enabled(&self) -> Vec<ToolCategory> {
        [ToolCategory::Readonly, ToolCategory::Write, ToolCategory::Destructive]
            .into_iter()
            .filter(|category| self.allows(*category))
            .collect()
    }
}

impl Default for ToolCategorySet {
    fn default() -> Self {
        Self::READONLY
    }
}

impl fmt::Display for ToolCategorySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.enabled().into_iter().map(ToolCategory::as_str).collect();
        f.write_str(&names.join(","))
    }
}

impl FromStr for ToolCategorySet {
    type Err = CategoryParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let mut highest = None;
        for part in raw.split(',').map(str::trim).filter(|part| !part.is_empty()) {
            let category = match part.to_ascii_lowercase().as_str() {
                "readonly" => ToolCategory::Readonly,
                "write" => ToolCategory::Write,
                "destructive" => ToolCategory::Destructive,
                _ => return Err(CategoryParseError::Unknown(part.to_string())),
            };
            highest = highest.max(Some(category));
        }
        highest.map(Self::up_to).ok_or(CategoryParseError::Empty)
    }
}

/// Tool name to category, sorted by name.
pub fn categorize(tools: &[Tool]) -> IndexMap<String, ToolCategory> {
    let mut entries: Vec<(String, ToolCategory)> = tools
        .iter()
        .map(|tool| (tool.name.to_string(), ToolCategory::of(tool)))
        .collect();
    entries.sort_by(|left, right| left.0.cmp(&right.0));
    entries.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_are_cumulative() {
        let write: ToolCategorySet = "write".parse().unwrap();
        assert!(write.allows(ToolCategory::Readonly));
        assert!(write.allows(ToolCategory::Write));
        assert!(!write.allows(ToolCategory::Destructive));

        let destructive: ToolCategorySet = "destructive".parse().unwrap();
        assert_eq!(destructive, ToolCategorySet::ALL);
    }

    #[test]
    fn lists_take_the_highest_category() {
        let parsed: ToolCategorySet = " readonly , Destructive ".parse().unwrap();
        assert_eq!(parsed, ToolCategorySet::ALL);
        assert_eq!(parsed.to_string(), "readonly,write,destructive");
    }

    #[test]
    fn unknown_and_empty_selections_fail() {
        assert_eq!(
            "readonly,admin".parse::<ToolCategorySet>(),
            Err(CategoryParseError::Unknown("admin".into()))
        );
        assert_eq!(" , ".parse::<ToolCategorySet>(), Err(CategoryParseError::Empty));
    }

    #[test]
    fn default_is_readonly() {
        assert_eq!(ToolCategorySet::default().enabled(), vec![ToolCategory::Readonly]);
    }
}
