//! Configuration types for quill
//!
//! Every field is optional in the file; accessors on each section resolve
//! the defaults.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::cst::BlockKind;

/// Root of a `.quillrc.toml` / `.quillrc.json` / `quill.toml` file
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuillConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linter: Option<LinterConfiguration>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub braces: Option<BraceConfiguration>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<FilesConfiguration>,
}

impl QuillConfig {
    pub fn linter_config(&self) -> LinterConfiguration {
        self.linter.clone().unwrap_or_default()
    }

    pub fn brace_config(&self) -> BraceConfiguration {
        self.braces.clone().unwrap_or_default()
    }

    pub fn files_config(&self) -> FilesConfiguration {
        self.files.clone().unwrap_or_default()
    }
}

/// Linter configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LinterConfiguration {
    /// Enable/disable linter
    pub enabled: Option<bool>,

    /// Run the recommended rules that `rules` does not mention
    pub recommended: Option<bool>,

    /// Severity per rule id, e.g. `"style/no-trailing-whitespace" = "warn"`
    pub rules: Option<BTreeMap<String, RuleSeverity>>,
}

impl LinterConfiguration {
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    pub fn use_recommended(&self) -> bool {
        self.recommended.unwrap_or(true)
    }

    /// Configured severity for `rule_id`, if any
    pub fn rule_severity(&self, rule_id: &str) -> Option<RuleSeverity> {
        self.rules.as_ref()?.get(rule_id).copied()
    }
}

/// Rule severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSeverity {
    /// Disable the rule
    Off,
    /// Informational message
    Info,
    /// Warning (doesn't fail the run)
    Warn,
    /// Error (fails the run)
    Error,
}

/// Where a closing brace that shares its line with content is reported
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CloseBraceAnchor {
    /// At the first token of the content sharing the line
    #[default]
    SharedContent,
    /// At the closing brace itself
    Delimiter,
}

/// Brace layout policy
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BraceConfiguration {
    pub close_brace_anchor: Option<CloseBraceAnchor>,

    /// Accept `{ X }` on one line when the block holds exactly one element
    pub allow_single_line_single_element: Option<bool>,

    /// Block kinds the layout rule skips
    pub ignore_kinds: Option<Vec<BlockKind>>,
}

impl BraceConfiguration {
    pub fn close_brace_anchor(&self) -> CloseBraceAnchor {
        self.close_brace_anchor.unwrap_or_default()
    }

    pub fn allow_single_line_single_element(&self) -> bool {
        self.allow_single_line_single_element.unwrap_or(true)
    }

    pub fn ignores(&self, kind: BlockKind) -> bool {
        self.ignore_kinds
            .as_ref()
            .is_some_and(|kinds| kinds.contains(&kind))
    }
}

/// Files configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FilesConfiguration {
    /// Glob patterns to include
    pub include: Option<Vec<String>>,

    /// Glob patterns to exclude
    pub exclude: Option<Vec<String>>,
}

impl FilesConfiguration {
    pub fn include_patterns(&self) -> Vec<String> {
        self.include
            .clone()
            .unwrap_or_else(|| vec!["**/*.cs".to_string()])
    }

    pub fn exclude_patterns(&self) -> Vec<String> {
        self.exclude.clone().unwrap_or_else(|| {
            vec![
                "**/bin/**".to_string(),
                "**/obj/**".to_string(),
                "**/.git/**".to_string(),
            ]
        })
    }
}
