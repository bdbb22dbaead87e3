//! Branch naming convention
//!
//! An ordered table of rules maps a branch name to a version and to the
//! constraint placed on the upstream package. Rules are tried in table order
//! and the first match wins, so `release/1.0-feature` is a release branch even
//! though a looser rule could also claim it.

use crate::domain::{BranchName, VersionConstraint, VersionSpec, LATEST_QUALIFIER};
use crate::error::{PackError, Result};
use regex::{Captures, Regex};

/// How a matched branch turns into a version
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionRule {
    /// Captures 1-3 are major, minor and an optional patch (defaults to 0)
    Numbered,
    /// `0.0.0-<qualifier>`
    Qualifier(&'static str),
    /// `0.0.0-<prefix>.<slug of capture 1>`
    Slug(&'static str),
}

/// How a matched branch constrains the upstream package
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintRule {
    /// Same `major.minor` release line as the derived version
    ReleaseLine,
    /// Latest development build
    LatestDevelopment,
}

/// One entry of the naming convention
#[derive(Debug, Clone)]
pub struct BranchRule {
    pub name: &'static str,
    pattern: Regex,
    version: VersionRule,
    constraint: ConstraintRule,
}

impl BranchRule {
    pub fn new(
        name: &'static str,
        pattern: &str,
        version: VersionRule,
        constraint: ConstraintRule,
    ) -> Result<Self> {
        let pattern = Regex::new(pattern)
            .map_err(|e| PackError::config(format!("Invalid pattern for rule '{}': {}", name, e)))?;

        Ok(BranchRule {
            name,
            pattern,
            version,
            constraint,
        })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    fn apply(&self, branch: &BranchName, captures: &Captures<'_>) -> Result<BranchMatch> {
        let version = match &self.version {
            VersionRule::Numbered => {
                let major = numeric_capture(branch, captures, 1)?;
                let minor = numeric_capture(branch, captures, 2)?;
                let patch = match captures.get(3) {
                    Some(_) => numeric_capture(branch, captures, 3)?,
                    None => 0,
                };
                VersionSpec::new(major, minor, patch)
            }
            VersionRule::Qualifier(qualifier) => VersionSpec::development(*qualifier),
            VersionRule::Slug(prefix) => {
                let raw = captures
                    .get(1)
                    .map(|m| m.as_str())
                    .ok_or_else(|| PackError::unresolvable(branch.as_str()))?;
                VersionSpec::development(format!("{}.{}", prefix, slugify(raw)))
            }
        };
        version
            .to_semver()
            .map_err(|_| PackError::unresolvable(branch.as_str()))?;

        let constraint = match self.constraint {
            ConstraintRule::ReleaseLine => VersionConstraint::ReleaseLine {
                major: version.major,
                minor: version.minor,
            },
            ConstraintRule::LatestDevelopment => VersionConstraint::LatestDevelopment,
        };

        Ok(BranchMatch {
            rule: self.name,
            version,
            constraint,
        })
    }
}

/// Result of matching a branch against the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchMatch {
    /// Name of the rule that matched
    pub rule: &'static str,
    pub version: VersionSpec,
    pub constraint: VersionConstraint,
}

/// Ordered branch naming rules, evaluated first-match-wins
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<BranchRule>,
}

impl RuleTable {
    /// Build a table from rules in priority order
    pub fn new(rules: Vec<BranchRule>) -> Self {
        RuleTable { rules }
    }

    /// The project's branch naming convention
    pub fn standard() -> Result<Self> {
        use ConstraintRule::*;
        use VersionRule::*;

        Ok(RuleTable::new(vec![
            BranchRule::new(
                "release",
                r"^release/(\d+)\.(\d+)(?:\.(\d+))?",
                Numbered,
                ReleaseLine,
            )?,
            BranchRule::new(
                "hotfix",
                r"^hotfix/(\d+)\.(\d+)\.(\d+)",
                Numbered,
                ReleaseLine,
            )?,
            BranchRule::new(
                "mainline",
                r"^(?:master|main)$",
                Qualifier(LATEST_QUALIFIER),
                LatestDevelopment,
            )?,
            BranchRule::new(
                "develop",
                r"^develop$",
                Qualifier("develop"),
                LatestDevelopment,
            )?,
            BranchRule::new(
                "feature",
                r"^feature/(.+)$",
                Slug("feature"),
                LatestDevelopment,
            )?,
            BranchRule::new(
                "bugfix",
                r"^bugfix/(.+)$",
                Slug("bugfix"),
                LatestDevelopment,
            )?,
        ]))
    }

    pub fn rules(&self) -> &[BranchRule] {
        &self.rules
    }

    /// Apply the first rule whose pattern matches the branch
    pub fn first_match(&self, branch: &BranchName) -> Result<BranchMatch> {
        for rule in &self.rules {
            if let Some(captures) = rule.pattern.captures(branch.as_str()) {
                tracing::debug!(branch = %branch, rule = rule.name, "branch rule matched");
                return rule.apply(branch, &captures);
            }
        }

        Err(PackError::unresolvable(branch.as_str()))
    }
}

fn numeric_capture(branch: &BranchName, captures: &Captures<'_>, index: usize) -> Result<u64> {
    captures
        .get(index)
        .and_then(|m| m.as_str().parse::<u64>().ok())
        .ok_or_else(|| PackError::unresolvable(branch.as_str()))
}

/// Turn a free-form branch suffix into a semver pre-release identifier
fn slugify(raw: &str) -> String {
    let slug: String = raw
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect();

    // Numeric identifiers may not carry leading zeros
    if slug.chars().all(|c| c.is_ascii_digit()) {
        let trimmed = slug.trim_start_matches('0');
        if trimmed.is_empty() {
            return "0".to_string();
        }
        return trimmed.to_string();
    }

    slug
}
