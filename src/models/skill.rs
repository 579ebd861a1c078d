//! Skill catalog models.

use serde::{Deserialize, Serialize};

/// A named skill from the shared catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub skill_id: i64,
    pub skill_name: String,
}

/// How a user relates to a skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillType {
    Offered,
    Wanted,
}

impl SkillType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillType::Offered => "offered",
            SkillType::Wanted => "wanted",
        }
    }
}

/// Split a comma-separated list of skill names, dropping blanks.
pub fn split_skill_names(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
