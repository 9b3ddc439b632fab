//! Catalog data types: tabs, skill groups, skills.

use crate::rating::Rating;
use serde::{Deserialize, Serialize};

/// Which rating interaction and descriptive schema a tab's skills use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TabKind {
    /// Skills list observable behaviours
    #[serde(alias = "exp")]
    Experience,
    /// Skills carry a basic/intermediate/advanced rubric
    #[serde(alias = "gen")]
    General,
}

impl TabKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Experience => "experience",
            Self::General => "general",
        }
    }
}

/// Three-level rubric for general skills
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Rubric {
    pub basic: String,
    pub intermediate: String,
    pub advanced: String,
}

impl Rubric {
    /// Rubric text for a level; `Na` has none.
    pub fn describe(&self, rating: Rating) -> Option<&str> {
        match rating {
            Rating::Na => None,
            Rating::Basic => Some(&self.basic),
            Rating::Intermediate => Some(&self.intermediate),
            Rating::Advanced => Some(&self.advanced),
        }
    }
}

/// Descriptive content attached to a skill, matching its tab kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkillDetail {
    Behaviors(Vec<String>),
    Rubric(Rubric),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skill {
    pub id: String,
    pub name: String,
    pub detail: SkillDetail,
}

impl Skill {
    /// Sub-behaviours, empty for rubric skills
    pub fn behaviors(&self) -> &[String] {
        match &self.detail {
            SkillDetail::Behaviors(items) => items,
            SkillDetail::Rubric(_) => &[],
        }
    }

    pub fn rubric(&self) -> Option<&Rubric> {
        match &self.detail {
            SkillDetail::Rubric(rubric) => Some(rubric),
            SkillDetail::Behaviors(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillGroup {
    pub name: String,
    pub skills: Vec<Skill>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub id: String,
    pub label: String,
    /// Presentation hint only
    pub icon: Option<String>,
    pub kind: TabKind,
    pub groups: Vec<SkillGroup>,
}

impl Tab {
    /// A tab is shown only if some group has at least one skill
    pub fn is_visible(&self) -> bool {
        self.groups.iter().any(|g| !g.skills.is_empty())
    }

    pub fn skill_count(&self) -> usize {
        self.groups.iter().map(|g| g.skills.len()).sum()
    }
}

/// One skill together with the tab and group that own it
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry<'a> {
    pub tab: &'a Tab,
    pub group: &'a SkillGroup,
    pub skill: &'a Skill,
}

/// Immutable skill catalog. Construct with [`Catalog::builtin`],
/// [`Catalog::load_from`] or [`Catalog::from_yaml`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    pub(crate) tabs: Vec<Tab>,
}

impl Catalog {
    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn tab(&self, id: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == id)
    }

    /// Every skill in catalog order: tabs, then groups, then skills
    pub fn entries(&self) -> impl Iterator<Item = CatalogEntry<'_>> {
        self.tabs.iter().flat_map(|tab| {
            tab.groups.iter().flat_map(move |group| {
                group
                    .skills
                    .iter()
                    .map(move |skill| CatalogEntry { tab, group, skill })
            })
        })
    }

    /// Total skills across all tabs, visible or not
    pub fn total_skills(&self) -> usize {
        self.tabs.iter().map(Tab::skill_count).sum()
    }

    pub fn contains_skill(&self, id: &str) -> bool {
        self.entries().any(|e| e.skill.id == id)
    }
}
