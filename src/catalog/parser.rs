//! Catalog YAML parser and validation.

use super::model::{Catalog, Rubric, Skill, SkillDetail, SkillGroup, Tab, TabKind};
use crate::error::CatalogError;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Built-in catalog shipped with the binary
const BUILTIN_CATALOG: &str = include_str!("default.yaml");

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    tabs: Vec<TabDef>,
}

#[derive(Debug, Deserialize)]
struct TabDef {
    id: String,
    label: String,
    #[serde(default)]
    icon: Option<String>,
    kind: TabKind,
    #[serde(default)]
    groups: Vec<GroupDef>,
}

#[derive(Debug, Deserialize)]
struct GroupDef {
    name: String,
    #[serde(default)]
    skills: Vec<SkillDef>,
}

#[derive(Debug, Deserialize)]
struct SkillDef {
    id: String,
    name: String,
    #[serde(default)]
    behaviors: Option<Vec<String>>,
    #[serde(default)]
    levels: Option<Rubric>,
}

impl Catalog {
    /// Parse the catalog embedded in the binary
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_yaml(BUILTIN_CATALOG)
    }

    /// Load and validate a catalog from a YAML file
    pub fn load_from(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Parse and validate a catalog from YAML text
    pub fn from_yaml(content: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_yaml::from_str(content)?;
        build(file)
    }
}

fn build(file: CatalogFile) -> Result<Catalog, CatalogError> {
    if file.tabs.is_empty() {
        return Err(CatalogError::NoTabs);
    }

    let mut tab_ids = HashSet::new();
    // skill id -> owning tab id
    let mut seen: HashMap<String, String> = HashMap::new();
    let mut tabs = Vec::with_capacity(file.tabs.len());

    for tab in file.tabs {
        if tab.id.trim().is_empty() {
            return Err(CatalogError::MissingField(format!("tab id ({})", tab.label)));
        }
        if !tab_ids.insert(tab.id.clone()) {
            return Err(CatalogError::DuplicateTabId(tab.id));
        }

        let mut groups = Vec::with_capacity(tab.groups.len());
        for group in tab.groups {
            let mut skills = Vec::with_capacity(group.skills.len());
            for def in group.skills {
                if def.id.trim().is_empty() || def.name.trim().is_empty() {
                    return Err(CatalogError::MissingField(format!("{}/{}", def.id, def.name)));
                }
                if let Some(first_tab) = seen.get(&def.id) {
                    return Err(CatalogError::DuplicateSkillId {
                        id: def.id,
                        first_tab: first_tab.clone(),
                        second_tab: tab.id,
                    });
                }
                seen.insert(def.id.clone(), tab.id.clone());

                let detail = resolve_detail(&def, &tab.id, tab.kind)?;
                skills.push(Skill {
                    id: def.id,
                    name: def.name,
                    detail,
                });
            }
            groups.push(SkillGroup {
                name: group.name,
                skills,
            });
        }

        tabs.push(Tab {
            id: tab.id,
            label: tab.label,
            icon: tab.icon,
            kind: tab.kind,
            groups,
        });
    }

    Ok(Catalog { tabs })
}

fn resolve_detail(def: &SkillDef, tab_id: &str, kind: TabKind) -> Result<SkillDetail, CatalogError> {
    let mismatch = |reason| CatalogError::DetailMismatch {
        skill: def.id.clone(),
        tab: tab_id.to_string(),
        kind: kind.as_str(),
        reason,
    };

    match (kind, &def.behaviors, &def.levels) {
        (_, Some(_), Some(_)) => Err(mismatch("defines both behaviors and levels")),
        (TabKind::Experience, _, Some(_)) => Err(mismatch("levels are only allowed in general tabs")),
        (TabKind::Experience, behaviors, None) => Ok(SkillDetail::Behaviors(
            behaviors.clone().unwrap_or_default(),
        )),
        (TabKind::General, Some(_), None) => {
            Err(mismatch("behaviors are only allowed in experience tabs"))
        }
        (TabKind::General, None, None) => Err(mismatch("missing basic/intermediate/advanced levels")),
        (TabKind::General, None, Some(rubric)) => Ok(SkillDetail::Rubric(rubric.clone())),
    }
}
