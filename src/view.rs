//! Derived views over the catalog: visible tabs, search filtering and
//! whole-catalog summary counts. Everything here is a pure function of its
//! inputs.

use crate::catalog::{Catalog, CatalogEntry, Skill, Tab};
use crate::rating::Rating;
use crate::store::{FocusAreasMap, RatingsMap};

/// Tabs with at least one skill, in catalog order
pub fn visible_tabs(catalog: &Catalog) -> Vec<&Tab> {
    catalog.tabs().iter().filter(|t| t.is_visible()).collect()
}

/// First visible tab, or the first catalog tab when none is visible
pub fn default_tab(catalog: &Catalog) -> &Tab {
    catalog
        .tabs()
        .iter()
        .find(|t| t.is_visible())
        .unwrap_or(&catalog.tabs()[0])
}

/// The visible tab named `requested`, otherwise [`default_tab`]
pub fn resolve_tab<'a>(catalog: &'a Catalog, requested: Option<&str>) -> &'a Tab {
    requested
        .and_then(|id| catalog.tabs().iter().find(|t| t.id == id && t.is_visible()))
        .unwrap_or_else(|| default_tab(catalog))
}

/// A skill group after filtering
#[derive(Debug, Clone)]
pub struct GroupView<'a> {
    pub name: &'a str,
    pub skills: Vec<&'a Skill>,
}

/// Groups of `tab` whose skills match `query`.
///
/// A blank query returns every group as-is, empty ones included.
/// Otherwise matching is a case-insensitive substring test against the
/// skill name and its sub-behaviours (rubric text is not searched), and
/// groups left without skills are dropped.
pub fn filter_groups<'a>(tab: &'a Tab, query: &str) -> Vec<GroupView<'a>> {
    let query = query.trim();
    if query.is_empty() {
        return tab
            .groups
            .iter()
            .map(|g| GroupView {
                name: &g.name,
                skills: g.skills.iter().collect(),
            })
            .collect();
    }

    let needle = query.to_lowercase();
    tab.groups
        .iter()
        .filter_map(|g| {
            let skills: Vec<&Skill> = g
                .skills
                .iter()
                .filter(|s| skill_matches(s, &needle))
                .collect();
            (!skills.is_empty()).then_some(GroupView {
                name: &g.name,
                skills,
            })
        })
        .collect()
}

fn skill_matches(skill: &Skill, needle: &str) -> bool {
    skill.name.to_lowercase().contains(needle)
        || skill
            .behaviors()
            .iter()
            .any(|b| b.to_lowercase().contains(needle))
}

/// Locate a skill by id anywhere in the catalog
pub fn find_skill<'a>(catalog: &'a Catalog, id: &str) -> Option<CatalogEntry<'a>> {
    catalog.entries().find(|e| e.skill.id == id)
}

/// Aggregate counts over the entire catalog.
///
/// Ids in the maps that the catalog does not know are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub na: usize,
    pub basic: usize,
    pub intermediate: usize,
    pub advanced: usize,
    pub unrated: usize,
    pub focused: usize,
}

impl Summary {
    pub fn compute(catalog: &Catalog, ratings: &RatingsMap, focus: &FocusAreasMap) -> Self {
        let mut summary = Summary::default();

        for entry in catalog.entries() {
            let id = entry.skill.id.as_str();
            summary.total += 1;
            match ratings.get(id) {
                Some(Rating::Na) => summary.na += 1,
                Some(Rating::Basic) => summary.basic += 1,
                Some(Rating::Intermediate) => summary.intermediate += 1,
                Some(Rating::Advanced) => summary.advanced += 1,
                None => summary.unrated += 1,
            }
            if focus.get(id).copied().unwrap_or(false) {
                summary.focused += 1;
            }
        }

        summary
    }

    /// Skills with any explicit rating, `na` included
    pub fn rated(&self) -> usize {
        self.total - self.unrated
    }

    pub fn count(&self, rating: Rating) -> usize {
        match rating {
            Rating::Na => self.na,
            Rating::Basic => self.basic,
            Rating::Intermediate => self.intermediate,
            Rating::Advanced => self.advanced,
        }
    }

    /// `round(100 * rated / total)`, halves rounded up; 0 for an empty catalog
    pub fn completion_percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        let rated = self.rated() as u64;
        let total = self.total as u64;
        ((200 * rated + total) / (2 * total)) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"
tabs:
  - id: empty
    label: Placeholder
    kind: experience
    groups:
      - name: Nothing yet
        skills: []
  - id: exp
    label: Experience
    kind: experience
    groups:
      - name: Framing
        skills:
          - id: s1
            name: Problem framing
            behaviors:
              - Reframe briefs based on new evidence.
          - id: s2
            name: Ecosystem mapping
            behaviors:
              - Map dependencies and incentives.
      - name: Empty group
        skills: []
      - name: Research
        skills:
          - id: s3
            name: Synthesis
            behaviors:
              - Cluster data to find patterns.
  - id: gen
    label: General
    kind: general
    groups:
      - name: Core
        skills:
          - id: g1
            name: Leadership
            levels:
              basic: Needs guidance.
              intermediate: Motivates others.
              advanced: Provides thought leadership.
"#;

    fn catalog() -> Catalog {
        Catalog::from_yaml(CATALOG).unwrap()
    }

    #[test]
    fn test_visible_and_default_tab() {
        let catalog = catalog();
        let ids: Vec<_> = visible_tabs(&catalog).iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["exp", "gen"]);
        assert_eq!(default_tab(&catalog).id, "exp");

        assert_eq!(resolve_tab(&catalog, Some("gen")).id, "gen");
        assert_eq!(resolve_tab(&catalog, Some("empty")).id, "exp");
        assert_eq!(resolve_tab(&catalog, Some("missing")).id, "exp");
        assert_eq!(resolve_tab(&catalog, None).id, "exp");
    }

    #[test]
    fn test_default_tab_falls_back_when_nothing_visible() {
        let catalog = Catalog::from_yaml(
            "tabs:\n  - {id: a, label: A, kind: experience, groups: []}\n  - {id: b, label: B, kind: general}\n",
        )
        .unwrap();
        assert!(visible_tabs(&catalog).is_empty());
        assert_eq!(default_tab(&catalog).id, "a");
    }

    #[test]
    fn test_blank_query_is_identity() {
        let catalog = catalog();
        let tab = catalog.tab("exp").unwrap();
        let groups = filter_groups(tab, "   ");
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[1].name, "Empty group");
        assert!(groups[1].skills.is_empty());
    }

    #[test]
    fn test_query_matches_name_or_behavior_case_insensitively() {
        let catalog = catalog();
        let tab = catalog.tab("exp").unwrap();

        let groups = filter_groups(tab, "FRAMING");
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].skills[0].id, "s1");

        let groups = filter_groups(tab, "patterns");
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "Research");

        assert!(filter_groups(tab, "no such thing").is_empty());
    }

    #[test]
    fn test_rubric_text_is_not_searched() {
        let catalog = catalog();
        let tab = catalog.tab("gen").unwrap();
        assert!(filter_groups(tab, "thought leadership").is_empty());
        assert_eq!(filter_groups(tab, "leader").len(), 1);
    }

    #[test]
    fn test_summary_ignores_stale_ids() {
        let catalog = catalog();
        let mut ratings = RatingsMap::new();
        ratings.insert("s1".into(), Rating::Basic);
        ratings.insert("g1".into(), Rating::Na);
        ratings.insert("retired_skill".into(), Rating::Advanced);
        let mut focus = FocusAreasMap::new();
        focus.insert("s2".into(), true);
        focus.insert("s3".into(), false);
        focus.insert("retired_skill".into(), true);

        let summary = Summary::compute(&catalog, &ratings, &focus);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.basic, 1);
        assert_eq!(summary.na, 1);
        assert_eq!(summary.advanced, 0);
        assert_eq!(summary.unrated, 2);
        assert_eq!(summary.focused, 1);
        assert_eq!(summary.completion_percent(), 50);
        assert_eq!(
            summary.na + summary.basic + summary.intermediate + summary.advanced + summary.unrated,
            summary.total
        );
    }

    #[test]
    fn test_completion_rounding() {
        let summary = |total, unrated| Summary {
            total,
            unrated,
            ..Summary::default()
        };
        assert_eq!(summary(0, 0).completion_percent(), 0);
        assert_eq!(summary(3, 2).completion_percent(), 33);
        assert_eq!(summary(3, 1).completion_percent(), 67);
        assert_eq!(summary(8, 7).completion_percent(), 13); // 12.5 rounds up
        assert_eq!(summary(34, 0).completion_percent(), 100);
    }
}
