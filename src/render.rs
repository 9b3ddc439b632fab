//! Terminal renderings of tabs, skills and the summary.

use crate::catalog::{CatalogEntry, Skill, SkillDetail, Tab};
use crate::rating::Rating;
use crate::store::AssessmentStore;
use crate::view::{GroupView, Summary};

const NO_MATCHES_HINT: &str = "Clear the search to see every skill in this category.";
const UNDEFINED_DISCIPLINE: &str =
    "Specific skills for this discipline have not been defined in the current matrix version.";

/// Visible tabs, one per line, the active one marked
pub fn tabs(tabs: &[&Tab], active: &Tab) -> String {
    tabs.iter()
        .map(|tab| {
            let marker = if tab.id == active.id { '>' } else { ' ' };
            format!(
                "{} {:<12} {} ({} skills, {})",
                marker,
                tab.id,
                tab.label,
                tab.skill_count(),
                tab.kind.as_str()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One-line skill status: focus star, id, name, rating
pub fn skill_line(skill: &Skill, store: &AssessmentStore) -> String {
    let star = if store.is_focused(&skill.id) { '*' } else { ' ' };
    let status = match store.rating(&skill.id) {
        Some(rating) => format!("Rated: {}", rating.label()),
        None => "Not yet rated".to_string(),
    };
    format!("{} {:<24} {}  [{}]", star, skill.id, skill.name, status)
}

/// Filtered groups of the active tab, or an explanation when there are none
pub fn groups(groups: &[GroupView<'_>], store: &AssessmentStore, query: &str) -> String {
    if groups.iter().all(|g| g.skills.is_empty()) {
        let query = query.trim();
        return if query.is_empty() {
            format!("No skills found. {}", UNDEFINED_DISCIPLINE)
        } else {
            format!(
                "No skills found matching \"{}\" in this category. {}",
                query, NO_MATCHES_HINT
            )
        };
    }

    let mut out = Vec::new();
    for group in groups {
        out.push(format!("\n{}", group.name.to_uppercase()));
        if group.skills.is_empty() {
            out.push("  (no skills)".to_string());
        }
        for skill in &group.skills {
            out.push(skill_line(skill, store));
        }
    }
    out.join("\n")
}

/// Expanded view of one skill
pub fn skill_detail(entry: &CatalogEntry<'_>, store: &AssessmentStore) -> String {
    let skill = entry.skill;
    let current = store.rating(&skill.id);

    let mut out = vec![
        skill_line(skill, store),
        format!("  {} / {}", entry.tab.label, entry.group.name),
        String::new(),
    ];

    match &skill.detail {
        SkillDetail::Rubric(rubric) => {
            out.push("Proficiency definitions".to_string());
            for level in Rating::LEVELS {
                let marker = if current == Some(level) { '>' } else { ' ' };
                let text = rubric.describe(level).unwrap_or_default();
                out.push(format!("{} {:<13} {}", marker, level.label(), text));
            }
        }
        SkillDetail::Behaviors(behaviors) => {
            out.push("Observable behaviours".to_string());
            if behaviors.is_empty() {
                out.push("  (none listed)".to_string());
            }
            for behavior in behaviors {
                out.push(format!("  - {}", behavior));
            }
        }
    }

    out.join("\n")
}

/// Counters, completion first
pub fn summary(summary: &Summary) -> String {
    format!(
        "Completion:   {}% ({} of {} rated)\nFocus Areas:  {}\nBasic:        {}\nIntermediate: {}\nAdvanced:     {}\nN/A:          {}",
        summary.completion_percent(),
        summary.rated(),
        summary.total,
        summary.focused,
        summary.basic,
        summary.intermediate,
        summary.advanced,
        summary.na,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::store::MemoryStore;
    use crate::view::{self, find_skill};

    #[test]
    fn test_skill_line_shows_status_and_focus() {
        let catalog = Catalog::builtin().unwrap();
        let mut store = AssessmentStore::load(MemoryStore::new());
        let entry = find_skill(&catalog, "ed_1").unwrap();

        assert!(skill_line(entry.skill, &store).contains("Not yet rated"));
        store.set_rating("ed_1", Rating::Intermediate);
        store.toggle_focus("ed_1");
        let line = skill_line(entry.skill, &store);
        assert!(line.starts_with('*'));
        assert!(line.contains("Rated: Intermediate"));
    }

    #[test]
    fn test_rubric_detail_marks_current_level() {
        let catalog = Catalog::builtin().unwrap();
        let mut store = AssessmentStore::load(MemoryStore::new());
        store.set_rating("gen_3", Rating::Advanced);

        let detail = skill_detail(&find_skill(&catalog, "gen_3").unwrap(), &store);
        assert!(detail.contains("Proficiency definitions"));
        assert!(detail.contains("> Advanced"));
        assert!(detail.contains("  Basic"));
    }

    #[test]
    fn test_empty_results_explain_why() {
        let catalog = Catalog::builtin().unwrap();
        let store = AssessmentStore::load(MemoryStore::new());

        let tab = catalog.tab("experience").unwrap();
        let filtered = view::filter_groups(tab, "zzz-not-a-skill");
        assert!(groups(&filtered, &store, "zzz-not-a-skill").contains("matching \"zzz-not-a-skill\""));

        let placeholder = catalog.tab("service").unwrap();
        let all = view::filter_groups(placeholder, "");
        assert!(groups(&all, &store, "").contains("have not been defined"));
    }
}
