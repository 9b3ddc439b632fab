use capmatrix::app::App;
use capmatrix::catalog::Catalog;
use capmatrix::config::Config;
use capmatrix::events::EventBus;
use capmatrix::rating::Rating;
use capmatrix::repl::{self, ReplCommand, ViewState};
use capmatrix::report::Report;
use capmatrix::store::{AssessmentStore, FileStore, FOCUS_KEY, RATINGS_KEY};
use capmatrix::view::{self, Summary};
use chrono::NaiveDate;
use std::path::Path;
use std::sync::Arc;

fn saved_state(dir: &Path) -> (String, String) {
    let read = |key: &str| std::fs::read_to_string(dir.join(format!("{}.json", key))).unwrap();
    (read(RATINGS_KEY), read(FOCUS_KEY))
}

fn summary(catalog: &Catalog, store: &AssessmentStore) -> Summary {
    Summary::compute(catalog, store.ratings(), store.focus_areas())
}

#[test]
fn test_state_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Catalog::builtin().unwrap();

    {
        let mut store = AssessmentStore::load(FileStore::new(dir.path()));
        store.set_rating("ed_1", Rating::Advanced);
        store.set_rating("gen_2", Rating::Basic);
        store.toggle_focus("gen_2");
    }

    let store = AssessmentStore::load(FileStore::new(dir.path()));
    assert_eq!(store.rating("ed_1"), Some(Rating::Advanced));
    assert_eq!(store.rating("gen_2"), Some(Rating::Basic));
    assert!(store.is_focused("gen_2"));

    let s = summary(&catalog, &store);
    assert_eq!(s.rated(), 2);
    assert_eq!(s.focused, 1);
    assert_eq!(s.completion_percent(), 6);
}

#[test]
fn test_toggle_rating_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Catalog::builtin().unwrap();
    let mut store = AssessmentStore::load(FileStore::new(dir.path()));

    assert_eq!(store.set_rating("ed_1", Rating::Basic), Some(Rating::Basic));
    assert_eq!(
        store.set_rating("ed_1", Rating::Intermediate),
        Some(Rating::Intermediate)
    );
    assert_eq!(store.set_rating("ed_1", Rating::Intermediate), None);

    let s = summary(&catalog, &store);
    assert_eq!(s.unrated, catalog.total_skills());
    assert_eq!(s.completion_percent(), 0);

    let saved = std::fs::read_to_string(dir.path().join(format!("{}.json", RATINGS_KEY))).unwrap();
    assert_eq!(saved, "{}");
}

#[test]
fn test_one_corrupt_key_keeps_the_other() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(format!("{}.json", RATINGS_KEY)),
        r#"{"ed_1":"advanced","ed_2":"expert","ed_3":null}"#,
    )
    .unwrap();
    std::fs::write(dir.path().join(format!("{}.json", FOCUS_KEY)), "{not json").unwrap();

    let store = AssessmentStore::load(FileStore::new(dir.path()));
    assert_eq!(store.rating("ed_1"), Some(Rating::Advanced));
    assert_eq!(store.rating("ed_2"), None);
    assert_eq!(store.rating("ed_3"), None);
    assert!(store.focus_areas().is_empty());
}

#[test]
fn test_counts_always_add_up() {
    let catalog = Catalog::builtin().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let mut store = AssessmentStore::load(FileStore::new(dir.path()));

    for (i, entry) in catalog.entries().enumerate() {
        if i % 5 != 0 {
            store.set_rating(&entry.skill.id, Rating::ALL[i % 4]);
        }
    }
    store.set_rating("removed_skill", Rating::Advanced);
    store.toggle_focus("removed_skill");

    let s = summary(&catalog, &store);
    assert_eq!(s.total, 34);
    assert_eq!(s.na + s.basic + s.intermediate + s.advanced + s.unrated, s.total);
    assert_eq!(s.focused, 0);
    assert!(s.completion_percent() <= 100);
}

#[test]
fn test_switching_tabs_and_searching_do_not_change_counts() {
    let catalog = Catalog::builtin().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let mut store = AssessmentStore::load(FileStore::new(dir.path()));
    store.set_rating("gen_1", Rating::Intermediate);
    store.toggle_focus("ed_1");
    let before = summary(&catalog, &store);
    let saved = saved_state(dir.path());

    for tab in view::visible_tabs(&catalog) {
        let _ = view::resolve_tab(&catalog, Some(&tab.id));
        let _ = view::filter_groups(tab, "user");
    }
    assert_eq!(summary(&catalog, &store), before);
    assert_eq!(saved_state(dir.path()), saved);

    let tabs: Vec<&str> = view::visible_tabs(&catalog)
        .iter()
        .map(|t| t.id.as_str())
        .collect();
    assert_eq!(tabs, ["experience", "general"]);
}

#[test]
fn test_session_navigation_leaves_saved_state_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let events = EventBus::new();
    let store = AssessmentStore::load_with_events(FileStore::new(dir.path()), Arc::clone(&events));
    let mut app = App::with_parts(
        Catalog::builtin().unwrap(),
        store,
        Config::default(),
        events,
        Some(dir.path().to_path_buf()),
    );
    let mut state = ViewState::default();

    for command in [
        ReplCommand::Rate {
            skill: "ed_1".into(),
            rating: "basic".into(),
        },
        ReplCommand::Focus("gen_2".into()),
    ] {
        repl::execute(&mut app, &mut state, command).unwrap();
    }
    let saved = saved_state(dir.path());
    let counts = app.summary();

    for command in [
        ReplCommand::Tab("general".into()),
        ReplCommand::Search("mentor".into()),
        ReplCommand::List,
        ReplCommand::Tab("experience".into()),
        ReplCommand::Search("no such behaviour".into()),
        ReplCommand::Clear,
        ReplCommand::Tabs,
        ReplCommand::Show("gen_3".into()),
        ReplCommand::Summary,
    ] {
        repl::execute(&mut app, &mut state, command).unwrap();
    }

    assert_eq!(state.active_tab.as_deref(), Some("experience"));
    assert_eq!(saved_state(dir.path()), saved);
    assert_eq!(app.summary(), counts);
    assert_eq!(saved.0, r#"{"ed_1":"basic"}"#);
}

#[test]
fn test_reset_clears_persisted_state() {
    let catalog = Catalog::builtin().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let mut store = AssessmentStore::load(FileStore::new(dir.path()));
    store.set_rating("ed_1", Rating::Na);
    store.toggle_focus("ed_1");

    assert!(!store.reset_all(|_| false));
    assert_eq!(store.rating("ed_1"), Some(Rating::Na));

    assert!(store.reset_all(|_| true));
    let reloaded = AssessmentStore::load(FileStore::new(dir.path()));
    let s = summary(&catalog, &reloaded);
    assert_eq!(s.rated(), 0);
    assert_eq!(s.focused, 0);
}

#[test]
fn test_csv_report_lists_every_skill() {
    let catalog = Catalog::builtin().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let mut store = AssessmentStore::load(FileStore::new(dir.path()));
    store.set_rating("gen_2", Rating::Advanced);
    store.toggle_focus("gen_2");

    let report = Report::build(
        &catalog,
        &store,
        NaiveDate::from_ymd_opt(2026, 3, 4).unwrap(),
        "%Y-%m-%d",
    );
    assert_eq!(report.rows.len(), 34);
    assert_eq!(report.csv_file_name(), "capability_matrix_2026-03-04.csv");

    let csv = report.to_csv();
    assert!(csv.contains(r#""General Skills","Core Competencies","Leadership","Advanced","YES""#));
    assert_eq!(
        csv.lines()
            .filter(|l| l.starts_with("\"Experience Design\""))
            .count(),
        26
    );
}
