//! Persistence through the tracker facade.

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use salestrack_core::{
    call_log::CallDraft,
    config::TrackerConfig,
    error::TrackerError,
    product::{CallResult, LiabilityLimit, ProductKey},
    store::TrackerStore,
    tracker::Tracker,
};

fn tracker() -> Tracker {
    let _ = env_logger::builder().is_test(true).try_init();
    Tracker::in_memory().expect("in-memory tracker")
}

fn auto_home_draft() -> CallDraft {
    let mut draft = CallDraft::new();
    draft.liability = LiabilityLimit::Limit50_100;
    draft.toggle_product(ProductKey::Auto);
    draft.toggle_product(ProductKey::Home);
    draft.set_premium(ProductKey::Auto, "1000");
    draft
}

const JUNE: &str = "agent,calls,sales,points,premium\nAlice,100,25,30,5000\nBob,90,9,11,1200\n";

#[test]
fn settings_default_until_changed() {
    let t = tracker();
    assert_eq!(t.agent_name().unwrap(), "Agent");
    assert_eq!(t.work_days().unwrap(), vec![0, 1, 2, 3, 4]);
    assert_eq!(t.tier_targets().unwrap(), TrackerConfig::default().default_tier_targets);
}

#[test]
fn rename_trims_and_ignores_blank() {
    let t = tracker();
    assert_eq!(t.rename_agent("  Jerry ").unwrap(), "Jerry");
    assert_eq!(t.rename_agent("   ").unwrap(), "Jerry");
    assert_eq!(t.agent_name().unwrap(), "Jerry");
}

#[test]
fn work_day_toggles_persist() {
    let t = tracker();
    assert_eq!(t.toggle_work_day(5).unwrap(), vec![0, 1, 2, 3, 4, 5]);
    assert_eq!(t.toggle_work_day(0).unwrap(), vec![1, 2, 3, 4, 5]);
    assert_eq!(t.work_days().unwrap(), vec![1, 2, 3, 4, 5]);
    assert!(matches!(t.toggle_work_day(9), Err(TrackerError::InvalidWorkDay { day: 9 })));
}

#[test]
fn tier_edits_persist_and_reset() {
    let t = tracker();
    let targets = t.update_tier(1, Some("30"), Some("9.5")).unwrap();
    assert_eq!(targets[1].min_points, 30);
    assert_eq!(targets[1].rate, 9.5);
    assert_eq!(t.tier_targets().unwrap()[1].min_points, 30);

    let targets = t.update_tier(0, None, Some("250")).unwrap();
    assert_eq!(targets[0].rate, 100.0);
    assert_eq!(targets[0].min_points, 10);

    assert!(t.update_tier(7, Some("1"), None).is_err());

    t.reset_tiers().unwrap();
    assert_eq!(t.tier_targets().unwrap(), TrackerConfig::default().default_tier_targets);
}

#[test]
fn calls_round_trip_newest_first() {
    let t = tracker();
    let first_at = Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap();
    let first = t.log_call(auto_home_draft(), first_at).unwrap();

    let mut vm = CallDraft::new();
    vm.result = CallResult::Voicemail;
    vm.notes = "left message".into();
    let second = t.log_call(vm, first_at + Duration::minutes(5)).unwrap();

    let calls = t.calls().unwrap();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], second);
    assert_eq!(calls[1], first);
    assert_eq!(calls[1].liability_limit, Some(LiabilityLimit::Limit50_100));
    assert_eq!(calls[1].bonus_reasons, vec!["+2 Home & Auto bundle (50/100)".to_string()]);
}

#[test]
fn delete_and_clear() {
    let t = tracker();
    let now = Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap();
    let a = t.log_call(auto_home_draft(), now).unwrap();
    t.log_call(CallDraft::new(), now).unwrap();
    t.log_call(CallDraft::new(), now).unwrap();

    t.delete_call(&a.id).unwrap();
    assert_eq!(t.store().call_count().unwrap(), 2);
    assert!(matches!(t.delete_call(&a.id), Err(TrackerError::CallNotFound { .. })));

    assert_eq!(t.clear_calls().unwrap(), 2);
    assert!(t.calls().unwrap().is_empty());
}

#[test]
fn recent_calls_respect_limit() {
    let config = TrackerConfig {
        recent_call_limit: 2,
        ..TrackerConfig::default()
    };
    let t = Tracker::new(TrackerStore::in_memory().unwrap(), config).unwrap();
    let start = Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap();
    for i in 0..4 {
        t.log_call(CallDraft::new(), start + Duration::minutes(i)).unwrap();
    }
    let recent = t.recent_calls().unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].timestamp, start + Duration::minutes(3));
    assert_eq!(t.calls().unwrap().len(), 4);
}

#[test]
fn dashboard_reads_stored_settings() {
    let t = tracker();
    let now = Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap();
    for _ in 0..2 {
        t.log_call(auto_home_draft(), now).unwrap();
    }
    // 2 x (2 + 3 base + 2 bonus) = 14 points: Bronze reached, 11 to Superior.
    t.update_tier(0, None, Some("6")).unwrap();

    let stats = t.dashboard(NaiveDate::from_ymd_opt(2024, 6, 28).unwrap()).unwrap();
    assert_eq!(stats.total_points, 14);
    assert_eq!(stats.points_needed, 11);
    assert!((stats.active_rate - 0.06).abs() < 1e-9);
    assert!((stats.projected_commission - 2000.0 * 0.10 * 0.06).abs() < 1e-9);
}

#[test]
fn import_upserts_by_agent_and_period() {
    let t = tracker();
    let batch = t.import_report("june.csv", JUNE.as_bytes(), "2024-06").unwrap();
    assert_eq!(batch.imported, 2);
    assert_eq!(batch.period, "2024-06");

    let fix = "agent,points,premium\nALICE,35,5500\n";
    t.import_report("june-fix.csv", fix.as_bytes(), "2024-06").unwrap();

    let records = t.store().records_for_period("2024-06").unwrap();
    assert_eq!(records.len(), 2);
    let alice = records.iter().find(|r| r.agent_name.eq_ignore_ascii_case("alice")).unwrap();
    assert_eq!(alice.agent_name, "ALICE");
    assert_eq!(alice.points, 35.0);
    assert_eq!(alice.calls, 0);

    let batches = t.store().import_batches().unwrap();
    assert_eq!(batches.len(), 2);
}

#[test]
fn leaderboard_defaults_to_latest_period() {
    let t = tracker();
    assert!(t.leaderboard(None).unwrap().is_none());

    t.import_report("may.csv", "agent,points\nBob,50\n".as_bytes(), "2024-05").unwrap();
    t.import_report("june.csv", JUNE.as_bytes(), "2024-06").unwrap();
    assert_eq!(t.store().periods().unwrap(), vec!["2024-06", "2024-05"]);

    let board = t.leaderboard(None).unwrap().unwrap();
    assert_eq!(board.period, "2024-06");
    assert_eq!(board.entries[0].agent_name, "Alice");

    let may = t.leaderboard(Some("2024-05")).unwrap().unwrap();
    assert_eq!(may.entries.len(), 1);
    assert_eq!(may.entries[0].tier.as_deref(), Some("Top"));
}

#[test]
fn agent_detail_from_store() {
    let t = tracker();
    t.import_report("may.csv", "agent,points\nBob,50\n".as_bytes(), "2024-05").unwrap();
    t.import_report("june.csv", JUNE.as_bytes(), "2024-06").unwrap();

    let bob = t.agent_detail("bob").unwrap();
    assert_eq!(bob.periods.len(), 2);
    assert_eq!(bob.best_period.as_deref(), Some("2024-05"));

    assert!(matches!(t.agent_detail("Nobody"), Err(TrackerError::AgentNotFound { .. })));
}

#[test]
fn non_ascii_names_keep_separate_histories() {
    let t = tracker();
    t.import_report("may.csv", "agent,points\n\u{c9}va,20\n".as_bytes(), "2024-05").unwrap();
    t.import_report("june.csv", "agent,points\n\u{e9}va,30\n".as_bytes(), "2024-06").unwrap();

    let upper = t.agent_detail("\u{c9}va").unwrap();
    assert_eq!(upper.periods.len(), 1);
    assert_eq!(upper.periods[0].record.period, "2024-05");

    let lower = t.agent_detail("\u{e9}VA").unwrap();
    assert_eq!(lower.periods.len(), 1);
    assert_eq!(lower.periods[0].record.period, "2024-06");
}

fn temp_db_path(tag: &str) -> String {
    std::env::temp_dir()
        .join(format!(
            "salestrack-{tag}-{}-{}.db",
            std::process::id(),
            Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ))
        .to_string_lossy()
        .to_string()
}

fn remove_db(path: &str) {
    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{path}{suffix}"));
    }
}

#[test]
fn file_store_survives_reopen() {
    let path_str = temp_db_path("reopen");

    {
        let t = Tracker::new(TrackerStore::open(&path_str).unwrap(), TrackerConfig::default()).unwrap();
        t.rename_agent("Jerry").unwrap();
        t.log_call(auto_home_draft(), Utc::now()).unwrap();
    }

    let t = Tracker::new(TrackerStore::open(&path_str).unwrap(), TrackerConfig::default()).unwrap();
    assert_eq!(t.agent_name().unwrap(), "Jerry");
    assert_eq!(t.calls().unwrap().len(), 1);
    assert_eq!(t.store().path(), Some(path_str.as_str()));

    drop(t);
    remove_db(&path_str);
}

#[test]
fn unreadable_settings_fall_back_to_defaults() {
    let path = temp_db_path("settings");
    {
        let t = Tracker::new(TrackerStore::open(&path).unwrap(), TrackerConfig::default()).unwrap();
        t.rename_agent("Jerry").unwrap();
        t.toggle_work_day(5).unwrap();
        t.update_tier(0, Some("12"), Some("6")).unwrap();
    }
    {
        let conn = rusqlite::Connection::open(&path).unwrap();
        let changed = conn.execute("UPDATE setting SET value_json = '{not json'", []).unwrap();
        assert_eq!(changed, 3);
    }

    let t = Tracker::new(TrackerStore::open(&path).unwrap(), TrackerConfig::default()).unwrap();
    assert_eq!(t.agent_name().unwrap(), "Agent");
    assert_eq!(t.work_days().unwrap(), vec![0, 1, 2, 3, 4]);
    assert_eq!(t.tier_targets().unwrap(), TrackerConfig::default().default_tier_targets);

    // The next write replaces the bad value.
    assert_eq!(t.toggle_work_day(6).unwrap(), vec![0, 1, 2, 3, 4, 6]);
    assert_eq!(t.work_days().unwrap(), vec![0, 1, 2, 3, 4, 6]);

    drop(t);
    remove_db(&path);
}
