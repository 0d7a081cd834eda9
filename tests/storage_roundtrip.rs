#![forbid(unsafe_code)]
use chrono::NaiveDate;
use roulement::{
    DaySchedule, DayType, JsonStorage, Person, Role, Roster, ShiftPeriod, Storage,
};
use tempfile::tempdir;

fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, day).unwrap()
}

fn empty_day(day: u32) -> DaySchedule {
    DaySchedule {
        date: d(day),
        period: ShiftPeriod::Afternoon,
        day_type: DayType::Weekday,
        slots: Vec::new(),
        required_total: 0,
        complete: true,
        warnings: Vec::new(),
    }
}

#[test]
fn roster_round_trip() {
    let dir = tempdir().unwrap();
    let storage = JsonStorage::open(dir.path()).unwrap();

    let roster = Roster {
        people: vec![
            Person::new("Alice", Role::Therapist),
            Person::new("Xavier", Role::Assistant),
        ],
    };
    storage.save_roster(&roster).unwrap();

    let loaded = storage.load_roster().unwrap();
    assert_eq!(loaded.people.len(), 2);
    assert_eq!(loaded.people[0].name, "Alice");
    assert_eq!(loaded.people[0].role, Role::Therapist);
}

#[test]
fn missing_roster_is_an_error_but_optional_inputs_default() {
    let dir = tempdir().unwrap();
    let storage = JsonStorage::open(dir.path()).unwrap();

    assert!(storage.load_roster().is_err());
    assert!(storage.load_holidays().unwrap().is_empty());
    assert!(storage.load_requests().unwrap().is_empty());
    assert!(storage.load_history().unwrap().is_empty());
    assert!(storage.load_config().unwrap().is_none());
    assert!(storage.load_schedule().unwrap().is_empty());
}

#[test]
fn save_schedule_replaces_only_the_covered_range() {
    let dir = tempdir().unwrap();
    let storage = JsonStorage::open(dir.path()).unwrap();

    // première plage : 1 → 3
    storage
        .save_schedule(&[empty_day(1), empty_day(2), empty_day(3)])
        .unwrap();
    // régénération de la plage 2 → 3 ; le jour 1 doit survivre
    let mut regenerated = empty_day(2);
    regenerated.warnings.push("therapist: 1 slot(s) unfilled".into());
    regenerated.complete = false;
    storage
        .save_schedule(&[regenerated, empty_day(3)])
        .unwrap();

    let days = storage.load_schedule().unwrap();
    assert_eq!(days.len(), 3);
    assert_eq!(days[0].date, d(1));
    assert!(days[0].complete);
    assert!(!days[1].complete);
    assert_eq!(days[1].warnings.len(), 1);
}

#[test]
fn save_schedule_with_no_days_leaves_the_document_untouched() {
    let dir = tempdir().unwrap();
    let storage = JsonStorage::open(dir.path()).unwrap();

    storage.save_schedule(&[empty_day(1)]).unwrap();
    storage.save_schedule(&[]).unwrap();
    assert_eq!(storage.load_schedule().unwrap().len(), 1);
}

#[test]
fn corrupt_document_surfaces_a_loading_error() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join(JsonStorage::HOLIDAYS_FILE), b"not-json").unwrap();
    let storage = JsonStorage::open(dir.path()).unwrap();
    assert!(storage.load_holidays().is_err());
}
