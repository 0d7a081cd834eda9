#![forbid(unsafe_code)]
use chrono::NaiveDate;
use roulement::{
    balance, Engine, HistoryEntry, Person, PersonId, Role, Roster, RunOptions, ShiftConfig,
    ShiftPeriod,
};

fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, day).unwrap()
}

fn person(id: &str, name: &str, role: Role) -> Person {
    let mut p = Person::new(name, role);
    p.id = PersonId::new(id);
    p
}

fn spread(run: &roulement::ScheduleRun, ids: &[&str]) -> u32 {
    let counts: Vec<u32> = ids
        .iter()
        .map(|id| run.count_for(&PersonId::new(id)))
        .collect();
    counts.iter().max().unwrap() - counts.iter().min().unwrap()
}

#[test]
fn consecutive_cap_leaves_the_day_incomplete_rather_than_violating() {
    // un seul thérapeute : après 3 jours de série (plafond), le 4e jour reste
    // en sous-effectif au lieu de forcer la garde
    let roster = Roster {
        people: vec![
            person("t1", "Alice", Role::Therapist),
            person("a1", "Xavier", Role::Assistant),
        ],
    };
    let mut config = ShiftConfig::default();
    config.weekday.therapists = 1;
    config.weekend.therapists = 1;
    config.weekday.assistants = 1;
    config.weekend.assistants = 1;

    let engine = Engine::new(roster, config.clone());
    // lundi 6 → samedi 11 : 6 jours ouvrés
    let run = engine.generate(d(6), d(11), &RunOptions::default()).unwrap();
    assert_eq!(run.days.len(), 6);

    // jours 6,7,8 travaillés, jour 9 de repos forcé, reprise le 10
    for (idx, expected) in [(0, true), (1, true), (2, true), (3, false), (4, true)] {
        assert_eq!(
            run.days[idx].contains(&PersonId::new("t1")),
            expected,
            "day {}",
            run.days[idx].date
        );
    }
    let day4 = &run.days[3];
    assert!(!day4.complete);
    assert!(day4.warnings.iter().any(|w| w.contains("therapist")));

    // aucune série ne dépasse le plafond du rôle
    let mut streak = 0u32;
    for day in &run.days {
        if day.contains(&PersonId::new("t1")) {
            streak += 1;
            assert!(streak <= config.max_consecutive.therapist);
        } else {
            streak = 0;
        }
    }
}

#[test]
fn assistants_tolerate_longer_streaks_than_therapists() {
    let roster = Roster {
        people: vec![
            person("t1", "Alice", Role::Therapist),
            person("t2", "Bruno", Role::Therapist),
            person("a1", "Xavier", Role::Assistant),
        ],
    };
    let mut config = ShiftConfig::default();
    config.weekday.therapists = 1;
    config.weekend.therapists = 1;

    let engine = Engine::new(roster, config);
    // lundi 6 → samedi 11 : l'assistant seul enchaîne 5 jours (son plafond)
    let run = engine.generate(d(6), d(11), &RunOptions::default()).unwrap();

    let worked: Vec<bool> = run
        .days
        .iter()
        .map(|day| day.contains(&PersonId::new("a1")))
        .collect();
    assert_eq!(worked, vec![true, true, true, true, true, false]);
    assert!(!run.days[5].complete);
}

#[test]
fn balancing_never_widens_the_spread() {
    let roster = Roster {
        people: vec![
            person("t1", "Alice", Role::Therapist),
            person("t2", "Bruno", Role::Therapist),
            person("t3", "Chloé", Role::Therapist),
            person("t4", "Diane", Role::Therapist),
            person("t5", "Émile", Role::Therapist),
            person("a1", "Xavier", Role::Assistant),
            person("a2", "Yaël", Role::Assistant),
        ],
    };

    let fair = ShiftConfig::default();
    let mut unfair = ShiftConfig::default();
    unfair.fairness_weight = 0.0;

    let run_fair = Engine::new(roster.clone(), fair)
        .generate(d(1), d(31), &RunOptions::default())
        .unwrap();
    let run_unfair = Engine::new(roster, unfair)
        .generate(d(1), d(31), &RunOptions::default())
        .unwrap();

    let therapists = ["t1", "t2", "t3", "t4", "t5"];
    assert!(spread(&run_fair, &therapists) <= spread(&run_unfair, &therapists));
    assert!(spread(&run_fair, &therapists) <= 1);
}

#[test]
fn history_seeds_the_rotation_order() {
    // t1 chargé sur la fenêtre passée : le premier jour va à t2
    let roster = Roster {
        people: vec![
            person("t1", "Alice", Role::Therapist),
            person("t2", "Bruno", Role::Therapist),
            person("a1", "Xavier", Role::Assistant),
        ],
    };
    let mut config = ShiftConfig::default();
    config.weekday.therapists = 1;

    let history: Vec<HistoryEntry> = (1..=3)
        .map(|day| HistoryEntry {
            person: PersonId::new("t1"),
            date: NaiveDate::from_ymd_opt(2025, 9, day).unwrap(),
            period: ShiftPeriod::Afternoon,
        })
        .collect();

    let engine = Engine::new(roster, config).with_history(history);
    let run = engine.generate(d(6), d(6), &RunOptions::default()).unwrap();
    assert!(run.days[0].contains(&PersonId::new("t2")));
    assert!(!run.days[0].contains(&PersonId::new("t1")));
}

#[test]
fn streak_straddles_the_run_boundary_via_history() {
    // série de 3 jours finissant la veille du run : t1 doit souffler le 1er jour
    let roster = Roster {
        people: vec![
            person("t1", "Alice", Role::Therapist),
            person("t2", "Bruno", Role::Therapist),
            person("a1", "Xavier", Role::Assistant),
        ],
    };
    let mut config = ShiftConfig::default();
    config.weekday.therapists = 1;

    let history: Vec<HistoryEntry> = (3..=5)
        .map(|day| HistoryEntry {
            person: PersonId::new("t1"),
            date: d(day),
            period: ShiftPeriod::Afternoon,
        })
        .collect();

    let engine = Engine::new(roster, config).with_history(history);
    let run = engine.generate(d(6), d(6), &RunOptions::default()).unwrap();
    assert!(run.days[0].contains(&PersonId::new("t2")));
}

#[test]
fn balance_report_matches_engine_output() {
    let roster = Roster {
        people: vec![
            person("t1", "Alice", Role::Therapist),
            person("t2", "Bruno", Role::Therapist),
            person("t3", "Chloé", Role::Therapist),
            person("a1", "Xavier", Role::Assistant),
            person("a2", "Yaël", Role::Assistant),
        ],
    };
    let engine = Engine::new(roster.clone(), ShiftConfig::default());
    let run = engine.generate(d(6), d(12), &RunOptions::default()).unwrap();

    let report = balance::analyze(&run.days, &roster);
    assert_eq!(report.fairness, 100.0);
    assert_eq!(report.mean_for(Role::Therapist), 4.0);
    assert_eq!(report.mean_for(Role::Assistant), 3.0);
    for entry in &report.per_person {
        assert_eq!(entry.assigned, run.count_for(&entry.person));
    }
}
