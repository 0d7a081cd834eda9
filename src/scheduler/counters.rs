use crate::model::{HistoryEntry, PersonId, Role, Roster, ShiftPeriod};
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};

/// Vue indexée de l'historique glissant : dates travaillées et totaux par
/// personne. Construite une fois avant la boucle, lecture seule ensuite.
#[derive(Debug, Clone, Default)]
pub struct ShiftHistory {
    dates: HashMap<PersonId, BTreeSet<NaiveDate>>,
    mornings: HashMap<PersonId, u32>,
}

impl ShiftHistory {
    pub fn from_entries(entries: &[HistoryEntry]) -> Self {
        let mut out = Self::default();
        for entry in entries {
            out.dates
                .entry(entry.person.clone())
                .or_default()
                .insert(entry.date);
            if entry.period == ShiftPeriod::Morning {
                *out.mornings.entry(entry.person.clone()).or_insert(0) += 1;
            }
        }
        out
    }

    pub fn total(&self, person: &PersonId) -> u32 {
        self.dates.get(person).map_or(0, |d| d.len() as u32)
    }

    pub fn mornings(&self, person: &PersonId) -> u32 {
        self.mornings.get(person).copied().unwrap_or(0)
    }

    pub fn worked_on(&self, person: &PersonId, date: NaiveDate) -> bool {
        self.dates.get(person).is_some_and(|d| d.contains(&date))
    }

    pub fn is_empty_for(&self, person: &PersonId) -> bool {
        self.total(person) == 0
    }
}

/// Compteurs de charge du run courant, amorcés par l'historique glissant.
/// Possédés exclusivement par un run ; incrémentés à chaque affectation,
/// quelle qu'en soit l'origine.
#[derive(Debug, Clone, Default)]
pub struct WorkloadCounters {
    totals: HashMap<PersonId, u32>,
    mornings: HashMap<PersonId, u32>,
}

impl WorkloadCounters {
    /// Amorce les compteurs avec la fenêtre d'historique pour que l'équité
    /// enjambe la frontière du run.
    pub fn seeded(roster: &Roster, history: &ShiftHistory) -> Self {
        let mut out = Self::default();
        for person in &roster.people {
            out.totals.insert(person.id.clone(), history.total(&person.id));
            out.mornings
                .insert(person.id.clone(), history.mornings(&person.id));
        }
        out
    }

    pub fn record(&mut self, person: &PersonId, period: ShiftPeriod) {
        *self.totals.entry(person.clone()).or_insert(0) += 1;
        if period == ShiftPeriod::Morning {
            *self.mornings.entry(person.clone()).or_insert(0) += 1;
        }
    }

    pub fn total(&self, person: &PersonId) -> u32 {
        self.totals.get(person).copied().unwrap_or(0)
    }

    pub fn mornings(&self, person: &PersonId) -> u32 {
        self.mornings.get(person).copied().unwrap_or(0)
    }

    /// Moyenne des totaux sur les actifs du rôle.
    pub fn role_mean(&self, roster: &Roster, role: Role) -> f64 {
        let totals: Vec<u32> = roster
            .active_in_role(role)
            .map(|p| self.total(&p.id))
            .collect();
        if totals.is_empty() {
            return 0.0;
        }
        totals.iter().sum::<u32>() as f64 / totals.len() as f64
    }

    /// (min, max) des totaux sur les actifs du rôle.
    pub fn role_spread(&self, roster: &Roster, role: Role) -> Option<(u32, u32)> {
        let mut min = u32::MAX;
        let mut max = 0u32;
        let mut seen = false;
        for p in roster.active_in_role(role) {
            let t = self.total(&p.id);
            min = min.min(t);
            max = max.max(t);
            seen = true;
        }
        seen.then_some((min, max))
    }

    /// Moyenne des gardes du matin sur les actifs du rôle.
    pub fn role_morning_mean(&self, roster: &Roster, role: Role) -> f64 {
        let counts: Vec<u32> = roster
            .active_in_role(role)
            .map(|p| self.mornings(&p.id))
            .collect();
        if counts.is_empty() {
            return 0.0;
        }
        counts.iter().sum::<u32>() as f64 / counts.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Person;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, day).unwrap()
    }

    #[test]
    fn history_indexes_totals_and_mornings() {
        let id = PersonId::new("a");
        let entries = vec![
            HistoryEntry {
                person: id.clone(),
                date: d(1),
                period: ShiftPeriod::Morning,
            },
            HistoryEntry {
                person: id.clone(),
                date: d(2),
                period: ShiftPeriod::Afternoon,
            },
        ];
        let history = ShiftHistory::from_entries(&entries);
        assert_eq!(history.total(&id), 2);
        assert_eq!(history.mornings(&id), 1);
        assert!(history.worked_on(&id, d(2)));
        assert!(!history.worked_on(&id, d(3)));
    }

    #[test]
    fn counters_seed_from_history_and_record() {
        let mut roster = Roster::default();
        let mut p = Person::new("Alice", Role::Therapist);
        p.id = PersonId::new("a");
        roster.people.push(p);

        let entries = vec![HistoryEntry {
            person: PersonId::new("a"),
            date: d(1),
            period: ShiftPeriod::Morning,
        }];
        let history = ShiftHistory::from_entries(&entries);
        let mut counters = WorkloadCounters::seeded(&roster, &history);
        assert_eq!(counters.total(&PersonId::new("a")), 1);

        counters.record(&PersonId::new("a"), ShiftPeriod::Morning);
        assert_eq!(counters.total(&PersonId::new("a")), 2);
        assert_eq!(counters.mornings(&PersonId::new("a")), 2);
        assert_eq!(counters.role_mean(&roster, Role::Therapist), 2.0);
    }
}
