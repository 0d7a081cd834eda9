use crate::model::{DaySchedule, PersonId, Role, Roster};
use serde::Serialize;
use std::collections::HashMap;

/// Seuil sous lequel le rapport émet des recommandations.
const FAIRNESS_ALERT_THRESHOLD: f64 = 70.0;

/// Charge d'une personne sur le run analysé.
#[derive(Debug, Clone, Serialize)]
pub struct PersonBalance {
    pub person: PersonId,
    pub name: String,
    pub role: Role,
    pub assigned: u32,
    /// Écart au nombre moyen de gardes du rôle (positif = sur-affectée).
    pub deviation: f64,
}

/// Rapport d'équité post-run. Lecture seule, aucun effet sur le planning.
#[derive(Debug, Clone, Serialize)]
pub struct BalanceReport {
    pub per_person: Vec<PersonBalance>,
    /// Score global 0–100, 100 = répartition parfaitement plate.
    pub fairness: f64,
    pub recommendations: Vec<String>,
}

impl BalanceReport {
    pub fn mean_for(&self, role: Role) -> f64 {
        let (sum, count) = self
            .per_person
            .iter()
            .filter(|p| p.role == role)
            .fold((0u32, 0u32), |(s, c), p| (s + p.assigned, c + 1));
        if count == 0 {
            0.0
        } else {
            f64::from(sum) / f64::from(count)
        }
    }
}

/// Analyse la répartition des gardes d'un run : totaux par personne, écart à
/// la moyenne du rôle, score d'équité = 100 − écart max/min normalisé
/// (plancher à 0), moyenné sur les rôles.
pub fn analyze(days: &[DaySchedule], roster: &Roster) -> BalanceReport {
    let mut totals: HashMap<PersonId, u32> = HashMap::new();
    for day in days {
        for slot in &day.slots {
            *totals.entry(slot.person.clone()).or_insert(0) += 1;
        }
    }

    let mut per_person = Vec::new();
    let mut fairness_sum = 0.0;
    let mut fairness_roles = 0u32;
    let mut recommendations = Vec::new();

    for role in Role::ALL {
        let people: Vec<_> = roster.active_in_role(role).collect();
        if people.is_empty() {
            continue;
        }
        let counts: Vec<u32> = people
            .iter()
            .map(|p| totals.get(&p.id).copied().unwrap_or(0))
            .collect();
        let mean = counts.iter().sum::<u32>() as f64 / counts.len() as f64;
        let min = *counts.iter().min().unwrap_or(&0);
        let max = *counts.iter().max().unwrap_or(&0);

        for (person, count) in people.iter().zip(&counts) {
            per_person.push(PersonBalance {
                person: person.id.clone(),
                name: person.name.clone(),
                role,
                assigned: *count,
                deviation: f64::from(*count) - mean,
            });
        }

        // écart normalisé par la moyenne : un même écart brut pèse moins sur
        // une longue période qu'à faible charge
        let spread = f64::from(max - min);
        let role_fairness = if mean > 0.0 {
            (100.0 - spread / mean * 50.0).max(0.0)
        } else {
            100.0
        };
        fairness_sum += role_fairness;
        fairness_roles += 1;

        if role_fairness < FAIRNESS_ALERT_THRESHOLD {
            let over: Vec<&str> = people
                .iter()
                .zip(&counts)
                .filter(|(_, c)| **c == max)
                .map(|(p, _)| p.name.as_str())
                .collect();
            let under: Vec<&str> = people
                .iter()
                .zip(&counts)
                .filter(|(_, c)| **c == min)
                .map(|(p, _)| p.name.as_str())
                .collect();
            recommendations.push(format!(
                "{role}: uneven load (spread {max}-{min}); favour {} over {} on upcoming days",
                under.join(", "),
                over.join(", ")
            ));
        }
    }

    let fairness = if fairness_roles == 0 {
        100.0
    } else {
        fairness_sum / f64::from(fairness_roles)
    };

    BalanceReport {
        per_person,
        fairness,
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::DayType;
    use crate::model::{Person, ShiftPeriod, ShiftSlot, SlotOrigin};
    use chrono::NaiveDate;

    fn day_with(people: &[&Person], day: u32) -> DaySchedule {
        DaySchedule {
            date: NaiveDate::from_ymd_opt(2025, 10, day).unwrap(),
            period: ShiftPeriod::Afternoon,
            day_type: DayType::Weekday,
            slots: people
                .iter()
                .map(|p| ShiftSlot {
                    person: p.id.clone(),
                    role: p.role,
                    origin: SlotOrigin::Auto,
                    confidence: 100.0,
                })
                .collect(),
            required_total: people.len() as u32,
            complete: true,
            warnings: Vec::new(),
        }
    }

    #[test]
    fn flat_distribution_scores_100() {
        let a = Person::new("Alice", Role::Therapist);
        let b = Person::new("Bruno", Role::Therapist);
        let x = Person::new("Xavier", Role::Assistant);
        let roster = Roster {
            people: vec![a.clone(), b.clone(), x.clone()],
        };
        let days = vec![day_with(&[&a, &x], 1), day_with(&[&b, &x], 2)];

        let report = analyze(&days, &roster);
        assert_eq!(report.fairness, 100.0);
        assert!(report.recommendations.is_empty());
        let alice = report
            .per_person
            .iter()
            .find(|p| p.person == a.id)
            .unwrap();
        assert_eq!(alice.assigned, 1);
        assert_eq!(alice.deviation, 0.0);
    }

    #[test]
    fn skewed_distribution_triggers_recommendations() {
        let a = Person::new("Alice", Role::Therapist);
        let b = Person::new("Bruno", Role::Therapist);
        let x = Person::new("Xavier", Role::Assistant);
        let roster = Roster {
            people: vec![a.clone(), b.clone(), x.clone()],
        };
        // Alice prend tout, Bruno rien
        let days: Vec<DaySchedule> = (1..=4).map(|d| day_with(&[&a, &x], d)).collect();

        let report = analyze(&days, &roster);
        assert!(report.fairness < 100.0);
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.contains("Bruno") && r.contains("Alice")));
    }

    #[test]
    fn empty_schedule_is_neutral() {
        let roster = Roster::default();
        let report = analyze(&[], &roster);
        assert_eq!(report.fairness, 100.0);
        assert!(report.per_person.is_empty());
    }
}
