use crate::calendar::DayType;
use crate::config::{DayRule, ShiftConfig};
use crate::model::{DaySchedule, Person, PersonId, Role, Roster, ShiftSlot, SlotOrigin};
use chrono::NaiveDate;
use rand::rngs::StdRng;
use std::collections::HashMap;
use tracing::debug;

use super::counters::{ShiftHistory, WorkloadCounters};
use super::requests::DayRequests;
use super::rotation::RotationQueue;
use super::scoring::{self, ScoreContext};

/// État mutable d'un run : compteurs, files d'équité, RNG. Possédé par un seul
/// run, jamais partagé.
pub(super) struct RunState {
    pub counters: WorkloadCounters,
    pub queues: HashMap<Role, RotationQueue>,
    pub rng: Option<StdRng>,
}

/// Étape d'affectation d'un jour : demandes "want" d'abord (bornées par le
/// quota), puis complément par les files d'équité. Les exclusions dures
/// (decline/leave, plafond consécutif, repos minimal) priment sur tout score.
#[allow(clippy::too_many_arguments)]
pub(super) fn assign_day(
    date: NaiveDate,
    day_type: DayType,
    rule: &DayRule,
    requests: &DayRequests,
    roster: &Roster,
    config: &ShiftConfig,
    history: &ShiftHistory,
    days_so_far: &[DaySchedule],
    state: &mut RunState,
) -> DaySchedule {
    let mut day = DaySchedule {
        date,
        period: rule.period,
        day_type,
        slots: Vec::new(),
        required_total: rule.required_total(),
        complete: false,
        warnings: Vec::new(),
    };

    // Passe "want" : dans l'ordre d'arrivée, un jour demandé coûte quand même
    // un tour d'équité.
    for person_id in &requests.want {
        let Some(person) = roster.find_person_by_id(person_id) else {
            debug!(person = person_id.as_str(), "want request from unknown person, ignored");
            continue;
        };
        if !person.active || day.contains(person_id) {
            continue;
        }
        if day.count_for(person.role) >= rule.required_for(person.role) {
            // quota atteint : retombe dans l'éligibilité normale (déjà pleine)
            continue;
        }
        if !hard_eligible(person, date, config, days_so_far, history) {
            continue;
        }
        let confidence = score_candidate(person, date, day_type, rule, requests, roster, config, history, days_so_far, state);
        place(&mut day, person, SlotOrigin::Request, confidence, rule, state);
    }

    // Complément automatique : candidates éligibles en ordre de file, la
    // meilleure note gagne, la tête départage les ex æquo.
    for role in Role::ALL {
        let needed = rule.required_for(role);
        loop {
            if day.count_for(role) >= needed {
                break;
            }
            let chosen = {
                let Some(queue) = state.queues.get(&role) else {
                    break;
                };
                let candidates: Vec<PersonId> = queue
                    .iter()
                    .filter(|&id| {
                        !day.contains(id)
                            && !requests.is_unavailable(id)
                            && roster.find_person_by_id(id).is_some_and(|p| p.active)
                    })
                    .cloned()
                    .collect();
                let mut best: Option<(PersonId, f64)> = None;
                for id in candidates {
                    let person = match roster.find_person_by_id(&id) {
                        Some(p) => p,
                        None => continue,
                    };
                    if !hard_eligible(person, date, config, days_so_far, history) {
                        continue;
                    }
                    let s = score_candidate(person, date, day_type, rule, requests, roster, config, history, days_so_far, state);
                    // strictement supérieur : la position de file prime à égalité
                    match &best {
                        Some((_, top)) if s <= *top => {}
                        _ => best = Some((id, s)),
                    }
                }
                best
            };

            let placed = chosen.and_then(|(person_id, confidence)| {
                roster
                    .find_person_by_id(&person_id)
                    .map(|person| place(&mut day, person, SlotOrigin::Auto, confidence, rule, state))
            });
            if placed.is_none() {
                let missing = needed - day.count_for(role);
                day.warnings
                    .push(format!("{role}: {missing} slot(s) unfilled"));
                break;
            }
        }
    }

    day.complete = day.slots.len() as u32 == day.required_total;
    day
}

/// Contraintes dures communes aux deux passes : plafond de jours consécutifs
/// et repos minimal après série complète.
fn hard_eligible(
    person: &Person,
    date: NaiveDate,
    config: &ShiftConfig,
    days_so_far: &[DaySchedule],
    history: &ShiftHistory,
) -> bool {
    let max = config.max_consecutive.for_role(person.role);
    let streak = scoring::consecutive_streak(&person.id, date, days_so_far, history);
    if streak + 1 > max {
        return false;
    }
    scoring::respects_min_rest(&person.id, max, config.min_rest_days, date, days_so_far, history)
}

#[allow(clippy::too_many_arguments)]
fn score_candidate(
    person: &Person,
    date: NaiveDate,
    day_type: DayType,
    rule: &DayRule,
    requests: &DayRequests,
    roster: &Roster,
    config: &ShiftConfig,
    history: &ShiftHistory,
    days_so_far: &[DaySchedule],
    state: &mut RunState,
) -> f64 {
    let ctx = ScoreContext {
        date,
        day_type,
        period: rule.period,
        requests,
        counters: &state.counters,
        history,
        days_so_far,
        config,
        roster,
    };
    scoring::score(person, &ctx, state.rng.as_mut())
}

/// Pose le slot, incrémente le compteur, fait tourner la file. Les trois
/// vont toujours ensemble, quelle que soit l'origine.
fn place(
    day: &mut DaySchedule,
    person: &Person,
    origin: SlotOrigin,
    confidence: f64,
    rule: &DayRule,
    state: &mut RunState,
) {
    day.slots.push(ShiftSlot {
        person: person.id.clone(),
        role: person.role,
        origin,
        confidence,
    });
    state.counters.record(&person.id, rule.period);
    if let Some(queue) = state.queues.get_mut(&person.role) {
        queue.rotate_to_back(&person.id);
    }
    debug!(
        person = person.id.as_str(),
        role = %person.role,
        origin = ?origin,
        "slot assigned"
    );
}
