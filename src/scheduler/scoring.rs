use crate::calendar::DayType;
use crate::config::ShiftConfig;
use crate::model::{DaySchedule, PeriodPreference, Person, PersonId, Roster, ShiftPeriod};
use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::Rng;

use super::counters::{ShiftHistory, WorkloadCounters};
use super::requests::DayRequests;

// Barème, appliqué dans l'ordre. Les signaux durs (spread extrême, refus)
// dominent largement les signaux doux (préférence, bruit).
const BASE_SCORE: f64 = 100.0;
const NEW_PERSON_PENALTY: f64 = 5.0;
const FAIRNESS_BONUS_PER_SHIFT: f64 = 6.0;
const FAIRNESS_PENALTY_PER_SHIFT: f64 = 9.0;
const FAIRNESS_BONUS_CAP: f64 = 18.0;
const FAIRNESS_PENALTY_CAP: f64 = 27.0;
const EXTREME_GAP: u32 = 2;
const EXTREME_MIN_BONUS: f64 = 60.0;
const EXTREME_MAX_PENALTY: f64 = 60.0;
const MORNING_PENALTY_PER_SHIFT: f64 = 4.0;
const MORNING_PENALTY_CAP: f64 = 12.0;
const STREAK_PENALTY_THERAPIST: f64 = 30.0;
const STREAK_PENALTY_ASSISTANT: f64 = 15.0;
const WANT_BONUS: f64 = 25.0;
const UNAVAILABLE_PENALTY: f64 = 80.0;
const PREFERENCE_BONUS: f64 = 5.0;
const RANDOM_SCALE: f64 = 0.5;
/// Fenêtre bornée du lookback de jours consécutifs.
const STREAK_LOOKBACK_DAYS: u32 = 14;

/// Contexte immuable d'un calcul de score pour un jour donné.
pub(super) struct ScoreContext<'a> {
    pub date: NaiveDate,
    pub day_type: DayType,
    pub period: ShiftPeriod,
    pub requests: &'a DayRequests,
    pub counters: &'a WorkloadCounters,
    pub history: &'a ShiftHistory,
    pub days_so_far: &'a [DaySchedule],
    pub config: &'a ShiftConfig,
    pub roster: &'a Roster,
}

/// Score de désirabilité d'une affectation : positif ou nul, plus haut = plus
/// souhaitable. Déterministe quand `randomness` vaut 0 (le RNG n'est alors
/// jamais consulté).
pub(super) fn score(person: &Person, ctx: &ScoreContext<'_>, rng: Option<&mut StdRng>) -> f64 {
    let mut score = BASE_SCORE;
    let weight = ctx.config.fairness_weight;

    // 2. Amortissement des nouveaux : sans historique, pas de sur-sélection
    // immédiate au seul motif d'un compteur à zéro.
    if ctx.history.is_empty_for(&person.id) {
        score -= NEW_PERSON_PENALTY;
    }

    // 3. Équité par rôle : rattrapage bonifié sous la moyenne, excès pénalisé
    // plus lourdement au-dessus (asymétrie voulue).
    let mine = ctx.counters.total(&person.id) as f64;
    let mean = ctx.counters.role_mean(ctx.roster, person.role);
    let gap = mean - mine;
    if gap > 0.0 {
        score += (gap * FAIRNESS_BONUS_PER_SHIFT * weight).min(FAIRNESS_BONUS_CAP);
    } else if gap < 0.0 {
        score -= (-gap * FAIRNESS_PENALTY_PER_SHIFT * weight).min(FAIRNESS_PENALTY_CAP);
    }

    // 4. Écart extrême : au-delà de EXTREME_GAP entre min et max du rôle, le
    // min est quasi forcé et le max quasi exclu, quoi qu'en disent les
    // signaux plus faibles.
    if let Some((min, max)) = ctx.counters.role_spread(ctx.roster, person.role) {
        if max - min >= EXTREME_GAP {
            let total = ctx.counters.total(&person.id);
            if total == min {
                score += EXTREME_MIN_BONUS;
            } else if total == max {
                score -= EXTREME_MAX_PENALTY;
            }
        }
    }

    // 5. Équité des matins, week-end et fériés uniquement.
    if matches!(ctx.day_type, DayType::Weekend | DayType::Holiday) {
        let morning_mean = ctx.counters.role_morning_mean(ctx.roster, person.role);
        let mornings = ctx.counters.mornings(&person.id) as f64;
        if mornings > morning_mean {
            score -= ((mornings - morning_mean) * MORNING_PENALTY_PER_SHIFT)
                .min(MORNING_PENALTY_CAP);
        }
    }

    // 6. Lookback de jours consécutifs : pénalité proportionnelle dès que
    // l'affectation atteindrait le plafond du rôle.
    let streak = consecutive_streak(&person.id, ctx.date, ctx.days_so_far, ctx.history);
    let max_consecutive = ctx.config.max_consecutive.for_role(person.role);
    let would_be = streak + 1;
    if would_be >= max_consecutive {
        let overage = (would_be - max_consecutive + 1) as f64;
        let magnitude = match person.role {
            crate::model::Role::Therapist => STREAK_PENALTY_THERAPIST,
            crate::model::Role::Assistant => STREAK_PENALTY_ASSISTANT,
        };
        score -= overage * magnitude;
    }

    // 7. Demandes explicites. La pénalité decline/leave est consultative : la
    // vraie exclusion est dans l'étape d'affectation, le score reste utile
    // pour l'analyse et un éventuel chemin d'urgence.
    if ctx.requests.wants(&person.id) {
        score += WANT_BONUS;
    }
    if ctx.requests.is_unavailable(&person.id) {
        score -= UNAVAILABLE_PENALTY;
    }

    // 8. Préférence de créneau (`Any` neutre).
    match (person.preference, ctx.period) {
        (PeriodPreference::Any, _) => {}
        (PeriodPreference::Morning, ShiftPeriod::Morning)
        | (PeriodPreference::Afternoon, ShiftPeriod::Afternoon) => score += PREFERENCE_BONUS,
        _ => score -= PREFERENCE_BONUS,
    }

    // 9. Perturbation symétrique bornée, réduite par rapport au facteur
    // nominal : permet de régénérer des variantes valides sans casser le
    // biais d'équité.
    if ctx.config.randomness > 0.0 {
        if let Some(rng) = rng {
            score += rng.gen_range(-1.0..=1.0) * ctx.config.randomness * RANDOM_SCALE;
        }
    }

    score.max(0.0)
}

/// Longueur de la série ininterrompue de jours travaillés se terminant la
/// veille de `date`, en consultant le planning en cours puis l'historique.
/// Lookback borné.
pub(super) fn consecutive_streak(
    person: &PersonId,
    date: NaiveDate,
    days_so_far: &[DaySchedule],
    history: &ShiftHistory,
) -> u32 {
    let mut streak = 0u32;
    let mut cursor = date - Duration::days(1);
    while streak < STREAK_LOOKBACK_DAYS {
        if !worked_on(person, cursor, days_so_far, history) {
            break;
        }
        streak += 1;
        cursor -= Duration::days(1);
    }
    streak
}

/// Vrai si la personne peut reprendre une garde le jour `date` au regard du
/// repos minimal : après une série complète (plafond atteint), il faut au
/// moins `min_rest_days` jours libres avant de réaffecter.
pub(super) fn respects_min_rest(
    person: &PersonId,
    role_max: u32,
    min_rest_days: u32,
    date: NaiveDate,
    days_so_far: &[DaySchedule],
    history: &ShiftHistory,
) -> bool {
    if min_rest_days == 0 {
        return true;
    }
    // Série en cours la veille : le plafond consécutif s'en charge.
    if consecutive_streak(person, date, days_so_far, history) > 0 {
        return true;
    }
    // Remonte jusqu'au dernier jour travaillé dans la fenêtre.
    let mut free = 0u32;
    let mut cursor = date - Duration::days(1);
    while free < STREAK_LOOKBACK_DAYS {
        if worked_on(person, cursor, days_so_far, history) {
            let prior = 1 + consecutive_streak(person, cursor, days_so_far, history);
            return prior < role_max || free >= min_rest_days;
        }
        free += 1;
        cursor -= Duration::days(1);
    }
    true
}

fn worked_on(
    person: &PersonId,
    date: NaiveDate,
    days_so_far: &[DaySchedule],
    history: &ShiftHistory,
) -> bool {
    if let Some(day) = days_so_far.iter().find(|d| d.date == date) {
        if day.contains(person) {
            return true;
        }
    }
    history.worked_on(person, date)
}
