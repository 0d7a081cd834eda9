mod assignment;
mod counters;
mod rotation;
mod scoring;

pub mod requests;
mod types;

pub use counters::{ShiftHistory, WorkloadCounters};
pub use requests::{classify as classify_requests, DayRequests};
pub use rotation::RotationQueue;
pub use types::{EngineError, RunOptions, ScheduleRun};

use crate::calendar::{self, DayType};
use crate::config::ShiftConfig;
use crate::model::{HistoryEntry, HolidaySet, Role, Roster, ShiftRequest};
use assignment::RunState;
use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use tracing::{info, warn};

/// Moteur d'affectation : capture toutes les entrées en lecture seule, puis
/// déroule la période strictement en ordre chronologique (chaque jour dépend
/// des files et des séries des jours précédents — pas de parallélisme ici).
#[derive(Debug, Clone, Default)]
pub struct Engine {
    pub roster: Roster,
    pub config: ShiftConfig,
    pub holidays: HolidaySet,
    pub requests: Vec<ShiftRequest>,
    pub history: Vec<HistoryEntry>,
}

impl Engine {
    pub fn new(roster: Roster, config: ShiftConfig) -> Self {
        Self {
            roster,
            config,
            ..Default::default()
        }
    }

    pub fn with_holidays(mut self, holidays: HolidaySet) -> Self {
        self.holidays = holidays;
        self
    }

    pub fn with_requests(mut self, requests: Vec<ShiftRequest>) -> Self {
        self.requests = requests;
        self
    }

    pub fn with_history(mut self, history: Vec<HistoryEntry>) -> Self {
        self.history = history;
        self
    }

    /// Génère le planning de `from` à `to` inclus. Erreurs fatales avant tout
    /// jour traité : config invalide, rôle sans personnel actif. Un jour en
    /// sous-effectif n'est pas fatal : avertissement + jour incomplet.
    pub fn generate(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        opts: &RunOptions,
    ) -> Result<ScheduleRun, EngineError> {
        if to < from {
            return Err(EngineError::InvalidRange);
        }

        let mut config = ShiftConfig::resolve(&self.config, opts.overlay.as_ref())?;
        if let Some(randomness) = opts.randomness {
            config.randomness = randomness;
        }
        config.validate()?;

        for role in Role::ALL {
            if !self.roster.has_active(role) {
                return Err(EngineError::EmptyRole(role));
            }
        }

        let history = ShiftHistory::from_entries(&self.history);
        let counters = WorkloadCounters::seeded(&self.roster, &history);
        let queues: HashMap<Role, RotationQueue> = Role::ALL
            .into_iter()
            .map(|role| (role, RotationQueue::seeded(&self.roster, role, &counters)))
            .collect();
        // RNG absent à facteur nul : le déterminisme ne tient pas qu'au seed.
        let rng = (config.randomness > 0.0).then(|| match opts.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        });
        let mut state = RunState {
            counters,
            queues,
            rng,
        };

        info!(%from, %to, randomness = config.randomness, "starting schedule generation");

        let mut days = Vec::new();
        let mut cursor = from;
        while cursor <= to {
            let day_type = calendar::classify(cursor, &self.holidays);
            let Some(rule) = config.rule_for(day_type) else {
                // jour de fermeture : jamais de garde, jamais émis
                debug_assert_eq!(day_type, DayType::RestDay);
                cursor += Duration::days(1);
                continue;
            };
            let day_requests = requests::classify(&self.requests, cursor);
            let day = assignment::assign_day(
                cursor,
                day_type,
                rule,
                &day_requests,
                &self.roster,
                &config,
                &history,
                &days,
                &mut state,
            );
            if !day.complete {
                warn!(date = %day.date, warnings = ?day.warnings, "day is understaffed");
            }
            days.push(day);
            cursor += Duration::days(1);
        }

        let incomplete = days.iter().filter(|d| !d.complete).count();
        info!(days = days.len(), incomplete, "schedule generation finished");

        Ok(ScheduleRun { days })
    }
}
