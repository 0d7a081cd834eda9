use crate::config::{ConfigError, PartialConfig};
use crate::model::{DaySchedule, PersonId, Role};
use thiserror::Error;

/// Options d'un run de génération.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Graine du terme aléatoire ; même graine + mêmes entrées = même planning.
    pub seed: Option<u64>,
    /// Surcharge ponctuelle du facteur aléatoire de la config.
    pub randomness: Option<f64>,
    /// Surcouche de configuration propre à ce run.
    pub overlay: Option<PartialConfig>,
}

/// Résultat d'un run : un `DaySchedule` par jour non chômé de la période,
/// en ordre chronologique.
#[derive(Debug, Clone, Default)]
pub struct ScheduleRun {
    pub days: Vec<DaySchedule>,
}

impl ScheduleRun {
    pub fn is_complete(&self) -> bool {
        self.days.iter().all(|d| d.complete)
    }

    pub fn incomplete_days(&self) -> impl Iterator<Item = &DaySchedule> {
        self.days.iter().filter(|d| !d.complete)
    }

    /// Nombre de gardes affectées à une personne sur le run.
    pub fn count_for(&self, person: &PersonId) -> u32 {
        self.days.iter().filter(|d| d.contains(person)).count() as u32
    }
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("no active personnel for role {0}: quota can never be met")]
    EmptyRole(Role),
    #[error("invalid date range: end must not precede start")]
    InvalidRange,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
