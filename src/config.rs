use crate::calendar::DayType;
use crate::model::{Role, ShiftPeriod};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Règle d'une famille de jours : effectifs requis par rôle + créneau servi.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayRule {
    pub therapists: u32,
    pub assistants: u32,
    pub period: ShiftPeriod,
}

impl DayRule {
    pub fn required_for(&self, role: Role) -> u32 {
        match role {
            Role::Therapist => self.therapists,
            Role::Assistant => self.assistants,
        }
    }
    pub fn required_total(&self) -> u32 {
        self.therapists + self.assistants
    }
}

/// Plafonds de jours consécutifs, par rôle (les assistants tolèrent plus).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaxConsecutive {
    pub therapist: u32,
    pub assistant: u32,
}

impl MaxConsecutive {
    pub fn for_role(&self, role: Role) -> u32 {
        match role {
            Role::Therapist => self.therapist,
            Role::Assistant => self.assistant,
        }
    }
}

/// Configuration résolue : totale par construction, passée explicitement à
/// chaque run (pas d'état global mutable).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftConfig {
    pub weekday: DayRule,
    pub weekend: DayRule,
    pub holiday: DayRule,
    pub max_consecutive: MaxConsecutive,
    pub min_rest_days: u32,
    pub fairness_weight: f64,
    pub randomness: f64,
}

impl Default for ShiftConfig {
    fn default() -> Self {
        Self {
            weekday: DayRule {
                therapists: 2,
                assistants: 1,
                period: ShiftPeriod::Afternoon,
            },
            weekend: DayRule {
                therapists: 2,
                assistants: 1,
                period: ShiftPeriod::Morning,
            },
            holiday: DayRule {
                therapists: 1,
                assistants: 1,
                period: ShiftPeriod::Morning,
            },
            max_consecutive: MaxConsecutive {
                therapist: 3,
                assistant: 5,
            },
            min_rest_days: 1,
            fairness_weight: 1.0,
            randomness: 0.0,
        }
    }
}

impl ShiftConfig {
    /// Règle applicable à un type de jour. `RestDay` n'a pas de règle : jamais
    /// de garde, le moteur saute ces jours avant d'arriver ici.
    pub fn rule_for(&self, day_type: DayType) -> Option<&DayRule> {
        match day_type {
            DayType::Weekday => Some(&self.weekday),
            DayType::Weekend => Some(&self.weekend),
            DayType::Holiday => Some(&self.holiday),
            DayType::RestDay => None,
        }
    }

    /// Fusionne une surcouche partielle sur `base` : tout champ présent dans
    /// la surcouche remplace le champ de base, le reste est hérité. Totale par
    /// construction, mais les réglages sont validés.
    pub fn resolve(base: &ShiftConfig, overlay: Option<&PartialConfig>) -> Result<ShiftConfig, ConfigError> {
        let mut out = base.clone();
        if let Some(ov) = overlay {
            apply_day(&mut out.weekday, ov.weekday.as_ref());
            apply_day(&mut out.weekend, ov.weekend.as_ref());
            apply_day(&mut out.holiday, ov.holiday.as_ref());
            if let Some(mc) = &ov.max_consecutive {
                if let Some(v) = mc.therapist {
                    out.max_consecutive.therapist = v;
                }
                if let Some(v) = mc.assistant {
                    out.max_consecutive.assistant = v;
                }
            }
            if let Some(v) = ov.min_rest_days {
                out.min_rest_days = v;
            }
            if let Some(v) = ov.fairness_weight {
                out.fairness_weight = v;
            }
            if let Some(v) = ov.randomness {
                out.randomness = v;
            }
        }
        out.validate()?;
        Ok(out)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.fairness_weight) {
            return Err(ConfigError::InvalidKnob("fairness_weight must be within [0, 1]"));
        }
        if self.randomness < 0.0 {
            return Err(ConfigError::InvalidKnob("randomness must be >= 0"));
        }
        if self.max_consecutive.therapist == 0 || self.max_consecutive.assistant == 0 {
            return Err(ConfigError::InvalidKnob("max_consecutive must be >= 1"));
        }
        Ok(())
    }
}

fn apply_day(target: &mut DayRule, overlay: Option<&PartialDayRule>) {
    if let Some(ov) = overlay {
        if let Some(v) = ov.therapists {
            target.therapists = v;
        }
        if let Some(v) = ov.assistants {
            target.assistants = v;
        }
        if let Some(v) = ov.period {
            target.period = v;
        }
    }
}

/// Document de configuration partiel : forme sur disque et surcouche par run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekday: Option<PartialDayRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekend: Option<PartialDayRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holiday: Option<PartialDayRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_consecutive: Option<PartialMaxConsecutive>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_rest_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fairness_weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub randomness: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialDayRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub therapists: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assistants: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<ShiftPeriod>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialMaxConsecutive {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub therapist: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assistant: Option<u32>,
}

impl PartialConfig {
    /// Résolution stricte, sans base : chaque combinaison type de jour / rôle
    /// doit être définie, sinon erreur fatale (jamais de zéro implicite).
    pub fn into_strict(self) -> Result<ShiftConfig, ConfigError> {
        let defaults = ShiftConfig::default();
        let weekday = strict_day(DayType::Weekday, self.weekday.as_ref())?;
        let weekend = strict_day(DayType::Weekend, self.weekend.as_ref())?;
        let holiday = strict_day(DayType::Holiday, self.holiday.as_ref())?;
        let out = ShiftConfig {
            weekday,
            weekend,
            holiday,
            max_consecutive: match self.max_consecutive {
                Some(mc) => MaxConsecutive {
                    therapist: mc.therapist.unwrap_or(defaults.max_consecutive.therapist),
                    assistant: mc.assistant.unwrap_or(defaults.max_consecutive.assistant),
                },
                None => defaults.max_consecutive,
            },
            min_rest_days: self.min_rest_days.unwrap_or(defaults.min_rest_days),
            fairness_weight: self.fairness_weight.unwrap_or(defaults.fairness_weight),
            randomness: self.randomness.unwrap_or(defaults.randomness),
        };
        out.validate()?;
        Ok(out)
    }
}

fn strict_day(day_type: DayType, rule: Option<&PartialDayRule>) -> Result<DayRule, ConfigError> {
    let rule = rule.ok_or(ConfigError::MissingRule {
        day_type,
        role: Role::Therapist,
    })?;
    let therapists = rule.therapists.ok_or(ConfigError::MissingRule {
        day_type,
        role: Role::Therapist,
    })?;
    let assistants = rule.assistants.ok_or(ConfigError::MissingRule {
        day_type,
        role: Role::Assistant,
    })?;
    let period = rule.period.ok_or(ConfigError::MissingPeriod { day_type })?;
    Ok(DayRule {
        therapists,
        assistants,
        period,
    })
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing headcount for {role} on {day_type} days")]
    MissingRule { day_type: DayType, role: Role },
    #[error("missing shift period for {day_type} days")]
    MissingPeriod { day_type: DayType },
    #[error("invalid setting: {0}")]
    InvalidKnob(&'static str),
}
