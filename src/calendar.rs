use crate::model::HolidaySet;
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification d'une date, pilote le quota et le créneau du jour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayType {
    Weekday,
    Weekend,
    Holiday,
    /// Jour de fermeture hebdomadaire : jamais de garde.
    RestDay,
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayType::Weekday => write!(f, "weekday"),
            DayType::Weekend => write!(f, "weekend"),
            DayType::Holiday => write!(f, "holiday"),
            DayType::RestDay => write!(f, "rest-day"),
        }
    }
}

/// Classe une date. Le férié prime, puis le jour de fermeture (dimanche),
/// puis le samedi, sinon jour ouvré. Pure, sans échec possible.
pub fn classify(date: NaiveDate, holidays: &HolidaySet) -> DayType {
    if holidays.contains(date) {
        return DayType::Holiday;
    }
    match date.weekday() {
        Weekday::Sun => DayType::RestDay,
        Weekday::Sat => DayType::Weekend,
        _ => DayType::Weekday,
    }
}
