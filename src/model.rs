use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

/// Identifiant fort pour Person
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PersonId(String);

impl PersonId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Rôle de planification : deux familles fermées, résolues une fois à l'import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Therapist,
    Assistant,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Therapist, Role::Assistant];
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Therapist => write!(f, "therapist"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// Créneau de la journée (matin / après-midi).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShiftPeriod {
    Morning,
    Afternoon,
}

impl fmt::Display for ShiftPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShiftPeriod::Morning => write!(f, "morning"),
            ShiftPeriod::Afternoon => write!(f, "afternoon"),
        }
    }
}

/// Préférence de créneau d'une personne (`Any` = neutre).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PeriodPreference {
    Morning,
    Afternoon,
    #[default]
    Any,
}

/// Membre du personnel (immutable pendant un run)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    pub role: Role,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default)]
    pub preference: PeriodPreference,
}

fn default_active() -> bool {
    true
}

impl Person {
    pub fn new<N: Into<String>>(name: N, role: Role) -> Self {
        Self {
            id: PersonId::random(),
            name: name.into(),
            role,
            active: true,
            position: None,
            preference: PeriodPreference::Any,
        }
    }
}

/// Roster complet (personnel uniquement ; le planning vit dans `DaySchedule`)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Roster {
    pub people: Vec<Person>,
}

impl Roster {
    pub fn find_person_by_id<'a>(&'a self, id: &PersonId) -> Option<&'a Person> {
        self.people.iter().find(|p| &p.id == id)
    }
    pub fn find_person_by_name<'a>(&'a self, name: &str) -> Option<&'a Person> {
        self.people.iter().find(|p| p.name == name)
    }
    /// Personnes actives d'un rôle, dans l'ordre stable du roster.
    pub fn active_in_role(&self, role: Role) -> impl Iterator<Item = &Person> {
        self.people
            .iter()
            .filter(move |p| p.active && p.role == role)
    }
    pub fn has_active(&self, role: Role) -> bool {
        self.active_in_role(role).next().is_some()
    }
}

/// Jours fériés de l'année cible.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HolidaySet(BTreeSet<NaiveDate>);

impl HolidaySet {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn insert(&mut self, date: NaiveDate) {
        self.0.insert(date);
    }
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.0.contains(&date)
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = &NaiveDate> {
        self.0.iter()
    }
}

impl FromIterator<NaiveDate> for HolidaySet {
    fn from_iter<I: IntoIterator<Item = NaiveDate>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Type de demande pour une date précise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestType {
    /// Souhaite être de garde ce jour.
    Want,
    /// Refuse la garde ce jour (exclusion dure).
    Decline,
    /// Congé (exclusion dure, même traitement que Decline).
    Leave,
}

/// Demande individuelle : une seule forme canonique, validée à l'import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftRequest {
    pub person: PersonId,
    pub date: NaiveDate,
    pub kind: RequestType,
}

/// Affectation passée (fenêtre glissante d'historique).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub person: PersonId,
    pub date: NaiveDate,
    pub period: ShiftPeriod,
}

/// Origine d'une affectation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotOrigin {
    /// Issue d'une demande "want".
    Request,
    /// Choisie par le moteur.
    Auto,
    /// Posée à la main par un opérateur.
    Manual,
}

/// Affectation d'une personne sur un jour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftSlot {
    pub person: PersonId,
    pub role: Role,
    pub origin: SlotOrigin,
    pub confidence: f64,
}

/// Journée planifiée. Créée une fois, mutée uniquement pendant son étape
/// d'affectation, puis consultée en lecture seule (lookback des jours suivants).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySchedule {
    pub date: NaiveDate,
    pub period: ShiftPeriod,
    pub day_type: crate::calendar::DayType,
    pub slots: Vec<ShiftSlot>,
    pub required_total: u32,
    pub complete: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl DaySchedule {
    pub fn contains(&self, person: &PersonId) -> bool {
        self.slots.iter().any(|s| &s.person == person)
    }
    pub fn count_for(&self, role: Role) -> u32 {
        self.slots.iter().filter(|s| s.role == role).count() as u32
    }
}
