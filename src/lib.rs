#![forbid(unsafe_code)]
//! Roulement — bibliothèque de génération de plannings de garde (sans BD).
//!
//! - Deux rôles fermés (thérapeutes / assistants), quotas par type de jour.
//! - Files d'équité par rôle, score multi-facteurs, demandes want/decline/leave.
//! - Stockage fichiers (JSON/CSV) ; écriture atomique.
//! - Déroulé strictement chronologique ; rejouable à graine fixée.

pub mod balance;
pub mod calendar;
pub mod config;
pub mod io;
pub mod model;
pub mod scheduler;
pub mod storage;

pub use balance::{analyze, BalanceReport, PersonBalance};
pub use calendar::{classify, DayType};
pub use config::{ConfigError, DayRule, MaxConsecutive, PartialConfig, ShiftConfig};
pub use model::{
    DaySchedule, HistoryEntry, HolidaySet, PeriodPreference, Person, PersonId, RequestType, Role,
    Roster, ShiftPeriod, ShiftRequest, ShiftSlot, SlotOrigin,
};
pub use scheduler::{Engine, EngineError, RunOptions, ScheduleRun};
pub use storage::{JsonStorage, Storage};
