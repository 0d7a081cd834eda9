use crate::model::{PersonId, RequestType, ShiftRequest};
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Demandes d'une date, partitionnées en trois ensembles disjoints.
/// Pour une même personne, decline/leave prime sur want (exclusion dure).
#[derive(Debug, Clone, Default)]
pub struct DayRequests {
    /// Demandes "want", dans l'ordre d'arrivée, dédupliquées.
    pub want: Vec<PersonId>,
    pub declined: BTreeSet<PersonId>,
    pub leave: BTreeSet<PersonId>,
}

impl DayRequests {
    /// Union decline ∪ leave, consommée par l'étape d'affectation.
    pub fn unavailable(&self) -> BTreeSet<PersonId> {
        self.declined.union(&self.leave).cloned().collect()
    }

    pub fn wants(&self, person: &PersonId) -> bool {
        self.want.contains(person)
    }

    pub fn is_unavailable(&self, person: &PersonId) -> bool {
        self.declined.contains(person) || self.leave.contains(person)
    }
}

/// Partitionne la liste plate des demandes pour `date`. Pure.
pub fn classify(requests: &[ShiftRequest], date: NaiveDate) -> DayRequests {
    let mut out = DayRequests::default();

    // Exclusions d'abord : elles priment sur les want du même jour.
    for req in requests.iter().filter(|r| r.date == date) {
        match req.kind {
            RequestType::Decline => {
                out.declined.insert(req.person.clone());
            }
            RequestType::Leave => {
                out.leave.insert(req.person.clone());
            }
            RequestType::Want => {}
        }
    }
    for req in requests.iter().filter(|r| r.date == date) {
        if req.kind == RequestType::Want
            && !out.is_unavailable(&req.person)
            && !out.want.contains(&req.person)
        {
            out.want.push(req.person.clone());
        }
    }

    out
}
