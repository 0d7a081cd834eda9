use crate::balance::BalanceReport;
use crate::model::{
    DaySchedule, PeriodPreference, Person, PersonId, RequestType, Role, Roster, ShiftRequest,
};
use anyhow::{bail, Context};
use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::Path;

/// Import de personnes depuis CSV: header `id,name,role,active,position,preference`
/// (`id` vide = généré ; `role` est résolu ici une fois pour toutes).
pub fn import_people_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Person>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let name = rec.get(1).context("missing name")?.trim();
        if name.is_empty() {
            bail!("invalid people row (empty name)");
        }
        let role = parse_role(rec.get(2).context("missing role")?.trim())
            .with_context(|| format!("invalid role for {name}"))?;

        let mut person = Person::new(name.to_string(), role);
        if let Some(id) = rec.get(0) {
            let id = id.trim();
            if !id.is_empty() {
                person.id = PersonId::new(id);
            }
        }
        if let Some(flag) = rec.get(3) {
            let flag = flag.trim();
            if !flag.is_empty() {
                person.active = parse_bool(flag)
                    .with_context(|| format!("invalid active value for {name}"))?;
            }
        }
        if let Some(position) = rec.get(4) {
            let position = position.trim();
            if !position.is_empty() {
                person.position = Some(position.to_string());
            }
        }
        if let Some(pref) = rec.get(5) {
            let pref = pref.trim();
            if !pref.is_empty() {
                person.preference = parse_preference(pref)
                    .with_context(|| format!("invalid preference for {name}"))?;
            }
        }
        out.push(person);
    }
    Ok(out)
}

/// Import de demandes: header `person_id,date,type` (date `YYYY-MM-DD`,
/// type `want|decline|leave`).
pub fn import_requests_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<ShiftRequest>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let person = rec.get(0).context("missing person_id")?.trim();
        if person.is_empty() {
            bail!("invalid request row (empty person_id)");
        }
        let date = parse_date(rec.get(1).context("missing date")?.trim())?;
        let kind = parse_request_type(rec.get(2).context("missing type")?.trim())
            .with_context(|| format!("invalid request type for {person}"))?;
        out.push(ShiftRequest {
            person: PersonId::new(person),
            date,
            kind,
        });
    }
    Ok(out)
}

/// Import de fériés: header `date`, une date par ligne.
pub fn import_holidays_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<NaiveDate>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let raw = rec.get(0).context("missing date")?.trim();
        if raw.is_empty() {
            continue;
        }
        out.push(parse_date(raw)?);
    }
    Ok(out)
}

/// Export CSV du planning: une ligne par slot,
/// header `date,period,day_type,person_id,name,role,origin,confidence`.
pub fn export_schedule_csv<P: AsRef<Path>>(
    path: P,
    days: &[DaySchedule],
    roster: &Roster,
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record([
        "date",
        "period",
        "day_type",
        "person_id",
        "name",
        "role",
        "origin",
        "confidence",
    ])?;
    for day in days {
        for slot in &day.slots {
            let name = roster
                .find_person_by_id(&slot.person)
                .map(|p| p.name.as_str())
                .unwrap_or("");
            let confidence = format!("{:.1}", slot.confidence);
            w.write_record([
                day.date.to_string().as_str(),
                day.period.to_string().as_str(),
                day.day_type.to_string().as_str(),
                slot.person.as_str(),
                name,
                slot.role.to_string().as_str(),
                origin_str(slot.origin),
                confidence.as_str(),
            ])?;
        }
    }
    w.flush()?;
    Ok(())
}

/// Export JSON du planning (jolie mise en forme)
pub fn export_schedule_json<P: AsRef<Path>>(path: P, days: &[DaySchedule]) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(days)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV du rapport d'équité: header `person_id,name,role,assigned,deviation`.
pub fn export_balance_csv<P: AsRef<Path>>(path: P, report: &BalanceReport) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["person_id", "name", "role", "assigned", "deviation"])?;
    for entry in &report.per_person {
        let assigned = entry.assigned.to_string();
        let deviation = format!("{:+.2}", entry.deviation);
        w.write_record([
            entry.person.as_str(),
            entry.name.as_str(),
            entry.role.to_string().as_str(),
            assigned.as_str(),
            deviation.as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

fn origin_str(origin: crate::model::SlotOrigin) -> &'static str {
    match origin {
        crate::model::SlotOrigin::Request => "request",
        crate::model::SlotOrigin::Auto => "auto",
        crate::model::SlotOrigin::Manual => "manual",
    }
}

fn parse_date(raw: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").with_context(|| format!("invalid date: {raw}"))
}

fn parse_bool(s: &str) -> anyhow::Result<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "oui" => Ok(true),
        "false" | "0" | "no" | "n" | "non" => Ok(false),
        _ => bail!("expected boolean"),
    }
}

fn parse_role(s: &str) -> anyhow::Result<Role> {
    match s.to_ascii_lowercase().as_str() {
        "therapist" | "pt" => Ok(Role::Therapist),
        "assistant" | "pt_asst" => Ok(Role::Assistant),
        _ => bail!("expected therapist or assistant"),
    }
}

fn parse_preference(s: &str) -> anyhow::Result<PeriodPreference> {
    match s.to_ascii_lowercase().as_str() {
        "morning" => Ok(PeriodPreference::Morning),
        "afternoon" => Ok(PeriodPreference::Afternoon),
        "any" | "none" => Ok(PeriodPreference::Any),
        _ => bail!("expected morning, afternoon or any"),
    }
}

fn parse_request_type(s: &str) -> anyhow::Result<RequestType> {
    match s.to_ascii_lowercase().as_str() {
        "want" => Ok(RequestType::Want),
        "decline" => Ok(RequestType::Decline),
        "leave" => Ok(RequestType::Leave),
        _ => bail!("expected want, decline or leave"),
    }
}
