use crate::config::PartialConfig;
use crate::model::{DaySchedule, HistoryEntry, HolidaySet, Roster, ShiftRequest};
use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Collaborateur de persistance du moteur. Les chargements sont indépendants
/// entre eux et capturés en instantanés immuables avant la boucle ; la
/// sauvegarde du planning doit être atomique sur la plage couverte.
pub trait Storage {
    /// Charge le roster. Fichier absent = erreur : on ne fabrique jamais un
    /// personnel fictif.
    fn load_roster(&self) -> anyhow::Result<Roster>;
    /// Charge la configuration partielle ; `None` si aucune n'est déposée.
    fn load_config(&self) -> anyhow::Result<Option<PartialConfig>>;
    /// Charge les fériés. Absent = ensemble vide (entrée non critique).
    fn load_holidays(&self) -> anyhow::Result<HolidaySet>;
    /// Charge les demandes. Absent = liste vide.
    fn load_requests(&self) -> anyhow::Result<Vec<ShiftRequest>>;
    /// Charge l'historique glissant. Absent = liste vide.
    fn load_history(&self) -> anyhow::Result<Vec<HistoryEntry>>;
    /// Charge le planning persisté (toutes plages confondues).
    fn load_schedule(&self) -> anyhow::Result<Vec<DaySchedule>>;
    /// Remplace les jours couverts par `days` et préserve le reste, de manière
    /// atomique : en cas d'échec, le document précédent reste intact.
    fn save_schedule(&self, days: &[DaySchedule]) -> anyhow::Result<()>;
}

/// Stockage fichiers : un document JSON par préoccupation dans un répertoire.
pub struct JsonStorage {
    dir: PathBuf,
}

impl JsonStorage {
    pub const ROSTER_FILE: &'static str = "roster.json";
    pub const CONFIG_FILE: &'static str = "config.json";
    pub const HOLIDAYS_FILE: &'static str = "holidays.json";
    pub const REQUESTS_FILE: &'static str = "requests.json";
    pub const HISTORY_FILE: &'static str = "history.json";
    pub const SCHEDULE_FILE: &'static str = "planning.json";

    pub fn open<P: AsRef<Path>>(dir: P) -> anyhow::Result<Self> {
        Ok(Self {
            dir: dir.as_ref().to_path_buf(),
        })
    }

    fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    fn read_json<T: DeserializeOwned>(&self, file: &str) -> anyhow::Result<T> {
        let path = self.path(file);
        let data = fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_slice(&data).with_context(|| format!("parsing {}", path.display()))
    }

    /// Lecture tolérante à l'absence : `Ok(None)` si le fichier n'existe pas,
    /// erreur s'il existe mais ne se lit pas.
    fn read_json_opt<T: DeserializeOwned>(&self, file: &str) -> anyhow::Result<Option<T>> {
        if !self.path(file).exists() {
            return Ok(None);
        }
        self.read_json(file).map(Some)
    }

    fn write_json<T: Serialize>(&self, file: &str, value: &T) -> anyhow::Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating data directory {}", self.dir.display()))?;
        let json = serde_json::to_vec_pretty(value)?;
        let mut tmp = NamedTempFile::new_in(&self.dir).with_context(|| "creating temp file")?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(self.path(file)).with_context(|| "atomic rename")?;
        Ok(())
    }

    pub fn save_roster(&self, roster: &Roster) -> anyhow::Result<()> {
        self.write_json(Self::ROSTER_FILE, roster)
    }

    pub fn save_holidays(&self, holidays: &HolidaySet) -> anyhow::Result<()> {
        self.write_json(Self::HOLIDAYS_FILE, holidays)
    }

    pub fn save_requests(&self, requests: &[ShiftRequest]) -> anyhow::Result<()> {
        self.write_json(Self::REQUESTS_FILE, &requests)
    }

    pub fn save_history(&self, history: &[HistoryEntry]) -> anyhow::Result<()> {
        self.write_json(Self::HISTORY_FILE, &history)
    }
}

impl Storage for JsonStorage {
    fn load_roster(&self) -> anyhow::Result<Roster> {
        self.read_json(Self::ROSTER_FILE)
    }

    fn load_config(&self) -> anyhow::Result<Option<PartialConfig>> {
        self.read_json_opt(Self::CONFIG_FILE)
    }

    fn load_holidays(&self) -> anyhow::Result<HolidaySet> {
        Ok(self.read_json_opt(Self::HOLIDAYS_FILE)?.unwrap_or_default())
    }

    fn load_requests(&self) -> anyhow::Result<Vec<ShiftRequest>> {
        Ok(self.read_json_opt(Self::REQUESTS_FILE)?.unwrap_or_default())
    }

    fn load_history(&self) -> anyhow::Result<Vec<HistoryEntry>> {
        Ok(self.read_json_opt(Self::HISTORY_FILE)?.unwrap_or_default())
    }

    fn load_schedule(&self) -> anyhow::Result<Vec<DaySchedule>> {
        Ok(self.read_json_opt(Self::SCHEDULE_FILE)?.unwrap_or_default())
    }

    fn save_schedule(&self, days: &[DaySchedule]) -> anyhow::Result<()> {
        let Some(first) = days.iter().map(|d| d.date).min() else {
            return Ok(()); // rien à écrire, ne touche pas au document
        };
        let last = days.iter().map(|d| d.date).max().unwrap_or(first);

        // remplace la plage couverte, préserve le reste
        let mut merged: Vec<DaySchedule> = self
            .load_schedule()?
            .into_iter()
            .filter(|d| d.date < first || d.date > last)
            .collect();
        merged.extend_from_slice(days);
        merged.sort_by_key(|d| d.date);

        debug!(
            from = %first,
            to = %last,
            total = merged.len(),
            "persisting schedule"
        );
        self.write_json(Self::SCHEDULE_FILE, &merged)
    }
}
