#![forbid(unsafe_code)]
use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use roulement::{
    balance, io,
    scheduler::{Engine, RunOptions},
    storage::{JsonStorage, Storage},
    HolidaySet, PartialConfig, ShiftConfig,
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de génération de plannings de garde (sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Répertoire de données (JSON)
    #[arg(long, global = true, default_value = "planning-data")]
    data: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Importer le personnel depuis un CSV
    ImportPeople {
        #[arg(long)]
        csv: String,
    },

    /// Importer les demandes (want/decline/leave) depuis un CSV
    ImportRequests {
        #[arg(long)]
        csv: String,
    },

    /// Importer les jours fériés depuis un CSV
    ImportHolidays {
        #[arg(long)]
        csv: String,
    },

    /// Générer le planning d'une période
    Generate {
        /// Premier jour (YYYY-MM-DD)
        #[arg(long)]
        from: String,
        /// Dernier jour inclus (YYYY-MM-DD)
        #[arg(long)]
        to: String,
        /// Graine du terme aléatoire (rejouable)
        #[arg(long)]
        seed: Option<u64>,
        /// Surcharge du facteur aléatoire de la config
        #[arg(long)]
        randomness: Option<f64>,
        /// Ne pas persister le résultat
        #[arg(long)]
        no_save: bool,
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Rapport d'équité du planning persisté
    Balance {
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Lister le planning persisté
    List {
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let storage = JsonStorage::open(&cli.data)?;

    let code = match cli.cmd {
        Commands::ImportPeople { csv } => {
            let people = io::import_people_csv(csv)?;
            let mut roster = storage.load_roster().unwrap_or_default();
            roster.people.extend(people);
            storage.save_roster(&roster)?;
            println!("Imported {} people", roster.people.len());
            0
        }
        Commands::ImportRequests { csv } => {
            let mut requests = storage.load_requests()?;
            requests.extend(io::import_requests_csv(csv)?);
            storage.save_requests(&requests)?;
            println!("Stored {} requests", requests.len());
            0
        }
        Commands::ImportHolidays { csv } => {
            let mut holidays = storage.load_holidays()?;
            for date in io::import_holidays_csv(csv)? {
                holidays.insert(date);
            }
            storage.save_holidays(&holidays)?;
            println!("Stored {} holidays", holidays.len());
            0
        }
        Commands::Generate {
            from,
            to,
            seed,
            randomness,
            no_save,
            out_json,
            out_csv,
        } => {
            let from = parse_date(&from)?;
            let to = parse_date(&to)?;

            // Phase de chargement : lectures indépendantes, instantanés
            // immuables avant la boucle. Le roster est critique, les fériés
            // retombent sur l'ensemble vide.
            let roster = storage.load_roster().context("loading roster")?;
            let config = resolve_config(&storage)?;
            let holidays = storage
                .load_holidays()
                .unwrap_or_else(|_| HolidaySet::new());
            let requests = storage.load_requests().context("loading requests")?;
            let history = storage.load_history().context("loading history")?;

            let engine = Engine::new(roster, config)
                .with_holidays(holidays)
                .with_requests(requests)
                .with_history(history);
            let opts = RunOptions {
                seed,
                randomness,
                overlay: None,
            };
            let run = engine.generate(from, to, &opts)?;

            for day in &run.days {
                let names: Vec<&str> = day
                    .slots
                    .iter()
                    .map(|s| {
                        engine
                            .roster
                            .find_person_by_id(&s.person)
                            .map(|p| p.name.as_str())
                            .unwrap_or("?")
                    })
                    .collect();
                println!(
                    "{} [{}] {} → {}",
                    day.date,
                    day.day_type,
                    day.period,
                    names.join(", ")
                );
            }
            let incomplete = run.incomplete_days().count();
            for day in run.incomplete_days() {
                for warning in &day.warnings {
                    eprintln!("{}: {}", day.date, warning);
                }
            }

            // exports et rapport avant la persistance : un échec d'écriture ne
            // doit pas faire perdre le planning calculé
            if let Some(path) = out_json {
                io::export_schedule_json(path, &run.days)?;
            }
            if let Some(path) = out_csv {
                io::export_schedule_csv(path, &run.days, &engine.roster)?;
            }
            let report = balance::analyze(&run.days, &engine.roster);
            println!("Fairness: {:.0}/100", report.fairness);

            if !no_save {
                storage
                    .save_schedule(&run.days)
                    .context("persisting schedule (the generated run above is still valid)")?;
            }

            // Code 2 = WARNING/INCOMPLETE
            if incomplete > 0 {
                eprintln!("{incomplete} day(s) understaffed");
                2
            } else {
                0
            }
        }
        Commands::Balance { out_csv } => {
            let days = storage.load_schedule()?;
            let roster = storage.load_roster().context("loading roster")?;
            let report = balance::analyze(&days, &roster);
            for entry in &report.per_person {
                println!(
                    "{} | {} | {} shift(s) | {:+.2}",
                    entry.name, entry.role, entry.assigned, entry.deviation
                );
            }
            println!("Fairness: {:.0}/100", report.fairness);
            for rec in &report.recommendations {
                println!("! {rec}");
            }
            if let Some(path) = out_csv {
                io::export_balance_csv(path, &report)?;
            }
            0
        }
        Commands::List { out_json, out_csv } => {
            let days = storage.load_schedule()?;
            let roster = storage.load_roster().unwrap_or_default();
            if let Some(path) = out_json {
                io::export_schedule_json(path, &days)?;
            }
            if let Some(path) = out_csv {
                io::export_schedule_csv(path, &days, &roster)?;
            }
            for day in &days {
                let names: Vec<&str> = day
                    .slots
                    .iter()
                    .map(|s| {
                        roster
                            .find_person_by_id(&s.person)
                            .map(|p| p.name.as_str())
                            .unwrap_or("?")
                    })
                    .collect();
                let flag = if day.complete { "" } else { " [incomplete]" };
                println!("{} | {} | {}{}", day.date, day.period, names.join(", "), flag);
            }
            0
        }
    };

    std::process::exit(code);
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").with_context(|| format!("invalid date: {raw}"))
}

/// Config déposée dans le répertoire de données, résolue sur les défauts.
fn resolve_config(storage: &JsonStorage) -> Result<ShiftConfig> {
    let partial: Option<PartialConfig> = storage.load_config().context("loading config")?;
    let config = ShiftConfig::resolve(&ShiftConfig::default(), partial.as_ref())?;
    Ok(config)
}
