//! Command-line front end for the ward administration dashboard.
//!
//! Each subcommand drives the matching screen controller from `ward-core`
//! against either the configured remote store or, with `--demo`, a seeded
//! in-memory store. Environment variables are read here only, at startup:
//! `WARD_CONFIG` (config file path), `WARD_STORE_URL` and `WARD_STORE_KEY`.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;
use ward_core::screens::admission::AdmissionScreen;
use ward_core::screens::detail::{DetailScreen, PatientLookup};
use ward_core::screens::discharge::DischargeScreen;
use ward_core::screens::reports::ReportsScreen;
use ward_core::screens::specialties::SpecialtiesScreen;
use ward_core::{
    Age, Gender, MemoryStore, Mrn, NewNote, NewPatient, PatientStore, RestStore, WardConfig,
};
use ward_types::NonEmptyText;

#[derive(Parser)]
#[command(name = "ward")]
#[command(about = "Hospital ward administration dashboard CLI")]
struct Cli {
    /// Path to a YAML configuration file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Run against a seeded in-memory store instead of the remote store
    #[arg(long)]
    demo: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Admit a new patient
    Admit {
        /// Medical record number
        mrn: String,
        /// Patient name
        name: String,
        /// Age in years
        age: String,
        /// Gender (male, female or other)
        gender: String,
        /// Admission date (YYYY-MM-DD)
        date: String,
        /// Admission time (HH:MM)
        time: String,
        /// Assigned doctor
        doctor: String,
        /// Specialty
        specialty: String,
    },
    /// List non-discharged patients
    Patients {
        /// Filter by name or MRN, case-insensitively
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one patient's record and notes
    Show {
        /// Medical record number
        mrn: String,
    },
    /// Add a clinical note to a patient
    AddNote {
        /// Medical record number
        mrn: String,
        /// Note content
        content: String,
    },
    /// Discharge a patient
    Discharge {
        /// Medical record number
        mrn: String,
    },
    /// List specialties with their patient counts
    Specialties,
    /// File a daily report and export it as markdown
    Report {
        /// Report content
        content: String,
        /// Report date (YYYY-MM-DD); defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Directory to write the exported document into
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ward=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("Use 'ward --help' for commands");
        return Ok(());
    };

    let config_file = cli
        .config
        .or_else(|| std::env::var("WARD_CONFIG").ok().map(PathBuf::from));

    if cli.demo {
        let cfg = WardConfig::local(config_file.as_deref())?;
        tracing::info!("running against a seeded in-memory store");
        let store = Arc::new(seeded_demo_store(&cfg).await?);
        run(store, &cfg, command).await
    } else {
        let cfg = WardConfig::load(
            config_file.as_deref(),
            std::env::var("WARD_STORE_URL").ok(),
            std::env::var("WARD_STORE_KEY").ok(),
        )?;
        let store = Arc::new(RestStore::new(&cfg)?);
        run(store, &cfg, command).await
    }
}

async fn run<S: PatientStore>(
    store: Arc<S>,
    cfg: &WardConfig,
    command: Commands,
) -> anyhow::Result<()> {
    match command {
        Commands::Admit {
            mrn,
            name,
            age,
            gender,
            date,
            time,
            doctor,
            specialty,
        } => {
            let mut screen = AdmissionScreen::new(store);
            screen.form.mrn = mrn;
            screen.form.name = name;
            screen.form.age = age;
            screen.form.gender = gender;
            screen.form.admission_date = date;
            screen.form.admission_time = time;
            screen.form.doctor = doctor;
            screen.form.specialty = specialty;

            match screen.submit(cfg).await {
                Some(mrn) => println!("Admitted patient {mrn}"),
                None => {
                    if let Some(message) = screen.state().error() {
                        eprintln!("Error: {message}");
                    }
                }
            }
        }
        Commands::Patients { search } => {
            let mut screen = DischargeScreen::new(store);
            screen.load().await;
            if let Some(term) = search {
                screen.search = term;
            }

            if let Some(message) = screen.patients().error() {
                eprintln!("Error: {message}");
            } else {
                let rows = screen.filtered();
                if rows.is_empty() {
                    println!("No patients found.");
                }
                for patient in rows {
                    println!(
                        "MRN: {}, Name: {}, Admitted: {}, Specialty: {}",
                        patient.mrn, patient.name, patient.admission_date, patient.specialty
                    );
                }
            }
        }
        Commands::Show { mrn } => {
            let mrn = match Mrn::new(&mrn) {
                Ok(mrn) => mrn,
                Err(e) => {
                    eprintln!("Error: {e}");
                    return Ok(());
                }
            };
            let mut screen = DetailScreen::new(store, mrn);
            screen.load_patient().await;
            screen.load_notes().await;

            match screen.patient().ready() {
                Some(PatientLookup::Found(patient)) => {
                    println!("MRN: {}", patient.mrn);
                    println!("Name: {}", patient.name);
                    println!("Age: {}", patient.age);
                    println!("Gender: {}", patient.gender);
                    println!(
                        "Admitted: {} {}",
                        patient.admission_date, patient.admission_time
                    );
                    println!("Doctor: {}", patient.doctor);
                    println!("Specialty: {}", patient.specialty);
                    if let Some(date) = patient.discharge_date {
                        println!("Discharged: {date}");
                    }
                }
                Some(PatientLookup::NotFound) => {
                    println!("No patient found with MRN {}", screen.mrn());
                }
                None => {
                    if let Some(message) = screen.patient().error() {
                        eprintln!("Error: {message}");
                    }
                }
            }

            if let Some(notes) = screen.notes().ready() {
                if notes.is_empty() {
                    println!("No notes.");
                }
                for note in notes {
                    println!("[{}] {}", note.created_at, note.content);
                }
            } else if let Some(message) = screen.notes().error() {
                eprintln!("Error: {message}");
            }
        }
        Commands::AddNote { mrn, content } => {
            let mrn = match Mrn::new(&mrn) {
                Ok(mrn) => mrn,
                Err(e) => {
                    eprintln!("Error: {e}");
                    return Ok(());
                }
            };
            let mut screen = DetailScreen::new(store, mrn);
            screen.load_notes().await;
            screen.draft = content;
            screen.add_note().await;

            match screen.note_error() {
                Some(message) => eprintln!("Error: {message}"),
                None => println!("Note added for patient {}", screen.mrn()),
            }
        }
        Commands::Discharge { mrn } => {
            let mrn = match Mrn::new(&mrn) {
                Ok(mrn) => mrn,
                Err(e) => {
                    eprintln!("Error: {e}");
                    return Ok(());
                }
            };
            let mut screen = DischargeScreen::new(store);
            screen.load().await;
            screen.discharge(&mrn).await;

            if let Some(message) = screen.confirmation() {
                println!("{message}");
            } else if let Some(message) = screen.action_error() {
                eprintln!("Error: {message}");
            } else if let Some(message) = screen.patients().error() {
                eprintln!("Error: {message}");
            } else {
                println!("No active patient with MRN {mrn}");
            }
        }
        Commands::Specialties => {
            let mut screen = SpecialtiesScreen::new(store);
            screen.load().await;

            match screen.specialties().ready() {
                Some(specialties) => {
                    if specialties.is_empty() {
                        println!("No specialties found.");
                    }
                    for specialty in specialties {
                        println!(
                            "{}: {} patient(s)",
                            specialty.name, specialty.patient_count
                        );
                    }
                }
                None => {
                    if let Some(message) = screen.specialties().error() {
                        eprintln!("Error: {message}");
                    }
                }
            }
        }
        Commands::Report { content, date, out } => {
            let today = date.unwrap_or_else(|| chrono::Utc::now().date_naive());
            let mut screen = ReportsScreen::new(today);
            screen.draft = content;

            let Some(report) = screen.add() else {
                eprintln!("Error: report content cannot be empty");
                return Ok(());
            };
            let id = report.id;
            let path = screen.export(id, &out)?;
            println!("Report written to {}", path.display());
        }
    }

    Ok(())
}

/// Builds the `--demo` store: a handful of admitted patients with notes, and
/// the configured specialties with their seeded patient counts.
async fn seeded_demo_store(cfg: &WardConfig) -> anyhow::Result<MemoryStore> {
    let seeds = [
        ("M1001", "Alice Carter", 34, Gender::Female, "Cardiology"),
        ("M1002", "Bob Reyes", 58, Gender::Male, "Neurology"),
        ("M1003", "Cara Osei", 47, Gender::Other, "Cardiology"),
    ];

    let specialties: Vec<(&str, u32)> = cfg
        .specialties()
        .iter()
        .map(|name| {
            let count = seeds.iter().filter(|s| s.4 == name).count() as u32;
            (name.as_str(), count)
        })
        .collect();
    let store = MemoryStore::with_specialties(&specialties);

    for (mrn, name, age, gender, specialty) in seeds {
        let patient = store
            .insert_patient(&NewPatient {
                mrn: Mrn::new(mrn)?,
                name: NonEmptyText::new(name)?,
                age: Age::new(age).map_err(anyhow::Error::msg)?,
                gender,
                admission_date: chrono::Utc::now().date_naive(),
                admission_time: chrono::NaiveTime::from_hms_opt(9, 0, 0)
                    .ok_or_else(|| anyhow::anyhow!("invalid seed time"))?,
                doctor: NonEmptyText::new("Dr. Patel")?,
                specialty: NonEmptyText::new(specialty)?,
                submission_id: Uuid::new_v4(),
            })
            .await?;
        store
            .insert_note(&NewNote {
                patient_mrn: patient.mrn,
                content: NonEmptyText::new("Admitted and settled on the ward.")?,
            })
            .await?;
    }

    Ok(store)
}
