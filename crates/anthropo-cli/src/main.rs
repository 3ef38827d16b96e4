//! `anthropo`: command-line front end for the patient register.
//!
//! # Usage
//!
//! ```text
//! anthropo list
//! anthropo add --last-name Иванов --first-name Иван --gender М \
//!   --birth-date 15-05-1990 --height 180 --weight 75
//! anthropo edit 3f0c1c2e --weight 78
//! anthropo stats --bins 10
//! anthropo --config ~/.config/anthropo.toml seed --count 20
//! ```

mod app;
mod settings;
mod ui;

use std::path::PathBuf;

use anthropo_core::{BaseDirResolver, Registry, stats::DEFAULT_AGE_BINS, validate::PatientInput};
use anthropo_store_json::JsonFileStore;
use anyhow::{Context, Result};
use app::{App, PatientEdit};
use chrono::Local;
use clap::{Args as ClapArgs, Parser, Subcommand};
use settings::Settings;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "anthropo", version, about = "Patient anthropometry register")]
struct Cli {
  /// Path to a TOML config file (data_dir, synthetic_count).
  #[arg(short, long, value_name = "FILE", default_value = "anthropo.toml")]
  config: PathBuf,

  /// Directory that holds `resources/data/patients_data.json`.
  #[arg(long, value_name = "DIR")]
  data_dir: Option<PathBuf>,

  /// Raise log verbosity (-v info, -vv debug). `RUST_LOG` takes precedence.
  #[arg(short, long, action = clap::ArgAction::Count)]
  verbose: u8,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List all patients (the default).
  List,
  /// Add a patient.
  Add(NewPatient),
  /// Replace the fields of an existing patient; omitted flags keep their
  /// current value.
  Edit {
    /// Patient id or an unambiguous prefix of it.
    id: String,
    #[command(flatten)]
    fields: EditFields,
  },
  /// Remove a patient.
  Remove {
    /// Patient id or an unambiguous prefix of it.
    id: String,
  },
  /// Print gender ratio, age histogram, BMI by gender and BMI vs age.
  Stats {
    /// Number of age histogram bins.
    #[arg(long, default_value_t = DEFAULT_AGE_BINS)]
    bins: usize,
    /// Print the report as JSON.
    #[arg(long)]
    json: bool,
  },
  /// Replace all patients with freshly generated synthetic ones.
  Seed {
    /// How many patients to generate (defaults to `synthetic_count`).
    #[arg(long)]
    count: Option<usize>,
  },
}

#[derive(ClapArgs, Debug)]
struct NewPatient {
  #[arg(long)]
  last_name:   String,
  #[arg(long)]
  first_name:  String,
  #[arg(long, default_value = "")]
  middle_name: String,
  /// М / Ж, or male / female.
  #[arg(long)]
  gender:      String,
  /// DD-MM-YYYY.
  #[arg(long)]
  birth_date:  String,
  /// Centimeters.
  #[arg(long)]
  height:      String,
  /// Kilograms.
  #[arg(long)]
  weight:      String,
}

impl From<NewPatient> for PatientInput {
  fn from(a: NewPatient) -> Self {
    Self {
      last_name:   a.last_name,
      first_name:  a.first_name,
      middle_name: a.middle_name,
      gender:      a.gender,
      birth_date:  a.birth_date,
      height:      a.height,
      weight:      a.weight,
    }
  }
}

#[derive(ClapArgs, Debug)]
struct EditFields {
  #[arg(long)]
  last_name:   Option<String>,
  #[arg(long)]
  first_name:  Option<String>,
  #[arg(long)]
  middle_name: Option<String>,
  #[arg(long)]
  gender:      Option<String>,
  #[arg(long)]
  birth_date:  Option<String>,
  #[arg(long)]
  height:      Option<String>,
  #[arg(long)]
  weight:      Option<String>,
}

impl From<EditFields> for PatientEdit {
  fn from(a: EditFields) -> Self {
    Self {
      last_name:   a.last_name,
      first_name:  a.first_name,
      middle_name: a.middle_name,
      gender:      a.gender,
      birth_date:  a.birth_date,
      height:      a.height,
      weight:      a.weight,
    }
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

fn main() -> Result<()> {
  let cli = Cli::parse();

  // Logs go to stderr so command output stays pipeable.
  let default_level = match cli.verbose {
    0 => LevelFilter::WARN,
    1 => LevelFilter::INFO,
    _ => LevelFilter::DEBUG,
  };
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy(),
    )
    .init();

  let mut settings = Settings::load(&cli.config)?;
  if let Some(dir) = cli.data_dir {
    settings.data_dir = dir;
  }

  let today = Local::now().date_naive();
  let store = JsonFileStore::open_resource(&BaseDirResolver::new(&settings.data_dir))
    .with_today(today)
    .with_synthetic_count(settings.synthetic_count);
  let store_path = store.path().to_path_buf();
  let registry = Registry::open(store)
    .with_context(|| format!("failed to open patient store at {}", store_path.display()))?;
  let mut app = App::new(registry, today);

  match cli.command.unwrap_or(Command::List) {
    Command::List => print!("{}", ui::render_patients(app.patients(), today)),
    Command::Add(fields) => {
      let id = app.add(&fields.into())?;
      println!("{id}");
    }
    Command::Edit { id, fields } => {
      let id = app.edit(&id, fields.into())?;
      println!("{id}");
    }
    Command::Remove { id } => {
      let removed = app.remove(&id)?;
      println!("removed {} ({})", removed.id(), removed.details().full_name());
    }
    Command::Stats { bins, json } => match app.report(bins) {
      None => println!("No data for statistics."),
      Some(report) if json => {
        println!("{}", serde_json::to_string_pretty(&report).context("encoding report")?)
      }
      Some(report) => print!("{}", ui::render_report(&report)),
    },
    Command::Seed { count } => {
      let count = count.unwrap_or(settings.synthetic_count);
      app.reseed(count)?;
      println!("stored {count} synthetic patients in {}", store_path.display());
    }
  }

  Ok(())
}
