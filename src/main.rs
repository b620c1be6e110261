//! Jobtrack CLI - command-line surface over the tracker core
//!
//! This binary holds no business logic: it parses arguments into core
//! calls, formats results for humans (or as JSON for scripts), and maps
//! errors onto exit codes (0 success, 1 correctable input, 2 storage).

use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use jobtrack::query::{ListFilter, QueryEngine};
use jobtrack::ui;
use jobtrack::{
    Application, ApplicationPatch, Error, NewApplication, Priority, Source, SqliteStore, Status,
    config, export, validate,
};

#[derive(Parser)]
#[command(name = "jobtrack")]
#[command(version)]
#[command(about = "Job application tracker backed by SQLite")]
#[command(long_about = r#"
Jobtrack keeps job applications in a single local SQLite file, replacing
ad-hoc spreadsheets with consistent, queryable, script-friendly records.

Example usage:
  jobtrack add --company "Acme" --role "Backend Intern" --source linkedin
  jobtrack list --active-only
  jobtrack followups --days 10
  jobtrack update-status Acme interview --last-action "Onsite scheduled"
  jobtrack export applications.csv
"#)]
struct Cli {
    /// Path to the database file (falls back to jobtrack.toml, then applications.db)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database and reconcile its schema
    Init,

    /// Add a new job application
    Add {
        #[arg(long)]
        company: String,

        #[arg(long)]
        role: String,

        /// URL of the job posting
        #[arg(long = "link")]
        job_link: Option<String>,

        #[arg(long)]
        location: Option<String>,

        /// ISO date (YYYY-MM-DD), default: today
        #[arg(long)]
        date_applied: Option<String>,

        /// Where the application was found (LinkedIn, Referral, ...)
        #[arg(long)]
        source: Option<String>,

        /// Pipeline stage (default: Applied)
        #[arg(long, default_value = "Applied")]
        status: String,

        /// 1 = high, 2 = medium (default), 3 = low
        #[arg(long, default_value_t = 2)]
        priority: i64,

        #[arg(long)]
        notes: Option<String>,
    },

    /// List stored applications
    List {
        /// Substring match on company name
        #[arg(long)]
        company: Option<String>,

        /// Filter by exact status
        #[arg(long)]
        status: Option<String>,

        /// Exclude Rejected, Ghosted, and Withdrawn applications
        #[arg(long)]
        active_only: bool,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Search by substring in company, role, or notes
    Search {
        /// Search string (case-insensitive)
        query: String,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List applications older than N days that may need a follow-up
    Followups {
        /// Days since application before flagging (default: 7)
        #[arg(long, default_value_t = 7)]
        days: i64,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show counts by status plus aggregate totals
    Stats {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Update the status of an application by id or company name
    UpdateStatus {
        /// Application id (integer) OR substring of the company name
        target: String,

        /// New pipeline status
        status: String,

        /// What happened (e.g. "Scheduled phone screen"); today's date is
        /// prefixed unless the text already carries one
        #[arg(long)]
        last_action: Option<String>,
    },

    /// Update one or more fields of an application by id or company name
    Update {
        /// Application id (integer) OR substring of the company name
        target: String,

        #[arg(long)]
        company: Option<String>,

        #[arg(long)]
        role: Option<String>,

        /// Empty string clears the stored link
        #[arg(long = "link")]
        job_link: Option<String>,

        /// Empty string clears the stored location
        #[arg(long)]
        location: Option<String>,

        #[arg(long)]
        date_applied: Option<String>,

        /// Empty string clears the stored source
        #[arg(long)]
        source: Option<String>,

        #[arg(long)]
        status: Option<String>,

        /// Empty string clears the stored entry
        #[arg(long)]
        last_action: Option<String>,

        #[arg(long)]
        priority: Option<i64>,

        /// Empty string clears the stored notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// Delete an application by id
    Remove {
        /// Application id
        id: i64,
    },

    /// Export applications to a CSV file
    Export {
        /// Destination CSV file path
        filepath: PathBuf,

        /// Substring match on company name
        #[arg(long)]
        company: Option<String>,

        /// Filter by exact status
        #[arg(long)]
        status: Option<String>,

        /// Only export active applications
        #[arg(long)]
        active_only: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    if let Err(err) = run(cli) {
        report_error(&err);
        std::process::exit(err.exit_code());
    }
}

fn report_error(err: &Error) {
    match err {
        Error::Ambiguous { token, candidates } => {
            ui::warn(&format!("Multiple applications match \"{}\":", token));
            for candidate in candidates {
                eprintln!("  {}", candidate);
            }
            eprintln!("Please refine your query or use an explicit ID.");
        }
        other => ui::error(&other.to_string()),
    }
}

fn run(cli: Cli) -> jobtrack::Result<()> {
    let db_path = config::resolve_database_path(cli.database)?;
    let existed_before = db_path.exists();

    config::ensure_db_dir(&db_path)?;
    // Schema is reconciled on open, so every command sees a ready store
    let store = SqliteStore::open(&db_path)?;
    let today = chrono::Local::now().date_naive();

    match cli.command {
        Commands::Init => {
            if existed_before {
                ui::success(&format!(
                    "Database already existed at {}. Ensured schema is up to date.",
                    db_path.display()
                ));
            } else {
                ui::success(&format!(
                    "Initialized new database at {}.",
                    db_path.display()
                ));
            }
        }

        Commands::Add {
            company,
            role,
            job_link,
            location,
            date_applied,
            source,
            status,
            priority,
            notes,
        } => {
            let mut draft = NewApplication::new(company, role)
                .with_status(Status::from_str(&status)?)
                .with_priority(Priority::from_int(priority)?);
            draft.job_link = job_link;
            draft.location = location;
            draft.notes = notes;
            if let Some(date) = date_applied {
                draft.date_applied = Some(validate::parse_date("date_applied", &date)?);
            }
            if let Some(source) = source {
                draft.source = Some(Source::from_str(&source)?);
            }

            let id = store.create(&draft, today)?;
            ui::success(&format!("Added new application with ID {}.", id));
        }

        Commands::List {
            company,
            status,
            active_only,
            json,
        } => {
            let filter = ListFilter {
                company,
                status: status.as_deref().map(Status::from_str).transpose()?,
                active_only,
            };
            let engine = QueryEngine::new(&store);
            let applications = engine.list(&filter)?;
            print_applications(&applications, json)?;
        }

        Commands::Search { query, json } => {
            let engine = QueryEngine::new(&store);
            let applications = engine.search(&query)?;
            print_applications(&applications, json)?;
        }

        Commands::Followups { days, json } => {
            let engine = QueryEngine::new(&store);
            let applications = engine.followups(days, today)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&applications)?);
            } else if applications.is_empty() {
                println!(
                    "No applications older than {} days needing follow-up.",
                    days
                );
            } else {
                ui::header(&format!(
                    "Applications older than {} days needing follow-up:",
                    days
                ));
                print_applications(&applications, false)?;
            }
        }

        Commands::Stats { json } => {
            let engine = QueryEngine::new(&store);
            let stats = engine.stats(today)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else if stats.total == 0 {
                println!("No applications in database.");
            } else {
                ui::section("Applications by status");
                println!("{}", ui::stats_table(&stats));
                ui::summary_row("Total:", &stats.total.to_string());
                ui::summary_row("Active:", &stats.active.to_string());
                ui::summary_row("Applied (30d):", &stats.applied_last_30_days.to_string());
            }
        }

        Commands::UpdateStatus {
            target,
            status,
            last_action,
        } => {
            let status = Status::from_str(&status)?;
            let entry = last_action.map(|text| normalize_last_action(&text, today));

            let engine = QueryEngine::new(&store);
            let id = engine.resolve(&target)?;
            if let Some(app) = store.get(id)? {
                ui::info(
                    "Updating",
                    &format!("[{}] {} — {}", app.id, app.company, app.role),
                );
            }
            store.update_status(id, status, entry.as_deref())?;
            ui::success(&format!(
                "Updated application {} to status '{}'.",
                id, status
            ));
        }

        Commands::Update {
            target,
            company,
            role,
            job_link,
            location,
            date_applied,
            source,
            status,
            last_action,
            priority,
            notes,
        } => {
            let patch = ApplicationPatch {
                company,
                role,
                job_link,
                location,
                date_applied: date_applied
                    .as_deref()
                    .map(|d| validate::parse_date("date_applied", d))
                    .transpose()?,
                source: source
                    .map(|s| {
                        if s.is_empty() {
                            Ok(None)
                        } else {
                            Source::from_str(&s).map(Some)
                        }
                    })
                    .transpose()?,
                status: status.as_deref().map(Status::from_str).transpose()?,
                last_action: last_action.map(|text| {
                    if text.is_empty() {
                        text
                    } else {
                        normalize_last_action(&text, today)
                    }
                }),
                priority: priority.map(Priority::from_int).transpose()?,
                notes,
            };

            if patch.is_empty() {
                println!("No fields specified to update; nothing to do.");
                return Ok(());
            }

            let engine = QueryEngine::new(&store);
            let id = engine.resolve(&target)?;
            if let Some(app) = store.get(id)? {
                ui::info(
                    "Updating",
                    &format!(
                        "[{}] {} — {} (fields: {})",
                        app.id,
                        app.company,
                        app.role,
                        patch.field_names().join(", ")
                    ),
                );
            }
            store.update_fields(id, &patch)?;
            ui::success(&format!("Updated application {}.", id));
        }

        Commands::Remove { id } => {
            store.delete(id)?;
            ui::success(&format!("Removed application {}.", id));
        }

        Commands::Export {
            filepath,
            company,
            status,
            active_only,
        } => {
            let filter = ListFilter {
                company,
                status: status.as_deref().map(Status::from_str).transpose()?,
                active_only,
            };
            let engine = QueryEngine::new(&store);
            let applications = engine.list(&filter)?;
            let count = export::export_csv(&applications, &filepath)?;
            ui::success(&format!(
                "Exported {} applications to {}",
                count,
                filepath.display()
            ));
        }
    }

    Ok(())
}

/// Prefix today's date (em-dash separated) unless the text already carries
/// a well-formed entry, so stored last_action values always match the
/// `<ISO date> — <free text>` pattern.
fn normalize_last_action(text: &str, today: NaiveDate) -> String {
    if validate::check_last_action(text).is_ok() {
        text.to_string()
    } else {
        format!("{} — {}", today, text)
    }
}

fn print_applications(applications: &[Application], json: bool) -> jobtrack::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(applications)?);
        return Ok(());
    }
    if applications.is_empty() {
        println!("No applications found.");
        return Ok(());
    }
    println!("{}", ui::application_table(applications));
    println!("{}", ui::dim(&format!("Total applications: {}", applications.len())));
    Ok(())
}
