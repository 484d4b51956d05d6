//! `booking` CLI - inspect a teacher's day and book or edit lessons.
//!
//! ## Usage
//!
//! ```sh
//! # List the allowed lesson lengths
//! booking durations
//!
//! # Show every start time on a day for a 60 minute lesson
//! booking --store bookings.json slots --date 2024-01-15 --duration 60
//!
//! # Preview a hovered start and a selected start
//! booking slots --date 2024-01-15 --duration 60 --hover 11:50 --select 14:00
//!
//! # Ask whether one start time is free, and why not
//! booking check --date 2024-01-15 --start 11:35 --duration 60
//!
//! # Free windows between bookings inside opening hours
//! booking free --date 2024-01-15
//!
//! # Book a lesson (writes the store file)
//! booking book --mode remote --duration 60 --date 2024-01-15 --start 11:50 --notes "scales"
//!
//! # Move an existing booking
//! booking edit --id 2 --start 15:00
//!
//! # Lengthen a booking and move it to another day in one go
//! booking edit --id 2 --duration 180 --date 2024-01-16
//! ```
//!
//! Set `RUST_LOG=debug` to see availability recomputation on stderr.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use booking_engine::clock::{format_hhmm, parse_hhmm};
use booking_engine::{
    durations, find_conflicts, free_windows, BookingForm, BookingId, BookingStore, EngineConfig,
    LessonMode, MemoryStore,
};
use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "booking",
    version,
    about = "Lesson slot availability and booking CLI"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Booking store file (JSON). A missing file is an empty store.
    #[arg(long, global = true, default_value = "bookings.json")]
    store: PathBuf,

    /// Engine configuration file (TOML): opening, closing, step_minutes, buffer_minutes
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the allowed lesson durations
    Durations,
    /// Show the display state of every slot on a day
    Slots {
        #[arg(long)]
        date: NaiveDate,
        /// Lesson length in minutes
        #[arg(long)]
        duration: u32,
        /// Hovered start time (HH:MM)
        #[arg(long, value_parser = parse_time)]
        hover: Option<NaiveTime>,
        /// Selected start time (HH:MM)
        #[arg(long, value_parser = parse_time)]
        select: Option<NaiveTime>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Check whether a lesson can start at a given time
    Check {
        #[arg(long)]
        date: NaiveDate,
        #[arg(long, value_parser = parse_time)]
        start: NaiveTime,
        #[arg(long)]
        duration: u32,
    },
    /// Show free windows inside opening hours
    Free {
        #[arg(long)]
        date: NaiveDate,
    },
    /// Book a new lesson
    Book {
        /// on-site or remote
        #[arg(long)]
        mode: LessonMode,
        #[arg(long)]
        duration: u32,
        #[arg(long)]
        date: NaiveDate,
        #[arg(long, value_parser = parse_time)]
        start: NaiveTime,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Change an existing booking
    Edit {
        #[arg(long)]
        id: u64,
        #[arg(long)]
        mode: Option<LessonMode>,
        #[arg(long)]
        duration: Option<u32>,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long, value_parser = parse_time)]
        start: Option<NaiveTime>,
        /// New notes; pass an empty string to clear them
        #[arg(long)]
        notes: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Durations => {
            for option in durations() {
                println!("{:>3} min  {:<10} {}", option.minutes, option.label(), option.description);
            }
        }
        Commands::Slots {
            date,
            duration,
            hover,
            select,
            json,
        } => {
            let store = load_store(&cli.store, &config)?;
            let mut form = BookingForm::create(&config).context("Invalid opening hours")?;
            form.set_mode(LessonMode::OnSite)?;
            form.set_duration(duration)?;
            form.set_date(date, &store)
                .with_context(|| format!("Failed to read bookings for {}", date))?;
            if let Some(time) = select {
                form.select_time(time)?;
            }
            if let Some(time) = hover {
                form.hover(time);
            }

            let states = form.slot_states();
            if json {
                let rows: Vec<serde_json::Value> = states
                    .iter()
                    .map(|(time, state)| {
                        serde_json::json!({ "time": format_hhmm(*time), "state": state.as_str() })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                for (time, state) in states {
                    println!("{}  {}", format_hhmm(time), state);
                }
            }
        }
        Commands::Check {
            date,
            start,
            duration,
        } => {
            let store = load_store(&cli.store, &config)?;
            let day = store.list_bookings_for_day(date)?;
            let conflicts = find_conflicts(date, start, duration, config.buffer(), &day);

            if conflicts.is_empty() {
                println!("{} available", format_hhmm(start));
            } else {
                println!("{} conflicting", format_hhmm(start));
                for conflict in conflicts {
                    let booking = &conflict.booking;
                    println!(
                        "  {} {} ({} min, {}), overlap {} min",
                        booking.id.map(|id| id.to_string()).unwrap_or_default(),
                        format_hhmm(booking.start_time),
                        booking.duration_minutes,
                        booking.mode,
                        conflict.overlap_minutes
                    );
                }
            }
        }
        Commands::Free { date } => {
            let store = load_store(&cli.store, &config)?;
            let day = store.list_bookings_for_day(date)?;
            for window in free_windows(date, config.opening, config.closing, config.buffer(), &day) {
                println!(
                    "{}-{}  {} min",
                    format_hhmm(window.start),
                    format_hhmm(window.end),
                    window.duration_minutes
                );
            }
        }
        Commands::Book {
            mode,
            duration,
            date,
            start,
            notes,
        } => {
            let mut store = load_store(&cli.store, &config)?;
            let mut form = BookingForm::create(&config).context("Invalid opening hours")?;
            form.set_mode(mode)?;
            form.set_duration(duration)?;
            form.set_date(date, &store)?;
            form.select_time(start)?;
            if let Some(notes) = notes {
                form.set_notes(notes)?;
            }

            let saved = form.submit(&mut store).context("Booking was not saved")?;
            save_store(&cli.store, &store)?;
            print_saved("Booked", &saved, &config);
        }
        Commands::Edit {
            id,
            mode,
            duration,
            date,
            start,
            notes,
        } => {
            let mut store = load_store(&cli.store, &config)?;
            let mut form = BookingForm::edit(&config, &store, BookingId(id))
                .with_context(|| format!("Failed to load booking {}", BookingId(id)))?;
            if let Some(mode) = mode {
                form.set_mode(mode)?;
            }
            match (date, duration) {
                (Some(date), Some(duration)) => form.set_date_and_duration(date, duration, &store)?,
                (Some(date), None) => form.set_date(date, &store)?,
                (None, Some(duration)) => form.set_duration(duration)?,
                (None, None) => {}
            }
            if let Some(start) = start {
                form.select_time(start)?;
            }
            if let Some(notes) = notes {
                form.set_notes(notes)?;
            }

            let saved = form.submit(&mut store).context("Booking was not updated")?;
            save_store(&cli.store, &store)?;
            print_saved("Updated", &saved, &config);
        }
    }

    Ok(())
}

fn parse_time(input: &str) -> std::result::Result<NaiveTime, String> {
    parse_hhmm(input).map_err(|e| e.to_string())
}

fn print_saved(verb: &str, saved: &booking_engine::Booking, config: &EngineConfig) {
    match saved.id {
        Some(id) => println!("{} {}", verb, id),
        None => println!("{}", verb),
    }
    println!("{}", saved.summary(config.buffer()));
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let config = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            toml::from_str::<EngineConfig>(&raw)
                .with_context(|| format!("Failed to parse config: {}", path.display()))?
        }
        None => EngineConfig::default(),
    };
    config.validate().context("Invalid opening hours in config")?;
    Ok(config)
}

fn load_store(path: &Path, config: &EngineConfig) -> Result<MemoryStore> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "store file missing, starting empty");
        return Ok(MemoryStore::new(config.buffer()));
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read store: {}", path.display()))?;
    MemoryStore::from_json(&raw, config.buffer())
        .with_context(|| format!("Failed to parse store: {}", path.display()))
}

fn save_store(path: &Path, store: &MemoryStore) -> Result<()> {
    let json = store.to_json()?;
    std::fs::write(path, json).with_context(|| format!("Failed to write store: {}", path.display()))
}
