//! Command-line surface
//!
//! Commands are grouped by what they act on (`timer`, `sessions`,
//! `projects`, `away`) with a few top-level verbs for whole-record work.
//! Parsing lives here, value parsers in [`parse`], text rendering in
//! [`output`] and the mapping onto [`crate::commands`] in [`dispatch`].

mod dispatch;
pub mod output;
pub mod parse;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use lapse_domain::{ProjectStatus, ScreenState};
use lapse_infra::export::ExportFormat;

use crate::commands::TotalsRange;
pub use dispatch::dispatch;

#[derive(Parser, Debug)]
#[command(name = "lapse")]
#[command(about = "Personal time tracking with away-time reconciliation")]
#[command(version)]
pub struct Cli {
    /// Config file (TOML or JSON); overrides LAPSE_CONFIG and the probed locations
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory holding the state files
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<String>,

    /// Keep all state in memory for this run
    #[arg(long, global = true)]
    pub ephemeral: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start, stop or inspect the running timer
    #[command(subcommand)]
    Timer(TimerCommand),

    /// Manage recorded sessions
    #[command(subcommand)]
    Sessions(SessionsCommand),

    /// Manage projects
    #[command(subcommand)]
    Projects(ProjectsCommand),

    /// Time per project for a day, a week or all time
    Totals {
        #[arg(long, default_value = "day")]
        range: TotalsRange,

        /// Day the range is anchored on (YYYY-MM-DD); defaults to today
        #[arg(long, value_name = "DATE")]
        date: Option<NaiveDate>,

        #[arg(long)]
        include_archived: bool,
    },

    /// Reconcile time spent away from a locked screen
    #[command(subcommand)]
    Away(AwayCommand),

    /// Feed a screen lock or unlock event to the idle detector
    Signal {
        #[arg(value_name = "locked|unlocked")]
        state: ScreenState,
    },

    /// Export every project and session
    Export {
        #[arg(value_name = "json|csv")]
        format: ExportFormat,

        /// Write to a file instead of stdout
        #[arg(long, short, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Replace all data with the contents of a JSON export
    Import {
        #[arg(value_name = "PATH")]
        file: PathBuf,
    },

    /// Delete all projects and sessions and stop the timer
    Clear {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },

    /// Show the live timer and reconcile lock events read from stdin
    Watch,
}

#[derive(Subcommand, Debug)]
pub enum TimerCommand {
    /// Start timing a project (id or name)
    Start { project: String },

    /// Stop the timer and record the session
    Stop {
        /// Note for the recorded session
        #[arg(long)]
        note: Option<String>,
    },

    /// Show what is being timed
    Status,
}

#[derive(Subcommand, Debug)]
pub enum SessionsCommand {
    /// Record a session by hand
    Add {
        /// Project id or name
        project: String,

        /// RFC 3339, `YYYY-MM-DD HH:MM[:SS]` local time, or epoch milliseconds
        #[arg(long, value_parser = parse::parse_timestamp)]
        start: i64,

        #[arg(long, value_parser = parse::parse_timestamp)]
        end: i64,

        #[arg(long, default_value = "")]
        note: String,
    },

    /// Change fields of a recorded session
    Edit {
        id: String,

        /// Move the session to another project (id or name)
        #[arg(long)]
        project: Option<String>,

        #[arg(long, value_parser = parse::parse_timestamp)]
        start: Option<i64>,

        #[arg(long, value_parser = parse::parse_timestamp)]
        end: Option<i64>,

        #[arg(long)]
        note: Option<String>,
    },

    /// Delete a session
    Remove { id: String },

    /// List sessions, newest first
    List {
        /// Only sessions of this project (id or name)
        #[arg(long)]
        project: Option<String>,
    },
}

/// Optional project fields shared by `projects add` and `projects edit`
#[derive(Args, Debug, Default)]
pub struct ProjectFields {
    #[arg(long)]
    pub note: Option<String>,

    #[arg(long)]
    pub project_no: Option<String>,

    #[arg(long)]
    pub task_no: Option<String>,

    #[arg(long, value_name = "DATE")]
    pub start_date: Option<NaiveDate>,

    #[arg(long, value_name = "DATE")]
    pub end_date: Option<NaiveDate>,

    /// One of: in queue, active, on hold, done
    #[arg(long)]
    pub status: Option<ProjectStatus>,
}

#[derive(Subcommand, Debug)]
pub enum ProjectsCommand {
    /// Create a project
    Add {
        name: String,

        #[command(flatten)]
        fields: ProjectFields,
    },

    /// Change fields of a project (id or name)
    Edit {
        project: String,

        #[arg(long)]
        name: Option<String>,

        #[command(flatten)]
        fields: ProjectFields,
    },

    /// Hide a project from choosers and totals
    Archive { project: String },

    /// Bring an archived project back
    Unarchive { project: String },

    /// Delete a project and all of its sessions
    Delete { project: String },

    /// List projects
    List {
        /// Include archived projects
        #[arg(long)]
        all: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum AwayCommand {
    /// Describe the oldest away interval awaiting a decision
    Show,

    /// Drop the oldest away interval without recording it
    Discard,

    /// Record the oldest away interval against a project (id or name)
    Allocate {
        project: String,

        #[arg(long, default_value = "")]
        note: String,
    },

    /// Create a project and record the oldest away interval against it
    Create {
        name: String,

        /// Note for the new project
        #[arg(long, default_value = "")]
        note: String,
    },
}
