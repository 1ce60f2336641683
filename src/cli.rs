//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Evalpulse - training-session feedback tracker
///
/// Manage an event's sessions, participants, and evaluation forms from
/// the terminal, inspect aggregate scores, and generate an AI narrative
/// report per session.
///
/// Examples:
///   evalpulse sessions import program.csv
///   evalpulse feedback add --session s1 --participant p1 --answers form.json
///   evalpulse dashboard --presenter "Dr. Sarah Miller"
///   evalpulse report --session s1 --output report.md
///   evalpulse init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path to the event store file
    ///
    /// Defaults to evalpulse_data.json (or the config file's setting).
    #[arg(long, value_name = "FILE", env = "EVALPULSE_STORE", global = true)]
    pub store: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .evalpulse.toml in the current directory
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show aggregate scores, rating spread, and speaker ranking
    Dashboard {
        /// Restrict to sessions on this date
        #[arg(long, value_name = "YYYY-MM-DD", conflicts_with = "presenter")]
        date: Option<NaiveDate>,

        /// Restrict to sessions led by this presenter
        #[arg(long, value_name = "NAME")]
        presenter: Option<String>,
    },

    /// Generate an AI narrative report for one session
    Report {
        /// Session id to analyze
        #[arg(short, long, value_name = "ID")]
        session: String,

        /// Output file path (defaults to the config's report output)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format (markdown, json)
        #[arg(long, default_value = "markdown", value_name = "FORMAT")]
        format: OutputFormat,

        /// Override the configured model name
        #[arg(long, value_name = "NAME", env = "EVALPULSE_MODEL")]
        model: Option<String>,
    },

    /// Manage the session program
    Sessions {
        #[command(subcommand)]
        action: SessionAction,
    },

    /// Manage the participant list
    Participants {
        #[command(subcommand)]
        action: ParticipantAction,
    },

    /// Record and inspect submitted evaluations
    Feedback {
        #[command(subcommand)]
        action: FeedbackAction,
    },

    /// Show or set the event title
    Title {
        /// New title; omit to print the current one
        new_title: Option<String>,
    },

    /// Generate a default .evalpulse.toml configuration file
    InitConfig,
}

#[derive(Subcommand, Debug, Clone)]
pub enum SessionAction {
    /// List all sessions
    List,

    /// Add one session manually
    Add {
        #[arg(long)]
        title: String,
        #[arg(long, value_name = "YYYY-MM-DD")]
        date: NaiveDate,
        #[arg(long, value_name = "HH:MM", value_parser = parse_hhmm)]
        start: NaiveTime,
        #[arg(long, value_name = "HH:MM", value_parser = parse_hhmm)]
        end: NaiveTime,
        #[arg(long, value_name = "NAME")]
        presenter: String,
        #[arg(long, value_name = "EMAIL")]
        email: String,
        #[arg(long, value_name = "PHONE")]
        phone: Option<String>,
        #[arg(long)]
        location: String,
        #[arg(long, value_name = "URL")]
        material_url: Option<String>,
    },

    /// Edit fields of an existing session
    ///
    /// Only the supplied flags change; everything else is kept as-is.
    Edit {
        /// Session id
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, value_name = "YYYY-MM-DD")]
        date: Option<NaiveDate>,
        #[arg(long, value_name = "HH:MM", value_parser = parse_hhmm)]
        start: Option<NaiveTime>,
        #[arg(long, value_name = "HH:MM", value_parser = parse_hhmm)]
        end: Option<NaiveTime>,
        #[arg(long, value_name = "NAME")]
        presenter: Option<String>,
        #[arg(long, value_name = "EMAIL")]
        email: Option<String>,
        #[arg(long, value_name = "PHONE")]
        phone: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long, value_name = "URL")]
        material_url: Option<String>,
    },

    /// Batch-import sessions from a template-format CSV file
    Import {
        /// CSV file path
        file: PathBuf,
    },

    /// Remove a session (its feedback is kept)
    Remove {
        /// Session id
        id: String,
    },

    /// Print the CSV import template
    Template,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ParticipantAction {
    /// List all participants
    List,

    /// Add one participant manually
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: Option<String>,
    },

    /// Edit fields of an existing participant
    ///
    /// Only the supplied flags change; everything else is kept as-is.
    Edit {
        /// Participant id
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },

    /// Batch-import participants from a template-format CSV file
    Import {
        /// CSV file path
        file: PathBuf,
    },

    /// Remove a participant (their feedback is kept)
    Remove {
        /// Participant id
        id: String,
    },

    /// Print the CSV import template
    Template,
}

#[derive(Subcommand, Debug, Clone)]
pub enum FeedbackAction {
    /// Record a completed evaluation form
    Add {
        /// Session id the form is for
        #[arg(long, value_name = "ID")]
        session: String,

        /// Participant id submitting the form
        #[arg(long, value_name = "ID")]
        participant: String,

        /// JSON file with one answer per questionnaire entry
        #[arg(long, value_name = "FILE")]
        answers: PathBuf,

        /// Free-text comments
        #[arg(long, default_value = "")]
        comments: String,
    },

    /// List submitted evaluations
    List {
        /// Restrict to one session
        #[arg(long, value_name = "ID")]
        session: Option<String>,
    },
}

/// Parse an HH:MM time-of-day argument.
fn parse_hhmm(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s, "%H:%M").map_err(|e| format!("invalid time '{}': {}", s, e))
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Command::Sessions {
            action: SessionAction::Import { file },
        }
        | Command::Participants {
            action: ParticipantAction::Import { file },
        } = &self.command
        {
            if !file.exists() {
                return Err(format!("Import file does not exist: {}", file.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args(command: Command) -> Args {
        Args {
            store: None,
            config: None,
            verbose: false,
            quiet: false,
            command,
        }
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args(Command::InitConfig);
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args(Command::InitConfig);
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_missing_import_file_rejected() {
        let args = make_args(Command::Participants {
            action: ParticipantAction::Import {
                file: PathBuf::from("/definitely/not/here.csv"),
            },
        });
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_parse_dashboard_filters() {
        let args =
            Args::try_parse_from(["evalpulse", "dashboard", "--date", "2024-11-12"]).unwrap();
        match args.command {
            Command::Dashboard { date, presenter } => {
                assert_eq!(date.unwrap().to_string(), "2024-11-12");
                assert!(presenter.is_none());
            }
            _ => panic!("expected dashboard command"),
        }

        // date and presenter filters are mutually exclusive
        assert!(Args::try_parse_from([
            "evalpulse",
            "dashboard",
            "--date",
            "2024-11-12",
            "--presenter",
            "Ada"
        ])
        .is_err());
    }

    #[test]
    fn test_parse_session_edit() {
        let args = Args::try_parse_from([
            "evalpulse", "sessions", "edit", "s1", "--title", "Strategic Planning", "--start",
            "10:00",
        ])
        .unwrap();
        match args.command {
            Command::Sessions {
                action:
                    SessionAction::Edit {
                        id,
                        title,
                        start,
                        presenter,
                        ..
                    },
            } => {
                assert_eq!(id, "s1");
                assert_eq!(title.as_deref(), Some("Strategic Planning"));
                assert_eq!(start.unwrap().to_string(), "10:00:00");
                // omitted flags stay untouched
                assert!(presenter.is_none());
            }
            _ => panic!("expected sessions edit command"),
        }
    }

    #[test]
    fn test_parse_participant_edit() {
        let args = Args::try_parse_from([
            "evalpulse",
            "participants",
            "edit",
            "p1",
            "--email",
            "alice@example.com",
        ])
        .unwrap();
        match args.command {
            Command::Participants {
                action: ParticipantAction::Edit { id, email, name, .. },
            } => {
                assert_eq!(id, "p1");
                assert_eq!(email.as_deref(), Some("alice@example.com"));
                assert!(name.is_none());
            }
            _ => panic!("expected participants edit command"),
        }
    }

    #[test]
    fn test_parse_hhmm() {
        assert_eq!(parse_hhmm("09:30").unwrap().to_string(), "09:30:00");
        assert!(parse_hhmm("9am").is_err());
    }

    #[test]
    fn test_parse_report_command() {
        let args = Args::try_parse_from([
            "evalpulse", "report", "--session", "s1", "--format", "json",
        ])
        .unwrap();
        match args.command {
            Command::Report {
                session, format, ..
            } => {
                assert_eq!(session, "s1");
                assert_eq!(format, OutputFormat::Json);
            }
            _ => panic!("expected report command"),
        }
    }
}
