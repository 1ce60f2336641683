//! Evalpulse - training-session feedback tracker
//!
//! A CLI tool for managing an event's sessions, participants, and
//! evaluation forms, with aggregate score dashboards and AI-generated
//! narrative reports per session.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (store, config, import, or analysis failure)

mod analysis;
mod cli;
mod config;
mod insight;
mod models;
mod report;
mod roster;
mod store;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use cli::{Args, Command, FeedbackAction, OutputFormat, ParticipantAction, SessionAction};
use config::Config;
use indicatif::{ProgressBar, ProgressStyle};
use models::{new_id, Feedback, Participant, QuestionFeedback, Session};
use std::path::{Path, PathBuf};
use std::time::Duration;
use store::Store;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle init-config early (no logging needed)
    if matches!(args.command, Command::InitConfig) {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    debug!("Evalpulse v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(args).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("\n❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle init-config: generate a default .evalpulse.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(".evalpulse.toml");

    if path.exists() {
        eprintln!("⚠️  .evalpulse.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .evalpulse.toml")?;

    println!("✅ Created .evalpulse.toml with default settings.");
    println!("   Edit it to customize the store path, model, and report output.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    match Config::load_default() {
        Ok(Some(config)) => {
            debug!("Loaded default config from .evalpulse.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}

/// Dispatch the parsed command.
async fn run(args: Args) -> Result<()> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let store_path = PathBuf::from(&config.general.store);
    let mut store = Store::load(&store_path)?;

    match args.command {
        Command::Dashboard { date, presenter } => handle_dashboard(&store, date, presenter),
        Command::Report {
            session,
            output,
            format,
            model,
        } => handle_report(&store, &config, &session, output, format, model).await,
        Command::Sessions { action } => handle_sessions(&mut store, action),
        Command::Participants { action } => handle_participants(&mut store, action),
        Command::Feedback { action } => handle_feedback(&mut store, action),
        Command::Title { new_title } => handle_title(&mut store, new_title),
        Command::InitConfig => unreachable!("handled before dispatch"),
    }
}

/// Print the aggregate dashboard, optionally filtered by date or presenter.
///
/// Filtered views scope both the feedback and the session list, and drop
/// the speaker ranking; that ranking only belongs in the overall view.
fn handle_dashboard(
    store: &Store,
    date: Option<chrono::NaiveDate>,
    presenter: Option<String>,
) -> Result<()> {
    let sessions = store.sessions();

    let (scoped_sessions, filtered): (Vec<Session>, Vec<Feedback>) = if let Some(date) = date {
        (
            analysis::sessions_on_date(sessions, date),
            analysis::filter_by_date(store.feedback(), sessions, date),
        )
    } else if let Some(ref presenter) = presenter {
        (
            analysis::sessions_by_presenter(sessions, presenter),
            analysis::filter_by_presenter(store.feedback(), sessions, presenter),
        )
    } else {
        (sessions.to_vec(), store.feedback().to_vec())
    };

    let include_ranking = date.is_none() && presenter.is_none();
    let stats = analysis::overall_stats(&filtered);
    print!(
        "{}",
        report::render_dashboard(
            store.event_title(),
            stats.as_ref(),
            &filtered,
            &scoped_sessions,
            include_ranking,
        )
    );

    Ok(())
}

/// Generate the AI report for one session and write it to disk.
async fn handle_report(
    store: &Store,
    config: &Config,
    session_id: &str,
    output: Option<PathBuf>,
    format: OutputFormat,
    model: Option<String>,
) -> Result<()> {
    let session = store
        .find_session(session_id)
        .with_context(|| format!("no session with id {}", session_id))?;
    let feedback = store.feedback_for_session(session_id);

    let mut insight_config = config.insight_config();
    if let Some(model) = model {
        insight_config.model_name = model;
    }

    println!("🔬 Analyzing session: {}", session.title);
    println!("   Model: {}", insight_config.model_name);
    println!("   Evaluations: {}", feedback.len());

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Waiting for the analysis engine...");
    spinner.enable_steady_tick(Duration::from_millis(120));

    let engine = insight::InsightEngine::new(insight_config);
    let result = engine.generate_session_report(session, &feedback).await;
    spinner.finish_and_clear();

    let insight = result?;

    let content = match format {
        OutputFormat::Markdown => {
            // The engine already rejected an empty feedback set, so the
            // aggregate is always present here.
            let averages = analysis::overall_stats(&feedback)
                .context("no evaluations found for this session")?;
            report::generate_markdown_report(session, &insight, &averages)
        }
        OutputFormat::Json => report::generate_json_report(&insight)?,
    };

    let output_path = output.unwrap_or_else(|| PathBuf::from(&config.report.output));
    std::fs::write(&output_path, &content)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;

    println!("\n✅ Report saved to: {}", output_path.display());
    Ok(())
}

fn handle_sessions(store: &mut Store, action: SessionAction) -> Result<()> {
    match action {
        SessionAction::List => {
            if store.sessions().is_empty() {
                println!("No sessions yet. Add one or import a program CSV.");
                return Ok(());
            }
            for s in store.sessions() {
                println!(
                    "{}  {}  {}-{}  {}  ({})",
                    s.id,
                    s.date,
                    s.start_time.format("%H:%M"),
                    s.end_time.format("%H:%M"),
                    s.title,
                    s.presenter_name
                );
            }
            Ok(())
        }
        SessionAction::Add {
            title,
            date,
            start,
            end,
            presenter,
            email,
            phone,
            location,
            material_url,
        } => {
            let session = Session {
                id: new_id(),
                title,
                date,
                start_time: start,
                end_time: end,
                presenter_name: presenter,
                presenter_email: email,
                presenter_phone: phone,
                location,
                material_url,
            };
            let id = session.id.clone();
            store.add_sessions(vec![session]);
            store.save()?;
            println!("✅ Added session {}", id);
            Ok(())
        }
        SessionAction::Edit {
            id,
            title,
            date,
            start,
            end,
            presenter,
            email,
            phone,
            location,
            material_url,
        } => {
            let mut session = store
                .find_session(&id)
                .with_context(|| format!("no session with id {}", id))?
                .clone();
            if let Some(title) = title {
                session.title = title;
            }
            if let Some(date) = date {
                session.date = date;
            }
            if let Some(start) = start {
                session.start_time = start;
            }
            if let Some(end) = end {
                session.end_time = end;
            }
            if let Some(presenter) = presenter {
                session.presenter_name = presenter;
            }
            if let Some(email) = email {
                session.presenter_email = email;
            }
            if let Some(phone) = phone {
                session.presenter_phone = Some(phone);
            }
            if let Some(location) = location {
                session.location = location;
            }
            if let Some(url) = material_url {
                session.material_url = Some(url);
            }
            store.update_session(session)?;
            store.save()?;
            println!("✅ Updated session {}", id);
            Ok(())
        }
        SessionAction::Import { file } => {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let sessions = roster::parse_sessions_csv(&content)?;
            let count = sessions.len();
            store.add_sessions(sessions);
            store.save()?;
            println!("✅ Imported {} session(s) from {}", count, file.display());
            Ok(())
        }
        SessionAction::Remove { id } => {
            store.remove_session(&id)?;
            store.save()?;
            println!("✅ Removed session {}", id);
            Ok(())
        }
        SessionAction::Template => {
            print!("{}", roster::SESSION_TEMPLATE);
            Ok(())
        }
    }
}

fn handle_participants(store: &mut Store, action: ParticipantAction) -> Result<()> {
    match action {
        ParticipantAction::List => {
            if store.participants().is_empty() {
                println!("No participants yet. Add one or import a list CSV.");
                return Ok(());
            }
            for p in store.participants() {
                println!("{}  {}  <{}>", p.id, p.name, p.email);
            }
            Ok(())
        }
        ParticipantAction::Add { name, email, phone } => {
            let participant = Participant {
                id: new_id(),
                name,
                email,
                phone,
            };
            let id = participant.id.clone();
            store.add_participants(vec![participant]);
            store.save()?;
            println!("✅ Added participant {}", id);
            Ok(())
        }
        ParticipantAction::Edit {
            id,
            name,
            email,
            phone,
        } => {
            let mut participant = store
                .find_participant(&id)
                .with_context(|| format!("no participant with id {}", id))?
                .clone();
            if let Some(name) = name {
                participant.name = name;
            }
            if let Some(email) = email {
                participant.email = email;
            }
            if let Some(phone) = phone {
                participant.phone = Some(phone);
            }
            store.update_participant(participant)?;
            store.save()?;
            println!("✅ Updated participant {}", id);
            Ok(())
        }
        ParticipantAction::Import { file } => {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let participants = roster::parse_participants_csv(&content)?;
            let count = participants.len();
            store.add_participants(participants);
            store.save()?;
            println!(
                "✅ Imported {} participant(s) from {}",
                count,
                file.display()
            );
            Ok(())
        }
        ParticipantAction::Remove { id } => {
            store.remove_participant(&id)?;
            store.save()?;
            println!("✅ Removed participant {}", id);
            Ok(())
        }
        ParticipantAction::Template => {
            print!("{}", roster::PARTICIPANT_TEMPLATE);
            Ok(())
        }
    }
}

fn handle_feedback(store: &mut Store, action: FeedbackAction) -> Result<()> {
    match action {
        FeedbackAction::Add {
            session,
            participant,
            answers,
            comments,
        } => {
            if store.find_session(&session).is_none() {
                bail!("no session with id {}", session);
            }
            if store.find_participant(&participant).is_none() {
                bail!("no participant with id {}", participant);
            }

            let content = std::fs::read_to_string(&answers)
                .with_context(|| format!("Failed to read {}", answers.display()))?;
            let answers: Vec<QuestionFeedback> = serde_json::from_str(&content)
                .context("Failed to parse answers file (expected a JSON array of answers)")?;

            let record = Feedback {
                id: new_id(),
                session_id: session,
                participant_id: participant,
                answers,
                comments,
                submitted_at: Utc::now(),
            };
            let id = record.id.clone();
            store.add_feedback(record)?;
            store.save()?;
            println!("✅ Recorded feedback {}", id);
            Ok(())
        }
        FeedbackAction::List { session } => {
            let records: Vec<&Feedback> = store
                .feedback()
                .iter()
                .filter(|f| session.as_deref().map_or(true, |id| f.session_id == id))
                .collect();

            if records.is_empty() {
                println!("No feedback recorded.");
                return Ok(());
            }
            for f in records {
                println!(
                    "{}  session={}  participant={}  overall={:.1}  ({})",
                    f.id,
                    f.session_id,
                    f.participant_id,
                    analysis::category_average(f, models::Category::Overall),
                    f.submitted_at.format("%Y-%m-%d %H:%M")
                );
            }
            Ok(())
        }
    }
}

fn handle_title(store: &mut Store, new_title: Option<String>) -> Result<()> {
    match new_title {
        Some(title) => {
            store.set_event_title(title);
            store.save()?;
            println!("✅ Event title updated: {}", store.event_title());
        }
        None => println!("{}", store.event_title()),
    }
    Ok(())
}
