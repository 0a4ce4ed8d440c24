// manigoal-cli/src/main.rs
mod history;

mod models {
    pub mod cli;
}

use anyhow::{anyhow, Context, Result};
use colored::*;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use uuid::Uuid;

use dialoguer::{theme::ColorfulTheme, Confirm};
use indicatif::{ProgressBar, ProgressStyle};
use rustyline::error::ReadlineError;
use rustyline::{Config, DefaultEditor};

use manigoal_core::{
    goals::resolve_goal_context, quotes, AIResponse, ChatMessage, Companion, CompanionConfig,
    GoalStore, JsonFileGoalStore,
};

use crate::history::{
    delete_history, get_history_preview, list_histories, load_history, save_history,
    ConversationHistory,
};
use crate::models::cli::{Cli, Commands};

use clap::Parser;
use tracing::{debug, error, info, warn, Level};
use tracing_subscriber::{
    fmt::{self, time::LocalTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

const CONFIG_FILENAME: &str = "Manigoal.toml";
const GOALS_FILENAME: &str = "goals.json";
const LOG_FILE_NAME: &str = "manigoal-app.log";
const APP_DIR: &str = "manigoal";

/// Produces replies either from the completion endpoint or from canned text.
enum Responder {
    Online(Companion),
    Offline {
        goal_store: Option<Arc<dyn GoalStore>>,
    },
}

impl Responder {
    async fn reply(
        &self,
        message: &str,
        goal_id: Option<&str>,
        previous_messages: &[ChatMessage],
    ) -> AIResponse {
        match self {
            Responder::Online(companion) => {
                companion.respond(message, goal_id, previous_messages).await
            }
            Responder::Offline { goal_store } => {
                let context = resolve_goal_context(goal_store.as_deref(), goal_id).await;
                quotes::mock_response(context.as_deref().unwrap_or(""))
            }
        }
    }
}

/// Everything a chat turn needs besides the conversation itself.
struct Session {
    responder: Responder,
    project_root: PathBuf,
    goal_override: Option<String>,
}

impl Session {
    fn goal_for<'a>(&'a self, history: &'a ConversationHistory) -> Option<&'a str> {
        self.goal_override.as_deref().or(history.goal_id.as_deref())
    }

    async fn run_turn(&self, history: &mut ConversationHistory, message: &str) -> Result<AIResponse> {
        let previous = history.chat_messages();
        let goal_id = self.goal_for(history).map(str::to_string);

        let pb = thinking_spinner()?;
        let response = self
            .responder
            .reply(message, goal_id.as_deref(), &previous)
            .await;
        pb.finish_and_clear();

        history.record_turn(message, &response);
        Ok(response)
    }
}

fn find_project_root() -> Result<Option<PathBuf>> {
    let current_dir = env::current_dir().context("Failed to get current directory")?;
    let mut current = current_dir.as_path();
    loop {
        let config_path = current.join(CONFIG_FILENAME);
        if config_path.is_file() {
            return Ok(Some(current.to_path_buf()));
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return Ok(None),
        }
    }
}

/// Reads `Manigoal.toml` from the project root, or falls back to environment variables.
fn load_cli_config(project_root: Option<&Path>) -> Result<CompanionConfig> {
    match project_root {
        Some(root) => {
            let config_path = root.join(CONFIG_FILENAME);
            info!("Found configuration file at: {:?}", config_path);
            let config_toml_content = fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read project config file: {:?}", config_path))?;
            CompanionConfig::from_toml_str(&config_toml_content)
                .context("Failed to parse or validate configuration content")
        }
        None => {
            info!("No {} found, configuring from environment.", CONFIG_FILENAME);
            CompanionConfig::from_env().context("Failed to configure from environment")
        }
    }
}

fn open_goal_store(goals_file: Option<PathBuf>, project_root: &Path) -> Option<Arc<dyn GoalStore>> {
    let explicit = goals_file.is_some();
    let path = goals_file.unwrap_or_else(|| project_root.join(GOALS_FILENAME));
    if path.is_file() {
        debug!(path = ?path, "Using goals file.");
        Some(Arc::new(JsonFileGoalStore::new(path)))
    } else {
        if explicit {
            warn!(path = ?path, "Goals file not found, replies will have no goal context.");
        }
        None
    }
}

fn thinking_spinner() -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")?
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "-"]),
    );
    pb.set_message("Thinking...");
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    Ok(pb)
}

fn print_welcome_message(history: &ConversationHistory, goal_id: Option<&str>, offline: bool) {
    println!("\n{}", "ManiGoal - Your Goal Companion".magenta().bold());
    println!("{}: {}", "Conversation ID".cyan(), history.id);
    if let Some(goal_id) = goal_id {
        println!("{}: {}", "Goal".cyan(), goal_id);
    }
    if offline {
        println!("{}", "Offline mode: replies are canned.".yellow());
    }
    println!(
        "{}\n{}",
        "Type 'exit', 'quit', Ctrl-D, or press Enter on an empty line to quit.".dimmed(),
        "Type 'new' to start a fresh conversation.".dimmed()
    );
    println!();
}

fn print_response(response: &AIResponse) {
    println!("\n{}\n", response.message);
}

fn save_or_report(project_root: &Path, history: &ConversationHistory) {
    match save_history(project_root, history) {
        Ok(()) => info!(history_id = %history.id, "Saved conversation history."),
        Err(e) => {
            error!(history_id = %history.id, "Failed to save conversation history: {}", e);
            eprintln!("{}", "Error: Failed to save conversation history.".red());
        }
    }
}

/// Runs a single turn (non-interactive).
async fn run_single_turn(
    session: &Session,
    message: String,
    mut history: ConversationHistory,
) -> Result<()> {
    info!(history_id = %history.id, "Running non-interactive turn.");
    let response = session.run_turn(&mut history, &message).await?;
    println!("{}", response.message);
    save_history(&session.project_root, &history)?;
    info!(history_id = %history.id, "Saved updated conversation history.");
    Ok(())
}

/// Runs an interactive chat session using rustyline for a REPL experience.
async fn run_interactive(session: &Session, mut history: ConversationHistory) -> Result<()> {
    let offline = matches!(session.responder, Responder::Offline { .. });
    print_welcome_message(&history, session.goal_for(&history), offline);

    let rl_config = Config::builder()
        .history_ignore_space(true)
        .edit_mode(rustyline::EditMode::Emacs)
        .auto_add_history(true)
        .build();
    let mut rl = DefaultEditor::with_config(rl_config)?;

    let history_dir = dirs::cache_dir()
        .map(|d| d.join(APP_DIR))
        .ok_or_else(|| anyhow!("Could not determine cache directory for history file"))?;
    fs::create_dir_all(&history_dir).context("Failed to create history directory")?;
    let history_file_path = history_dir.join("cli_history.txt");
    if rl.load_history(&history_file_path).is_err() {
        debug!(path = %history_file_path.display(), "No previous CLI history found or error loading.");
    }

    let prompt = format!("{} ", ">".green().bold());

    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed_input = line.trim();
                let command = trimmed_input.to_lowercase();

                if trimmed_input.is_empty() || command == "exit" || command == "quit" {
                    info!("Exit command or empty line entered, exiting interactive mode.");
                    break;
                }

                if command == "new" {
                    println!("\n{}", "Starting a new conversation...".cyan());
                    if !history.messages.is_empty() {
                        save_or_report(&session.project_root, &history);
                    }
                    history = ConversationHistory::new(history.goal_id.clone());
                    info!(history_id = %history.id, "Started new conversation history.");
                    print_welcome_message(&history, session.goal_for(&history), offline);
                    continue;
                }

                let response = session.run_turn(&mut history, trimmed_input).await?;
                print_response(&response);
                save_or_report(&session.project_root, &history);
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "^C".yellow());
                continue;
            }
            Err(ReadlineError::Eof) => {
                info!("EOF detected, exiting interactive mode.");
                break;
            }
            Err(err) => {
                error!("Readline error: {:?}", err);
                eprintln!("Error reading input: {}", err.to_string().red());
                break;
            }
        }
    }

    if let Err(e) = rl.save_history(&history_file_path) {
        warn!(path = %history_file_path.display(), error = %e, "Failed to save CLI history.");
    }

    if !history.messages.is_empty() {
        save_or_report(&session.project_root, &history);
        println!("\n{}\n", "Conversation saved. Keep going!".cyan());
    }
    Ok(())
}

// --- Functions for quote, goals, list, view, delete ---

fn handle_quote() -> Result<()> {
    let quote = quotes::daily_quote();
    println!("\n\"{}\"", quote.quote_text.italic());
    println!(
        "  - {} ({})\n",
        quote.author.as_deref().unwrap_or("Unknown"),
        quote.category.dimmed()
    );
    Ok(())
}

async fn handle_list_goals(goals_file: Option<PathBuf>, project_root: &Path) -> Result<()> {
    let path = goals_file.unwrap_or_else(|| project_root.join(GOALS_FILENAME));
    let goals = JsonFileGoalStore::new(path).load_goals().await?;
    if goals.is_empty() {
        println!("No goals found.");
        return Ok(());
    }

    println!("\n{}", "Goals:".bold());
    println!(
        "{:<20} {:<40} {:>8}  {}",
        "ID".underline(),
        "Title".underline(),
        "Progress".underline(),
        "Deadline".underline()
    );
    for goal in &goals {
        let deadline = goal
            .deadline
            .map(|d| d.format("%m/%d/%Y").to_string())
            .unwrap_or_else(|| "No deadline".to_string());
        println!(
            "{:<20} {:<40} {:>7}%  {}",
            goal.id,
            goal.title,
            goal.completion_percentage,
            deadline.dimmed()
        );
    }
    println!("\n{}", "(Use 'manigoal --goal <ID>' to chat about one)".dimmed());
    Ok(())
}

fn handle_list_conversations(project_root: &Path, limit: usize) -> Result<()> {
    let histories = list_histories(project_root)?;
    if histories.is_empty() {
        println!("No conversation histories found.");
        return Ok(());
    }

    println!("\n{}", "Recent Conversations:".bold());
    println!(
        "{:<36} {:<20} {}",
        "ID".underline(),
        "Last Updated".underline(),
        "Preview".underline()
    );
    for history in histories.iter().take(limit) {
        let local_time = history.last_updated_at.with_timezone(&chrono::Local);
        println!(
            "{:<36} {:<20} {}",
            history.id.to_string(),
            local_time.format("%Y-%m-%d %H:%M:%S").to_string(),
            get_history_preview(history).dimmed()
        );
    }
    println!("\n{}", "(Use 'manigoal view <ID>' to see details)".dimmed());
    Ok(())
}

fn handle_view_conversation(project_root: &Path, id: Uuid, full: bool) -> Result<()> {
    let history = load_history(project_root, id)?;
    let created_local = history.created_at.with_timezone(&chrono::Local);
    let updated_local = history.last_updated_at.with_timezone(&chrono::Local);

    println!("\n{}", format!("Conversation ID: {}", history.id).bold());
    println!("Created:         {}", created_local.format("%Y-%m-%d %H:%M:%S %Z"));
    println!("Last Updated:    {}", updated_local.format("%Y-%m-%d %H:%M:%S %Z"));
    if let Some(goal_id) = &history.goal_id {
        println!("Goal:            {}", goal_id);
    }
    println!("Messages:        {}", history.messages.len());
    println!("{}", "--- Messages ---".bold());

    let is_long = |c: &str| c.lines().count() > 1 || c.chars().count() > 100;
    for entry in &history.messages {
        let content = entry.message.content.as_str();
        println!("\n[{}]", entry.message.role.to_string().to_uppercase().cyan());
        if full {
            println!("{}", content);
            if let Some(actions) = &entry.suggested_actions {
                println!("{} {}", "Suggested:".dimmed(), actions.join(" | ").dimmed());
            }
        } else {
            let preview: String = content.lines().next().unwrap_or("").chars().take(100).collect();
            if is_long(content) {
                println!("{}...", preview.trim());
            } else {
                println!("{}", preview.trim());
            }
        }
    }
    println!("\n{}", "--- End ---".bold());
    if !full && history.messages.iter().any(|m| is_long(&m.message.content)) {
        println!("{}", "(Pass --full to see complete message content)".dimmed());
    }
    Ok(())
}

fn handle_delete_conversation(project_root: &Path, id: Uuid) -> Result<()> {
    if Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("Are you sure you want to delete conversation {}?", id))
        .default(false)
        .interact()?
    {
        delete_history(project_root, id)?;
        println!("Conversation {} deleted.", id);
    } else {
        println!("Deletion cancelled.");
    }
    Ok(())
}

/// Installs stderr and file logging. The returned guard must outlive `main`'s work.
fn init_logging(verbose: u8) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let default_level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(default_level.into()));

    let log_dir = dirs::cache_dir()
        .or_else(dirs::runtime_dir)
        .unwrap_or_else(env::temp_dir)
        .join(APP_DIR);
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(&log_dir, LOG_FILE_NAME);
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);

    let time_format_desc = time::format_description::parse(
        "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]",
    )
    .context("Failed to parse log time format")?;
    let local_timer = LocalTime::new(time_format_desc);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_writer)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .with_timer(local_timer.clone());
    let stderr_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_timer(local_timer)
        .with_target(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to initialize logging")?;

    info!(
        "Logging initialized. Level determined by RUST_LOG or -v flags (default: {}). Logging to stderr and {}",
        default_level,
        log_dir.join(LOG_FILE_NAME).display()
    );
    Ok(guard)
}

async fn run(cli: Cli) -> Result<()> {
    let found_root = find_project_root()?;
    let project_root = match &found_root {
        Some(root) => root.clone(),
        None => env::current_dir().context("Failed to get current directory")?,
    };

    match cli.command {
        Some(Commands::Quote) => return handle_quote(),
        Some(Commands::Goals) => return handle_list_goals(cli.goals_file, &project_root).await,
        Some(Commands::List { limit }) => return handle_list_conversations(&project_root, limit),
        Some(Commands::View { id, full }) => return handle_view_conversation(&project_root, id, full),
        Some(Commands::Delete { id }) => return handle_delete_conversation(&project_root, id),
        _ => {}
    }

    let goal_store = open_goal_store(cli.goals_file, &project_root);
    let responder = if cli.offline {
        info!("Offline mode, using canned replies.");
        Responder::Offline { goal_store }
    } else {
        let config = load_cli_config(found_root.as_deref())?;
        debug!(config = ?config, "Loaded companion configuration.");
        Responder::Online(Companion::new(config, goal_store)?)
    };
    let session = Session {
        responder,
        project_root,
        goal_override: cli.goal,
    };

    match cli.command {
        Some(Commands::Resume { id, turn }) => {
            let history = load_history(&session.project_root, id)
                .with_context(|| format!("Could not load conversation history for ID: {}", id))?;
            info!(history_id = %history.id, "Resuming conversation.");
            match turn {
                Some(message) => run_single_turn(&session, message, history).await,
                None => run_interactive(&session, history).await,
            }
        }
        _ => {
            let history = ConversationHistory::new(session.goal_override.clone());
            info!(history_id = %history.id, "Starting new conversation.");
            match cli.turn {
                Some(message) => run_single_turn(&session, message, history).await,
                None => run_interactive(&session, history).await,
            }
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let _guard = match init_logging(cli.verbose) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red(), e);
            return ExitCode::FAILURE;
        }
    };

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if e.downcast_ref::<dialoguer::Error>().is_none() {
                error!("Operation failed: {:#}", e);
                eprintln!("{} {:#}", "Error:".red(), e);
            }
            ExitCode::FAILURE
        }
    }
}
