// manigoal-cli/src/history.rs

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use manigoal_core::{AIResponse, ChatMessage, Role};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};
use tracing::warn;
use uuid::Uuid;

const HISTORY_SUBDIR: &str = ".manigoal/history";
const PREVIEW_CHARS: usize = 70;

/// One stored turn. Assistant turns keep the quick replies they offered.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct HistoryMessage {
    #[serde(flatten)]
    pub message: ChatMessage,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub suggested_actions: Option<Vec<String>>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ConversationHistory {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub last_updated_at: DateTime<Utc>,
    #[serde(default)]
    pub goal_id: Option<String>,
    pub messages: Vec<HistoryMessage>,
}

impl ConversationHistory {
    pub fn new(goal_id: Option<String>) -> Self {
        let now = Utc::now();
        ConversationHistory {
            id: Uuid::new_v4(),
            created_at: now,
            last_updated_at: now,
            goal_id,
            messages: Vec::new(),
        }
    }

    /// Records a user message and the reply it got.
    pub fn record_turn(&mut self, user_message: &str, response: &AIResponse) {
        self.messages.push(HistoryMessage {
            message: ChatMessage::user(user_message),
            suggested_actions: None,
        });
        self.messages.push(HistoryMessage {
            message: ChatMessage::assistant(response.message.clone()),
            suggested_actions: response.suggested_actions.clone(),
        });
        self.last_updated_at = Utc::now();
    }

    /// The stored turns as plain chat messages, oldest first.
    pub fn chat_messages(&self) -> Vec<ChatMessage> {
        self.messages.iter().map(|m| m.message.clone()).collect()
    }
}

// --- Helper Functions ---

/// Gets the path to the project-specific history storage directory, creating it if necessary.
fn ensure_history_dir(project_root: &Path) -> Result<PathBuf> {
    let history_path = project_root.join(HISTORY_SUBDIR);
    fs::create_dir_all(&history_path)
        .with_context(|| format!("Failed to create history directory at {:?}", history_path))?;
    Ok(history_path)
}

fn get_history_file_path(project_root: &Path, id: Uuid) -> Result<PathBuf> {
    let history_dir = ensure_history_dir(project_root)?;
    Ok(history_dir.join(format!("{}.json", id)))
}

/// Saves a conversation history to a JSON file within the project's history directory.
pub fn save_history(project_root: &Path, history: &ConversationHistory) -> Result<()> {
    let file_path = get_history_file_path(project_root, history.id)?;
    let file = File::create(&file_path)
        .with_context(|| format!("Failed to create history file at {:?}", file_path))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, history)
        .with_context(|| format!("Failed to serialize history to {:?}", file_path))?;
    writer
        .flush()
        .with_context(|| format!("Failed to flush writer for {:?}", file_path))?;
    Ok(())
}

/// Loads a conversation history by ID from the project's history directory.
pub fn load_history(project_root: &Path, id: Uuid) -> Result<ConversationHistory> {
    let file_path = get_history_file_path(project_root, id)?;
    if !file_path.exists() {
        return Err(anyhow::anyhow!("History file not found at {:?}", file_path));
    }
    let file = File::open(&file_path)
        .with_context(|| format!("Failed to open history file at {:?}", file_path))?;
    let reader = BufReader::new(file);
    let history: ConversationHistory = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to deserialize history from {:?}", file_path))?;
    Ok(history)
}

pub fn delete_history(project_root: &Path, id: Uuid) -> Result<()> {
    let file_path = get_history_file_path(project_root, id)?;
    if file_path.exists() {
        fs::remove_file(&file_path)
            .with_context(|| format!("Failed to delete history file at {:?}", file_path))?;
        Ok(())
    } else {
        Err(anyhow::anyhow!("History with ID {} not found in project.", id))
    }
}

/// Lists all saved conversations in the project, newest first.
/// Files that fail to load are skipped with a warning.
pub fn list_histories(project_root: &Path) -> Result<Vec<ConversationHistory>> {
    let history_dir = ensure_history_dir(project_root)?;
    let mut histories = Vec::new();

    for entry in fs::read_dir(&history_dir)
        .with_context(|| format!("Failed to read history directory at {:?}", history_dir))?
    {
        let path = entry?.path();
        if !path.is_file() || path.extension().map_or(true, |ext| ext != "json") {
            continue;
        }
        let Some(id) = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|stem| Uuid::parse_str(stem).ok())
        else {
            continue;
        };
        match load_history(project_root, id) {
            Ok(history) => histories.push(history),
            Err(e) => warn!(path = ?path, error = %e, "Skipping unreadable history file."),
        }
    }

    histories.sort_by(|a, b| b.last_updated_at.cmp(&a.last_updated_at));
    Ok(histories)
}

/// Gets a short preview string of the first user message.
pub fn get_history_preview(history: &ConversationHistory) -> String {
    history
        .messages
        .iter()
        .find(|m| m.message.role == Role::User)
        .map(|m| {
            let content = &m.message.content;
            let preview: String = content.chars().take(PREVIEW_CHARS).collect();
            if content.chars().count() > PREVIEW_CHARS {
                format!("{}...", preview)
            } else {
                preview
            }
        })
        .unwrap_or_else(|| "[No user messages]".to_string())
}
