// manigoal-core/src/lib.rs

#![doc = include_str!("../../README.md")]

pub mod api;
pub mod config;
pub mod errors;
pub mod goals;
pub mod parsers;
pub mod persona;
pub mod postprocess;
pub mod quotes;


use std::sync::Arc;
use tracing::{debug, error, info, trace};

pub use config::{CompanionConfig, GenerationParameters};
pub use errors::CompanionError;
pub use goals::{GoalStore, InMemoryGoalStore, JsonFileGoalStore};
pub use models::chat::{AIResponse, ApiResponse, ChatMessage, Choice, Role};
pub use models::goal::{Goal, Milestone, MilestoneStatus};
pub use models::suggestions::{
    GoalSuggestion, MotivationalResponse, ProgressUpdate, VisionBoardSuggestion,
};
pub use quotes::QuoteResponse;

pub use async_trait::async_trait;

use reqwest::Client;

/// How many prior turns travel with each request.
pub const MAX_CONTEXT_MESSAGES: usize = 2;

/// The goal-setting companion: turns one user message into one coached reply.
pub struct Companion {
    config: CompanionConfig,
    goal_store: Option<Arc<dyn GoalStore>>,
    http_client: Client,
}

impl Companion {
    /// Creates a new `Companion`. Without a goal store every reply is sent
    /// without goal context.
    pub fn new(
        config: CompanionConfig,
        goal_store: Option<Arc<dyn GoalStore>>,
    ) -> Result<Self, CompanionError> {
        let http_client = Client::builder()
            .build()
            .map_err(CompanionError::Http)?;
        Ok(Self {
            config,
            goal_store,
            http_client,
        })
    }

    pub fn config(&self) -> &CompanionConfig {
        &self.config
    }

    /// Resolves `goal_id` to its context text; see [`goals::resolve_goal_context`].
    pub async fn goal_context(&self, goal_id: Option<&str>) -> Option<String> {
        goals::resolve_goal_context(self.goal_store.as_deref(), goal_id).await
    }

    /// Assembles the request messages: persona prompt, optional goal
    /// context, the most recent prior turns, then the new message.
    pub async fn build_messages(
        &self,
        message: &str,
        goal_id: Option<&str>,
        previous_messages: &[ChatMessage],
    ) -> Vec<ChatMessage> {
        let mut messages = vec![ChatMessage::system(persona::SYSTEM_PROMPT.as_str())];
        if let Some(context) = self.goal_context(goal_id).await {
            messages.push(ChatMessage::system(context));
        }
        let skip = previous_messages.len().saturating_sub(MAX_CONTEXT_MESSAGES);
        messages.extend(previous_messages[skip..].iter().cloned());
        messages.push(ChatMessage::user(message));
        messages
    }

    /// Runs one turn, surfacing every failure to the caller.
    pub async fn try_respond(
        &self,
        message: &str,
        goal_id: Option<&str>,
        previous_messages: &[ChatMessage],
    ) -> Result<AIResponse, CompanionError> {
        if message.trim().is_empty() {
            return Err(CompanionError::EmptyMessage);
        }
        let messages = self.build_messages(message, goal_id, previous_messages).await;
        debug!(
            model = %self.config.model_name,
            num_messages = messages.len(),
            "Sending request to completion endpoint."
        );

        let raw = api::call_chat_completion_api(&self.http_client, &self.config, &messages).await?;
        trace!(raw = %raw, "Raw completion text");

        let response = postprocess::process_completion(&raw);
        debug!(
            chars = response.message.chars().count(),
            actions = response.suggested_actions.as_ref().map_or(0, Vec::len),
            "Processed completion."
        );
        Ok(response)
    }

    /// Runs one turn. Never fails: any error is logged and the fixed
    /// fallback reply is returned instead.
    pub async fn respond(
        &self,
        message: &str,
        goal_id: Option<&str>,
        previous_messages: &[ChatMessage],
    ) -> AIResponse {
        info!(goal_id = ?goal_id, num_previous = previous_messages.len(), "Generating companion response.");
        match self.try_respond(message, goal_id, previous_messages).await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "Error generating AI response, using fallback.");
                persona::fallback_response()
            }
        }
    }
}

pub mod models {
    pub mod chat;
    pub mod goal;
    pub mod suggestions;
}
