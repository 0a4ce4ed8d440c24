// manigoal-core/src/models/suggestions.rs
//! Structured extractions scraped from free-text model output.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GoalSuggestion {
    pub title: String,
    pub category: String,
    pub description: String,
    pub milestones: Vec<String>,
    pub estimated_duration: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub current_progress: u32,
    pub completed_milestones: Vec<String>,
    pub pending_milestones: Vec<String>,
    pub next_milestone: Option<String>,
    pub recent_achievements: Option<Vec<String>>,
    pub challenges: Option<Vec<String>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct MotivationalResponse {
    pub quote: Option<String>,
    pub author: Option<String>,
    pub context: Option<String>,
    pub encouragement: Option<String>,
    pub success_story: Option<String>,
    pub personalized_tips: Option<Vec<String>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VisionBoardSuggestion {
    pub keywords: Vec<String>,
    pub layout: String,
    pub theme: String,
    pub image_prompts: Vec<String>,
    pub captions: Vec<String>,
    pub mood_description: Option<String>,
}
