// manigoal-core/src/goals.rs

//! Lookup of the goal whose context grounds a reply.

use crate::models::goal::Goal;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Source of goal records (with milestones) for goal context.
#[async_trait]
pub trait GoalStore: Send + Sync {
    /// Returns the goal with `goal_id`, or `None` when it does not exist.
    async fn get_goal(&self, goal_id: &str) -> Result<Option<Goal>>;
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryGoalStore {
    goals: HashMap<String, Goal>,
}

impl InMemoryGoalStore {
    pub fn new(goals: impl IntoIterator<Item = Goal>) -> Self {
        Self {
            goals: goals.into_iter().map(|g| (g.id.clone(), g)).collect(),
        }
    }

    pub fn insert(&mut self, goal: Goal) {
        self.goals.insert(goal.id.clone(), goal);
    }
}

#[async_trait]
impl GoalStore for InMemoryGoalStore {
    async fn get_goal(&self, goal_id: &str) -> Result<Option<Goal>> {
        Ok(self.goals.get(goal_id).cloned())
    }
}

/// Goals kept as a JSON array in a file, re-read on every lookup.
#[derive(Debug, Clone)]
pub struct JsonFileGoalStore {
    path: PathBuf,
}

impl JsonFileGoalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load_goals(&self) -> Result<Vec<Goal>> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read goals file: {:?}", self.path))?;
        let goals: Vec<Goal> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse goals file: {:?}", self.path))?;
        debug!(path = ?self.path, count = goals.len(), "Loaded goals from file.");
        Ok(goals)
    }
}

#[async_trait]
impl GoalStore for JsonFileGoalStore {
    async fn get_goal(&self, goal_id: &str) -> Result<Option<Goal>> {
        Ok(self.load_goals().await?.into_iter().find(|g| g.id == goal_id))
    }
}

/// Context text for `goal_id`. A missing store, an unknown id and a failed
/// lookup are all logged and yield `None`.
pub async fn resolve_goal_context(
    store: Option<&dyn GoalStore>,
    goal_id: Option<&str>,
) -> Option<String> {
    let goal_id = goal_id?;
    let Some(store) = store else {
        warn!(goal_id = %goal_id, "Goal requested but no goal store is configured.");
        return None;
    };
    match store.get_goal(goal_id).await {
        Ok(Some(goal)) => {
            debug!(goal_id = %goal_id, title = %goal.title, "Resolved goal for context.");
            Some(goal.context_text())
        }
        Ok(None) => {
            warn!(goal_id = %goal_id, "Goal not found, replying without goal context.");
            None
        }
        Err(e) => {
            warn!(goal_id = %goal_id, error = ?e, "Goal lookup failed, replying without goal context.");
            None
        }
    }
}
