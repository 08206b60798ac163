//! Achievement catalog, player progress, and the merge between them

use serde::{Deserialize, Serialize};

/// Catalog entry from `GET /achievements`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub steps: u32,
    #[serde(default)]
    pub img_url: Option<String>,
}

/// Response from `GET /players/{id}/achievements`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerAchievementsResponse {
    #[serde(default)]
    pub achievements: AchievementProgressLists,
}

/// The two progress sublists the platform reports
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AchievementProgressLists {
    #[serde(default)]
    pub started: Vec<StartedAchievement>,
    #[serde(default)]
    pub completed: Vec<CompletedAchievement>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartedAchievement {
    pub id: String,
    /// Steps done so far
    #[serde(default)]
    pub count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletedAchievement {
    pub id: String,
}

/// Merged status of one achievement for the selected player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AchievementStatus {
    /// In progress
    Unlocked,
    /// Completed
    Granted,
}

/// Status + progress for one achievement id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AchievementProgress {
    pub status: Option<AchievementStatus>,
    pub steps_completed: u32,
}

/// Achievement card view model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: String,
    pub name: String,
    pub description: String,
    pub steps: u32,
    pub steps_completed: u32,
    pub status: Option<AchievementStatus>,
    pub img_url: Option<String>,
}

impl Achievement {
    /// Progress bar fill, clamped to 0..=100
    pub fn progress_percent(&self) -> f64 {
        if self.steps == 0 {
            return if self.status == Some(AchievementStatus::Granted) { 100.0 } else { 0.0 };
        }
        (self.steps_completed as f64 / self.steps as f64 * 100.0).min(100.0)
    }

    pub fn is_active(&self) -> bool {
        self.status.is_some()
    }
}

impl AchievementProgressLists {
    /// Progress for `id` given the catalog step count.
    ///
    /// Completed beats started when an id shows up in both lists.
    pub fn progress_for(&self, id: &str, steps: u32) -> AchievementProgress {
        if self.completed.iter().any(|c| c.id == id) {
            return AchievementProgress {
                status: Some(AchievementStatus::Granted),
                steps_completed: steps,
            };
        }
        match self.started.iter().find(|s| s.id == id) {
            Some(started) => AchievementProgress {
                status: Some(AchievementStatus::Unlocked),
                steps_completed: started.count,
            },
            None => AchievementProgress {
                status: None,
                steps_completed: 0,
            },
        }
    }
}

/// Merge the catalog with the player's progress, keeping catalog order
pub fn merge_achievements(
    catalog: Vec<AchievementRecord>,
    progress: &AchievementProgressLists,
) -> Vec<Achievement> {
    catalog
        .into_iter()
        .map(|record| {
            let AchievementProgress { status, steps_completed } = progress.progress_for(&record.id, record.steps);

            Achievement {
                id: record.id,
                name: record.name,
                description: record.description,
                steps: record.steps,
                steps_completed,
                status,
                img_url: record.img_url,
            }
        })
        .collect()
}
