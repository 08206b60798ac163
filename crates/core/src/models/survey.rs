//! Survey models and answer bookkeeping

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Survey from `GET /surveys/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Survey {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub points: i64,
    #[serde(default)]
    pub credits: i64,
    #[serde(default)]
    pub questions: Vec<SurveyQuestion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyQuestion {
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, rename = "type")]
    pub question_type: String,
    #[serde(default)]
    pub answers: Vec<SurveyAnswer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyAnswer {
    pub id: String,
    #[serde(default)]
    pub text: String,
}

/// Answers picked so far, one per question
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSelection {
    picks: BTreeMap<String, Vec<String>>,
}

impl AnswerSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-select: picking an answer replaces any earlier pick
    pub fn select(&mut self, question_id: &str, answer_id: &str) {
        self.picks
            .insert(question_id.to_string(), vec![answer_id.to_string()]);
    }

    pub fn selected(&self, question_id: &str) -> Option<&[String]> {
        self.picks.get(question_id).map(Vec::as_slice)
    }

    /// Questions of `survey` that still have no answer
    pub fn unanswered<'a>(&self, survey: &'a Survey) -> Vec<&'a SurveyQuestion> {
        survey
            .questions
            .iter()
            .filter(|q| self.picks.get(&q.id).map_or(true, |a| a.is_empty()))
            .collect()
    }

    pub fn clear(&mut self) {
        self.picks.clear();
    }

    /// Wire form of the picks, in question-id order
    pub fn to_answers(&self) -> Vec<SurveyAnswerPayload> {
        self.picks
            .iter()
            .map(|(question_id, answer_ids)| SurveyAnswerPayload {
                question_id: question_id.clone(),
                answer_ids: answer_ids.clone(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyAnswerPayload {
    pub question_id: String,
    pub answer_ids: Vec<String>,
}

/// Body of `POST /surveys/{id}/complete`
#[derive(Debug, Clone, Serialize)]
pub struct SurveySubmission {
    pub account: String,
    pub player: String,
    pub answers: Vec<SurveyAnswerPayload>,
}
