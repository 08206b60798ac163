//! Survey operations with validation

use super::GameLayerApi;
use gamelayer_core::{AnswerSelection, CompletionReceipt, Error, Result, Survey, SurveySubmission};
use tracing::info;

/// Shown when the operator tries to submit with questions left open
pub const UNANSWERED_SURVEY_NOTICE: &str = "Please answer all questions";

/// Build the submission body, refusing partially answered surveys
pub fn build_submission(
    survey: &Survey,
    selection: &AnswerSelection,
    account: &str,
    player_id: &str,
) -> Result<SurveySubmission> {
    if !selection.unanswered(survey).is_empty() {
        return Err(Error::InvalidData(UNANSWERED_SURVEY_NOTICE.to_string()));
    }
    Ok(SurveySubmission {
        account: account.to_string(),
        player: player_id.to_string(),
        answers: selection.to_answers(),
    })
}

/// Submit every answer of `survey` for the player
pub async fn submit_survey<A: GameLayerApi>(
    api: &A,
    survey: &Survey,
    selection: &AnswerSelection,
    player_id: &str,
) -> Result<CompletionReceipt> {
    let submission = build_submission(survey, selection, api.account(), player_id)?;
    info!(
        "Submitting survey {} for {} ({} answers)",
        survey.id,
        player_id,
        submission.answers.len()
    );
    api.complete_survey(&survey.id, &submission).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn survey() -> Survey {
        serde_json::from_value(serde_json::json!({
            "id": "s1",
            "questions": [
                {"id": "q1", "answers": [{"id": "a"}]},
                {"id": "q2", "answers": [{"id": "b"}]}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_partial_survey_refused() {
        let mut selection = AnswerSelection::new();
        selection.select("q1", "a");
        let err = build_submission(&survey(), &selection, "acme", "p1").unwrap_err();
        assert_eq!(err.user_message(), UNANSWERED_SURVEY_NOTICE);
    }

    #[test]
    fn test_complete_survey_builds_body() {
        let mut selection = AnswerSelection::new();
        selection.select("q1", "a");
        selection.select("q2", "b");
        let body = build_submission(&survey(), &selection, "acme", "p1").unwrap();
        assert_eq!(body.account, "acme");
        assert_eq!(body.answers.len(), 2);
    }
}
