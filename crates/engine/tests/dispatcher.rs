mod common;

use common::*;
use gamelayer_core::{AnswerSelection, ClientConfig, Error, RequestState, Survey};
use gamelayer_engine::dispatcher::{mission_key, mystery_box_key, survey_key, NOT_COMPLETABLE_NOTICE};
use gamelayer_engine::{load_player_state, ActionDispatcher, Dashboard, PlayerView};
use gamelayer_networking::api::UNANSWERED_SURVEY_NOTICE;
use std::sync::Arc;

fn seeded() -> Arc<FakeApi> {
    let api = FakeApi::new();
    {
        let mut players = api.players.lock().unwrap();
        players.push(player_record("p1", "Ada", None));
        players.push(player_record("p2", "Bob", None));
    }
    *api.missions.lock().unwrap() = vec![
        mission("ready", 1, true, &["evt-ready"]),
        mission("no-event", 2, true, &[]),
        mission("daily", 3, true, &["evt-daily"]),
    ];
    *api.streaks.lock().unwrap() = streaks(&[("login", "daily", 2, 5), ("broken", "missing", 0, 5)]);
    *api.survey.lock().unwrap() = Some(
        serde_json::from_value::<Survey>(serde_json::json!({
            "id": "1-test-survey",
            "name": "Feedback",
            "questions": [
                {"id": "q1", "text": "Fun?", "answers": [{"id": "yes", "text": "Yes"}]},
                {"id": "q2", "text": "Again?", "answers": [{"id": "sure", "text": "Sure"}]}
            ]
        }))
        .unwrap(),
    );
    Arc::new(api)
}

#[tokio::test]
async fn test_complete_mission_posts_its_event() {
    let api = seeded();
    let dispatcher = ActionDispatcher::new(api.clone());
    let snapshot = load_player_state(api.as_ref(), "p1").await.unwrap();

    let receipt = dispatcher
        .complete_mission("p1", snapshot.mission("ready").unwrap())
        .await
        .unwrap();
    assert_eq!(receipt.points, Some(10));
    assert_eq!(api.count("complete_event:evt-ready@p1"), 1);
    assert_eq!(dispatcher.tracker().state(&mission_key("ready")), RequestState::Idle);
}

#[tokio::test]
async fn test_uncompletable_actions_never_hit_the_api() {
    let api = seeded();
    let dispatcher = ActionDispatcher::new(api.clone());
    let snapshot = load_player_state(api.as_ref(), "p1").await.unwrap();

    let err = dispatcher
        .complete_mission("p1", snapshot.mission("no-event").unwrap())
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), NOT_COMPLETABLE_NOTICE);

    let err = dispatcher
        .complete_streak("p1", snapshot.streak("broken").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotCompletable(_)));
    assert_eq!(api.count("complete_event"), 0);
}

#[tokio::test]
async fn test_failed_action_records_message() {
    let api = seeded();
    let dispatcher = ActionDispatcher::new(api.clone());
    let snapshot = load_player_state(api.as_ref(), "p1").await.unwrap();
    api.fail("complete_event");

    let err = dispatcher
        .complete_mission("p1", snapshot.mission("ready").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NetworkError(_)));
    assert_eq!(
        dispatcher.tracker().state(&mission_key("ready")),
        RequestState::Failed(gamelayer_core::errors::NETWORK_FAILURE_NOTICE.to_string())
    );
}

#[tokio::test]
async fn test_partial_survey_is_refused() {
    let api = seeded();
    let dispatcher = ActionDispatcher::new(api.clone());
    let survey = api.survey.lock().unwrap().clone().unwrap();

    let mut selection = AnswerSelection::new();
    selection.select("q1", "yes");
    let err = dispatcher
        .submit_survey("p1", &survey, &selection)
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), UNANSWERED_SURVEY_NOTICE);
    assert_eq!(api.count("complete_survey"), 0);

    selection.select("q2", "sure");
    dispatcher.submit_survey("p1", &survey, &selection).await.unwrap();
    assert_eq!(api.count("complete_survey:1-test-survey@p1"), 1);
    assert_eq!(dispatcher.tracker().state(&survey_key(&survey.id)), RequestState::Idle);
}

#[tokio::test]
async fn test_dashboard_reloads_after_action() {
    let api = seeded();
    let dashboard = Dashboard::new(api.clone(), ClientConfig::default());

    dashboard.select_player("p1").await.unwrap();
    assert_eq!(api.count("get_player:p1"), 1);

    dashboard.complete_streak("login").await.unwrap();
    assert_eq!(api.count("complete_event:evt-daily@p1"), 1);
    assert_eq!(api.count("get_player:p1"), 2);

    let survey = dashboard.survey().await.unwrap();
    let mut selection = AnswerSelection::new();
    selection.select("q1", "yes");
    selection.select("q2", "sure");
    dashboard.submit_survey(&survey, &selection).await.unwrap();
    assert_eq!(api.count("get_player:p1"), 3);
}

#[tokio::test]
async fn test_dashboard_reloads_after_winning_spin_only() {
    let api = seeded();
    *api.mystery_box.lock().unwrap() = Some(mystery_box(true));
    *api.prizes.lock().unwrap() = vec![prize_record("mug", &["MB"]), prize_record("hoodie", &["MB"])];
    let dashboard = Dashboard::new(api.clone(), ClientConfig::default());
    dashboard.select_player("p1").await.unwrap();
    let mut session = dashboard.mystery_box().await.unwrap();

    // refused claims change nothing server side
    let err = dashboard.spin_mystery_box(&mut session).await.unwrap_err();
    assert!(err.is_rejection());
    assert_eq!(api.count("get_player:p1"), 1);

    *api.claim.lock().unwrap() = ClaimScript::Win(prize("hoodie", &["MB"]));
    dashboard.spin_mystery_box(&mut session).await.unwrap();
    assert_eq!(api.count("claim_mystery_box:1-test-wheel@p1"), 2);
    assert_eq!(api.count("get_player:p1"), 2);
    assert_eq!(
        dashboard.dispatcher().tracker().state(&mystery_box_key("1-test-wheel")),
        RequestState::Idle
    );

    let won = dashboard.finish_spin(&mut session).await.unwrap();
    assert_eq!(won.id, "hoodie");
    assert_eq!(api.count("get_mystery_box"), 2);
    assert!(!session.is_spinning());
}

#[tokio::test]
async fn test_stale_load_is_not_committed() {
    let api = seeded();
    let view = PlayerView::new();

    let stale_generation = view.select("p1");
    let stale = load_player_state(api.as_ref(), "p1").await.unwrap();

    // the operator moved on before the first load settled
    let generation = view.select("p2");
    assert!(view.commit(stale_generation, stale).is_none());
    assert!(view.snapshot().is_none());

    let fresh = load_player_state(api.as_ref(), "p2").await.unwrap();
    let committed = view.commit(generation, fresh).unwrap();
    assert_eq!(committed.player.id, "p2");
    assert_eq!(view.snapshot().unwrap().player.name, "Bob");
}
