mod common;

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use common::{body, data, spawn_server, spawn_server_with, TestServer};
use ngo_scholarship_api::database::models::{
    AssessmentDefinition, AssessmentStatus, AssessmentSubmission,
};
use ngo_scholarship_api::database::ProfileStore;
use ngo_scholarship_api::error::ApiError;
use ngo_scholarship_api::services::{EligibilityPolicy, QuestionProvider};

async fn first_available(server: &TestServer, user_id: &str, token: &str) -> Result<Value> {
    let list = data(
        server
            .get(&format!("/students/{}/assessment/available", user_id), Some(token))
            .await?,
    )
    .await?;
    list.get(0).cloned().context("catalog is empty")
}

fn answers() -> Value {
    json!({ "answers": { "q1": "Technology", "q2": "Visual", "q3": "Social Impact" } })
}

#[tokio::test]
async fn available_lists_active_newest_first() -> Result<()> {
    let server = spawn_server().await?;
    let (account, _) = server.student_with_profile().await?;

    let mut newest = AssessmentDefinition::new("Leadership Readiness", "leadership", None, 20, 15);
    newest.created_at = Utc::now() + Duration::minutes(5);
    server.store.put_assessment(newest.clone()).await;

    let mut retired = AssessmentDefinition::new("Retired Quiz", "aptitude", None, 5, 5);
    retired.is_active = false;
    retired.created_at = Utc::now() + Duration::minutes(10);
    server.store.put_assessment(retired.clone()).await;

    let res = server
        .get(&format!("/students/{}/assessment/available", account.id), Some(&account.token))
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let list = data(res).await?;
    let list = list.as_array().cloned().unwrap_or_default();

    assert_eq!(list.len(), 4);
    assert_eq!(list[0]["assessment_name"], "Leadership Readiness");
    assert!(list.iter().all(|a| a["is_active"] == true));
    assert!(list.iter().all(|a| a["assessment_id"] != retired.assessment_id.to_string().as_str()));

    // Inactive definitions cannot be started either
    let res = server
        .get(
            &format!("/students/{}/assessment/start/{}", account.id, retired.assessment_id),
            Some(&account.token),
        )
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn start_returns_definition_and_questions() -> Result<()> {
    let server = spawn_server().await?;
    let (account, _) = server.student_with_profile().await?;
    let assessment = first_available(&server, &account.id, &account.token).await?;
    let id = assessment["assessment_id"].as_str().unwrap_or_default();

    let res = server
        .get(&format!("/students/{}/assessment/start/{}", account.id, id), Some(&account.token))
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let started = data(res).await?;
    assert_eq!(started["assessment_name"], assessment["assessment_name"]);
    assert_eq!(started["time_limit_minutes"], assessment["time_limit_minutes"]);
    for q in ["q1", "q2", "q3"] {
        assert_eq!(started["questions"][q]["type"], "multiple_choice");
    }

    let res = server
        .get(
            &format!("/students/{}/assessment/start/{}", account.id, Uuid::new_v4()),
            Some(&account.token),
        )
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn submitting_twice_records_two_attempts() -> Result<()> {
    let server = spawn_server().await?;
    let (account, _) = server.student_with_profile().await?;
    let assessment = first_available(&server, &account.id, &account.token).await?;
    let id = assessment["assessment_id"].as_str().unwrap_or_default();
    let submit = format!("/students/{}/assessment/submit/{}", account.id, id);

    let mut receipts = Vec::new();
    for _ in 0..2 {
        let res = server.post(&submit, Some(&account.token), answers()).await?;
        assert_eq!(res.status(), StatusCode::OK);
        let receipt = data(res).await?;
        assert_eq!(receipt["assessment_completed"], true);
        let url = receipt["report_pdf_url"].as_str().unwrap_or_default();
        assert!(url.starts_with("https://reports.test/assessment_reports/"), "{}", url);
        assert!(url.ends_with(".pdf"));
        receipts.push(receipt);
    }
    assert_ne!(receipts[0]["submission_id"], receipts[1]["submission_id"]);

    let history = data(
        server
            .get(&format!("/students/{}/assessment/history", account.id), Some(&account.token))
            .await?,
    )
    .await?;
    let history = history.as_array().cloned().unwrap_or_default();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["submission_id"], receipts[1]["submission_id"]);
    assert_eq!(history[0]["assessment_name"], assessment["assessment_name"]);
    assert_eq!(history[0]["assessment_type"], assessment["assessment_type"]);

    let progress = data(
        server
            .get(&format!("/students/{}/profile/progress", account.id), Some(&account.token))
            .await?,
    )
    .await?;
    assert_eq!(progress["assessment_completed"], true);
    Ok(())
}

#[tokio::test]
async fn submit_requires_answers_object() -> Result<()> {
    let server = spawn_server().await?;
    let (account, _) = server.student_with_profile().await?;
    let assessment = first_available(&server, &account.id, &account.token).await?;
    let id = assessment["assessment_id"].as_str().unwrap_or_default();

    let res = server
        .post(
            &format!("/students/{}/assessment/submit/{}", account.id, id),
            Some(&account.token),
            json!({ "answers": ["q1"] }),
        )
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body(res).await?["code"], "VALIDATION_ERROR");
    Ok(())
}

#[tokio::test]
async fn reports_are_private_to_their_student() -> Result<()> {
    let server = spawn_server().await?;
    let (alice, _) = server.student_with_profile().await?;
    let (bob, _) = server.student_with_profile().await?;
    let assessment = first_available(&server, &alice.id, &alice.token).await?;
    let id = assessment["assessment_id"].as_str().unwrap_or_default();

    let receipt = data(
        server
            .post(&format!("/students/{}/assessment/submit/{}", alice.id, id), Some(&alice.token), answers())
            .await?,
    )
    .await?;
    let submission = receipt["submission_id"].as_str().unwrap_or_default();

    let res = server
        .get(&format!("/students/{}/assessment/report/{}", alice.id, submission), Some(&alice.token))
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let report = data(res).await?;
    assert_eq!(report["assessment_name"], assessment["assessment_name"]);
    assert_eq!(report["report_pdf_url"], receipt["report_pdf_url"]);

    // Bob on his own path, asking for Alice's submission
    let res = server
        .get(&format!("/students/{}/assessment/report/{}", bob.id, submission), Some(&bob.token))
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Bob on Alice's path
    let res = server
        .get(&format!("/students/{}/assessment/report/{}", alice.id, submission), Some(&bob.token))
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = server
        .get(&format!("/students/{}/assessment/report/{}", bob.id, Uuid::new_v4()), Some(&bob.token))
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn status_reports_last_attempt() -> Result<()> {
    let server = spawn_server().await?;
    let (account, _) = server.student_with_profile().await?;
    let assessment = first_available(&server, &account.id, &account.token).await?;
    let id = assessment["assessment_id"].as_str().unwrap_or_default();
    let status_path = format!("/students/{}/assessment/status/{}", account.id, id);

    let before = data(server.get(&status_path, Some(&account.token)).await?).await?;
    assert_eq!(before["can_take_assessment"], true);
    assert!(before["last_assessment_date"].is_null());

    let receipt = data(
        server
            .post(&format!("/students/{}/assessment/submit/{}", account.id, id), Some(&account.token), answers())
            .await?,
    )
    .await?;

    let after = data(server.get(&status_path, Some(&account.token)).await?).await?;
    assert_eq!(after["can_take_assessment"], true);
    assert_eq!(after["last_assessment_date"], receipt["submitted_at"]);
    assert!(after["next_available_date"].is_null());
    Ok(())
}

#[tokio::test]
async fn assessment_routes_enforce_ownership() -> Result<()> {
    let server = spawn_server().await?;
    let (owner, _) = server.student_with_profile().await?;
    let intruder = server.account("student").await?;
    let fake = Uuid::new_v4();

    let paths = [
        format!("/students/{}/assessment/available", owner.id),
        format!("/students/{}/assessment/start/{}", owner.id, fake),
        format!("/students/{}/assessment/report/{}", owner.id, fake),
        format!("/students/{}/assessment/history", owner.id),
        format!("/students/{}/assessment/status/{}", owner.id, fake),
    ];
    for path in &paths {
        let res = server.get(path, Some(&intruder.token)).await?;
        assert_eq!(res.status(), StatusCode::FORBIDDEN, "{}", path);
    }

    let res = server
        .post(
            &format!("/students/{}/assessment/submit/{}", owner.id, fake),
            Some(&intruder.token),
            answers(),
        )
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn deleting_a_student_cascades() -> Result<()> {
    let server = spawn_server().await?;
    let (account, profile) = server.student_with_profile().await?;
    let token = Some(account.token.as_str());
    let assessment = first_available(&server, &account.id, &account.token).await?;
    let id = assessment["assessment_id"].as_str().unwrap_or_default();

    server
        .post(
            &format!("/students/{}/education", account.id),
            token,
            json!({ "institution_name": "School", "education_level": "Class 10", "year_of_passing": "2022" }),
        )
        .await?;
    server
        .post(&format!("/students/{}/assessment/submit/{}", account.id, id), token, answers())
        .await?;

    let student_id: Uuid = profile["student_id"].as_str().unwrap_or_default().parse()?;
    assert_eq!(server.store.owned_row_counts(student_id).await, (1, 1));

    server.store.delete_student(student_id).await?;
    assert_eq!(server.store.owned_row_counts(student_id).await, (0, 0));

    let res = server
        .get(&format!("/students/{}/profile", account.id), token)
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

struct ClosedWindow;

impl EligibilityPolicy for ClosedWindow {
    fn evaluate(
        &self,
        _assessment: &AssessmentDefinition,
        last: Option<&AssessmentSubmission>,
        now: DateTime<Utc>,
    ) -> AssessmentStatus {
        AssessmentStatus {
            can_take_assessment: false,
            last_assessment_date: last.map(|s| s.submitted_at),
            next_available_date: Some(now + Duration::days(30)),
            message: "Assessment window is closed".to_string(),
        }
    }
}

struct ShortQuiz;

#[async_trait]
impl QuestionProvider for ShortQuiz {
    async fn questions_for(&self, assessment: &AssessmentDefinition) -> Result<Value, ApiError> {
        Ok(json!({ "only": { "question": format!("Ready for {}?", assessment.assessment_name) } }))
    }
}

#[tokio::test]
async fn eligibility_denial_blocks_start_and_submit() -> Result<()> {
    let server = spawn_server_with(|state| state.with_eligibility(Arc::new(ClosedWindow))).await?;
    let (account, _) = server.student_with_profile().await?;
    let assessment = first_available(&server, &account.id, &account.token).await?;
    let id = assessment["assessment_id"].as_str().unwrap_or_default();

    let res = server
        .get(&format!("/students/{}/assessment/start/{}", account.id, id), Some(&account.token))
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(body(res).await?["error"], "Assessment window is closed");

    let res = server
        .post(&format!("/students/{}/assessment/submit/{}", account.id, id), Some(&account.token), answers())
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let status = data(
        server
            .get(&format!("/students/{}/assessment/status/{}", account.id, id), Some(&account.token))
            .await?,
    )
    .await?;
    assert_eq!(status["can_take_assessment"], false);
    assert!(status["next_available_date"].is_string());
    Ok(())
}

#[tokio::test]
async fn question_provider_is_pluggable() -> Result<()> {
    let server = spawn_server_with(|state| state.with_questions(Arc::new(ShortQuiz))).await?;
    let (account, _) = server.student_with_profile().await?;
    let assessment = first_available(&server, &account.id, &account.token).await?;
    let id = assessment["assessment_id"].as_str().unwrap_or_default();

    let started = data(
        server
            .get(&format!("/students/{}/assessment/start/{}", account.id, id), Some(&account.token))
            .await?,
    )
    .await?;
    assert!(started["questions"]["only"]["question"].is_string());
    assert!(started["questions"].get("q1").is_none());
    Ok(())
}
