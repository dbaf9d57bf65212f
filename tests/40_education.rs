mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{data, spawn_server};

fn entry(institution: &str, level: &str, year: &str) -> Value {
    json!({
        "institution_name": institution,
        "education_level": level,
        "year_of_passing": year,
        "marks_obtained": "850/1100"
    })
}

#[tokio::test]
async fn education_crud_round() -> Result<()> {
    let server = spawn_server().await?;
    let (account, _) = server.student_with_profile().await?;
    let base = format!("/students/{}/education", account.id);
    let token = Some(account.token.as_str());

    let res = server.post(&base, token, entry("Govt High School", "Class 10", "2022")).await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created = data(res).await?;
    let id = created["education_id"].as_str().unwrap_or_default().to_string();

    let res = server.get(&format!("{}/{}", base, id), token).await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(data(res).await?["institution_name"], "Govt High School");

    let res = server
        .put(&format!("{}/{}", base, id), &account.token, json!({ "marks_obtained": null, "year_of_passing": "2023" }))
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let updated = data(res).await?;
    assert_eq!(updated["year_of_passing"], "2023");
    assert!(updated["marks_obtained"].is_null());
    assert_eq!(updated["education_level"], "Class 10");

    let res = server.delete(&format!("{}/{}", base, id), &account.token).await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = server.get(&format!("{}/{}", base, id), token).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn entries_are_listed_newest_first() -> Result<()> {
    let server = spawn_server().await?;
    let (account, _) = server.student_with_profile().await?;
    let base = format!("/students/{}/education", account.id);
    let token = Some(account.token.as_str());

    server.post(&base, token, entry("Primary School", "Class 5", "2017")).await?;
    server.post(&base, token, entry("Govt High School", "Class 10", "2022")).await?;
    server.post(&base, token, entry("City College", "Class 12", "2024")).await?;

    let list = data(server.get(&base, token).await?).await?;
    let names: Vec<&str> = list
        .as_array()
        .map(|a| a.iter().filter_map(|e| e["institution_name"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(names, vec!["City College", "Govt High School", "Primary School"]);
    Ok(())
}

#[tokio::test]
async fn required_education_fields_are_checked() -> Result<()> {
    let server = spawn_server().await?;
    let (account, _) = server.student_with_profile().await?;
    let base = format!("/students/{}/education", account.id);

    let res = server
        .post(&base, Some(&account.token), entry("", "Class 10", "2022"))
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let created = data(server.post(&base, Some(&account.token), entry("School", "Class 10", "2022")).await?).await?;
    let id = created["education_id"].as_str().unwrap_or_default();
    let res = server
        .put(&format!("{}/{}", base, id), &account.token, json!({ "institution_name": null }))
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn entries_are_scoped_to_their_owner() -> Result<()> {
    let server = spawn_server().await?;
    let (alice, _) = server.student_with_profile().await?;
    let (bob, _) = server.student_with_profile().await?;

    let alice_base = format!("/students/{}/education", alice.id);
    let created = data(server.post(&alice_base, Some(&alice.token), entry("School", "Class 10", "2022")).await?).await?;
    let alice_entry = created["education_id"].as_str().unwrap_or_default().to_string();

    // Through Alice's path Bob is refused outright
    let res = server.get(&format!("{}/{}", alice_base, alice_entry), Some(&bob.token)).await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let res = server.get(&alice_base, Some(&bob.token)).await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Through his own path Alice's entry does not exist
    let bob_base = format!("/students/{}/education", bob.id);
    let res = server.get(&format!("{}/{}", bob_base, alice_entry), Some(&bob.token)).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let res = server.delete(&format!("{}/{}", bob_base, alice_entry), &bob.token).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = server.get(&format!("{}/not-a-uuid", bob_base), Some(&bob.token)).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Alice still has her entry
    let list = data(server.get(&alice_base, Some(&alice.token)).await?).await?;
    assert_eq!(list.as_array().map(Vec::len), Some(1));
    Ok(())
}

#[tokio::test]
async fn foreign_education_writes_are_forbidden_whether_or_not_a_profile_exists() -> Result<()> {
    let server = spawn_server().await?;
    let (owner, _) = server.student_with_profile().await?;
    let intruder = server.account("student").await?;
    let bare = server.account("student").await?;

    let owner_base = format!("/students/{}/education", owner.id);
    let created = data(server.post(&owner_base, Some(&owner.token), entry("School", "Class 10", "2022")).await?).await?;
    let owner_entry = created["education_id"].as_str().unwrap_or_default().to_string();

    for target in [&owner.id, &bare.id] {
        let base = format!("/students/{}/education", target);
        let item = format!("{}/{}", base, owner_entry);

        assert_eq!(
            server.post(&base, Some(&intruder.token), entry("Fake", "Class 12", "2024")).await?.status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            server.put(&item, &intruder.token, json!({ "marks_obtained": "1100/1100" })).await?.status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(server.delete(&item, &intruder.token).await?.status(), StatusCode::FORBIDDEN);
    }

    // Nothing changed for the owner
    let list = data(server.get(&owner_base, Some(&owner.token)).await?).await?;
    let entries = list.as_array().cloned().unwrap_or_default();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["marks_obtained"], "850/1100");
    Ok(())
}

#[tokio::test]
async fn education_without_profile_is_not_found() -> Result<()> {
    let server = spawn_server().await?;
    let account = server.account("student").await?;

    let res = server
        .get(&format!("/students/{}/education", account.id), Some(&account.token))
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}
