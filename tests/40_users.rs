mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

async fn fixture_job(base_url: &str) -> Result<i64> {
    let client = reqwest::Client::new();
    let handle = common::unique("aco");

    let res = client
        .post(format!("{}/companies", base_url))
        .bearer_auth(common::admin_token())
        .json(&json!({ "handle": handle, "name": format!("Company {}", handle) }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::CREATED, "create company failed");

    let res = client
        .post(format!("{}/jobs", base_url))
        .bearer_auth(common::admin_token())
        .json(&json!({ "title": "applicant bait", "companyHandle": handle }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::CREATED, "create job failed");
    let payload = res.json::<serde_json::Value>().await?;
    payload["data"]["id"].as_i64().ok_or_else(|| anyhow::anyhow!("no job id"))
}

#[tokio::test]
async fn self_or_admin_gates_user_detail() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let u1 = common::unique("selfa");
    let u2 = common::unique("selfb");
    let t1 = common::register_user(&server.base_url, &u1).await?;
    let t2 = common::register_user(&server.base_url, &u2).await?;

    // Owner sees their own record
    let res = client
        .get(format!("{}/users/{}", server.base_url, u1))
        .bearer_auth(&t1)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let payload = res.json::<serde_json::Value>().await?;
    assert_eq!(payload["data"]["username"], u1.as_str());
    assert!(payload["data"].get("password").is_none(), "credential leaked: {}", payload);
    assert!(payload["data"]["applications"].is_array());

    // A different user is forbidden
    let res = client
        .get(format!("{}/users/{}", server.base_url, u1))
        .bearer_auth(&t2)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Anonymous is unauthenticated
    let res = client.get(format!("{}/users/{}", server.base_url, u1)).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // An admin sees anyone
    let res = client
        .get(format!("{}/users/{}", server.base_url, u1))
        .bearer_auth(common::admin_token())
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn user_update_never_returns_credential() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let username = common::unique("upd");
    let token = common::register_user(&server.base_url, &username).await?;

    let res = client
        .patch(format!("{}/users/{}", server.base_url, username))
        .bearer_auth(&token)
        .json(&json!({ "firstName": "Renamed", "password": "newpassword1" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let payload = res.json::<serde_json::Value>().await?;
    assert_eq!(payload["data"]["firstName"], "Renamed");
    assert!(payload["data"].get("password").is_none(), "credential leaked: {}", payload);

    // The new password is live
    let res = client
        .post(format!("{}/auth/token", server.base_url))
        .json(&json!({ "username": username, "password": "newpassword1" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn privilege_escalation_through_patch_is_rejected() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let username = common::unique("esc");
    let token = common::register_user(&server.base_url, &username).await?;

    let res = client
        .patch(format!("{}/users/{}", server.base_url, username))
        .bearer_auth(&token)
        .json(&json!({ "isAdmin": true }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn duplicate_application_conflicts() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let username = common::unique("appl");
    let token = common::register_user(&server.base_url, &username).await?;
    let job_id = fixture_job(&server.base_url).await?;

    let url = format!("{}/users/{}/jobs/{}", server.base_url, username, job_id);

    let res = client.post(&url).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let payload = res.json::<serde_json::Value>().await?;
    assert_eq!(payload["data"]["applied"], job_id);

    // Same pair again: rejected, not upserted
    let res = client.post(&url).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    // Applying to a job that does not exist is a 404
    let res = client
        .post(format!("{}/users/{}/jobs/999999999", server.base_url, username))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}
