mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

async fn create_company(base_url: &str, handle: &str, num_employees: i64) -> Result<()> {
    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/companies", base_url))
        .bearer_auth(common::admin_token())
        .json(&json!({
            "handle": handle,
            "name": format!("Company {}", handle),
            "description": "integration fixture",
            "numEmployees": num_employees,
        }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::CREATED, "create failed: {}", res.status());
    Ok(())
}

#[tokio::test]
async fn company_crud_and_search() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let handle = common::unique("co");
    create_company(&server.base_url, &handle, 7).await?;

    // Substring search finds it, case-insensitively
    let res = client
        .get(format!("{}/companies", server.base_url))
        .query(&[("name", format!("COMPANY {}", handle).as_str())])
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let payload = res.json::<serde_json::Value>().await?;
    let data = payload["data"].as_array().cloned().unwrap_or_default();
    assert_eq!(data.len(), 1, "expected one match: {}", payload);
    assert_eq!(data[0]["handle"], handle.as_str());
    assert_eq!(data[0]["numEmployees"], 7);

    // Partial update renames; the immutable handle is untouched
    let res = client
        .patch(format!("{}/companies/{}", server.base_url, handle))
        .bearer_auth(common::admin_token())
        .json(&json!({ "name": format!("Renamed {}", handle), "numEmployees": 9 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let payload = res.json::<serde_json::Value>().await?;
    assert_eq!(payload["data"]["handle"], handle.as_str());
    assert_eq!(payload["data"]["numEmployees"], 9);

    // Detail view carries the jobs array
    let res = client
        .get(format!("{}/companies/{}", server.base_url, handle))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let payload = res.json::<serde_json::Value>().await?;
    assert!(payload["data"]["jobs"].is_array());

    // Delete, then the lookup is a 404
    let res = client
        .delete(format!("{}/companies/{}", server.base_url, handle))
        .bearer_auth(common::admin_token())
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/companies/{}", server.base_url, handle))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn inverted_employee_range_is_bad_request() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/companies", server.base_url))
        .query(&[("minEmployees", "5"), ("maxEmployees", "2")])
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let payload = res.json::<serde_json::Value>().await?;
    assert_eq!(payload["code"], "BAD_REQUEST");

    Ok(())
}

#[tokio::test]
async fn unknown_search_parameter_is_rejected() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/companies", server.base_url))
        .query(&[("employees", "5")])
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn company_writes_require_admin() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let body = json!({ "handle": common::unique("nope"), "name": "Nope Inc" });

    // Anonymous caller: unauthenticated
    let res = client
        .post(format!("{}/companies", server.base_url))
        .json(&body)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Logged-in non-admin: forbidden
    let username = common::unique("plain");
    let token = common::register_user(&server.base_url, &username).await?;
    let res = client
        .post(format!("{}/companies", server.base_url))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    Ok(())
}
