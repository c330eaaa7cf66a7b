mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::TestServer;

#[tokio::test]
async fn roles_are_admin_only() -> Result<()> {
    let server = TestServer::start().await?;
    let ghost = server.ghost_token().await?;

    assert_eq!(server.get("/api/roles", &ghost).send().await?.status(), StatusCode::FORBIDDEN);
    let res = server.post("/api/roles", &ghost).json(&json!({ "title": "editor" })).send().await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn builtin_roles_are_seeded() -> Result<()> {
    let server = TestServer::start().await?;
    let admin = server.admin_token().await?;

    let body: Value = server.get("/api/roles", &admin).send().await?.json().await?;
    let titles: Vec<&str> = body["roles"]
        .as_array()
        .expect("roles array")
        .iter()
        .filter_map(|r| r["title"].as_str())
        .collect();
    assert_eq!(titles, vec!["admin", "regular"]);
    Ok(())
}

#[tokio::test]
async fn role_lifecycle() -> Result<()> {
    let server = TestServer::start().await?;
    let admin = server.admin_token().await?;

    let res = server.post("/api/roles", &admin).json(&json!({ "title": "editor" })).send().await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await?;
    let id = body["role"]["id"].as_i64().expect("role id");

    let res = server.post("/api/roles", &admin).json(&json!({ "title": "editor" })).send().await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = server
        .put(&format!("/api/roles/{}", id), &admin)
        .json(&json!({ "title": "reviewer" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["role"]["title"], "reviewer");

    let res = server.delete(&format!("/api/roles/{}", id), &admin).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = server.delete(&format!("/api/roles/{}", id), &admin).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn builtin_roles_cannot_change() -> Result<()> {
    let server = TestServer::start().await?;
    let admin = server.admin_token().await?;

    let res = server.delete("/api/roles/2", &admin).send().await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = server.put("/api/roles/1", &admin).json(&json!({ "title": "root" })).send().await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn role_in_use_cannot_be_deleted() -> Result<()> {
    let server = TestServer::start().await?;
    let admin = server.admin_token().await?;

    let body: Value = server
        .post("/api/roles", &admin)
        .json(&json!({ "title": "editor" }))
        .send()
        .await?
        .json()
        .await?;
    let id = body["role"]["id"].as_i64().expect("role id");

    let res = server.put("/api/users/2", &admin).json(&json!({ "roleID": id })).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = server.delete(&format!("/api/roles/{}", id), &admin).send().await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    Ok(())
}
