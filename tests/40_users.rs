mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{TestServer, PASSWORD};

fn signup_body(email: &str) -> Value {
    json!({
        "firstName": "Tobi",
        "lastName": "Ola",
        "email": email,
        "password": "secret",
    })
}

#[tokio::test]
async fn signup_issues_a_token_with_the_regular_role() -> Result<()> {
    let server = TestServer::start().await?;

    let res = server
        .client
        .post(server.url("/api/users"))
        .json(&signup_body("Tobi@Example.com"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let body: Value = res.json().await?;
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["user"]["email"], "tobi@example.com");
    assert_eq!(body["user"]["roleID"], 2);
    assert!(body["user"].get("password").is_none());

    // the new token works right away
    let token = body["token"].as_str().unwrap_or_default();
    let res = server.get("/api/documents", token).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn signup_validates_input() -> Result<()> {
    let server = TestServer::start().await?;

    let res = server
        .client
        .post(server.url("/api/users"))
        .json(&json!({ "email": "someone@example.com" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert!(body["field_errors"]["firstName"].is_string());
    assert!(body["field_errors"]["password"].is_string());

    let res = server
        .client
        .post(server.url("/api/users"))
        .json(&signup_body("not-an-email"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn duplicate_signup_email_conflicts() -> Result<()> {
    let server = TestServer::start().await?;

    let res = server
        .client
        .post(server.url("/api/users"))
        .json(&signup_body("GHOST@ghost.com"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    Ok(())
}

#[tokio::test]
async fn login_rejects_bad_credentials() -> Result<()> {
    let server = TestServer::start().await?;

    for body in [
        json!({ "email": "ghost@ghost.com", "password": "wrong" }),
        json!({ "email": "nobody@ghost.com", "password": PASSWORD }),
    ] {
        let res = server.client.post(server.url("/api/users/login")).json(&body).send().await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let err: Value = res.json().await?;
        assert_eq!(err["message"], "Invalid credentials");
    }
    Ok(())
}

#[tokio::test]
async fn logout_answers_with_a_message() -> Result<()> {
    let server = TestServer::start().await?;
    let token = server.ghost_token().await?;

    let res = server.get("/api/users/logout", &token).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert!(body["message"].is_string());
    Ok(())
}

#[tokio::test]
async fn listing_and_fetching_users_is_admin_only() -> Result<()> {
    let server = TestServer::start().await?;
    let ghost = server.ghost_token().await?;
    let admin = server.admin_token().await?;

    assert_eq!(server.get("/api/users", &ghost).send().await?.status(), StatusCode::FORBIDDEN);
    assert_eq!(server.get("/api/users/2", &ghost).send().await?.status(), StatusCode::FORBIDDEN);

    let body: Value = server.get("/api/users", &admin).send().await?.json().await?;
    assert_eq!(body["metaData"]["totalCount"], 2);

    let body: Value = server.get("/api/users/2", &admin).send().await?.json().await?;
    assert_eq!(body["email"], "ghost@ghost.com");

    let res = server.get("/api/users/99", &admin).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn users_update_themselves_but_not_their_role() -> Result<()> {
    let server = TestServer::start().await?;
    let ghost = server.ghost_token().await?;

    let res = server
        .put("/api/users/2", &ghost)
        .json(&json!({ "firstName": "Casper" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["user"]["firstName"], "Casper");

    let res = server.put("/api/users/2", &ghost).json(&json!({ "roleID": 1 })).send().await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = server.put("/api/users/1", &ghost).json(&json!({ "firstName": "x" })).send().await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn password_change_takes_effect() -> Result<()> {
    let server = TestServer::start().await?;
    let ghost = server.ghost_token().await?;

    let res = server
        .put("/api/users/2", &ghost)
        .json(&json!({ "password": "changed" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    assert!(server.login("ghost@ghost.com", PASSWORD).await.is_err());
    assert!(server.login("ghost@ghost.com", "changed").await.is_ok());
    Ok(())
}

#[tokio::test]
async fn admin_can_promote_a_user() -> Result<()> {
    let server = TestServer::start().await?;
    let admin = server.admin_token().await?;

    let res = server.put("/api/users/2", &admin).json(&json!({ "roleID": 1 })).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["user"]["roleID"], 1);

    let res = server.put("/api/users/2", &admin).json(&json!({ "roleID": 77 })).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn email_change_to_taken_address_conflicts() -> Result<()> {
    let server = TestServer::start().await?;
    let ghost = server.ghost_token().await?;

    let res = server
        .put("/api/users/2", &ghost)
        .json(&json!({ "email": "admin@admin.com" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    Ok(())
}

#[tokio::test]
async fn deleting_a_user_removes_their_documents() -> Result<()> {
    let server = TestServer::start().await?;
    let ghost = server.ghost_token().await?;
    let admin = server.admin_token().await?;

    assert_eq!(server.delete("/api/users/1", &ghost).send().await?.status(), StatusCode::FORBIDDEN);

    let res = server.delete("/api/users/2", &ghost).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = server.get("/api/documents/2", &admin).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = server.delete("/api/users/2", &admin).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn token_of_deleted_user_is_rejected() -> Result<()> {
    let server = TestServer::start().await?;
    let ghost = server.ghost_token().await?;

    let res = server.delete("/api/users/2", &ghost).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = server
        .post("/api/documents", &ghost)
        .json(&json!({ "title": "x", "content": "y", "access": "public" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let err: Value = res.json().await?;
    assert_eq!(err["message"], "Invalid or expired token");

    assert_eq!(server.get("/api/documents", &ghost).send().await?.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
