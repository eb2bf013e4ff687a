mod common;

use anyhow::Result;
use axum::http::StatusCode;
use common::Auth;
use serde_json::json;

#[tokio::test]
async fn create_then_read_brand() -> Result<()> {
    let app = common::spawn_app();

    let res = app.post("/marken", json!({ "name": "Volkswagen" })).await?;
    assert_eq!(res.status, StatusCode::CREATED);
    assert!(res.body.contains("Volkswagen"));

    let res = app.get("/marken?id=1", Auth::User).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json()?, json!({ "idMarke": 1, "name": "Volkswagen" }));
    Ok(())
}

#[tokio::test]
async fn client_supplied_id_is_ignored_on_create() -> Result<()> {
    let app = common::spawn_app();

    app.post("/marken", json!({ "idMarke": 500, "name": "Opel" })).await?;
    let res = app.get("/marken?id=500", Auth::User).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = app.get("/marken?id=1", Auth::User).await?;
    assert_eq!(res.json()?["name"], "Opel");
    Ok(())
}

#[tokio::test]
async fn blank_brand_name_is_rejected() -> Result<()> {
    let app = common::spawn_app();

    for body in [json!({ "name": "   " }), json!({})] {
        let res = app.post("/marken", body).await?;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert!(res.json()?["message"].as_str().unwrap().contains("Brand name must not be empty"));
    }

    let res = app.get("/marken/all", Auth::User).await?;
    assert!(res.json()?.as_array().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() -> Result<()> {
    let app = common::spawn_app();

    let res = app
        .send(axum::http::Method::POST, "/marken", Auth::Admin, Some(json!(["not", "an", "object"])))
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()?["code"], "INVALID_JSON");
    Ok(())
}

#[tokio::test]
async fn unknown_brand_is_not_found() -> Result<()> {
    let app = common::spawn_app();

    let res = app.get("/marken?id=99999", Auth::User).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.json()?["message"], "Brand not found");

    let res = app.delete("/marken?id=99999").await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn malformed_id_is_a_bad_request() -> Result<()> {
    let app = common::spawn_app();

    let res = app.get("/marken?id=abc", Auth::User).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    let res = app.get("/marken", Auth::User).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn list_returns_all_brands_in_id_order() -> Result<()> {
    let app = common::spawn_app();

    app.post("/marken", json!({ "name": "Volkswagen" })).await?;
    app.post("/marken", json!({ "name": "BMW" })).await?;

    let res = app.get("/marken/all", Auth::Admin).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(
        res.json()?,
        json!([{ "idMarke": 1, "name": "Volkswagen" }, { "idMarke": 2, "name": "BMW" }])
    );
    Ok(())
}

#[tokio::test]
async fn referenced_brand_cannot_be_deleted() -> Result<()> {
    let app = common::spawn_app();

    app.post("/marken", json!({ "name": "Opel" })).await?;
    for modell in ["Astra", "Corsa"] {
        let res = app
            .post(
                "/autos",
                json!({
                    "modell": modell, "baujahr": "2019-01-01", "gewicht": 1200.0,
                    "leistung": 90, "verbrenner": true, "produktion": true, "fsMarken": 1
                }),
            )
            .await?;
        assert_eq!(res.status, StatusCode::CREATED);
    }

    let res = app.delete("/marken?id=1").await?;
    assert_eq!(res.status, StatusCode::CONFLICT);
    assert!(res.json()?["message"].as_str().unwrap().contains("referenced by 2"));

    // nothing changed
    assert_eq!(app.get("/marken?id=1", Auth::User).await?.status, StatusCode::OK);
    assert_eq!(app.get("/autos/count", Auth::User).await?.json()?["count"], 2);
    Ok(())
}

#[tokio::test]
async fn unreferenced_brand_is_deleted_and_unreadable() -> Result<()> {
    let app = common::spawn_app();

    app.post("/marken", json!({ "name": "Trabant" })).await?;
    let res = app.delete("/marken?id=1").await?;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.contains("Brand 1 deleted successfully"));

    assert_eq!(app.get("/marken?id=1", Auth::User).await?.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn store_fault_is_a_server_error_with_cause() -> Result<()> {
    let app = common::spawn_app();
    app.gateway.set_offline(true);

    let res = app.get("/marken/all", Auth::User).await?;
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = res.json()?["message"].as_str().unwrap().to_string();
    assert!(message.starts_with("Database error"));
    assert!(message.contains("offline"));
    Ok(())
}
