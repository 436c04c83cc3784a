mod common;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;

use common::{context, seed_user};
use taskmanager::auth::{JwtResponse, UnauthorizedBody};
use taskmanager::models::Role;
use taskmanager::routes;

#[test_log::test(actix_rt::test)]
async fn test_login_and_access_over_http() {
    let ctx = context().await;
    seed_user(&ctx, "testuser", "password", &[Role::User]).await;

    let state = ctx.state.clone();
    let policy = Arc::clone(&ctx.policy);
    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(state.auth_middleware(Arc::clone(&policy)))
            .wrap(Cors::default().allow_any_origin().allow_any_method().allow_any_header())
            .service(routes::health::health)
            .service(web::scope("/api").configure(routes::config))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .unwrap();
    let base = format!("http://{}", server.addrs()[0]);
    let server = server.run();
    let handle = server.handle();
    actix_rt::spawn(server);

    let client = reqwest::Client::new();

    let health: Value = client
        .get(format!("{}/health", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");

    let resp = client
        .get(format!("{}/api/test/user", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);
    let body: UnauthorizedBody = resp.json().await.unwrap();
    assert_eq!(body.path, "/api/test/user");

    let login: JwtResponse = client
        .post(format!("{}/api/auth/login", base))
        .json(&json!({"username": "testuser", "password": "password"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let content: Value = client
        .get(format!("{}/api/test/user", base))
        .bearer_auth(&login.token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(content, json!({"message": "User Content for testuser."}));

    handle.stop(true).await;
}
