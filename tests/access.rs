#[macro_use]
mod common;

use actix_web::{http::StatusCode, test};
use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::collections::BTreeSet;

use common::{bearer, context, seed_user};
use taskmanager::auth::{TokenService, UnauthorizedBody};
use taskmanager::models::{NewUser, Principal, Role};
use taskmanager::store::UserStore;

#[actix_rt::test]
async fn test_public_paths_need_no_token() {
    let ctx = context().await;
    let app = test_app!(ctx);

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/api/test/all").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"message": "Public Content."}));
}

#[test_log::test(actix_rt::test)]
async fn test_protected_path_without_token_is_unauthorized() {
    let ctx = context().await;
    let app = test_app!(ctx);

    let req = test::TestRequest::get().uri("/api/users/me").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: UnauthorizedBody = test::read_body_json(resp).await;
    assert_eq!(
        body,
        UnauthorizedBody {
            status: 401,
            error: "Unauthorized".to_string(),
            message: "Full authentication is required to access this resource".to_string(),
            path: "/api/users/me".to_string(),
        }
    );
}

#[actix_rt::test]
async fn test_unrouted_paths_are_gated_before_routing() {
    let ctx = context().await;
    let user = seed_user(&ctx, "testuser", "password", &[Role::User]).await;
    let token = ctx.token_for(&user);
    let app = test_app!(ctx);

    let req = test::TestRequest::get().uri("/api/nowhere").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/nowhere")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[test_log::test(actix_rt::test)]
async fn test_me_returns_principal_for_valid_token() {
    let ctx = context().await;
    let user = seed_user(&ctx, "testuser", "password", &[Role::User, Role::Moderator]).await;
    let token = ctx.token_for(&user);
    let app = test_app!(ctx);

    let req = test::TestRequest::get()
        .uri("/api/users/me")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        json!({
            "id": user.id,
            "username": "testuser",
            "email": "testuser@example.com",
            "roles": ["ROLE_USER", "ROLE_MODERATOR"]
        })
    );

    let req = test::TestRequest::get()
        .uri("/api/test/all")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({"message": "Public Content. Signed in as testuser."}));
}

#[test_log::test(actix_rt::test)]
async fn test_role_gates_on_content_endpoints() {
    let ctx = context().await;
    let user = seed_user(&ctx, "plain", "password", &[Role::User]).await;
    let moderator = seed_user(&ctx, "moderator", "password", &[Role::Moderator]).await;
    let admin = seed_user(&ctx, "admin", "password", &[Role::Admin]).await;
    let tokens = [
        ("plain", ctx.token_for(&user)),
        ("moderator", ctx.token_for(&moderator)),
        ("admin", ctx.token_for(&admin)),
    ];
    let app = test_app!(ctx);

    let expected = [
        ("/api/test/user", [true, true, true]),
        ("/api/test/mod", [false, true, false]),
        ("/api/test/admin", [false, false, true]),
    ];

    for (path, allowed) in expected {
        for ((name, token), allow) in tokens.iter().zip(allowed) {
            let req = test::TestRequest::get()
                .uri(path)
                .insert_header(bearer(token))
                .to_request();
            let resp = test::call_service(&app, req).await;
            let want = if allow {
                StatusCode::OK
            } else {
                StatusCode::UNAUTHORIZED
            };
            assert_eq!(resp.status(), want, "{} on {}", name, path);

            if !allow {
                let body: UnauthorizedBody = test::read_body_json(resp).await;
                assert_eq!(body.message, "Access is denied");
                assert_eq!(body.path, path);
            }
        }
    }
}

#[actix_rt::test]
async fn test_content_messages_name_the_principal() {
    let ctx = context().await;
    let admin = seed_user(&ctx, "root", "password", &[Role::Admin]).await;
    let token = ctx.token_for(&admin);
    let app = test_app!(ctx);

    let req = test::TestRequest::get()
        .uri("/api/test/admin")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({"message": "Admin Board for root."}));
}

#[test_log::test(actix_rt::test)]
async fn test_bad_tokens_fall_back_to_anonymous() {
    let ctx = context().await;
    let user = seed_user(&ctx, "testuser", "password", &[Role::User]).await;
    let principal = Principal::from(&user);

    let expired = ctx
        .state
        .tokens
        .issue_at(&principal, Utc::now() - Duration::hours(2))
        .unwrap();
    let foreign = TokenService::new(
        "YW5vdGhlci1zZWNyZXQta2V5LXRoYXQtaXMtbG9uZy1lbm91Z2gtZm9yLWhzNTEy",
        60_000,
    )
    .unwrap()
    .issue(&principal)
    .unwrap();
    let app = test_app!(ctx);

    let headers = [
        format!("Bearer {}", expired),
        format!("Bearer {}", foreign),
        "Bearer not.a.token".to_string(),
        "Bearer ".to_string(),
        "Basic dGVzdHVzZXI6cGFzc3dvcmQ=".to_string(),
    ];
    for header in headers {
        let req = test::TestRequest::get()
            .uri("/api/users/me")
            .insert_header(("Authorization", header.clone()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{}", header);

        let body: UnauthorizedBody = test::read_body_json(resp).await;
        assert_eq!(
            body.message,
            "Full authentication is required to access this resource"
        );
    }

    // A failed token on a public path is not an error.
    let req = test::TestRequest::get()
        .uri("/api/test/all")
        .insert_header(("Authorization", format!("Bearer {}", expired)))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({"message": "Public Content."}));
}

#[test_log::test(actix_rt::test)]
async fn test_deleted_user_token_is_rejected() {
    let ctx = context().await;
    let user = seed_user(&ctx, "leaver", "password", &[Role::User]).await;
    let token = ctx.token_for(&user);
    ctx.store.remove_user("leaver").await;
    let app = test_app!(ctx);

    let req = test::TestRequest::get()
        .uri("/api/users/me")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[test_log::test(actix_rt::test)]
async fn test_role_changes_apply_to_existing_tokens() {
    let ctx = context().await;
    let user = seed_user(&ctx, "promoted", "password", &[Role::User]).await;
    let token = ctx.token_for(&user);
    let app = test_app!(ctx);

    let req = test::TestRequest::get()
        .uri("/api/test/admin")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Roles live in the store, not in the token.
    let old = ctx.store.remove_user("promoted").await.unwrap();
    ctx.store
        .save(NewUser {
            username: old.username,
            email: old.email,
            password_hash: old.password_hash,
            roles: BTreeSet::from([Role::User, Role::Admin]),
        })
        .await
        .unwrap();

    let req = test::TestRequest::get()
        .uri("/api/test/admin")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[test_log::test(actix_rt::test)]
async fn test_encoded_paths_cannot_skip_role_rules() {
    let ctx = context().await;
    let user = seed_user(&ctx, "plain", "password", &[Role::User]).await;
    let admin = seed_user(&ctx, "boss", "password", &[Role::Admin]).await;
    let user_token = ctx.token_for(&user);
    let admin_token = ctx.token_for(&admin);
    let app = test_app!(ctx);

    for uri in [
        "/api/test/%61dmin",
        "/api/test/adm%69n",
        "/api/%74est/admin",
        "/api/test/%6dod",
    ] {
        let req = test::TestRequest::get()
            .uri(uri)
            .insert_header(bearer(&user_token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{}", uri);

        let body: UnauthorizedBody = test::read_body_json(resp).await;
        assert_eq!(body.message, "Access is denied", "{}", uri);
    }

    // The decoded spelling still reaches the handler for a holder of the role.
    let req = test::TestRequest::get()
        .uri("/api/test/%61dmin")
        .insert_header(bearer(&admin_token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({"message": "Admin Board for boss."}));
}
