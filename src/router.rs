// ============================================================================
// Router - rotas /api/*, rotas admin protegidas e SPA estático
// ============================================================================

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    handler::Handler,
    http::{header, HeaderName, HeaderValue, Method},
    middleware,
    routing::{get, patch, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::config::Settings;
use crate::handlers::{
    actions, admin, contacts, crm, expansion, goals, health, journal, kpis, leads, produtos, spa,
};
use crate::middleware::require_admin_passcode;
use crate::utils::logging::log_warning;
use crate::AppState;

/// Limite do corpo das requisições (10 MiB)
pub const BODY_LIMIT: usize = 10 * 1024 * 1024;

const DEV_CORS_ORIGIN: &str = "http://localhost:8080";

// HeaderName::from_static exige minúsculas
const ADMIN_PASSCODE_HEADER_LOWER: &str = "x-admin-passcode";

pub fn build_router(state: Arc<AppState>) -> Router {
    // `public/` primeiro, depois o build do SPA, e por fim `index.html`
    let dist_dir = PathBuf::from(&state.settings.static_files.dist_dir);
    let static_files = ServeDir::new(&state.settings.static_files.public_dir).fallback(
        ServeDir::new(&dist_dir).fallback(spa::spa_index.with_state(Arc::new(dist_dir.clone()))),
    );

    // Rotas protegidas por X-Admin-Passcode
    let admin_routes = Router::new()
        .route("/api/admin/health", get(health::admin_health))
        .route("/api/__selftest", get(health::self_test))
        .route("/api/kpis/admin", get(kpis::list_admin_kpis))
        .route("/api/admin/databases", post(admin::create_database))
        .route("/api/admin/databases/:id", get(admin::get_database))
        .route(
            "/api/admin/databases/:id/properties",
            patch(admin::update_database_properties),
        )
        .route("/api/admin/maintenance/dedupe-kpis", post(admin::dedupe_kpis))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_admin_passcode,
        ));

    let api_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/kpis/public", get(kpis::list_public_kpis))
        .route("/api/goals", get(goals::list_goals))
        .route("/api/actions", get(actions::list_actions))
        .route("/api/actions/:id/done", patch(actions::toggle_action_done))
        .route("/api/journal/yesterday/check", get(journal::check_yesterday))
        .route(
            "/api/journal/:date",
            get(journal::get_journal).post(journal::upsert_journal),
        )
        .route(
            "/api/contacts",
            get(contacts::list_contacts).post(contacts::create_contact),
        )
        .route(
            "/api/contacts/:id",
            get(contacts::get_contact)
                .put(contacts::update_contact)
                .delete(contacts::delete_contact),
        )
        .route("/api/crm/health", get(crm::crm_health))
        .route(
            "/api/crm/pipeline",
            get(crm::list_pipeline).post(crm::create_pipeline_contact),
        )
        .route("/api/crm/pipeline/:id", put(crm::update_pipeline_contact))
        .route("/api/crm/kpis", get(crm::pipeline_metrics))
        .route("/api/crm/sync-goals", post(crm::sync_goals))
        .route("/api/produtos", get(produtos::list_produtos))
        .route("/api/lead-gate", post(leads::lead_gate))
        .route("/api/save-lead", post(leads::save_axis_lead))
        .route("/api/coffee/contacts", get(contacts::search_contacts))
        .route("/api/coffee", post(expansion::create_coffee))
        .route(
            "/api/expansion/customer-wins",
            get(expansion::list_customer_wins),
        )
        .route(
            "/api/expansion/customer-win",
            post(expansion::create_customer_win),
        )
        .route(
            "/api/expansion/opportunities",
            get(expansion::list_expansion_opportunities),
        )
        .route(
            "/api/expansion/opportunity",
            post(expansion::create_expansion_opportunity),
        )
        .route("/api/expansion/clients", get(expansion::list_clients));

    Router::new()
        .merge(api_routes)
        .merge(admin_routes)
        .fallback_service(static_files)
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(CompressionLayer::new())
        .layer(cors_layer(&state.settings))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Produção espelha a origem da requisição; desenvolvimento aceita só CORS_ORIGIN
fn cors_layer(settings: &Settings) -> CorsLayer {
    let origin = if settings.is_production() {
        AllowOrigin::mirror_request()
    } else {
        let configured = settings.cors.origin.as_deref().unwrap_or(DEV_CORS_ORIGIN);
        match HeaderValue::from_str(configured) {
            Ok(value) => AllowOrigin::exact(value),
            Err(_) => {
                log_warning(&format!(
                    "⚠️ CORS_ORIGIN inválido ({}), usando {}",
                    configured, DEV_CORS_ORIGIN
                ));
                AllowOrigin::exact(HeaderValue::from_static(DEV_CORS_ORIGIN))
            }
        }
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(ADMIN_PASSCODE_HEADER_LOWER),
        ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::data_layer::test_support::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use httpmock::prelude::*;
    use httpmock::Method::PATCH;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn settings_with_static(dist: &std::path::Path) -> Settings {
        let mut settings = Settings::default();
        settings.static_files.dist_dir = dist.display().to_string();
        settings.static_files.public_dir = dist.join("public").display().to_string();
        settings
    }

    fn app_without_notion(settings: Settings) -> Router {
        build_router(Arc::new(AppState {
            settings,
            data: None,
        }))
    }

    fn app_with_notion(server: &MockServer) -> Router {
        build_router(Arc::new(AppState {
            settings: Settings::default(),
            data: Some(Arc::new(layer(server))),
        }))
    }

    async fn send(app: Router, request: Request<Body>) -> Response {
        app.oneshot(request).await.unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = send(app_without_notion(Settings::default()), get("/api/health")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_admin_routes_require_passcode() {
        let mut settings = Settings::default();
        settings.admin.passcode = Some("s3cret".into());

        let response = send(app_without_notion(settings.clone()), get("/api/__selftest")).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Unauthorized: Invalid passcode" })
        );

        let request = Request::builder()
            .uri("/api/__selftest")
            .header("X-Admin-Passcode", "admin123")
            .body(Body::empty())
            .unwrap();
        let response = send(app_without_notion(settings.clone()), request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let request = Request::builder()
            .uri("/api/__selftest")
            .header("X-Admin-Passcode", "s3cret")
            .body(Body::empty())
            .unwrap();
        let response = send(app_without_notion(settings), request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let report = body_json(response).await;
        assert_eq!(report["dryRun"], true);
        assert_eq!(report["passed"], true);
    }

    #[tokio::test]
    async fn test_dev_passcode_only_without_configuration() {
        let request = Request::builder()
            .uri("/api/admin/health")
            .header("X-Admin-Passcode", "admin123")
            .body(Body::empty())
            .unwrap();
        let response = send(app_without_notion(Settings::default()), request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let report = body_json(response).await;
        assert_eq!(report["status"], "error");
        assert_eq!(report["checks"][0]["name"], "ENV: NOTION_TOKEN");

        let mut production = Settings::default();
        production.environment = "production".into();
        let request = Request::builder()
            .uri("/api/admin/health")
            .header("X-Admin-Passcode", "admin123")
            .body(Body::empty())
            .unwrap();
        let response = send(app_without_notion(production), request).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_data_routes_without_token() {
        let response = send(app_without_notion(Settings::default()), get("/api/kpis/public")).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], "NOTION_TOKEN not configured");
    }

    #[tokio::test]
    async fn test_request_validation() {
        let app = app_without_notion(Settings::default());

        let response = send(
            app.clone(),
            json_request("PATCH", "/api/actions/a1/done", json!({ "done": "yes" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Body must contain { done: boolean }");

        let response = send(
            app.clone(),
            json_request("POST", "/api/lead-gate", json!({ "name": "Ana" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Name and Phone are required");

        let response = send(app, get("/api/journal/2026-13-01")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_public_kpis() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(format!("/databases/{}/query", KPIS_DB));
                then.status(200).json_body(json!({
                    "results": [{
                        "id": "k1",
                        "properties": {
                            "Name": { "type": "title", "title": [{ "plain_text": "Cafés" }] },
                            "VisiblePublic": { "type": "checkbox", "checkbox": true },
                            "Active": { "type": "checkbox", "checkbox": true }
                        }
                    }],
                    "has_more": false,
                    "next_cursor": null
                }));
            })
            .await;

        let response = send(app_with_notion(&server), get("/api/kpis/public")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let kpis = body_json(response).await;
        assert_eq!(kpis[0]["id"], "k1");
        assert_eq!(kpis[0]["Name"], "Cafés");
        assert_eq!(kpis[0]["IsFinancial"], false);
    }

    #[tokio::test]
    async fn test_action_without_goal_cannot_be_done() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/pages/a1");
                then.status(200).json_body(json!({
                    "id": "a1",
                    "properties": {
                        "Goal": { "type": "relation", "relation": [] }
                    }
                }));
            })
            .await;
        let update = server
            .mock_async(|when, then| {
                when.method(PATCH).path("/pages/a1");
                then.status(200).json_body(json!({ "id": "a1", "properties": {} }));
            })
            .await;

        let response = send(
            app_with_notion(&server),
            json_request("PATCH", "/api/actions/a1/done", json!({ "done": true })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({
                "error": "Cannot mark action as done",
                "reason": "Não é possível concluir uma ação sem meta associada"
            })
        );
        update.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn test_journal_not_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(format!("/databases/{}/query", JOURNAL_DB));
                then.status(200)
                    .json_body(json!({ "results": [], "has_more": false, "next_cursor": null }));
            })
            .await;

        let response = send(app_with_notion(&server), get("/api/journal/2026-01-05")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "Journal not found");

        let response = send(app_with_notion(&server), get("/api/journal/yesterday/check")).await;
        assert_eq!(
            body_json(response).await,
            json!({ "exists": false, "filled": false, "locked": true })
        );
    }

    #[tokio::test]
    async fn test_create_database_requires_fields() {
        let server = MockServer::start_async().await;
        let request = Request::builder()
            .method("POST")
            .uri("/api/admin/databases")
            .header("content-type", "application/json")
            .header("X-Admin-Passcode", "admin123")
            .body(Body::from(json!({ "title": "X" }).to_string()))
            .unwrap();

        let response = send(app_with_notion(&server), request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["error"],
            "parentPageId, title, and properties are required"
        );
    }

    async fn mock_create<'a>(server: &'a MockServer, database_id: &str, page_id: &str) -> httpmock::Mock<'a> {
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/pages")
                    .json_body_partial(json!({ "parent": { "database_id": database_id } }).to_string());
                then.status(200).json_body(json!({ "id": page_id, "properties": {} }));
            })
            .await
    }

    async fn mock_empty_goals(server: &MockServer) {
        server
            .mock_async(|when, then| {
                when.method(POST).path(format!("/databases/{}/query", GOALS_DB));
                then.status(200)
                    .json_body(json!({ "results": [], "has_more": false, "next_cursor": null }));
            })
            .await;
    }

    #[tokio::test]
    async fn test_coffee_requires_acceptances() {
        let server = MockServer::start_async().await;

        for body in [
            json!({ "contactName": "Ana", "additivesPolicyAccepted": true }),
            json!({ "contactName": "Ana", "scopeLockAccepted": true, "additivesPolicyAccepted": false }),
        ] {
            let response = send(app_with_notion(&server), json_request("POST", "/api/coffee", body)).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(
                body_json(response).await["error"],
                "ScopeLockAccepted and AdditivesPolicyAccepted are required"
            );
        }

        let response = send(
            app_with_notion(&server),
            json_request(
                "POST",
                "/api/coffee",
                json!({ "scopeLockAccepted": true, "additivesPolicyAccepted": true }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["error"],
            "Either contactId or contactName is required"
        );
    }

    #[tokio::test]
    async fn test_coffee_creates_contact_from_name() {
        let server = MockServer::start_async().await;
        let contact = mock_create(&server, CONTACTS_DB, "contact-new").await;
        let diagnostic = server
            .mock_async(|when, then| {
                when.method(POST).path("/pages").json_body_partial(
                    r#"{
                        "parent": { "database_id": "coffee-db" },
                        "properties": {
                            "Name": { "title": [{ "text": { "content": "Café - Ana Souza" } }] },
                            "Contact": { "relation": [{ "id": "contact-new" }] },
                            "TeamSize": { "number": 4.0 }
                        }
                    }"#,
                );
                then.status(200).json_body(json!({ "id": "diag-1", "properties": {} }));
            })
            .await;
        mock_empty_goals(&server).await;
        let action = server
            .mock_async(|when, then| {
                when.method(POST).path("/pages").json_body_partial(
                    r#"{
                        "parent": { "database_id": "actions-db" },
                        "properties": {
                            "Name": { "title": [{ "text": { "content": "Café com Ana Souza" } }] },
                            "Type": { "select": { "name": "Café" } },
                            "Done": { "checkbox": true },
                            "Contact": { "relation": [{ "id": "contact-new" }] },
                            "Diagnostic": { "relation": [{ "id": "diag-1" }] },
                            "Notes": { "rich_text": [{ "text": { "content": "Leads sem resposta" } }] }
                        }
                    }"#,
                );
                then.status(200).json_body(json!({ "id": "action-1", "properties": {} }));
            })
            .await;

        let response = send(
            app_with_notion(&server),
            json_request(
                "POST",
                "/api/coffee",
                json!({
                    "contactName": "Ana Souza",
                    "teamSize": "4",
                    "mainPain": "Leads sem resposta",
                    "scopeLockAccepted": true,
                    "additivesPolicyAccepted": true
                }),
            ),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        contact.assert_hits_async(1).await;
        diagnostic.assert_hits_async(1).await;
        action.assert_hits_async(1).await;

        let body = body_json(response).await;
        assert_eq!(body["diagnosticId"], "diag-1");
        assert_eq!(body["actionId"], "action-1");
        assert_eq!(body["mainPain"], "Leads sem resposta");
        assert_eq!(body["goalLinked"], false);
        assert_eq!(
            body["goalWarning"],
            "Crie uma meta Goals para cafés (Network_Coffees) no Notion"
        );
    }

    #[tokio::test]
    async fn test_customer_win_below_gol_score() {
        let server = MockServer::start_async().await;
        let win = mock_create(&server, WINS_DB, "win-7").await;
        let actions = mock_create(&server, ACTIONS_DB, "action-x").await;

        let response = send(
            app_with_notion(&server),
            json_request(
                "POST",
                "/api/expansion/customer-win",
                json!({ "Name": "Relatório elogiado", "Date": "2026-04-02", "Score": 7 }),
            ),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({ "id": "win-7", "isGOL": false }));
        win.assert_hits_async(1).await;
        actions.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn test_customer_win_gol_flow() {
        let server = MockServer::start_async().await;
        let win = server
            .mock_async(|when, then| {
                when.method(POST).path("/pages").json_body_partial(
                    r#"{ "parent": { "database_id": "wins-db" }, "properties": { "IsGOL": { "checkbox": true } } }"#,
                );
                then.status(200).json_body(json!({ "id": "win-8", "properties": {} }));
            })
            .await;
        mock_empty_goals(&server).await;
        let actions = mock_create(&server, ACTIONS_DB, "action-x").await;
        let opportunity = server
            .mock_async(|when, then| {
                when.method(POST).path("/pages").json_body_partial(
                    r#"{
                        "parent": { "database_id": "expansion-db" },
                        "properties": {
                            "Name": { "title": [{ "text": { "content": "Expansão - Renovação antecipada" } }] },
                            "Type": { "select": { "name": "Upsell" } },
                            "Stage": { "select": { "name": "Identificado" } },
                            "Trigger": { "select": { "name": "GOLMoment" } }
                        }
                    }"#,
                );
                then.status(200).json_body(json!({ "id": "opp-1", "properties": {} }));
            })
            .await;

        let response = send(
            app_with_notion(&server),
            json_request(
                "POST",
                "/api/expansion/customer-win",
                json!({ "Name": "Renovação antecipada", "Date": "2026-04-02", "Score": 8 }),
            ),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({ "id": "win-8", "isGOL": true }));
        win.assert_hits_async(1).await;
        opportunity.assert_hits_async(1).await;
        // GOL_Detected + reunião de expansão
        actions.assert_hits_async(2).await;
    }

    #[tokio::test]
    async fn test_customer_win_red_health_blocks_expansion() {
        let server = MockServer::start_async().await;
        mock_create(&server, WINS_DB, "win-red").await;
        mock_empty_goals(&server).await;
        let actions = mock_create(&server, ACTIONS_DB, "action-x").await;
        let opportunity = mock_create(&server, EXPANSION_DB, "opp-x").await;

        let response = send(
            app_with_notion(&server),
            json_request(
                "POST",
                "/api/expansion/customer-win",
                json!({ "Name": "Case publicado", "Date": "2026-04-02", "Score": 9, "Health": "Red" }),
            ),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({
                "error": "Cliente com Health Red. Expansão bloqueada. Sugerir CS primeiro.",
                "winId": "win-red"
            })
        );
        actions.assert_hits_async(1).await;
        opportunity.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn test_customer_win_requires_name_and_date() {
        let server = MockServer::start_async().await;
        let response = send(
            app_with_notion(&server),
            json_request("POST", "/api/expansion/customer-win", json!({ "Name": "Sem data" })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Name and Date are required");
    }

    #[tokio::test]
    async fn test_spa_fallback() {
        let dist = tempfile::tempdir().unwrap();
        std::fs::write(dist.path().join("index.html"), "<html>FR Tech OS</html>").unwrap();
        std::fs::write(dist.path().join("app.js"), "console.log(1)").unwrap();
        let settings = settings_with_static(dist.path());

        let response = send(app_without_notion(settings.clone()), get("/dashboard/kpis")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"<html>FR Tech OS</html>");

        let response = send(app_without_notion(settings.clone()), get("/app.js")).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = send(app_without_notion(settings), get("/api/unknown")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "Not found");
    }

    #[tokio::test]
    async fn test_spa_not_built() {
        let dist = tempfile::tempdir().unwrap();
        let response = send(
            app_without_notion(settings_with_static(dist.path())),
            get("/"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await["error"],
            "Application not built (index.html missing)"
        );
    }
}
