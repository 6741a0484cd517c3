// ============================================================================
// HTTP API - /api/actions
// ============================================================================
//
// GET    /api/actions/       list (restores from backup when the store is empty)
// POST   /api/actions/       create
// PUT    /api/actions/{id}/  partial update
// PATCH  /api/actions/{id}/  partial update
// DELETE /api/actions/{id}/  delete
//
// Trailing slashes are optional.
//
// ============================================================================

mod errors;

use actix_web::{web, HttpResponse};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::action::{
    ActionChanges, ActionCommand, ActionCommandHandler, ActionError, ActionId, ListOutcome, NewAction,
};
use crate::metrics::ServiceMetrics;

use errors::{json_error_handler, path_error_handler};

pub const MSG_SUCCESS: &str = "Success";
pub const MSG_NO_BACKUP: &str = "No actions found and no backup file available";
pub const MSG_CREATED: &str = "Action created successfully";
pub const MSG_UPDATED: &str = "Action updated successfully";
pub const MSG_DELETED: &str = "Action deleted successfully";

/// Shared state for the API workers
pub struct AppState {
    pub handler: ActionCommandHandler,
    pub metrics: Arc<ServiceMetrics>,
}

impl AppState {
    pub fn new(handler: ActionCommandHandler, metrics: Arc<ServiceMetrics>) -> Self {
        Self { handler, metrics }
    }

    fn record<T>(&self, operation: &str, result: &Result<T, ActionError>) {
        let outcome = match result {
            Ok(_) => "ok",
            Err(e) if e.is_not_found() => "not_found",
            Err(_) => "error",
        };
        self.metrics.record_request(operation, outcome);
    }
}

/// Register routes and extractor configuration
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .service(
            web::scope("/api")
                .service(
                    web::resource(vec!["/actions", "/actions/"])
                        .route(web::get().to(list_actions))
                        .route(web::post().to(create_action)),
                )
                .service(
                    web::resource(vec!["/actions/{id}", "/actions/{id}/"])
                        .route(web::put().to(update_action))
                        .route(web::patch().to(update_action))
                        .route(web::delete().to(delete_action)),
                ),
        );
}

async fn list_actions(state: web::Data<AppState>) -> Result<HttpResponse, ActionError> {
    let _timer = state.metrics.start_request_timer("list");
    let result = state.handler.list_or_restore(Uuid::new_v4()).await;
    state.record("list", &result);
    let listing = result?;

    let body = match listing.outcome {
        ListOutcome::Stored => json!({
            "message": MSG_SUCCESS,
            "data": listing.actions,
        }),
        ListOutcome::Restored(count) => json!({
            "message": MSG_SUCCESS,
            "data": listing.actions,
            "restored": count,
        }),
        ListOutcome::NoBackup => json!({
            "message": MSG_NO_BACKUP,
            "data": listing.actions,
        }),
    };

    Ok(HttpResponse::Ok().json(body))
}

async fn create_action(
    state: web::Data<AppState>,
    body: web::Json<NewAction>,
) -> Result<HttpResponse, ActionError> {
    let id = run_command(&state, ActionCommand::CreateAction(body.into_inner())).await?;
    Ok(HttpResponse::Created().json(json!({
        "message": MSG_CREATED,
        "data": { "id": id },
    })))
}

async fn update_action(
    state: web::Data<AppState>,
    path: web::Path<ActionId>,
    body: web::Json<ActionChanges>,
) -> Result<HttpResponse, ActionError> {
    let command = ActionCommand::UpdateAction {
        id: path.into_inner(),
        changes: body.into_inner(),
    };
    let id = run_command(&state, command).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": MSG_UPDATED,
        "data": { "id": id },
    })))
}

async fn delete_action(
    state: web::Data<AppState>,
    path: web::Path<ActionId>,
) -> Result<HttpResponse, ActionError> {
    let command = ActionCommand::DeleteAction { id: path.into_inner() };
    let id = run_command(&state, command).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": MSG_DELETED,
        "data": { "id": id },
    })))
}

async fn run_command(state: &AppState, command: ActionCommand) -> Result<ActionId, ActionError> {
    let operation = command.operation();
    let _timer = state.metrics.start_request_timer(operation);
    let correlation_id = Uuid::new_v4();

    let result = state.handler.handle(command, correlation_id).await;
    if let Err(e) = &result {
        tracing::warn!(correlation_id = %correlation_id, operation = operation, error = %e, "Request failed");
    }
    state.record(operation, &result);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backup::BackupMirror;
    use crate::store::InMemoryActionStore;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::Value;
    use std::path::Path;

    fn state_with_backup(path: &Path) -> web::Data<AppState> {
        let metrics = Arc::new(ServiceMetrics::new().unwrap());
        let handler = ActionCommandHandler::new(
            Arc::new(InMemoryActionStore::new()),
            BackupMirror::new(path),
            metrics.clone(),
        );
        web::Data::new(AppState::new(handler, metrics))
    }

    macro_rules! app {
        ($state:expr) => {
            test::init_service(App::new().app_data($state.clone()).configure(configure)).await
        };
    }

    #[actix_web::test]
    async fn test_create_then_list() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with_backup(&dir.path().join("backup.json"));
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/actions/")
            .set_json(json!({"action": "Recycling", "date": "2024-02-10", "points": 5}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], MSG_CREATED);
        let id = body["data"]["id"].as_i64().unwrap();

        let req = test::TestRequest::get().uri("/api/actions/").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["message"], MSG_SUCCESS);
        assert_eq!(body["data"][0]["id"], id);
        assert_eq!(body["data"][0]["action"], "Recycling");
        assert_eq!(body["data"][0]["date"], "2024-02-10");
    }

    #[actix_web::test]
    async fn test_trailing_slash_is_optional() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with_backup(&dir.path().join("backup.json"));
        let app = app!(state);

        let req = test::TestRequest::get().uri("/api/actions").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_create_with_bad_body_is_400() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with_backup(&dir.path().join("backup.json"));
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/actions/")
            .set_json(json!({"action": "Recycling", "date": "yesterday", "points": 5}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().starts_with("Invalid request"));
    }

    #[actix_web::test]
    async fn test_create_with_too_long_action_is_400() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with_backup(&dir.path().join("backup.json"));
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/actions/")
            .set_json(json!({"action": "z".repeat(300), "date": "2024-02-10", "points": 5}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_patch_points_only() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with_backup(&dir.path().join("backup.json"));
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/actions/")
            .set_json(json!({"action": "Meatless Monday", "date": "2024-02-12", "points": 6}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let id = body["data"]["id"].as_i64().unwrap();

        let req = test::TestRequest::patch()
            .uri(&format!("/api/actions/{}/", id))
            .set_json(json!({"points": 12}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["id"], id);
        assert_eq!(body["message"], MSG_UPDATED);

        let req = test::TestRequest::get().uri("/api/actions/").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"][0]["points"], 12);
        assert_eq!(body["data"][0]["action"], "Meatless Monday");
        assert_eq!(body["data"][0]["date"], "2024-02-12");
    }

    #[actix_web::test]
    async fn test_put_is_a_partial_update() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with_backup(&dir.path().join("backup.json"));
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/actions/")
            .set_json(json!({"action": "Thrifted a coat", "date": "2024-01-20", "points": 10}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let id = body["data"]["id"].as_i64().unwrap();

        let req = test::TestRequest::put()
            .uri(&format!("/api/actions/{}/", id))
            .set_json(json!({"date": "2024-01-21"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], MSG_UPDATED);
        assert_eq!(body["data"]["id"], id);

        let req = test::TestRequest::get().uri("/api/actions/").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"][0]["date"], "2024-01-21");
        assert_eq!(body["data"][0]["action"], "Thrifted a coat");
        assert_eq!(body["data"][0]["points"], 10);
    }

    #[actix_web::test]
    async fn test_failed_mirror_write_is_400() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with_backup(&dir.path().join("no-such-dir").join("backup.json"));
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/actions/")
            .set_json(json!({"action": "Repair cafe", "date": "2024-04-06", "points": 3}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("backup file"));

        // the row stays in the store even though the mirror is stale
        let req = test::TestRequest::get().uri("/api/actions/").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"][0]["action"], "Repair cafe");
    }

    #[actix_web::test]
    async fn test_put_unknown_id_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with_backup(&dir.path().join("backup.json"));
        let app = app!(state);

        let req = test::TestRequest::put()
            .uri("/api/actions/999/")
            .set_json(json!({"points": 1}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Action not found: 999");
    }

    #[actix_web::test]
    async fn test_non_numeric_id_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with_backup(&dir.path().join("backup.json"));
        let app = app!(state);

        let req = test::TestRequest::delete().uri("/api/actions/abc/").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_delete_then_delete_again() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with_backup(&dir.path().join("backup.json"));
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/actions/")
            .set_json(json!({"action": "Fixed a leak", "date": "2024-03-01", "points": 7}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let id = body["data"]["id"].as_i64().unwrap();

        let req = test::TestRequest::delete()
            .uri(&format!("/api/actions/{}/", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/actions/{}", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_empty_store_without_backup_reports_no_backup() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with_backup(&dir.path().join("backup.json"));
        let app = app!(state);

        let req = test::TestRequest::get().uri("/api/actions/").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], MSG_NO_BACKUP);
        assert_eq!(body["data"], json!([]));
    }

    #[actix_web::test]
    async fn test_empty_store_restores_backup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backup.json");
        std::fs::write(
            &path,
            r#"[{"id": 40, "action": "Bike", "date": "2023-09-01", "points": 4},
                {"id": 41, "action": "Bus", "date": "2023-09-02", "points": 2}]"#,
        )
        .unwrap();
        let state = state_with_backup(&path);
        let app = app!(state);

        let req = test::TestRequest::get().uri("/api/actions/").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["message"], MSG_SUCCESS);
        assert_eq!(body["restored"], 2);
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
        assert_eq!(body["data"][0]["id"], 1);
        assert_eq!(body["data"][1]["action"], "Bus");
    }

    #[actix_web::test]
    async fn test_corrupt_backup_is_400() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backup.json");
        std::fs::write(&path, "not json at all").unwrap();
        let state = state_with_backup(&path);
        let app = app!(state);

        let req = test::TestRequest::get().uri("/api/actions/").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_requests_are_counted() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with_backup(&dir.path().join("backup.json"));
        let app = app!(state);

        let req = test::TestRequest::delete().uri("/api/actions/5/").to_request();
        test::call_service(&app, req).await;

        let counted = state
            .metrics
            .requests_total
            .with_label_values(&["delete", "not_found"])
            .get();
        assert_eq!(counted, 1);
    }
}
