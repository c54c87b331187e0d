//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, patch, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/timers", get(list_timers_handler).post(add_timer_handler))
        .route("/timers/:id", patch(edit_timer_handler).delete(delete_timer_handler))
        .route("/timers/:id/toggle", post(toggle_timer_handler))
        .route("/timers/:id/restart", post(restart_timer_handler))
        .route("/timers/:id/dismiss", post(dismiss_alert_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::{alerts::recording::RecordingAlerts, storage::MemoryStorage};

    fn app() -> (Router, Arc<AppState>, Arc<RecordingAlerts>) {
        let alerts = Arc::new(RecordingAlerts::default());
        let state = Arc::new(AppState::new(
            Arc::new(MemoryStorage::new()),
            alerts.clone(),
            20554,
            "127.0.0.1".to_string(),
        ));
        (create_router(Arc::clone(&state)), state, alerts)
    }

    async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn tea_form() -> Value {
        json!({ "title": " Tea ", "description": "green", "hours": 0, "minutes": 5, "seconds": 0 })
    }

    #[tokio::test]
    async fn test_add_and_list() {
        let (router, _, _) = app();

        let (status, created) = send(&router, Method::POST, "/timers", Some(tea_form())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["title"], "Tea");
        assert_eq!(created["duration"], 300);
        assert_eq!(created["remainingTime"], 300);
        assert_eq!(created["isRunning"], false);
        assert_eq!(created["phase"], "idle");
        assert_eq!(created["remainingDisplay"], "05:00");

        let (status, listed) = send(&router, Method::GET, "/timers", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed["timers"].as_array().unwrap().len(), 1);
        assert_eq!(listed["timers"][0]["id"], created["id"]);
    }

    #[tokio::test]
    async fn test_invalid_form_is_rejected() {
        let (router, state, _) = app();
        let form = json!({ "title": "Tea", "hours": 25 });

        let (status, body) = send(&router, Method::POST, "/timers", Some(form)).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["message"], "Timer cannot exceed 24 hours");
        assert!(state.timers().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_restart_and_edit() {
        let (router, state, alerts) = app();
        let (_, created) = send(&router, Method::POST, "/timers", Some(tea_form())).await;
        let id = created["id"].as_str().unwrap().to_string();

        let (status, toggled) = send(&router, Method::POST, &format!("/timers/{id}/toggle"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(toggled["isRunning"], true);

        state.tick(&id).unwrap();
        let (_, restarted) = send(&router, Method::POST, &format!("/timers/{id}/restart"), None).await;
        assert_eq!(restarted["remainingTime"], 300);
        assert_eq!(restarted["isRunning"], false);
        assert_eq!(alerts.cancelled(), vec![id.clone()]);

        let edit = json!({ "title": "X", "hours": 0, "minutes": 2, "seconds": 0 });
        let (status, edited) = send(&router, Method::PATCH, &format!("/timers/{id}"), Some(edit)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(edited["title"], "X");
        assert_eq!(edited["description"], "");
        assert_eq!(edited["duration"], 120);
        assert_eq!(edited["remainingTime"], 120);
    }

    #[tokio::test]
    async fn test_unknown_id() {
        let (router, _, _) = app();

        let (status, _) = send(&router, Method::POST, "/timers/nope/toggle", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&router, Method::DELETE, "/timers/nope", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_delete_and_dismiss_cancel_alerts() {
        let (router, state, alerts) = app();
        let (_, created) = send(&router, Method::POST, "/timers", Some(tea_form())).await;
        let id = created["id"].as_str().unwrap().to_string();
        state.notify_completion(&id, "Tea");

        let (_, status_body) = send(&router, Method::GET, "/status", None).await;
        assert_eq!(status_body["active_alerts"], json!([id.clone()]));
        assert_eq!(status_body["phases"]["idle"], 1);

        let (status, _) = send(&router, Method::POST, &format!("/timers/{id}/dismiss"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&router, Method::DELETE, &format!("/timers/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        assert_eq!(alerts.cancelled(), vec![id.clone(), id]);
        assert!(state.timers().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_completed_timer_needs_restart_to_run_again() {
        let (router, state, _) = app();
        let form = json!({ "title": "Egg", "hours": 0, "minutes": 0, "seconds": 1 });
        let (_, created) = send(&router, Method::POST, "/timers", Some(form)).await;
        let id = created["id"].as_str().unwrap().to_string();
        send(&router, Method::POST, &format!("/timers/{id}/toggle"), None).await;
        state.tick(&id).unwrap();

        let (status, toggled) = send(&router, Method::POST, &format!("/timers/{id}/toggle"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(toggled["phase"], "completed");
        assert_eq!(toggled["isRunning"], false);

        let (_, restarted) = send(&router, Method::POST, &format!("/timers/{id}/restart"), None).await;
        assert_eq!(restarted["phase"], "idle");
        let (_, started) = send(&router, Method::POST, &format!("/timers/{id}/toggle"), None).await;
        assert_eq!(started["phase"], "running");
    }

    #[tokio::test]
    async fn test_health() {
        let (router, _, _) = app();
        let (status, body) = send(&router, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }
}
