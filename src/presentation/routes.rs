// Router construction
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    get_view, health_check, pointer_moved, refresh, relayout, select_range, set_auto_update,
    stream_view,
};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/view", get(get_view))
        .route("/view/stream", get(stream_view))
        .route("/view/pointer", post(pointer_moved))
        .route("/view/relayout", post(relayout))
        .route("/view/auto-update", post(set_auto_update))
        .route("/view/refresh", post(refresh))
        .route("/view/range", post(select_range))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::render_surface::{RenderSurface, ValueRange};
    use crate::application::view_runtime::{ViewEvent, ViewHandle};
    use crate::domain::time_window::{RangePreset, TimeWindow};
    use crate::infrastructure::frame_publisher::FramePublisher;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use tokio::sync::mpsc;
    use tower::ServiceExt;

    fn make_state() -> (Arc<AppState>, FramePublisher, mpsc::Receiver<ViewEvent>) {
        let publisher = FramePublisher::new();
        let (view, events) = ViewHandle::channel();
        let state = Arc::new(AppState {
            view,
            feed: publisher.feed(),
        });
        (state, publisher, events)
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (state, _publisher, _events) = make_state();
        let response = create_router(state)
            .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_view_snapshot() {
        let (state, _publisher, _events) = make_state();
        let response = create_router(state)
            .oneshot(Request::get("/view").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json["frame"].is_null());
        assert_eq!(json["status"]["mode"], "x_free");
    }

    #[tokio::test]
    async fn test_pointer_and_navigation_become_events() {
        let (state, _publisher, mut events) = make_state();
        let router = create_router(state);

        let response = router
            .clone()
            .oneshot(post_json("/view/pointer", r#"{"x": 12.5}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(events.recv().await, Some(ViewEvent::PointerMoved(12.5)));

        router
            .clone()
            .oneshot(post_json("/view/auto-update", r#"{"enabled": false}"#))
            .await
            .unwrap();
        assert_eq!(events.recv().await, Some(ViewEvent::SetAutoUpdate(false)));

        router
            .clone()
            .oneshot(post_json("/view/range", r#"{"preset": "1d"}"#))
            .await
            .unwrap();
        assert_eq!(events.recv().await, Some(ViewEvent::SelectRange(RangePreset::LastDay)));

        router
            .oneshot(Request::post("/view/refresh").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(events.recv().await, Some(ViewEvent::Refresh));
    }

    #[tokio::test]
    async fn test_relayout_updates_visible_window() {
        let (state, publisher, _events) = make_state();
        let router = create_router(state);

        let response = router
            .clone()
            .oneshot(post_json("/view/relayout", r#"{"x_range": [1000, 2000], "y_range": [0, 500]}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(publisher.visible_window(), Some(TimeWindow::new(1000, 2000).unwrap()));
        assert_eq!(publisher.value_range(), Some(ValueRange::new(0.0, 500.0)));

        // A degenerate window is rejected and the previous one retained
        let response = router
            .clone()
            .oneshot(post_json("/view/relayout", r#"{"x_range": [2000, 2000]}"#))
            .await
            .unwrap();
        assert!(response.status().is_client_error());
        assert_eq!(publisher.visible_window(), Some(TimeWindow::new(1000, 2000).unwrap()));

        // So is one whose width does not fit in an i64
        let response = router
            .oneshot(post_json(
                "/view/relayout",
                r#"{"x_range": [-9223372036854775808, 9223372036854775807]}"#,
            ))
            .await
            .unwrap();
        assert!(response.status().is_client_error());
        assert_eq!(publisher.visible_window(), Some(TimeWindow::new(1000, 2000).unwrap()));
    }

    #[tokio::test]
    async fn test_closed_view_reports_unavailable() {
        let (state, _publisher, events) = make_state();
        drop(events);
        let response = create_router(state)
            .oneshot(Request::post("/view/refresh").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
