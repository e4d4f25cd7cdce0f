mod helpers;

use axum::http::StatusCode;
use helpers::{get_public, make_app, read_json};
use tower::ServiceExt;

#[tokio::test]
async fn health_endpoint_is_public() {
    let (app, _state) = make_app().await;

    let res = app.oneshot(get_public("/api/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body = read_json(res).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"], "OK");
    assert_eq!(body["message"], "Service is healthy");
}
