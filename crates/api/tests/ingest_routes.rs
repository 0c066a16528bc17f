use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use api::{create_router, AppState};
use intake_queue::{intake_queues, IntakeReceivers, OverflowPolicy};

fn app(capacity: usize, policy: OverflowPolicy) -> (axum::Router, IntakeReceivers) {
    let (queues, receivers) = intake_queues(capacity, policy);
    (create_router(Arc::new(AppState::new(queues))), receivers)
}

fn post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_text(resp: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

const ALERTMANAGER_BODY: &str = r#"{
    "receiver": "kafka",
    "status": "firing",
    "alerts": [{
        "status": "firing",
        "labels": {"alertname": "HighCPU", "instance": "host1", "env": "prod"},
        "annotations": {"description": "cpu high", "summary": "warn", "value": "95"},
        "startsAt": "2023-01-01T00:00:00Z",
        "endsAt": "0001-01-01T00:00:00Z",
        "generatorURL": ""
    }],
    "groupLabels": {},
    "commonLabels": {},
    "commonAnnotations": {},
    "externalURL": "http://alertmanager:9093"
}"#;

const GRAFANA_BODY: &str = r#"{
    "title": "[Alerting] Disk usage",
    "ruleId": 3,
    "ruleName": "Disk usage",
    "state": "alerting",
    "ruleUrl": "http://grafana/d/abc",
    "imageUrl": "",
    "message": "disk almost full",
    "evalMatches": [{"value": 91.5, "metric": "disk", "tags": {"instance": "db1"}}]
}"#;

#[tokio::test]
async fn alertmanager_accepts_and_enqueues() {
    let (app, mut receivers) = app(10, OverflowPolicy::Block);

    let resp = app.oneshot(post("/v1/alertmanager", ALERTMANAGER_BODY)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    assert_eq!(body_text(resp).await, "");
    let message = receivers.alertmanager.try_dequeue().unwrap();
    assert_eq!(message.alerts.len(), 1);
    assert!(receivers.grafana.is_empty());
}

#[tokio::test]
async fn grafana_decodes_its_own_schema() {
    let (app, mut receivers) = app(10, OverflowPolicy::Block);

    let resp = app.oneshot(post("/v1/grafana", GRAFANA_BODY)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    let message = receivers.grafana.try_dequeue().unwrap();
    assert_eq!(message.rule_id, "3");
    assert_eq!(message.eval_matches.len(), 1);
    assert!(receivers.alertmanager.is_empty());
}

#[tokio::test]
async fn malformed_json_is_rejected_on_both_endpoints() {
    for uri in ["/v1/alertmanager", "/v1/grafana"] {
        let (app, receivers) = app(10, OverflowPolicy::Block);

        let resp = app.oneshot(post(uri, "{not json")).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
        let text = body_text(resp).await;
        assert!(text.contains("line 1"), "{uri}: {text}");
        assert!(receivers.alertmanager.is_empty());
        assert!(receivers.grafana.is_empty());
    }
}

#[tokio::test]
async fn oversized_body_is_rejected_before_decoding() {
    let (queues, receivers) = intake_queues(10, OverflowPolicy::Block);
    let state = AppState::new(queues).with_max_body_bytes(64);
    let app = create_router(Arc::new(state));

    let padding = "x".repeat(256);
    let body = format!(r#"{{"receiver": "{padding}", "alerts": []}}"#);
    let resp = app.oneshot(post("/v1/alertmanager", &body)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let text = body_text(resp).await;
    assert!(!text.is_empty());
    assert!(!text.contains("line 1"), "{text}");
    assert!(receivers.alertmanager.is_empty());
}

#[tokio::test]
async fn body_within_limit_is_accepted() {
    let (queues, receivers) = intake_queues(10, OverflowPolicy::Block);
    let state = AppState::new(queues).with_max_body_bytes(ALERTMANAGER_BODY.len());
    let app = create_router(Arc::new(state));

    let resp = app.oneshot(post("/v1/alertmanager", ALERTMANAGER_BODY)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    assert_eq!(receivers.alertmanager.len(), 1);
}

#[tokio::test]
async fn null_label_values_decode_as_empty() {
    let (app, mut receivers) = app(10, OverflowPolicy::Block);

    let resp = app
        .oneshot(post(
            "/v1/alertmanager",
            r#"{"alerts": [{"labels": {"alertname": "HighCPU", "env": null}}]}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    let message = receivers.alertmanager.try_dequeue().unwrap();
    assert_eq!(message.alerts[0].labels["env"], "");
}

#[tokio::test]
async fn wrong_shape_is_rejected() {
    let (app, receivers) = app(10, OverflowPolicy::Block);

    let resp = app
        .oneshot(post("/v1/alertmanager", r#"{"alerts": {"not": "a list"}}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(receivers.alertmanager.is_empty());
}

#[tokio::test]
async fn empty_object_is_tolerated() {
    let (app, receivers) = app(10, OverflowPolicy::Block);

    let resp = app.oneshot(post("/v1/alertmanager", "{}")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    assert_eq!(receivers.alertmanager.len(), 1);
}

#[tokio::test]
async fn full_queue_under_reject_policy_returns_unavailable() {
    let (app, receivers) = app(1, OverflowPolicy::Reject);

    let resp = app.clone().oneshot(post("/v1/grafana", GRAFANA_BODY)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::ACCEPTED);

    let resp = app.oneshot(post("/v1/grafana", GRAFANA_BODY)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(body_text(resp).await.contains("full"));
    assert_eq!(receivers.grafana.len(), 1);
}

#[tokio::test]
async fn get_on_ingest_route_is_not_allowed() {
    let (app, _receivers) = app(10, OverflowPolicy::Block);

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/v1/alertmanager")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn health_reports_queue_depths() {
    let (app, _receivers) = app(10, OverflowPolicy::Block);

    let resp = app
        .clone()
        .oneshot(post("/v1/alertmanager", ALERTMANAGER_BODY))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::ACCEPTED);

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/v1/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body_text(resp).await).unwrap();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["queues"]["alertmanager"]["depth"], 1);
    assert_eq!(json["queues"]["alertmanager"]["capacity"], 10);
    assert_eq!(json["queues"]["grafana"]["depth"], 0);
}
