use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use platform_api::{ApiError, ApiResult};
use serde::Deserialize;
use serde_json::{Value, json};
use serde_json_path::JsonPath;

const SAMPLE_PAYLOAD: &str = r#"{ "Skills": ["C#", "SQL", "React"] }"#;

fn parse_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(inner)| inner)
        .map_err(|err| ApiError::bad_request(err.body_text()))
}

fn pretty(value: &Value) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value).map_err(ApiError::internal)
}

/// Shows a worked example of the normalize endpoint.
pub async fn normalize_sample() -> ApiResult<Json<Value>> {
    let sample: Value = serde_json::from_str(SAMPLE_PAYLOAD).map_err(ApiError::internal)?;
    let normalized = pretty(&sample)?;
    Ok(Json(json!({
        "instructions": "POST your own JSON payload to this endpoint to receive a pretty-printed response.",
        "endpoint": "/api/jsonsamples/normalize",
        "payload": SAMPLE_PAYLOAD,
        "normalized": normalized,
    })))
}

/// Accepts any JSON payload and returns a pretty-printed version.
pub async fn normalize(payload: Result<Json<Value>, JsonRejection>) -> ApiResult<Response> {
    let value = parse_body(payload)?;
    let formatted = pretty(&value)?;
    Ok(([(header::CONTENT_TYPE, "application/json")], formatted).into_response())
}

#[derive(Deserialize)]
pub struct JsonPathRequest {
    #[serde(default)]
    json: String,
    #[serde(default)]
    path: String,
}

/// Evaluates the requested JSONPath expression against the provided JSON
/// string. String matches come back raw, anything else as compact JSON.
pub async fn extract(payload: Result<Json<JsonPathRequest>, JsonRejection>) -> ApiResult<String> {
    let request = parse_body(payload)?;
    if request.json.trim().is_empty() {
        return Err(ApiError::bad_request("provide the JSON payload to inspect"));
    }
    if request.path.trim().is_empty() {
        return Err(ApiError::bad_request(
            "provide a JSONPath expression, e.g. $.employee.email",
        ));
    }

    let document: Value = serde_json::from_str(&request.json)
        .map_err(|err| ApiError::bad_request(format!("invalid JSON: {err}")))?;
    let path = JsonPath::parse(&request.path)
        .map_err(|err| ApiError::bad_request(format!("invalid JSONPath: {err}")))?;

    let Some(matched) = path.query(&document).first() else {
        return Err(ApiError::not_found(
            "the JSONPath expression did not match any value",
        ));
    };
    Ok(match matched {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode, header};
    use http_body_util::BodyExt;
    use serde_json::json;
    use tower::ServiceExt;

    use crate::http::testing::test_router;

    async fn post_json(uri: &str, body: serde_json::Value) -> (StatusCode, String) {
        let (router, _store) = test_router();
        let response = router
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn normalize_pretty_prints_the_payload() {
        let (status, body) =
            post_json("/api/jsonsamples/normalize", json!({"Skills": ["SQL"]})).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("\"Skills\": [\n"));
    }

    #[tokio::test]
    async fn normalize_sample_describes_itself() {
        let (router, _store) = test_router();
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/jsonsamples/normalize")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["endpoint"], "/api/jsonsamples/normalize");
        assert!(value["normalized"].as_str().unwrap().contains("Skills"));
    }

    #[tokio::test]
    async fn extract_returns_string_matches_raw() {
        let (status, body) = post_json(
            "/api/jsonsamples/extract",
            json!({
                "json": r#"{ "employee": { "email": "ada@example.com" } }"#,
                "path": "$.employee.email"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ada@example.com");
    }

    #[tokio::test]
    async fn extract_indexes_into_arrays() {
        let (status, body) = post_json(
            "/api/jsonsamples/extract",
            json!({ "json": r#"["C#", "SQL", "React"]"#, "path": "$[1]" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "SQL");
    }

    #[tokio::test]
    async fn extract_serializes_non_string_matches_compactly() {
        let (status, body) = post_json(
            "/api/jsonsamples/extract",
            json!({ "json": r#"{ "skills": ["SQL", "React"] }"#, "path": "$.skills" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"["SQL","React"]"#);
    }

    #[tokio::test]
    async fn extract_without_match_is_404() {
        let (status, _body) = post_json(
            "/api/jsonsamples/extract",
            json!({ "json": r#"{ "a": 1 }"#, "path": "$.missing" }),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn extract_rejects_invalid_json_and_blank_inputs() {
        let (status, body) = post_json(
            "/api/jsonsamples/extract",
            json!({ "json": "{ not json", "path": "$.a" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("invalid JSON"));

        let (status, _) =
            post_json("/api/jsonsamples/extract", json!({ "json": "", "path": "$.a" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = post_json(
            "/api/jsonsamples/extract",
            json!({ "json": "{}", "path": "" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
