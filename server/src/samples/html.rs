use anyhow::anyhow;
use axum::Json;
use axum::extract::{Query, State};
use platform_api::{ApiError, ApiResult};
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;

use crate::http::AppState;

const DEMO_HTML: &str = r#"
<html>
    <body>
        <article>
            <h1>Company Announcements</h1>
            <p>Welcome aboard!</p>
            <h2>Onboarding</h2>
        </article>
    </body>
</html>
"#;

#[derive(Deserialize)]
pub struct UrlQuery {
    url: Option<String>,
}

/// Parses a tiny in-memory HTML snippet and returns the extracted heading
/// and paragraph text.
pub async fn demo() -> ApiResult<Json<Vec<String>>> {
    Ok(Json(select_texts(DEMO_HTML, "h1, h2, p")?))
}

/// Fetches the supplied URL and extracts the `<title>` element.
pub async fn title(
    State(state): State<AppState>,
    Query(query): Query<UrlQuery>,
) -> ApiResult<String> {
    let url = require_url(
        query.url.as_deref(),
        "/api/htmlsamples/title?url=https://example.com",
    )?;
    let html = fetch_html(&state.http_client, url).await?;
    select_first_text(&html, "title")
        .filter(|text| !text.is_empty())
        .ok_or_else(|| ApiError::not_found("the page did not contain a <title> tag"))
}

/// Downloads the provided URL and returns the full text content of `<body>`.
pub async fn body_text(
    State(state): State<AppState>,
    Query(query): Query<UrlQuery>,
) -> ApiResult<String> {
    let url = require_url(
        query.url.as_deref(),
        "/api/htmlsamples/bodyFromHtml?url=https://example.com",
    )?;
    let html = fetch_html(&state.http_client, url).await?;
    select_first_text(&html, "body")
        .ok_or_else(|| ApiError::not_found("the page did not contain a <body> tag"))
}

fn require_url(raw: Option<&str>, example: &str) -> Result<Url, ApiError> {
    let raw = raw.map(str::trim).filter(|value| !value.is_empty());
    let Some(raw) = raw else {
        return Err(ApiError::bad_request(format!(
            "provide a URL to inspect, e.g. {example}"
        )));
    };
    Url::parse(raw).map_err(|_| ApiError::bad_request("the supplied URL is not valid"))
}

async fn fetch_html(client: &reqwest::Client, url: Url) -> Result<String, ApiError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|err| ApiError::internal(anyhow!("could not download '{url}': {err}")))?;
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::upstream(
            status,
            format!("request failed with status {}", status.as_u16()),
        ));
    }
    response
        .text()
        .await
        .map_err(|err| ApiError::internal(anyhow!("could not read body of '{url}': {err}")))
}

// Parsing stays in synchronous helpers: `scraper::Html` is not `Send`, so it
// must never live across an await point in a handler future.

fn parse_selector(css: &str) -> Result<Selector, ApiError> {
    Selector::parse(css).map_err(|err| ApiError::internal(anyhow!("bad selector `{css}`: {err}")))
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn select_texts(html: &str, css: &str) -> Result<Vec<String>, ApiError> {
    let selector = parse_selector(css)?;
    let document = Html::parse_document(html);
    Ok(document.select(&selector).map(element_text).collect())
}

fn select_first_text(html: &str, css: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    let document = Html::parse_document(html);
    document.select(&selector).next().map(element_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::http::testing::test_router;

    #[test]
    fn demo_snippet_extracts_in_document_order() {
        let texts = select_texts(DEMO_HTML, "h1, h2, p").unwrap();
        assert_eq!(texts, ["Company Announcements", "Welcome aboard!", "Onboarding"]);
    }

    #[test]
    fn title_selection_ignores_paragraphs() {
        let html = "<html><head><title>Hello</title></head><body><p>not me</p></body></html>";
        assert_eq!(select_first_text(html, "title"), Some("Hello".into()));
    }

    #[test]
    fn missing_title_yields_none() {
        let html = "<html><body><p>only text</p></body></html>";
        assert_eq!(select_first_text(html, "title"), None);
    }

    #[test]
    fn body_text_concatenates_and_trims() {
        let html = "<html><body> <p>one</p><p>two</p> </body></html>";
        assert_eq!(select_first_text(html, "body"), Some("onetwo".into()));
    }

    #[test]
    fn require_url_rejects_blank_and_malformed_input() {
        assert!(require_url(None, "example").is_err());
        assert!(require_url(Some("   "), "example").is_err());
        assert!(require_url(Some("notaurl"), "example").is_err());
        assert!(require_url(Some("https://example.com"), "example").is_ok());
    }

    #[tokio::test]
    async fn demo_endpoint_returns_extracted_texts() {
        let (router, _store) = test_router();
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/htmlsamples/demo")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let texts: Vec<String> = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(texts.len(), 3);
    }

    #[tokio::test]
    async fn title_endpoint_without_url_is_400() {
        let (router, _store) = test_router();
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/htmlsamples/title")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn title_endpoint_with_malformed_url_is_400() {
        let (router, _store) = test_router();
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/htmlsamples/title?url=notaurl")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
