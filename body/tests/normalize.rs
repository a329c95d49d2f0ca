use bytes::Bytes;
use http_body_util::Full;
use kit_body::{process, BodyConfig, BodyError, Context, FieldValue, Request};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::collections::HashMap;

const BOUNDARY: &str = "----KitFormBoundary7MA4YWxkTrZu0gW";

fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn multipart_body(fields: &[(&str, &str)]) -> Bytes {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
            BOUNDARY, name, value
        ));
    }
    body.push_str(&format!("--{}--\r\n", BOUNDARY));
    Bytes::from(body)
}

fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}

async fn normalize(
    content_type: &str,
    body: impl Into<Bytes>,
    query: &HashMap<String, String>,
) -> (Context, Result<Option<Bytes>, BodyError>) {
    let mut extensions = http::Extensions::new();
    let result = process(&mut extensions, content_type, Some(body.into()), query).await;
    (Context::from_extensions(&extensions), result)
}

fn parse(bytes: &Bytes) -> Value {
    serde_json::from_slice(bytes).unwrap()
}

#[tokio::test]
async fn json_object_round_trips() {
    let (ctx, result) = normalize(
        "application/json",
        r#"{"name": "John", "age": 30, "nested": {"ok": [1, 2.5, null]}}"#,
        &query(&[("query", "test")]),
    )
    .await;

    let bytes = result.unwrap().unwrap();
    assert_eq!(
        parse(&bytes),
        json!({"name": "John", "age": 30, "nested": {"ok": [1, 2.5, null]}})
    );
    assert_eq!(ctx.get("query"), "test");
}

#[tokio::test]
async fn json_array_of_objects_keeps_order() {
    let (_, result) = normalize(
        "application/json",
        r#"[{"name": "John"}, {"name": "Jane"}]"#,
        &HashMap::new(),
    )
    .await;

    let bytes = result.unwrap().unwrap();
    assert_eq!(parse(&bytes), json!([{"name": "John"}, {"name": "Jane"}]));
}

#[tokio::test]
async fn json_array_with_non_object_reports_index() {
    let (_, result) = normalize(
        "application/json",
        r#"[{"name": "John"}, {"name": "Jane"}, ["nested"]]"#,
        &HashMap::new(),
    )
    .await;

    let err = result.unwrap_err();
    assert!(matches!(err, BodyError::InvalidArrayItem { index: 2 }));
    assert_eq!(err.status_code(), 400);
}

#[tokio::test]
async fn invalid_json_fails_without_bytes() {
    let (_, result) = normalize("application/json", r#"{"invalid": json}"#, &HashMap::new()).await;
    let err = result.unwrap_err();
    assert!(err.to_string().starts_with("failed to parse body: "));
}

#[tokio::test]
async fn json_output_is_a_fixed_point() {
    let input = r#"{ "z": 1, "a": {"y": [3, {"b": true, "a": "x"}], "x": -0.5e3 }, "m": "é" }"#;
    let (_, first) = normalize("application/json", input, &HashMap::new()).await;
    let first = first.unwrap().unwrap();

    let (_, second) = normalize("application/json", first.clone(), &HashMap::new()).await;
    assert_eq!(second.unwrap().unwrap(), first);

    let (_, list) = normalize("application/json", r#"[{"b": 1, "a": 2}]"#, &HashMap::new()).await;
    let list = list.unwrap().unwrap();
    let (_, again) = normalize("application/json", list.clone(), &HashMap::new()).await;
    assert_eq!(again.unwrap().unwrap(), list);
}

#[tokio::test]
async fn form_fields_merge_with_query() {
    let (ctx, result) = normalize(
        "application/x-www-form-urlencoded",
        "name=John&age=30",
        &query(&[("query", "test")]),
    )
    .await;

    assert_eq!(ctx.get("name"), "John");
    assert_eq!(ctx.get("age"), "30");
    assert_eq!(ctx.get("query"), "test");

    let bytes = result.unwrap().unwrap();
    assert_eq!(parse(&bytes), json!({"name": "John", "age": "30", "query": "test"}));
}

#[tokio::test]
async fn repeated_form_field_becomes_list() {
    let (ctx, result) = normalize(
        "application/x-www-form-urlencoded; charset=utf-8",
        "tag=a&tag=b",
        &HashMap::new(),
    )
    .await;

    assert_eq!(ctx.get("tag"), "a");
    assert_eq!(ctx.get_all("tag"), &["a".to_string(), "b".to_string()]);

    let bytes = result.unwrap().unwrap();
    assert_eq!(parse(&bytes), json!({"tag": ["a", "b"]}));
}

#[tokio::test]
async fn multipart_fields_are_decoded() {
    let (ctx, result) = normalize(
        &multipart_content_type(),
        multipart_body(&[("name", "John"), ("age", "30")]),
        &HashMap::new(),
    )
    .await;

    assert_eq!(ctx.get("name"), "John");
    let bytes = result.unwrap().unwrap();
    assert_eq!(parse(&bytes), json!({"name": "John", "age": "30"}));
}

#[tokio::test]
async fn repeated_multipart_field_overrides_query() {
    let (ctx, result) = normalize(
        &multipart_content_type(),
        multipart_body(&[("tag", "a"), ("tag", "b")]),
        &query(&[("tag", "from-query"), ("page", "1")]),
    )
    .await;

    assert_eq!(
        ctx.value("tag"),
        Some(&FieldValue::Multiple(vec!["a".to_string(), "b".to_string()]))
    );
    assert_eq!(ctx.get("tag"), "a");

    let bytes = result.unwrap().unwrap();
    assert_eq!(parse(&bytes), json!({"tag": ["a", "b"], "page": "1"}));
}

#[tokio::test]
async fn text_body_becomes_json_string() {
    let (_, result) = normalize("text/plain", "Hello World", &HashMap::new()).await;
    let bytes = result.unwrap().unwrap();
    assert_eq!(parse(&bytes), json!("Hello World"));
}

#[tokio::test]
async fn empty_json_and_text_bodies_are_none() {
    let (_, result) = normalize("application/json", "", &HashMap::new()).await;
    assert_eq!(result.unwrap(), None);

    let (_, result) = normalize("text/plain", "", &HashMap::new()).await;
    assert_eq!(result.unwrap(), None);
}

#[tokio::test]
async fn unsupported_content_type_passes_through() {
    let (_, result) = normalize("application/xml", "<xml></xml>", &HashMap::new()).await;
    assert_eq!(result.unwrap().unwrap(), "<xml></xml>");
}

#[tokio::test]
async fn request_normalize_attaches_context() {
    let req = hyper::Request::builder()
        .method("POST")
        .uri("/users?query=test&page=1&page=2")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Full::new(Bytes::from_static(b"name=John&page=9")))
        .unwrap();

    let config = BodyConfig::builder().max_body_size(1024).build();
    let (parts, body) = Request::new(req).normalize(&config).await.unwrap();

    let ctx = Context::from_extensions(&parts.extensions);
    assert_eq!(ctx.get("query"), "test");
    assert_eq!(ctx.get("page"), "9");
    assert_eq!(ctx.get("name"), "John");
    assert_eq!(parts.uri.path(), "/users");

    let body = body.unwrap();
    assert_eq!(parse(&body), json!({"name": "John", "page": "9", "query": "test"}));
}

#[tokio::test]
async fn request_normalize_enforces_body_limit() {
    let req = hyper::Request::builder()
        .header("content-type", "application/json")
        .body(Full::new(Bytes::from_static(br#"{"name": "John"}"#)))
        .unwrap();

    let config = BodyConfig::builder().max_body_size(4).build();
    let err = Request::new(req).normalize(&config).await.unwrap_err();

    assert!(matches!(err, BodyError::TooLarge { limit: 4 }));
    assert_eq!(err.into_response().status(), 413);
}

#[tokio::test]
async fn request_without_content_type_passes_through() {
    let req = hyper::Request::builder()
        .body(Full::new(Bytes::from_static(b"raw")))
        .unwrap();

    let (parts, body) = Request::new(req)
        .normalize(&BodyConfig::builder().max_body_size(16).build())
        .await
        .unwrap();

    assert_eq!(body.unwrap(), "raw");
    assert!(Context::from_extensions(&parts.extensions).is_empty());
}
