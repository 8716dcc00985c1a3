//! Test Helper Utilities
//!
//! Synthetic survey uploads and request builders for esr-dash tests

use axum::{body::Body, http::Request, Router};
use serde_json::Value;
use tower::util::ServiceExt; // for `oneshot` method

use esr_common::schema::{self, DIMENSIONS};

/// One synthetic respondent: gender code, satisfaction code and a uniform
/// item value per dimension
pub struct Row {
    pub genre: i64,
    pub satisfaction: i64,
    pub items: [f64; 4],
}

pub fn row(genre: i64, es_item: f64) -> Row {
    Row {
        genre,
        satisfaction: 3,
        items: [es_item, 3.0, 2.0, 4.0],
    }
}

/// Delimited export with the workbook layout (title row, header, data)
pub fn survey_csv(rows: &[Row]) -> String {
    let mut header: Vec<String> = [
        "id_participants",
        "Age",
        "Genre",
        "Etude",
        "Item4",
        "Item5",
        "Item6",
        "Item7",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    header.extend(schema::all_items().into_iter().map(String::from));
    header.extend(schema::total_columns().into_iter().map(String::from));

    let mut out = format!("Participant{}\n", ",".repeat(header.len() - 1));
    out.push_str(&header.join(","));
    out.push('\n');

    for (i, r) in rows.iter().enumerate() {
        let mut line = vec![
            format!("P{}", i + 1),
            "1".to_string(),
            r.genre.to_string(),
            "4".to_string(),
            "1".to_string(),
            format!("{}", 6 * (i + 1)),
            "1".to_string(),
            r.satisfaction.to_string(),
        ];
        for (dim, value) in DIMENSIONS.iter().zip(r.items) {
            line.extend(dim.items.iter().map(|_| value.to_string()));
        }
        for (dim, value) in DIMENSIONS.iter().zip(r.items) {
            line.push((value * dim.items.len() as f64).to_string());
        }
        out.push_str(&line.join(","));
        out.push('\n');
    }
    out
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn upload(name: &str, bytes: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/api/dataset?name={}", name))
        .header("content-type", "application/octet-stream")
        .body(bytes.into())
        .unwrap()
}

/// Send one request through a clone of the router
pub async fn send(app: &Router, request: Request<Body>) -> axum::response::Response {
    app.clone().oneshot(request).await.unwrap()
}

/// Extract JSON body from response
pub async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

pub async fn text_body(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    String::from_utf8(bytes.to_vec()).expect("Should be UTF-8")
}
