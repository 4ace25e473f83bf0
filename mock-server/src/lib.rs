use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, Method, StatusCode},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub html_url: String,
    pub stargazers_count: u32,
    pub language: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResults {
    pub total_count: usize,
    pub incomplete_results: bool,
    pub items: Vec<Repository>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub query: BTreeMap<String, String>,
    pub headers: BTreeMap<String, String>,
}

/// Read-only search index shared across requests.
pub type Db = Arc<Vec<Repository>>;

pub fn app() -> Router {
    app_with(seed())
}

pub fn app_with(repositories: Vec<Repository>) -> Router {
    let db: Db = Arc::new(repositories);
    Router::new()
        .route("/search/repositories", get(search_repositories))
        .route("/echo", get(echo).post(echo))
        .route("/status/{code}", get(status))
        .route("/array", get(array))
        .route("/garbage", get(garbage))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// A handful of repositories about design patterns.
pub fn seed() -> Vec<Repository> {
    let repo = |id, owner: &str, name: &str, description: &str, stars, language: &str| Repository {
        id,
        name: name.to_string(),
        full_name: format!("{owner}/{name}"),
        description: Some(description.to_string()),
        html_url: format!("https://github.com/{owner}/{name}"),
        stargazers_count: stars,
        language: Some(language.to_string()),
    };
    vec![
        repo(1, "patterns", "builder-pattern", "Builder design pattern examples", 420, "Swift"),
        repo(2, "patterns", "rust-builder", "Derive a builder for any Rust struct", 1337, "Rust"),
        repo(3, "patterns", "observer", "Observer design pattern in five languages", 87, "Kotlin"),
        repo(4, "acme", "http-client", "Tiny HTTP client with a request builder", 12, "Go"),
    ]
}

/// Every word of `q` must appear in the name or description, ignoring case.
fn matches(repository: &Repository, words: &[String]) -> bool {
    let haystack = format!(
        "{} {}",
        repository.name,
        repository.description.as_deref().unwrap_or("")
    )
    .to_lowercase();
    words.iter().all(|word| haystack.contains(word.as_str()))
}

async fn search_repositories(
    State(db): State<Db>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Result<Json<SearchResults>, (StatusCode, Json<ErrorBody>)> {
    let q = params.get("q").map(|q| q.trim()).unwrap_or("");
    if q.is_empty() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorBody {
                message: "Validation Failed".to_string(),
            }),
        ));
    }
    let words: Vec<String> = q.split_whitespace().map(str::to_lowercase).collect();

    let mut items: Vec<Repository> = db
        .iter()
        .filter(|r| matches(r, &words))
        .cloned()
        .collect();
    items.sort_by(|a, b| b.stargazers_count.cmp(&a.stargazers_count));

    Ok(Json(SearchResults {
        total_count: items.len(),
        incomplete_results: false,
        items,
    }))
}

async fn echo(
    method: Method,
    headers: HeaderMap,
    Query(query): Query<BTreeMap<String, String>>,
) -> Json<Echo> {
    let headers = headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();
    Json(Echo {
        method: method.as_str().to_string(),
        query,
        headers,
    })
}

async fn status(Path(code): Path<u16>) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST)
}

async fn array() -> Json<Vec<u32>> {
    Json(vec![1, 2, 3])
}

async fn garbage() -> &'static str {
    "this is not json"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(q: &str) -> Vec<String> {
        q.split_whitespace().map(str::to_lowercase).collect()
    }

    #[test]
    fn every_word_must_match() {
        let seed = seed();
        assert!(matches(&seed[0], &words("Builder Design Pattern")));
        assert!(!matches(&seed[2], &words("Builder Design Pattern")));
    }

    #[test]
    fn matching_ignores_case() {
        let seed = seed();
        assert!(matches(&seed[1], &words("RUST builder")));
    }

    #[test]
    fn description_is_searched() {
        let seed = seed();
        assert!(matches(&seed[3], &words("request")));
    }

    #[test]
    fn repository_serializes_github_field_names() {
        let json = serde_json::to_value(&seed()[0]).unwrap();
        assert_eq!(json["full_name"], "patterns/builder-pattern");
        assert_eq!(json["stargazers_count"], 420);
        assert_eq!(json["html_url"], "https://github.com/patterns/builder-pattern");
    }

    #[test]
    fn search_results_serialize_as_object() {
        let results = SearchResults {
            total_count: 0,
            incomplete_results: false,
            items: Vec::new(),
        };
        let json = serde_json::to_value(&results).unwrap();
        assert!(json.is_object());
        assert_eq!(json["total_count"], 0);
        assert_eq!(json["items"], serde_json::json!([]));
    }
}
