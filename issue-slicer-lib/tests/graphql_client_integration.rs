//! Integration tests for the GraphQL client and the fetch loop using wiremock

use core::time::Duration;
use issue_slicer_lib::issues::github::{Fetcher, GraphQlClient, IssuePageSource, PageError, RetryPolicy};
use issue_slicer_lib::issues::{LabelRules, Progress, RepoSpec};
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// No-op progress reporter for testing
#[derive(Debug)]
struct NoOpProgress;

impl Progress for NoOpProgress {
    fn set_phase(&self, _phase: &str) {}
    fn set_position(&self, _processed: u64, _total: u64) {}
    fn println(&self, _msg: &str) {}
    fn done(&self) {}
}

fn issue(number: u64, created_at: &str, closed_at: Option<&str>, milestone: Option<&str>, labels: &[&str]) -> Value {
    json!({
        "number": number,
        "title": format!("Issue {number}"),
        "createdAt": created_at,
        "closedAt": closed_at,
        "milestone": milestone.map(|title| json!({ "title": title })),
        "labels": {
            "nodes": labels.iter().map(|name| json!({ "name": name })).collect::<Vec<_>>(),
            "totalCount": labels.len(),
        },
    })
}

fn page(nodes: Vec<Value>, end_cursor: Option<&str>, total_count: u64) -> Value {
    json!({
        "data": {
            "repository": {
                "name": "maui",
                "issues": {
                    "nodes": nodes,
                    "pageInfo": { "hasNextPage": end_cursor.is_some(), "endCursor": end_cursor },
                    "totalCount": total_count,
                },
            },
        },
    })
}

fn client(server: &MockServer) -> GraphQlClient {
    let endpoint = Url::parse(&format!("{}/graphql", server.uri())).unwrap();
    GraphQlClient::new("ghp_test", endpoint, 2, Duration::from_secs(5)).unwrap()
}

fn repo() -> RepoSpec {
    RepoSpec::new("dotnet", "maui")
}

#[tokio::test]
async fn test_fetch_page_sends_query_and_parses_page() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(header("authorization", "bearer ghp_test"))
        .and(body_partial_json(json!({
            "variables": { "owner": "dotnet", "name": "maui", "afterIssue": null, "pageSize": 2 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            vec![issue(7, "2021-06-02T08:00:00Z", None, Some("6.0.100"), &["t/bug", "area/xaml"])],
            Some("c1"),
            3,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let connection = client(&server).fetch_page(&repo(), None).await.unwrap();

    assert_eq!(connection.total_count, 3);
    assert!(connection.page_info.has_next_page);
    assert_eq!(connection.page_info.end_cursor.as_deref(), Some("c1"));
    assert_eq!(connection.nodes.len(), 1);
    assert_eq!(connection.nodes[0].number, 7);
}

#[tokio::test]
async fn test_unauthorized_is_fatal() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client(&server).fetch_page(&repo(), None).await.unwrap_err();
    assert!(err.is_fatal());
    assert!(matches!(err, PageError::Unauthorized(_)));
}

#[tokio::test]
async fn test_server_error_is_transient() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let err = client(&server).fetch_page(&repo(), None).await.unwrap_err();
    assert!(!err.is_fatal());
    assert!(err.to_string().contains("502"));
}

#[tokio::test]
async fn test_graphql_errors_are_transient() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [{ "message": "Something went wrong" }, { "message": "And again" }],
        })))
        .mount(&server)
        .await;

    let err = client(&server).fetch_page(&repo(), None).await.unwrap_err();
    assert!(!err.is_fatal());
    assert!(err.to_string().contains("2 error(s)"));
}

#[tokio::test]
async fn test_malformed_body_is_transient() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>rate limited</html>"))
        .mount(&server)
        .await;

    let err = client(&server).fetch_page(&repo(), None).await.unwrap_err();
    assert!(matches!(err, PageError::Transient(_)));
}

#[tokio::test]
async fn test_fetcher_follows_cursor_chain() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "variables": { "afterIssue": null } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            vec![
                issue(3, "2021-06-10T08:00:00Z", None, None, &["t/bug", "area/xaml"]),
                issue(2, "2021-06-05T08:00:00Z", Some("2021-06-06T08:00:00Z"), None, &[]),
            ],
            Some("c1"),
            3,
        )))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "variables": { "afterIssue": "c1" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            vec![issue(1, "2021-06-01T08:00:00Z", None, Some("Future"), &["area/controls"])],
            None,
            3,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let rules = LabelRules::new("^area/", "t/bug").unwrap();
    let fetcher = Fetcher::new(&client, &rules, RetryPolicy::default(), &NoOpProgress);

    let mut rows = Vec::new();
    let summary = fetcher.fetch_repository(&repo(), &mut rows).await.unwrap();

    assert_eq!(summary.fetched, 3);
    assert_eq!(summary.total_count, Some(3));
    assert_eq!(summary.pages, 2);
    assert!(!summary.abandoned);

    let numbers: Vec<u64> = rows.iter().map(|r| r.number).collect();
    assert_eq!(numbers, vec![3, 2, 1]);
    assert_eq!(rows[0].primary_area.as_deref(), Some("area/xaml"));
    assert!(rows[0].is_bug);
    assert!(!rows[1].is_open());
    assert_eq!(rows[2].milestone.as_deref(), Some("Future"));
    assert_eq!(&*rows[2].repository, "maui");
}

#[tokio::test]
async fn test_fetcher_abandons_after_repeated_failures() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let client = client(&server);
    let rules = LabelRules::new("^area/", "t/bug").unwrap();
    let policy = RetryPolicy {
        max_consecutive_failures: 3,
        delay: Duration::from_millis(1),
    };
    let fetcher = Fetcher::new(&client, &rules, policy, &NoOpProgress);

    let mut rows = Vec::new();
    let summary = fetcher.fetch_repository(&repo(), &mut rows).await.unwrap();

    assert!(summary.abandoned);
    assert_eq!(summary.fetched, 0);
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_fetcher_stops_on_unauthorized_without_retry() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let rules = LabelRules::new("^area/", "t/bug").unwrap();
    let fetcher = Fetcher::new(&client, &rules, RetryPolicy::default(), &NoOpProgress);

    let mut rows = Vec::new();
    let err = fetcher.fetch_repository(&repo(), &mut rows).await.unwrap_err();
    assert!(err.to_string().contains("401"));
}
