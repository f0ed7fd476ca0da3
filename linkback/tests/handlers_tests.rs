use linkback::handlers::*;
use linkback_scanner::TextEncoding;
use std::io::Cursor;
use std::time::Duration;
use tempfile::TempDir;
use tracing::Level;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

fn output_text(out: Vec<u8>) -> String {
    String::from_utf8(out).unwrap()
}

// ============================================================================
// Worker count
// ============================================================================

#[test]
fn test_parse_worker_count_valid() {
    assert_eq!(parse_worker_count("8"), Ok(8));
    assert_eq!(parse_worker_count(" 12 \n"), Ok(12));
}

#[test]
fn test_parse_worker_count_not_a_literal_int() {
    assert_eq!(
        parse_worker_count("abc"),
        Err("abc is not a literal int, please enter a literal int".to_string())
    );
    assert!(parse_worker_count("-3").unwrap_err().contains("not a literal int"));
    assert!(parse_worker_count("2.5").unwrap_err().contains("not a literal int"));
    assert!(parse_worker_count("").unwrap_err().contains("not a literal int"));
}

#[test]
fn test_parse_worker_count_zero() {
    assert_eq!(parse_worker_count("0"), Err("0 is not positive".to_string()));
}

#[test]
fn test_resolve_worker_count_from_argument() {
    let mut reader = Cursor::new(Vec::new());
    let mut out = Vec::new();
    let workers = resolve_worker_count(Some("6"), 4, &mut reader, &mut out).unwrap();
    assert_eq!(workers, 6);
    assert!(out.is_empty());
}

#[test]
fn test_resolve_worker_count_reprompts_until_valid() {
    let mut reader = Cursor::new(b"zero\n0\n3\n".to_vec());
    let mut out = Vec::new();
    let workers = resolve_worker_count(Some("x"), 4, &mut reader, &mut out).unwrap();
    assert_eq!(workers, 3);

    let out = output_text(out);
    assert!(out.contains("x is not a literal int"));
    assert!(out.contains("zero is not a literal int"));
    assert!(out.contains("0 is not positive"));
}

#[test]
fn test_resolve_worker_count_retry_prompt_follows_failed_check() {
    let mut reader = Cursor::new(b"0\nabc\n5\n".to_vec());
    let mut out = Vec::new();
    let workers = resolve_worker_count(Some("many"), 4, &mut reader, &mut out).unwrap();
    assert_eq!(workers, 5);

    let out = output_text(out);
    let literal = out.find("Please enter a literal int:").unwrap();
    let positive = out.find("Please enter a positive integer:").unwrap();
    assert!(literal < positive);
    assert_eq!(out.matches("Please enter a literal int:").count(), 2);
    assert_eq!(out.matches("Please enter a positive integer:").count(), 1);
}

#[test]
fn test_resolve_worker_count_prompt_shows_default() {
    let mut reader = Cursor::new(b"\n".to_vec());
    let mut out = Vec::new();
    let workers = resolve_worker_count(None, 13, &mut reader, &mut out).unwrap();
    assert_eq!(workers, 13);
    assert!(output_text(out).contains("The default value for your computer is: 13"));
}

#[test]
fn test_resolve_worker_count_end_of_input() {
    let mut reader = Cursor::new(b"nope\n".to_vec());
    let mut out = Vec::new();
    assert!(resolve_worker_count(None, 4, &mut reader, &mut out).is_err());
}

// ============================================================================
// Seed URL
// ============================================================================

#[tokio::test]
async fn test_resolve_seed_url_accepts_active_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wiki/Israel"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&server)
        .await;

    let seed = format!("{}/wiki/Israel", server.uri());
    let mut reader = Cursor::new(Vec::new());
    let mut out = Vec::new();

    let resolved = resolve_seed_url(
        Some(seed.clone()),
        &mut reader,
        &mut out,
        Duration::from_secs(2),
    )
    .await
    .unwrap();
    assert_eq!(resolved, seed);
}

#[tokio::test]
async fn test_resolve_seed_url_reprompts_after_bad_urls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/good"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let good = format!("{}/good", server.uri());
    let missing = format!("{}/missing", server.uri());
    let mut reader = Cursor::new(format!("{}\n{}\n", missing, good).into_bytes());
    let mut out = Vec::new();

    let resolved = resolve_seed_url(
        Some("ftp://example.com/file.pdf".to_string()),
        &mut reader,
        &mut out,
        Duration::from_secs(2),
    )
    .await
    .unwrap();
    assert_eq!(resolved, good);

    let out = output_text(out);
    assert!(out.contains("must start with either http:// or https://"));
    assert!(out.contains(&format!("The page at {} is not active", missing)));
    assert_eq!(out.matches("Enter your URL:").count(), 2);
}

#[tokio::test]
async fn test_resolve_seed_url_gives_up_at_end_of_input() {
    let mut reader = Cursor::new(Vec::new());
    let mut out = Vec::new();
    let result = resolve_seed_url(None, &mut reader, &mut out, Duration::from_secs(1)).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_seed_url_problems_combines_messages() {
    let problems = seed_url_problems("https://example.invalid/logo.png", Duration::from_secs(1))
        .await
        .unwrap();
    assert!(problems.contains("file extension"));
    assert!(problems.contains("is not active"));
}

// ============================================================================
// Options
// ============================================================================

#[test]
fn test_build_policy_wiki_wins() {
    let policy = build_policy(true, None, None, false);
    assert_eq!(policy, linkback_scanner::PagePolicy::wiki());
}

#[test]
fn test_build_policy_domain_and_prefix() {
    let policy = build_policy(false, Some("example.com"), Some("/docs/"), true);
    let domain = policy.domain.as_ref().unwrap();
    assert_eq!(domain.host_suffix, "example.com");
    assert_eq!(domain.path_prefix.as_deref(), Some("/docs/"));
    assert!(policy.exclude_query);
}

#[test]
fn test_build_policy_permissive_by_default() {
    assert_eq!(
        build_policy(false, None, None, false),
        linkback_scanner::PagePolicy::permissive()
    );
}

#[test]
fn test_parse_encoding() {
    assert_eq!(parse_encoding("latin-1").unwrap(), TextEncoding::Latin1);
    assert!(parse_encoding("klingon").is_err());
}

#[test]
fn test_log_level() {
    assert_eq!(log_level(0, false), Level::WARN);
    assert_eq!(log_level(1, false), Level::INFO);
    assert_eq!(log_level(3, false), Level::DEBUG);
    assert_eq!(log_level(2, true), Level::ERROR);
}

// ============================================================================
// Output
// ============================================================================

#[test]
fn test_write_report_creates_parent_dirs() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("reports").join("israel.json");

    let written = write_report("{}", target.to_str().unwrap()).unwrap();
    assert_eq!(written, target);
    assert_eq!(std::fs::read_to_string(&target).unwrap(), "{}");
}

#[test]
fn test_write_report_error_has_context() {
    let dir = TempDir::new().unwrap();
    // A directory cannot be overwritten with a file.
    let err = write_report("x", dir.path().to_str().unwrap()).unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to write report"));
}
