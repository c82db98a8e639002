//! Remote centile table provider.
//!
//! Reads `(centile, salary_value)` rows from a PostgREST-style endpoint,
//! ordered by ascending centile. A missing table or an empty result means the
//! data is unavailable; transport, auth and query failures are source errors.
//!
//! There is no retry loop. Refreshing is left to the user.

use std::time::Duration;

use log::{debug, info, warn};
use reqwest::StatusCode;
use serde::Deserialize;

use super::provider::{DataError, DataSource, DistributionProvider};
use crate::domain::{Distribution, DistributionPoint, FIRST_CENTILE, LAST_CENTILE};

/// Default relation holding the distribution.
pub const DEFAULT_TABLE: &str = "salary_centiles";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// PostgreSQL "undefined_table" error code.
const PG_UNDEFINED_TABLE: &str = "42P01";

/// PostgREST "table not found in schema cache" error code.
const PGRST_TABLE_NOT_FOUND: &str = "PGRST205";

/// Connection settings for the remote source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSettings {
    /// Base endpoint URL, e.g. `https://project.example.co`.
    pub url: String,
    /// Access credential sent as `apikey` and bearer token.
    pub api_key: String,
    pub table: String,
    pub timeout: Duration,
}

impl RemoteSettings {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            table: DEFAULT_TABLE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// One row of the remote table.
#[derive(Debug, Clone, Deserialize)]
struct CentileRow {
    centile: i64,
    salary_value: f64,
}

/// Error body returned by the gateway on failed queries.
#[derive(Debug, Deserialize)]
struct GatewayError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Provider reading the distribution from a remote tabular store.
pub struct RemoteProvider {
    client: reqwest::blocking::Client,
    settings: RemoteSettings,
}

impl RemoteProvider {
    pub fn new(settings: RemoteSettings) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| DataError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self::with_client(client, settings))
    }

    /// Use an already configured HTTP client. `settings.timeout` is not
    /// applied to it.
    pub fn with_client(client: reqwest::blocking::Client, settings: RemoteSettings) -> Self {
        Self { client, settings }
    }

    fn fetch_rows(&self) -> Result<Vec<CentileRow>, DataError> {
        let url = table_url(&self.settings.url, &self.settings.table);
        debug!("fetching salary centiles from {url}");

        let resp = self
            .client
            .get(&url)
            .header("apikey", &self.settings.api_key)
            .bearer_auth(&self.settings.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .map_err(transport_error)?;

        let status = resp.status();
        let body = resp.text().map_err(transport_error)?;

        if !status.is_success() {
            return Err(classify_failure(status, &body, &self.settings.table));
        }

        serde_json::from_str(&body).map_err(|e| {
            DataError::ResponseFormat(format!(
                "failed to parse rows from '{}': {e}",
                self.settings.table
            ))
        })
    }
}

impl DistributionProvider for RemoteProvider {
    fn name(&self) -> &str {
        "remote"
    }

    fn source(&self) -> DataSource {
        DataSource::Remote
    }

    fn produce_distribution(&self) -> Result<Distribution, DataError> {
        let rows = self.fetch_rows()?;
        debug!("received {} rows from '{}'", rows.len(), self.settings.table);
        let distribution = rows_to_distribution(rows, &self.settings.table)?;
        info!(
            "loaded {} centiles from '{}'",
            distribution.len(),
            self.settings.table
        );
        Ok(distribution)
    }
}

/// Query URL selecting both columns, ascending by centile.
pub fn table_url(base: &str, table: &str) -> String {
    format!(
        "{}/rest/v1/{table}?select=centile,salary_value&order=centile.asc",
        base.trim_end_matches('/')
    )
}

fn transport_error(e: reqwest::Error) -> DataError {
    if e.is_timeout() {
        DataError::NetworkUnreachable(format!("request timed out: {e}"))
    } else {
        DataError::NetworkUnreachable(e.to_string())
    }
}

/// Map a non-success response to the matching error.
fn classify_failure(status: StatusCode, body: &str, table: &str) -> DataError {
    let gateway: Option<GatewayError> = serde_json::from_str(body).ok();
    let code = gateway.as_ref().and_then(|g| g.code.as_deref());
    let message = gateway
        .as_ref()
        .and_then(|g| g.message.clone())
        .unwrap_or_else(|| body.trim().to_string());

    // A 404 without a gateway error code comes from something that is not
    // the REST gateway (wrong base URL, proxy page), not from a missing table.
    let table_missing = matches!(code, Some(PG_UNDEFINED_TABLE) | Some(PGRST_TABLE_NOT_FOUND))
        || (status == StatusCode::NOT_FOUND && code.is_some());
    if table_missing {
        return DataError::TableMissing {
            table: table.to_string(),
        };
    }

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return DataError::AuthenticationFailed(format!("HTTP {status}: {message}"));
    }

    DataError::Query {
        status: status.as_u16(),
        message,
    }
}

/// Turn fetched rows into a distribution.
///
/// Rows outside 1..=100 are dropped with a warning. The rest are sorted by
/// centile; a non-monotonic or partial table is reported but passed through.
fn rows_to_distribution(rows: Vec<CentileRow>, table: &str) -> Result<Distribution, DataError> {
    if rows.is_empty() {
        return Err(DataError::NoRows {
            table: table.to_string(),
        });
    }

    let total = rows.len();
    let mut points: Vec<DistributionPoint> = rows
        .into_iter()
        .filter_map(|row| {
            u8::try_from(row.centile)
                .ok()
                .filter(|c| (FIRST_CENTILE..=LAST_CENTILE).contains(c))
                .map(|c| DistributionPoint::new(c, row.salary_value))
        })
        .collect();

    let dropped = total - points.len();
    if dropped > 0 {
        warn!("'{table}': dropped {dropped} rows with a centile outside 1..=100");
    }
    if points.is_empty() {
        return Err(DataError::NoRows {
            table: table.to_string(),
        });
    }

    points.sort_by_key(|p| p.centile);
    let distribution = Distribution::new(points);

    if !distribution.is_monotonic() {
        warn!("'{table}': salaries are not non-decreasing in centile order; lookups may be off");
    }
    if !distribution.is_complete() {
        warn!(
            "'{table}': expected 100 centiles, got {}",
            distribution.len()
        );
    }

    Ok(distribution)
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    use super::*;
    use crate::data::{generate_distribution, load_distribution};

    fn row(centile: i64, salary_value: f64) -> CentileRow {
        CentileRow {
            centile,
            salary_value,
        }
    }

    #[test]
    fn url_orders_by_centile_and_trims_slash() {
        assert_eq!(
            table_url("https://db.example.co/", "salary_centiles"),
            "https://db.example.co/rest/v1/salary_centiles?select=centile,salary_value&order=centile.asc"
        );
    }

    #[test]
    fn undefined_table_code_is_table_missing() {
        let body = r#"{"code":"42P01","details":null,"hint":null,"message":"relation \"public.salary_centiles\" does not exist"}"#;
        let err = classify_failure(StatusCode::BAD_REQUEST, body, "salary_centiles");
        assert!(matches!(err, DataError::TableMissing { .. }));
        assert!(err.is_unavailable());
    }

    #[test]
    fn schema_cache_miss_is_table_missing() {
        let body = r#"{"code":"PGRST205","message":"Could not find the table 'public.salary_centiles' in the schema cache"}"#;
        let err = classify_failure(StatusCode::NOT_FOUND, body, "salary_centiles");
        assert!(err.is_unavailable());
    }

    #[test]
    fn gateway_not_found_is_table_missing() {
        let body = r#"{"code":"PGRST200","message":"Could not find a relationship"}"#;
        let err = classify_failure(StatusCode::NOT_FOUND, body, "salary_centiles");
        assert!(matches!(err, DataError::TableMissing { .. }));
    }

    #[test]
    fn bare_not_found_is_a_source_error() {
        let err = classify_failure(StatusCode::NOT_FOUND, "<html>Not Found</html>", "salary_centiles");
        match &err {
            DataError::Query { status, message } => {
                assert_eq!(*status, 404);
                assert!(message.contains("Not Found"));
            }
            other => panic!("expected Query, got {other:?}"),
        }
        assert!(!err.is_unavailable());
    }

    #[test]
    fn unauthorized_is_auth_failure() {
        let body = r#"{"message":"Invalid API key"}"#;
        let err = classify_failure(StatusCode::UNAUTHORIZED, body, "salary_centiles");
        match err {
            DataError::AuthenticationFailed(msg) => assert!(msg.contains("Invalid API key")),
            other => panic!("expected AuthenticationFailed, got {other:?}"),
        }
    }

    #[test]
    fn server_error_is_query_failure_with_raw_body() {
        let err = classify_failure(StatusCode::INTERNAL_SERVER_ERROR, "upstream down", "t");
        match err {
            DataError::Query { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "upstream down");
            }
            other => panic!("expected Query, got {other:?}"),
        }
    }

    #[test]
    fn zero_rows_is_unavailable() {
        let err = rows_to_distribution(Vec::new(), "salary_centiles").unwrap_err();
        assert!(matches!(err, DataError::NoRows { .. }));
    }

    #[test]
    fn rows_map_to_sorted_points() {
        let rows = vec![row(2, 1300.0), row(1, 1250.0), row(3, 1350.0)];
        let dist = rows_to_distribution(rows, "t").unwrap();
        let centiles: Vec<u8> = dist.iter().map(|p| p.centile).collect();
        assert_eq!(centiles, vec![1, 2, 3]);
        assert_eq!(dist.salary_at(1), Some(1250.0));
    }

    #[test]
    fn out_of_range_rows_are_dropped() {
        let rows = vec![row(0, 900.0), row(1, 1250.0), row(101, 99999.0), row(-3, 1.0)];
        let dist = rows_to_distribution(rows, "t").unwrap();
        assert_eq!(dist.len(), 1);
    }

    #[test]
    fn only_out_of_range_rows_is_unavailable() {
        let err = rows_to_distribution(vec![row(500, 1.0)], "t").unwrap_err();
        assert!(err.is_unavailable());
    }

    #[test]
    fn row_json_decodes() {
        let body = r#"[{"id":7,"centile":1,"salary_value":1250},{"id":8,"centile":2,"salary_value":1300.5}]"#;
        let rows: Vec<CentileRow> = serde_json::from_str(body).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].salary_value, 1300.5);
    }

    // ── Loopback HTTP ────────────────────────────────────────────────

    /// Answer a single request on a loopback port with a canned response.
    /// Returns the base URL and a channel yielding the raw request head.
    fn serve_once(status: &'static str, body: String) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut head = Vec::new();
            let mut chunk = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut chunk).unwrap();
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&chunk[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
            tx.send(String::from_utf8_lossy(&head).into_owned()).unwrap();
        });
        (format!("http://{addr}"), rx)
    }

    fn loopback_provider(url: &str) -> RemoteProvider {
        let mut settings = RemoteSettings::new(url, "test-key");
        settings.timeout = Duration::from_secs(5);
        let client = reqwest::blocking::Client::builder()
            .no_proxy()
            .timeout(settings.timeout)
            .build()
            .unwrap();
        RemoteProvider::with_client(client, settings)
    }

    #[test]
    fn fetches_and_sorts_full_table() {
        let rows: Vec<String> = generate_distribution()
            .iter()
            .rev()
            .map(|p| format!(r#"{{"centile":{},"salary_value":{}}}"#, p.centile, p.salary))
            .collect();
        let (url, request) = serve_once("200 OK", format!("[{}]", rows.join(",")));

        let dist = loopback_provider(&url).produce_distribution().unwrap();
        assert_eq!(dist, generate_distribution());

        let head = request.recv().unwrap().to_ascii_lowercase();
        assert!(head.starts_with(
            "get /rest/v1/salary_centiles?select=centile,salary_value&order=centile.asc "
        ));
        assert!(head.contains("apikey: test-key"));
        assert!(head.contains("authorization: bearer test-key"));
    }

    #[test]
    fn empty_result_falls_back_through_loader() {
        let (url, _request) = serve_once("200 OK", "[]".to_string());
        let loaded = load_distribution(&loopback_provider(&url)).unwrap();
        assert!(loaded.is_fallback());
        assert!(loaded.distribution.is_empty());
    }

    #[test]
    fn missing_relation_response_is_unavailable() {
        let body = r#"{"code":"PGRST205","message":"Could not find the table"}"#;
        let (url, _request) = serve_once("404 Not Found", body.to_string());
        let err = loopback_provider(&url).produce_distribution().unwrap_err();
        assert!(matches!(err, DataError::TableMissing { .. }));
    }

    #[test]
    fn garbage_body_is_a_format_error() {
        let (url, _request) = serve_once("200 OK", "<html>hello</html>".to_string());
        let err = loopback_provider(&url).produce_distribution().unwrap_err();
        assert!(matches!(err, DataError::ResponseFormat(_)));
        assert!(!err.is_unavailable());
    }

    #[test]
    fn refused_connection_is_network_unreachable() {
        let addr = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();
        let provider = loopback_provider(&format!("http://{addr}"));

        let err = provider.produce_distribution().unwrap_err();
        assert!(matches!(err, DataError::NetworkUnreachable(_)), "{err:?}");
        assert!(!err.is_unavailable());

        let err = load_distribution(&provider).unwrap_err();
        assert!(matches!(err, DataError::NetworkUnreachable(_)));
    }
}
