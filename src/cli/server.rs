//! HTTP server mode for REST API access to the tables

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::connector::{Connector, HubSpotConnector, ListRequest};
use crate::error::{Error, Result};

/// App state shared across handlers
#[derive(Clone)]
struct AppState {
    connector: HubSpotConnector,
}

/// Query string of the rows endpoint
#[derive(Debug, Default, Deserialize)]
struct RowsQuery {
    #[serde(default)]
    archived: bool,
    #[serde(default)]
    limit: Option<usize>,
    /// Comma-separated column names
    #[serde(default)]
    columns: Option<String>,
}

impl RowsQuery {
    fn into_request(self) -> ListRequest {
        ListRequest {
            archived: self.archived,
            limit: self.limit,
            columns: self.columns.as_deref().map(split_columns),
        }
    }
}

/// Query string of the single row endpoint
#[derive(Debug, Default, Deserialize)]
struct RowQuery {
    /// Comma-separated column names
    #[serde(default)]
    columns: Option<String>,
}

fn split_columns(columns: &str) -> Vec<String> {
    columns
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Response wrapper
#[derive(Debug, Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn error(msg: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

/// Build the router for a connector
pub fn router(connector: HubSpotConnector) -> Router {
    // Build CORS layer - allow all origins
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/tables", get(list_tables))
        .route("/tables/:name", get(get_table))
        .route("/tables/:name/rows", get(list_rows))
        .route("/tables/:name/rows/:id", get(get_row))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { connector })
}

/// Start the HTTP server
pub async fn serve(connector: HubSpotConnector, port: u16) -> Result<()> {
    let app = router(connector);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting HTTP server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::config(format!("Failed to bind to port {port}: {e}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::config(format!("Server error: {e}")))?;

    Ok(())
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// All tables with their columns
async fn list_tables(State(state): State<AppState>) -> Response {
    match state.connector.tables().await {
        Ok(tables) => Json(ApiResponse::success(json!({
            "type": "TABLES",
            "tables": tables
        })))
        .into_response(),
        Err(e) => error_response(&e),
    }
}

/// One table with its columns
async fn get_table(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    match state.connector.table(&name).await {
        Ok(table) => Json(ApiResponse::success(table)).into_response(),
        Err(e) => error_response(&e),
    }
}

/// Rows of a table
///
/// Dropping the request drops the listing with it.
async fn list_rows(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<RowsQuery>,
) -> Response {
    let request = query.into_request();
    let cancel = CancellationToken::new();
    let mut rows = Vec::new();

    let result = state
        .connector
        .list(&name, &request, &cancel, &mut |row| rows.push(row))
        .await;

    match result {
        Ok(summary) => Json(ApiResponse::success(json!({
            "type": "ROWS",
            "table": name,
            "rows": rows,
            "summary": summary
        })))
        .into_response(),
        Err(e) => error_response(&e),
    }
}

/// One row by id
async fn get_row(
    State(state): State<AppState>,
    Path((name, id)): Path<(String, String)>,
    Query(query): Query<RowQuery>,
) -> Response {
    let columns = query.columns.as_deref().map(split_columns);
    match state.connector.get_selected(&name, &id, columns.as_deref()).await {
        Ok(Some(row)) => Json(ApiResponse::success(json!({
            "type": "ROW",
            "table": name,
            "row": row
        })))
        .into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<()>::error(format!("No {name} row with id '{id}'"))),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}

/// Map an error to a status code and JSON body
fn error_response(err: &Error) -> Response {
    let body = Json(ApiResponse::<()>::error(err.to_string()));

    if let Some(seconds) = err.retry_after() {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            [(header::RETRY_AFTER, seconds.to_string())],
            body,
        )
            .into_response();
    }

    let status = match err.root() {
        Error::TableNotFound { .. } | Error::NotFound { .. } => StatusCode::NOT_FOUND,
        Error::Auth { .. } | Error::TokenRefresh { .. } => StatusCode::UNAUTHORIZED,
        Error::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        e if e.is_config() => StatusCode::BAD_REQUEST,
        _ => StatusCode::BAD_GATEWAY,
    };
    (status, body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Credentials;
    use crate::config::ConnectionConfig;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn app(server: &MockServer) -> Router {
        let connector = HubSpotConnector::with_credentials(
            ConnectionConfig::with_private_app_token("pat").base_url(server.uri()),
            Credentials::PrivateAppToken("pat".to_string()),
        )
        .unwrap();
        router(connector)
    }

    async fn call(app: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, serde_json::from_slice(&bytes).unwrap())
    }

    async fn mount_contact_properties(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/crm/v3/properties/contact"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{"name": "email", "type": "string"}]
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_health() {
        let server = MockServer::start().await;
        let (status, _, body) = call(app(&server), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_list_rows() {
        let server = MockServer::start().await;
        mount_contact_properties(&server).await;

        Mock::given(method("GET"))
            .and(path("/crm/v3/objects/contact"))
            .and(query_param("limit", "2"))
            .and(query_param("archived", "false"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [
                    {"id": "1", "properties": {"email": "a@example.com"}},
                    {"id": "2", "properties": {"email": "b@example.com"}}
                ],
                "paging": {"next": {"after": "2"}}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (status, _, body) = call(
            app(&server),
            "/tables/hubspot_contact/rows?limit=2&columns=id,email",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["rows"][1]["email"], "b@example.com");
        assert_eq!(body["data"]["summary"]["stop"], "row_limit");
    }

    #[tokio::test]
    async fn test_missing_row_is_404() {
        let server = MockServer::start().await;
        mount_contact_properties(&server).await;

        Mock::given(method("GET"))
            .and(path("/crm/v3/objects/contact/404"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let (status, _, body) = call(app(&server), "/tables/contact/rows/404").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_get_row_with_columns() {
        let server = MockServer::start().await;
        mount_contact_properties(&server).await;

        Mock::given(method("GET"))
            .and(path("/crm/v3/objects/contact/12"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "12",
                "properties": {"email": "c@example.com"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (status, _, body) =
            call(app(&server), "/tables/contact/rows/12?columns=id,email").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["data"]["row"],
            json!({"id": "12", "email": "c@example.com"})
        );
    }

    #[tokio::test]
    async fn test_unknown_table_is_404() {
        let server = MockServer::start().await;
        let (status, _, _) = call(app(&server), "/tables/hubspot_widget/rows").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_rate_limit_is_429_with_retry_after() {
        let server = MockServer::start().await;
        mount_contact_properties(&server).await;

        Mock::given(method("GET"))
            .and(path("/crm/v3/objects/contact"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "4"))
            .mount(&server)
            .await;

        let (status, headers, _) = call(app(&server), "/tables/contact/rows").await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(headers[header::RETRY_AFTER], "4");
    }

    #[test]
    fn test_rows_query_columns() {
        let query = RowsQuery {
            archived: true,
            limit: Some(3),
            columns: Some("id, email,,".to_string()),
        };
        let request = query.into_request();
        assert!(request.archived);
        assert_eq!(request.limit, Some(3));
        assert_eq!(
            request.columns,
            Some(vec!["id".to_string(), "email".to_string()])
        );
    }
}
