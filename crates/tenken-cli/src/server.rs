use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Multipart, Query, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Local;
use serde::Deserialize;
use serde_json::json;
use tenken_core::analysis::build_analyzer;
use tenken_core::config::AnalyzerConfig;
use tenken_core::delivery::{content_disposition, report_filename, HTML_CONTENT_TYPE};
use tenken_core::error::TenkenError;
use tenken_core::extraction::PdfExtractor;
use tenken_core::lexicon::schema::KeywordLexicon;
use tenken_core::model::{Document, Report, ReportMeta};
use tenken_core::report::html::render_html;
use tenken_core::tickets::{load_tickets, TableFormat};
use tenken_core::{generate_report, ReportRequest};

/// Upload limit for one request, covering the ticket sheet and all PDFs.
pub const MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// Read-only settings shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AnalyzerConfig>,
    pub lexicon: Arc<KeywordLexicon>,
    pub extractor: Arc<dyn PdfExtractor>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(upload_form))
        .route("/report", post(create_report))
        .route("/health", get(|| async { "ok" }))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> Result<(), TenkenError> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        ai = state.config.uses_ai(),
        backend = state.extractor.backend_name(),
        "upload form listening"
    );
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {e}");
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        ApiError {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        ApiError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<TenkenError> for ApiError {
    fn from(e: TenkenError) -> Self {
        if e.is_input_error() {
            ApiError::bad_request(e.to_string())
        } else {
            ApiError::internal(e.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, "{}", self.message);
        } else {
            tracing::warn!(status = %self.status, "{}", self.message);
        }
        (self.status, Json(json!({"error": self.message}))).into_response()
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn upload_form() -> Html<&'static str> {
    Html(UPLOAD_PAGE_HTML)
}

#[derive(Debug, Default, Deserialize)]
struct ReportQuery {
    download: Option<String>,
}

/// Multipart fields of a report request.
#[derive(Debug, Default)]
struct ReportForm {
    tickets: Option<(String, Vec<u8>)>,
    documents: Vec<Document>,
    month: String,
    property: String,
    client: String,
    download: bool,
}

async fn read_form(multipart: &mut Multipart) -> Result<ReportForm, ApiError> {
    let mut form = ReportForm::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return Err(ApiError {
                    status: e.status(),
                    message: e.body_text(),
                })
            }
        };
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "tickets" | "documents" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("failed to read {name}: {e}")))?;
                // Browsers send an empty part for an untouched file input.
                if filename.is_empty() && bytes.is_empty() {
                    continue;
                }
                if filename.trim().is_empty() {
                    return Err(ApiError::bad_request(format!(
                        "uploaded {name} file has no file name"
                    )));
                }
                if name == "tickets" {
                    form.tickets = Some((filename, bytes.to_vec()));
                } else {
                    form.documents.push(Document {
                        filename,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            "month" | "property" | "client" | "download" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("failed to read {name}: {e}")))?;
                let value = value.trim().to_string();
                match name.as_str() {
                    "month" => form.month = value,
                    "property" => form.property = value,
                    "client" => form.client = value,
                    _ => form.download = is_truthy(&value),
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "on" | "yes")
}

async fn create_report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let form = read_form(&mut multipart).await?;
    let download = form.download || query.download.as_deref().is_some_and(is_truthy);

    let (tickets_name, tickets_bytes) = form
        .tickets
        .ok_or_else(|| ApiError::bad_request("a ticket file (field 'tickets') is required"))?;
    let format = TableFormat::from_filename(&tickets_name)?;

    let meta = ReportMeta {
        month: form.month,
        property: form.property,
        client: form.client,
    };
    let documents = form.documents;

    tracing::info!(
        tickets = %tickets_name,
        documents = documents.len(),
        download,
        "report requested"
    );

    // The analyzer may hold a blocking HTTP client, so it is built and
    // dropped on the blocking pool together with the rest of the run.
    let report = tokio::task::spawn_blocking(move || -> Result<Report, TenkenError> {
        let tickets = load_tickets(&tickets_bytes, format)?;
        let analyzer = build_analyzer(&state.config, state.lexicon.as_ref().clone())?;
        Ok(generate_report(
            ReportRequest {
                meta,
                tickets,
                documents,
            },
            state.extractor.as_ref(),
            analyzer.as_ref(),
        ))
    })
    .await
    .map_err(|e| ApiError::internal(format!("report task failed: {e}")))??;

    let html = render_html(&report, &Local::now());
    let mut response = (
        [(header::CONTENT_TYPE, HeaderValue::from_static(HTML_CONTENT_TYPE))],
        html,
    )
        .into_response();

    if download {
        let disposition = content_disposition(&report_filename(&report.meta));
        let value = HeaderValue::from_str(&disposition)
            .map_err(|e| ApiError::internal(format!("invalid download header: {e}")))?;
        response
            .headers_mut()
            .insert(header::CONTENT_DISPOSITION, value);
    }

    Ok(response)
}

const UPLOAD_PAGE_HTML: &str = r#"<!DOCTYPE html>
<html lang="ja">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>月次報告書作成</title>
<style>
body { font-family: "Hiragino Kaku Gothic ProN", "Noto Sans JP", Meiryo, sans-serif; background: #f5f6f8; margin: 0; padding: 24px; color: #222; }
form { max-width: 640px; margin: 0 auto; background: #fff; padding: 32px; border-radius: 8px; box-shadow: 0 1px 4px rgba(0,0,0,.08); }
h1 { font-size: 22px; color: #2c5282; margin-top: 0; }
label { display: block; margin: 16px 0 4px; font-weight: bold; font-size: 14px; }
input[type=text], input[type=file] { width: 100%; box-sizing: border-box; padding: 8px; }
.hint { font-size: 12px; color: #718096; }
.actions { margin-top: 24px; display: flex; gap: 12px; }
button { flex: 1; padding: 12px; font-size: 15px; border: 0; border-radius: 6px; cursor: pointer; color: #fff; background: #2c5282; }
button.secondary { background: #4a5568; }
</style>
</head>
<body>
<form method="post" action="/report" enctype="multipart/form-data">
<h1>月次報告書作成</h1>
<label for="tickets">チケット一覧 (CSV / Excel)</label>
<input type="file" id="tickets" name="tickets" accept=".csv,.xlsx,.xls,.ods" required>
<label for="documents">点検報告書 PDF (複数可)</label>
<input type="file" id="documents" name="documents" accept=".pdf" multiple>
<div class="hint">チケットの「対象ファイル」列とファイル名が一致するものを照合します。</div>
<label for="month">対象月</label>
<input type="text" id="month" name="month" placeholder="2025年8月" required>
<label for="property">物件名</label>
<input type="text" id="property" name="property" required>
<label for="client">宛先 (任意)</label>
<input type="text" id="client" name="client">
<div class="actions">
<button type="submit" name="download" value="0">表示</button>
<button type="submit" name="download" value="1" class="secondary">ダウンロード</button>
</div>
</form>
</body>
</html>
"#;
