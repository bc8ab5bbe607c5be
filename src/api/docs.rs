//! Human-readable API reference

use axum::response::{Html, Redirect};

const API_DOCS: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>s3-image-bridge API</title>
</head>
<body>
  <h1>s3-image-bridge API</h1>

  <h2>GET /health</h2>
  <p>Lists buckets on the storage backend to confirm it is reachable.</p>
  <pre>200 {"status": "healthy", "aws_configured": true, "s3_bucket": "...", "aws_region": "..."}
500 {"status": "unhealthy", "error": "...", "aws_configured": false, "s3_bucket": "...", "aws_region": "..."}</pre>

  <h2>POST /upload-image</h2>
  <p>Stores a base64-encoded image as <code>&lt;uuid&gt;.png</code> with content type <code>image/png</code>.</p>
  <pre>request  {"image": "&lt;base64&gt;"}
200      {"success": true, "url": "https://&lt;bucket&gt;.s3.amazonaws.com/&lt;uuid&gt;.png"}
400/500  {"detail": "..."}</pre>

  <h2>GET /metrics</h2>
  <p>Prometheus metrics.</p>
</body>
</html>
"#;

/// GET /
pub async fn root() -> Redirect {
    Redirect::temporary("/docs")
}

/// GET /docs
pub async fn api_docs() -> Html<&'static str> {
    Html(API_DOCS)
}
