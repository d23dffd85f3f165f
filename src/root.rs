//! The root!
//!
//! A small status page, showing the service is up

use axum::Extension;
use axum::response::Html;
use chrono::Local;

/// Port the server listens on, shown on the status page
#[derive(Clone, Copy, Debug)]
pub struct ListenPort(pub u16);

/// The root!
///
/// Renders the status page with the port and the current local time
pub async fn root(Extension(ListenPort(port)): Extension<ListenPort>) -> Html<String> {
    let current_time = Local::now().format("%Y-%m-%d %H:%M:%S");

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>Destination catalog</title></head>
<body>
<h1>Destination catalog</h1>
<p>Server running on port {port}</p>
<p>Current time: {current_time}</p>
</body>
</html>
"#
    ))
}
