// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! API documentation
//!
//! Aggregates the annotated handler paths and response schemas into an
//! `OpenAPI` document, and serves it as JSON alongside a minimal
//! Swagger UI page.

use axum::{Json, response::Html};
use utoipa::OpenApi;

/// Swagger UI asset release served from the unpkg CDN
const SWAGGER_UI_DIST_VERSION: &str = "5.17.14";

/// `OpenAPI` documentation for the listing API
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "Marketplace Listing API",
        description = "Read API over indexer-populated NFT marketplace event tables",
        license(name = "Apache-2.0")
    ),
    paths(
        crate::routes::handlers::ping_handler,
        crate::routes::handlers::listings_handler,
        crate::routes::handlers::health_handler,
    ),
    components(schemas(
        listings::ListingEvent,
        crate::routes::handlers::PingResponse,
        crate::state::HealthCheck,
        crate::state::HealthStatus,
    )),
    tags(
        (name = "listings", description = "Marketplace listing state"),
        (name = "health", description = "Liveness and health reporting")
    )
)]
pub struct ApiDoc;

/// `OpenAPI` specification endpoint
pub async fn openapi_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Swagger UI endpoint
///
/// Renders a static page that loads the pinned `swagger-ui-dist` assets
/// and points them at [`openapi_spec`].
pub async fn swagger_ui() -> Html<String> {
    let html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Marketplace Listing API</title>
    <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@{SWAGGER_UI_DIST_VERSION}/swagger-ui.css" />
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@{SWAGGER_UI_DIST_VERSION}/swagger-ui-bundle.js"></script>
    <script>
        window.onload = () => {{
            SwaggerUIBundle({{
                url: '/api-doc/openapi.json',
                dom_id: '#swagger-ui',
                deepLinking: true,
            }});
        }};
    </script>
</body>
</html>
"#
    );
    Html(html)
}
