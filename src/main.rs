use anyhow::Context;
use axum::{http::StatusCode, response::IntoResponse};
use dotenv::dotenv;

use route_table::{app::manifest, app::routes, compile, config::Config, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok(); // This line loads the environment variables from the ".env" file.
    telemetry::init();

    let config = Config::from_env()?;
    let manifest = manifest::load(&config.routes_file, &routes::registry())?;
    let table = compile(manifest.routes, &config.compile)
        .with_context(|| format!("compiling {}", config.routes_file.display()))?;

    let app = table.into_router().fallback(handler_404);
    let app = telemetry::with_cors(app, config.origins);
    let app = telemetry::with_http_tracing(app);

    let listener = tokio::net::TcpListener::bind(&config.service_addr)
        .await
        .with_context(|| format!("binding {}", config.service_addr))?;
    tracing::debug!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn handler_404() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "404")
}
