use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::{Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use crate::card::{FontBook, RenderRequest, render_png};

pub const CARD_ROUTE: &str = "/api/iqc";
pub const RENDER_FAILED: &str = "Rendering failed";

#[derive(Clone)]
pub struct AppState {
    fonts: Arc<FontBook>,
}

impl AppState {
    pub fn new(fonts: FontBook) -> Self {
        Self {
            fonts: Arc::new(fonts),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    details: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(CARD_ROUTE, any(handle_render))
        .with_state(state)
}

pub async fn run_http_server(state: AppState, bind: &str) -> Result<()> {
    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("failed to bind HTTP server to `{bind}`"))?;
    let local_addr = listener.local_addr().ok();

    info!(
        requested_bind = %bind,
        bound_addr = local_addr.map(|addr| addr.to_string()),
        font_faces = state.fonts.len(),
        route = CARD_ROUTE,
        "starting HTTP server"
    );

    serve(listener, state).await
}

pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    axum::serve(listener, router(state))
        .await
        .context("HTTP server exited with an error")
}

async fn handle_render(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let started = Instant::now();
    match render_card(&state, &params).await {
        Ok(png) => {
            debug!(
                bytes = png.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "rendered card"
            );
            (StatusCode::OK, [(header::CONTENT_TYPE, "image/png")], png).into_response()
        }
        Err(err) => {
            let details = error_details(&err);
            error!(error = %details, "card rendering failed");
            let body = ErrorBody {
                error: RENDER_FAILED,
                details,
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}

async fn render_card(state: &AppState, params: &HashMap<String, String>) -> Result<Vec<u8>> {
    let request = RenderRequest::from_query(params);
    let fonts = Arc::clone(&state.fonts);

    let png = tokio::task::spawn_blocking(move || render_png(&request, &fonts))
        .await
        .context("render task did not complete")??;
    Ok(png)
}

fn error_details(error: &anyhow::Error) -> String {
    error
        .chain()
        .map(std::string::ToString::to_string)
        .collect::<Vec<_>>()
        .join(": ")
}
