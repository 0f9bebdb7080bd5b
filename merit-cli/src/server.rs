pub mod archive;
mod error;
pub mod payload;

use std::{any::Any, sync::Arc, time::Duration};

use axum::{
    Json,
    Router,
    body::Bytes,
    extract::State,
    response::{IntoResponse, Response},
    routing::post,
};
use merit_quantities::emission::EmissionIntensity;
use tower_http::{catch_panic::CatchPanicLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::{
    core::plan::ProductionPlan,
    prelude::*,
    server::{archive::Archive, error::ApiError, payload::Payload},
};

pub struct AppState {
    pub emission_factor: EmissionIntensity,
    pub archive: Option<Archive>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/productionplan", post(post_production_plan))
        .with_state(Arc::new(state))
        .layer((
            TraceLayer::new_for_http(),
            TimeoutLayer::new(Duration::from_secs(10)),
            CatchPanicLayer::custom(handle_panic),
        ))
}

/// Per <https://github.com/tokio-rs/axum/blob/main/examples/graceful-shutdown/src/main.rs>.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}

#[instrument(skip_all)]
async fn post_production_plan(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ProductionPlan>, ApiError> {
    info!(n_bytes = body.len(), "received the payload");
    let payload = Payload::from_slice(&body).inspect_err(|error| warn!("{error}"))?;
    info!(load = %payload.load, n_powerplants = payload.units.len(), "validated the payload");

    let plan = payload
        .dispatcher(state.emission_factor)
        .dispatch()
        .inspect_err(|error| warn!("{error}"))?;
    info!(total = %plan.total(), "dispatched");

    if let Some(archive) = &state.archive {
        archive.store(&plan).await;
    }
    Ok(Json(plan))
}

fn handle_panic(_: Box<dyn Any + Send + 'static>) -> Response {
    error!("the request handler panicked");
    ApiError::Internal.into_response()
}
