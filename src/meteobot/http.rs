// meteobot - Daily Discord weather bulletin with clothing advice
//
// Copyright 2025 The meteobot authors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.
//

//! HTTP surface of the bot.
//!
//! * `GET /` - fixed liveness body for platform health checks.
//! * `GET /weather` - returns the current bulletin and queues it for channel
//!   delivery without waiting on it.
//! * `GET /metrics` - OpenMetrics text exposition of the fetch/delivery
//!   counters.

use crate::client::OpenWeatherClient;
use crate::discord::NotifierHandle;
use crate::metrics::BotMetrics;
use crate::report;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use prometheus_client::encoding::text::encode;
use prometheus_client::registry::Registry;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

const INDEX_BODY: &str = "meteobot est en ligne !";
const OPENMETRICS_CONTENT_TYPE: &str = "application/openmetrics-text; version=1.0.0; charset=utf-8";

/// Everything a request handler needs, shared between the HTTP surface and
/// the scheduled job.
pub struct RequestContext {
    pub weather: OpenWeatherClient,
    pub location: String,
    pub notifier: NotifierHandle,
    pub metrics: BotMetrics,
    registry: Registry,
}

impl RequestContext {
    pub fn new(
        weather: OpenWeatherClient,
        location: String,
        notifier: NotifierHandle,
        metrics: BotMetrics,
        registry: Registry,
    ) -> Self {
        RequestContext {
            weather,
            location,
            notifier,
            metrics,
            registry,
        }
    }
}

/// Build the router over the shared context.
pub fn app(context: Arc<RequestContext>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/weather", get(weather))
        .route("/metrics", get(metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(context)
}

/// Liveness probe. No side effects, succeeds no matter what the weather API
/// or Discord are doing.
async fn index() -> &'static str {
    INDEX_BODY
}

/// On-demand trigger: fetch now, answer with the bulletin, and queue the same
/// bulletin for channel delivery. The response never waits on Discord.
async fn weather(State(context): State<Arc<RequestContext>>) -> String {
    let bulletin = report::current_bulletin(&context.weather, &context.location, &context.metrics).await;
    context.notifier.notify(bulletin.clone());
    bulletin
}

async fn metrics(State(context): State<Arc<RequestContext>>) -> Response {
    let mut buf = String::new();
    match encode(&mut buf, &context.registry) {
        Ok(()) => ([(header::CONTENT_TYPE, OPENMETRICS_CONTENT_TYPE)], buf).into_response(),
        Err(e) => {
            tracing::error!(message = "error encoding metrics", error = %e);
            StatusCode::SERVICE_UNAVAILABLE.into_response()
        }
    }
}
