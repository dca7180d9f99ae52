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

use chrono::Utc;
use chrono_tz::Tz;
use clap::Parser;
use meteobot::client::OpenWeatherClient;
use meteobot::discord::{DeliveryError, DiscordClient, Notifier, UNCONFIGURED_CHANNEL};
use meteobot::http::RequestContext;
use meteobot::metrics::BotMetrics;
use meteobot::report;
use meteobot::schedule::{self, DailySchedule};
use prometheus_client::registry::Registry;
use reqwest::Client;
use std::error::Error;
use std::io;
use std::net::SocketAddr;
use std::process;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal::unix::{self, SignalKind};
use tracing::Level;

const DEFAULT_LOG_LEVEL: Level = Level::INFO;
const DEFAULT_PORT: u16 = 10000;
const DEFAULT_LOCATION: &str = "Sainte-Croix";
const DEFAULT_TIMEZONE: &str = "Europe/Paris";
const DEFAULT_TIMEOUT_MILLIS: u64 = 10_000;
const DEFAULT_KEEPALIVE_SECS: u64 = 300;
const DEFAULT_WEATHER_API_URL: &str = "https://api.openweathermap.org/";

// The bulletin goes out with breakfast
const BULLETIN_HOUR: u32 = 6;
const BULLETIN_MINUTE: u32 = 40;

#[derive(Debug, Parser)]
#[clap(name = "meteobot", version = clap::crate_version!())]
struct MeteobotApplication {
    /// Discord bot token used to deliver bulletins. The process does not
    /// start without one.
    #[clap(long, env = "DISCORD_TOKEN", hide_env_values = true)]
    discord_token: String,

    /// OpenWeather API key. When empty, fetches produce a user-visible error
    /// bulletin instead of weather.
    #[clap(long, env = "OPENWEATHER_API_KEY", hide_env_values = true, default_value = "")]
    openweather_api_key: String,

    /// City the bulletin reports on
    #[clap(long, env = "METEOBOT_LOCATION", default_value_t = DEFAULT_LOCATION.into())]
    location: String,

    /// Discord channel that receives the daily bulletin. 0 leaves delivery
    /// unconfigured: bulletins are dropped with a logged warning.
    #[clap(long, env = "METEOBOT_CHANNEL_ID", default_value_t = UNCONFIGURED_CHANNEL)]
    channel_id: u64,

    /// HTTP listen port
    #[clap(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Timezone the daily schedule is anchored to
    #[clap(long, env = "METEOBOT_TIMEZONE", default_value = DEFAULT_TIMEZONE)]
    timezone: Tz,

    /// Public URL of this service. When set, it is pinged periodically so
    /// the hosting platform does not idle the process.
    #[clap(long, env = "METEOBOT_KEEPALIVE_URL")]
    keep_alive_url: Option<String>,

    /// Interval between keep-alive pings, in seconds
    #[clap(long, env = "METEOBOT_KEEPALIVE_SECS", default_value_t = DEFAULT_KEEPALIVE_SECS)]
    keep_alive_secs: u64,

    /// Timeout for fetching current conditions from the weather API, in
    /// milliseconds
    #[clap(long, env = "METEOBOT_TIMEOUT_MILLIS", default_value_t = DEFAULT_TIMEOUT_MILLIS)]
    timeout_millis: u64,

    /// Base URL for the OpenWeather API
    #[clap(long, default_value_t = DEFAULT_WEATHER_API_URL.into())]
    weather_api_url: String,

    /// Base URL for the Discord REST API
    #[clap(long, default_value_t = DiscordClient::DEFAULT_API_URL.into())]
    discord_api_url: String,

    /// Logging verbosity. Allowed values are 'trace', 'debug', 'info', 'warn', and 'error'
    /// (case insensitive)
    #[clap(long, env = "METEOBOT_LOG_LEVEL", default_value_t = DEFAULT_LOG_LEVEL)]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let opts = MeteobotApplication::parse();
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(opts.log_level)
            .finish(),
    )
    .expect("failed to set tracing subscriber");

    // Only the weather call is bounded; chat delivery carries no timeout.
    let timeout = Duration::from_millis(opts.timeout_millis);
    let weather_http = Client::builder().timeout(timeout).build().unwrap_or_else(|e| {
        tracing::error!(message = "unable to initialize HTTP client", error = %e);
        process::exit(1)
    });

    // Make an initial identity request. This verifies the configured token
    // against the Discord API before starting the HTTP server and running
    // indefinitely.
    let discord = DiscordClient::new(Client::new(), &opts.discord_api_url, &opts.discord_token);
    match discord.current_user().await {
        Err(DeliveryError::InvalidToken) => {
            tracing::error!(message = "discord rejected the configured token");
            process::exit(1)
        }
        Err(e) => {
            tracing::warn!(message = "failed to verify discord identity", error = %e);
        }
        Ok(user) => {
            tracing::info!(message = "connected to discord", username = %user.username, id = %user.id);
        }
    }

    if opts.channel_id == UNCONFIGURED_CHANNEL {
        tracing::warn!(message = "no channel configured, bulletins will not be delivered");
    }
    if opts.openweather_api_key.is_empty() {
        tracing::warn!(message = "no weather API key configured, bulletins will report the missing key");
    }

    let mut registry = Registry::default();
    let metrics = BotMetrics::new(&mut registry);
    let weather = OpenWeatherClient::new(
        weather_http.clone(),
        &opts.weather_api_url,
        &opts.openweather_api_key,
    );

    let (worker, notifier) = Notifier::new(discord, opts.channel_id, metrics.clone());
    tokio::spawn(worker.run());

    let context = Arc::new(RequestContext::new(
        weather,
        opts.location.clone(),
        notifier,
        metrics,
        registry,
    ));

    let daily = DailySchedule::new(opts.timezone, BULLETIN_HOUR, BULLETIN_MINUTE);
    let scheduled_context = context.clone();
    tokio::spawn(async move {
        tracing::info!(message = "daily bulletin scheduled", schedule = %daily);

        loop {
            let wait = daily.wait_from(Utc::now());
            tokio::time::sleep(wait).await;

            let bulletin = report::current_bulletin(
                &scheduled_context.weather,
                &scheduled_context.location,
                &scheduled_context.metrics,
            )
            .await;
            scheduled_context.notifier.notify(bulletin);
        }
    });

    if let Some(url) = opts.keep_alive_url.clone() {
        let period = Duration::from_secs(opts.keep_alive_secs);
        tokio::spawn(schedule::keep_alive(weather_http, url, period));
    }

    let bind: SocketAddr = ([0, 0, 0, 0], opts.port).into();
    let server = axum::Server::try_bind(&bind).unwrap_or_else(|e| {
        tracing::error!(message = "error binding to address", address = %bind, error = %e);
        process::exit(1)
    });

    tracing::info!(message = "server started", address = %bind);
    server
        .serve(meteobot::http::app(context).into_make_service())
        .with_graceful_shutdown(async {
            // Wait for either SIGTERM or SIGINT to shutdown
            tokio::select! {
                _ = sigterm() => {}
                _ = sigint() => {}
            }
        })
        .await?;

    tracing::info!("server shutdown");
    Ok(())
}

/// Return after the first SIGTERM signal received by this process
async fn sigterm() -> io::Result<()> {
    unix::signal(SignalKind::terminate())?.recv().await;
    Ok(())
}

/// Return after the first SIGINT signal received by this process
async fn sigint() -> io::Result<()> {
    unix::signal(SignalKind::interrupt())?.recv().await;
    Ok(())
}
