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

//! Daily Discord weather bulletin with clothing advice
//!
//! ## Features
//!
//! `meteobot` fetches the current weather for a configured city from the
//! [OpenWeather] current-conditions API once per day (06:40, `Europe/Paris` by
//! default), turns the temperature and weather description into clothing
//! advice, and posts the resulting bulletin to a Discord channel. It also
//! exposes a small HTTP surface so the bot can run on hosting platforms that
//! expect a web service:
//!
//! * `GET /` - fixed liveness body, used by platform health checks.
//! * `GET /weather` - fetches and returns the current bulletin immediately,
//!   and queues the same bulletin for delivery to the Discord channel.
//! * `GET /metrics` - fetch/delivery counters in OpenMetrics text format.
//!
//! [OpenWeather]: https://openweathermap.org/current
//!
//! ## Configuration
//!
//! All configuration is sourced from the environment (or the matching CLI
//! flags, see `meteobot --help`):
//!
//! * `DISCORD_TOKEN` - bot token, required. The process exits at startup
//!   without it.
//! * `OPENWEATHER_API_KEY` - API key for OpenWeather. When absent, fetches
//!   produce a user-visible error bulletin instead of weather.
//! * `METEOBOT_LOCATION` - city to report on, `Sainte-Croix` by default.
//! * `METEOBOT_CHANNEL_ID` - Discord channel that receives the bulletin.
//!   `0` (the default) leaves delivery unconfigured; bulletins are then
//!   dropped with a logged warning.
//! * `PORT` - HTTP listen port, `10000` by default.
//! * `METEOBOT_KEEPALIVE_URL` - public URL of this service. When set, the bot
//!   pings it every five minutes so free hosting tiers do not idle the
//!   process.
//!
//! ## Run
//!
//! ```text
//! export DISCORD_TOKEN="..."
//! export OPENWEATHER_API_KEY="..."
//! export METEOBOT_CHANNEL_ID="1412736489892352093"
//! ./meteobot
//! ```
//!
//! The daily bulletin looks like this:
//!
//! ```text
//! ☁️ **Météo à Sainte-Croix** ☁️
//! 🌡 Température : 22.0°C
//! ☀️ Ciel dégagé
//! 👕 Lunettes de soleil 🕶️ et vêtements légers.
//! ```

pub mod advice;
pub mod client;
pub mod discord;
pub mod http;
pub mod metrics;
pub mod report;
pub mod schedule;
