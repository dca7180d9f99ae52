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

//! Assembles the bulletin posted to the channel: fetch, advise, format.
//!
//! Fetch failures never escape this module. They become the bulletin body
//! itself, in the same user-facing French the bot has always spoken, so the
//! reader of the channel (or of `GET /weather`) sees what went wrong.

use crate::advice::{self, AdviceResult};
use crate::client::{FetchError, OpenWeatherClient, WeatherReading};
use crate::metrics::BotMetrics;

/// Fetch current conditions and produce the bulletin for them, or the
/// user-facing error message when the fetch fails.
pub async fn current_bulletin(
    weather: &OpenWeatherClient,
    location: &str,
    metrics: &BotMetrics,
) -> String {
    match weather.current(location).await {
        Ok(reading) => {
            metrics.fetch_succeeded();
            let advice = advice::select_advice(reading.temperature_c, &reading.description);
            format_bulletin(location, &reading, &advice)
        }
        Err(e) => {
            metrics.fetch_failed();
            tracing::error!(message = "failed to fetch current conditions", location = %location, error = %e);
            fetch_failure_message(&e)
        }
    }
}

/// Render one reading plus its advice into the channel message.
pub fn format_bulletin(location: &str, reading: &WeatherReading, advice: &AdviceResult) -> String {
    format!(
        "☁️ **Météo à {}** ☁️\n🌡 Température : {:.1}°C\n{} {}\n👕 {}",
        location,
        reading.temperature_c,
        advice.emoji,
        capitalize(&reading.description),
        advice.advice,
    )
}

/// User-facing body for a failed fetch.
pub fn fetch_failure_message(error: &FetchError) -> String {
    match error {
        FetchError::MissingApiKey => "❌ Erreur : OPENWEATHER_API_KEY manquante.".to_owned(),
        FetchError::Api(status) => format!("❌ Erreur API météo ({}).", status.as_u16()),
        FetchError::Network(e) => format!("❌ Erreur réseau météo : {}", e),
        FetchError::Malformed(_) => "❌ Erreur réseau météo : réponse invalide.".to_owned(),
    }
}

/// Uppercase the first letter of a provider description ("ciel dégagé" ->
/// "Ciel dégagé").
fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
