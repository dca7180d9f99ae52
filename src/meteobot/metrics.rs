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

use prometheus_client::metrics::counter::Counter;
use prometheus_client::registry::Registry;

/// Counters for the two things the bot does: fetch weather and deliver
/// bulletins.
///
/// All metrics are created and registered upon call to `BotMetrics::new()`
/// and share the prefix `meteobot_`.
#[derive(Debug, Clone, Default)]
pub struct BotMetrics {
    fetches: Counter,
    fetch_failures: Counter,
    bulletins_delivered: Counter,
    delivery_failures: Counter,
}

impl BotMetrics {
    /// Create a new `BotMetrics` and register each metric with the provided
    /// `Registry`.
    pub fn new(registry: &mut Registry) -> Self {
        let metrics = BotMetrics::default();

        registry.register(
            "meteobot_weather_fetches",
            "Successful weather API fetches",
            metrics.fetches.clone(),
        );
        registry.register(
            "meteobot_weather_fetch_failures",
            "Weather API fetches that returned an error",
            metrics.fetch_failures.clone(),
        );
        registry.register(
            "meteobot_bulletins_delivered",
            "Bulletins delivered to the Discord channel",
            metrics.bulletins_delivered.clone(),
        );
        registry.register(
            "meteobot_delivery_failures",
            "Bulletin deliveries that failed",
            metrics.delivery_failures.clone(),
        );

        metrics
    }

    pub fn fetch_succeeded(&self) {
        self.fetches.inc();
    }

    pub fn fetch_failed(&self) {
        self.fetch_failures.inc();
    }

    pub fn bulletin_delivered(&self) {
        self.bulletins_delivered.inc();
    }

    pub fn delivery_failed(&self) {
        self.delivery_failures.inc();
    }

    pub fn delivered_count(&self) -> u64 {
        self.bulletins_delivered.get()
    }
}

#[cfg(test)]
mod tests {
    use super::BotMetrics;
    use prometheus_client::encoding::text::encode;
    use prometheus_client::registry::Registry;

    #[test]
    fn counters_appear_in_text_exposition() {
        let mut registry = Registry::default();
        let metrics = BotMetrics::new(&mut registry);

        metrics.fetch_succeeded();
        metrics.fetch_succeeded();
        metrics.fetch_failed();
        metrics.bulletin_delivered();

        let mut buf = String::new();
        encode(&mut buf, &registry).unwrap();

        assert!(buf.contains("meteobot_weather_fetches_total 2"));
        assert!(buf.contains("meteobot_weather_fetch_failures_total 1"));
        assert!(buf.contains("meteobot_bulletins_delivered_total 1"));
        assert!(buf.contains("meteobot_delivery_failures_total 0"));
    }

    #[test]
    fn clones_share_underlying_counters() {
        let metrics = BotMetrics::default();
        let clone = metrics.clone();
        clone.bulletin_delivered();
        assert_eq!(metrics.delivered_count(), 1);
    }
}
