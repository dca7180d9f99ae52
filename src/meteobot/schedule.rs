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

use chrono::{DateTime, LocalResult, TimeZone, Utc};
use chrono_tz::Tz;
use reqwest::Client;
use std::fmt;
use std::time::Duration;

/// A fixed wall-clock time of day in a named civil timezone.
///
/// `next_after` is where DST lives: a wall time swallowed by a spring-forward
/// gap is skipped to the next day, and an ambiguous fall-back time resolves
/// to its earliest occurrence.
#[derive(Debug, Clone, Copy)]
pub struct DailySchedule {
    tz: Tz,
    hour: u32,
    minute: u32,
}

impl DailySchedule {
    /// # Panics
    ///
    /// If `hour` or `minute` do not form a valid wall-clock time.
    pub fn new(tz: Tz, hour: u32, minute: u32) -> Self {
        assert!(hour < 24 && minute < 60, "invalid wall clock time");
        DailySchedule { tz, hour, minute }
    }

    /// The first occurrence of the scheduled wall-clock time strictly after
    /// `now`.
    pub fn next_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let local_now = now.with_timezone(&self.tz);
        let mut date = local_now.date_naive();

        loop {
            let wall = date
                .and_hms_opt(self.hour, self.minute, 0)
                .expect("valid wall clock time");
            let candidate = match self.tz.from_local_datetime(&wall) {
                LocalResult::Single(dt) => Some(dt),
                LocalResult::Ambiguous(earliest, _) => Some(earliest),
                // the scheduled time falls into a DST gap on this date
                LocalResult::None => None,
            };

            if let Some(dt) = candidate {
                if dt > local_now {
                    return dt.with_timezone(&Utc);
                }
            }

            date = date.succ_opt().expect("date overflow");
        }
    }

    /// How long to sleep from `now` until the next occurrence.
    pub fn wait_from(&self, now: DateTime<Utc>) -> Duration {
        (self.next_after(now) - now).to_std().unwrap_or_default()
    }
}

impl fmt::Display for DailySchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02} {}", self.hour, self.minute, self.tz)
    }
}

/// Periodically GET the service's own public URL so the hosting platform
/// does not idle the process. Failures are logged; the loop never exits.
pub async fn keep_alive(client: Client, url: String, period: Duration) {
    let mut interval = tokio::time::interval(period);
    tracing::info!(message = "keep-alive pinging started", url = %url, period_secs = period.as_secs());

    loop {
        let _ = interval.tick().await;
        match client.get(&url).send().await {
            Ok(res) => {
                tracing::debug!(message = "keep-alive ping", status = %res.status());
            }
            Err(e) => {
                tracing::warn!(message = "keep-alive ping failed", error = %e);
            }
        }
    }
}
