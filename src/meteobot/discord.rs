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

//! Thin client for the few Discord REST calls the bot needs, plus the
//! background worker that owns bulletin delivery.

use crate::metrics::BotMetrics;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::error;
use std::fmt;
use tokio::sync::mpsc;

/// Channel id sentinel meaning "no destination configured".
pub const UNCONFIGURED_CHANNEL: u64 = 0;

/// Bulletins queued for delivery while the worker is busy; beyond this the
/// newest bulletin is dropped with a warning.
const DELIVERY_QUEUE_DEPTH: usize = 16;

#[derive(Debug)]
pub enum DeliveryError {
    /// The API rejected the bot token.
    InvalidToken,
    /// The channel does not exist or the bot cannot see it.
    UnknownChannel(u64),
    Unexpected(StatusCode),
    Network(reqwest::Error),
}

impl fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidToken => write!(f, "discord rejected the bot token"),
            Self::UnknownChannel(id) => write!(f, "unknown channel {}", id),
            Self::Unexpected(status) => write!(f, "unexpected status {} from discord", status),
            Self::Network(e) => write!(f, "{}", e),
        }
    }
}

impl error::Error for DeliveryError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Network(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DiscordClient {
    client: Client,
    base_url: Url,
    token: String,
}

impl DiscordClient {
    pub const DEFAULT_API_URL: &'static str = "https://discord.com/api/v10/";

    pub fn new(client: Client, base_url: &str, token: &str) -> Self {
        DiscordClient {
            client,
            base_url: Url::parse(base_url).expect("invalid discord API base URL"),
            token: token.to_owned(),
        }
    }

    /// Identify the bot account behind the token. Used once at startup to
    /// verify the token before running indefinitely.
    pub async fn current_user(&self) -> Result<CurrentUser, DeliveryError> {
        let url = self.api_url(&["users", "@me"]);
        tracing::debug!(message = "making identity request");

        let res = self
            .client
            .get(url)
            .header(AUTHORIZATION, self.auth())
            .send()
            .await
            .map_err(DeliveryError::Network)?;

        let status = res.status();
        if status.is_success() {
            res.json::<CurrentUser>().await.map_err(DeliveryError::Network)
        } else if status == StatusCode::UNAUTHORIZED {
            Err(DeliveryError::InvalidToken)
        } else {
            Err(DeliveryError::Unexpected(status))
        }
    }

    /// Look a channel up by id, confirming the bot can see it.
    pub async fn channel(&self, id: u64) -> Result<Channel, DeliveryError> {
        let url = self.api_url(&["channels", &id.to_string()]);
        tracing::debug!(message = "making channel lookup request", channel = id);

        let res = self
            .client
            .get(url)
            .header(AUTHORIZATION, self.auth())
            .send()
            .await
            .map_err(DeliveryError::Network)?;

        let status = res.status();
        if status.is_success() {
            res.json::<Channel>().await.map_err(DeliveryError::Network)
        } else if status == StatusCode::UNAUTHORIZED {
            Err(DeliveryError::InvalidToken)
        } else if status == StatusCode::NOT_FOUND {
            Err(DeliveryError::UnknownChannel(id))
        } else {
            Err(DeliveryError::Unexpected(status))
        }
    }

    /// Post a message to a channel.
    pub async fn send_message(&self, channel: u64, content: &str) -> Result<(), DeliveryError> {
        let url = self.api_url(&["channels", &channel.to_string(), "messages"]);
        tracing::debug!(message = "making send message request", channel = channel);

        let res = self
            .client
            .post(url)
            .header(AUTHORIZATION, self.auth())
            .json(&CreateMessage { content })
            .send()
            .await
            .map_err(DeliveryError::Network)?;

        let status = res.status();
        if status.is_success() {
            Ok(())
        } else if status == StatusCode::UNAUTHORIZED {
            Err(DeliveryError::InvalidToken)
        } else {
            Err(DeliveryError::Unexpected(status))
        }
    }

    fn auth(&self) -> String {
        format!("Bot {}", self.token)
    }

    fn api_url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        {
            url.path_segments_mut()
                .map(|mut p| {
                    p.pop_if_empty();
                    for segment in segments {
                        p.push(segment);
                    }
                })
                .expect("unable to modify discord URL path segments");
        }

        url
    }
}

#[derive(Serialize, Debug)]
struct CreateMessage<'a> {
    content: &'a str,
}

#[derive(Deserialize, Debug)]
pub struct CurrentUser {
    #[serde(alias = "id")]
    pub id: String,
    #[serde(alias = "username")]
    pub username: String,
}

#[derive(Deserialize, Debug)]
pub struct Channel {
    #[serde(alias = "id")]
    pub id: String,
    #[serde(alias = "name")]
    pub name: Option<String>,
}

/// Cheap handle given to anything that produces bulletins. Enqueueing never
/// blocks and never fails the caller.
#[derive(Debug, Clone)]
pub struct NotifierHandle {
    tx: mpsc::Sender<String>,
}

impl NotifierHandle {
    pub fn notify(&self, bulletin: String) {
        if let Err(e) = self.tx.try_send(bulletin) {
            tracing::warn!(message = "dropping bulletin, delivery queue unavailable", error = %e);
        }
    }
}

/// Background worker that owns the Discord client and the destination
/// channel. Failures are logged and swallowed; delivery never crashes the
/// process.
#[derive(Debug)]
pub struct Notifier {
    client: DiscordClient,
    channel_id: u64,
    metrics: BotMetrics,
    rx: mpsc::Receiver<String>,
}

impl Notifier {
    pub fn new(client: DiscordClient, channel_id: u64, metrics: BotMetrics) -> (Self, NotifierHandle) {
        let (tx, rx) = mpsc::channel(DELIVERY_QUEUE_DEPTH);
        (
            Notifier {
                client,
                channel_id,
                metrics,
                rx,
            },
            NotifierHandle { tx },
        )
    }

    /// Drain the queue until every handle is dropped.
    pub async fn run(mut self) {
        while let Some(bulletin) = self.rx.recv().await {
            match self.deliver(&bulletin).await {
                Ok(()) => self.metrics.bulletin_delivered(),
                Err(e) => {
                    self.metrics.delivery_failed();
                    tracing::error!(message = "failed to deliver bulletin", error = %e);
                }
            }
        }
    }

    async fn deliver(&self, bulletin: &str) -> Result<(), DeliveryError> {
        if self.channel_id == UNCONFIGURED_CHANNEL {
            tracing::warn!(message = "no channel configured, skipping bulletin delivery");
            return Ok(());
        }

        self.client.channel(self.channel_id).await?;
        self.client.send_message(self.channel_id, bulletin).await?;
        tracing::info!(message = "bulletin delivered", channel = self.channel_id);
        Ok(())
    }
}
