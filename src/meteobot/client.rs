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

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use std::error;
use std::fmt;

#[derive(Debug)]
pub enum FetchError {
    /// No API key configured. Raised before any network call is attempted.
    MissingApiKey,
    /// The API answered with a non-success status.
    Api(StatusCode),
    /// Transport failure, timeout, or a body that did not decode as JSON.
    Network(reqwest::Error),
    /// The JSON decoded but a required field was absent.
    Malformed(&'static str),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingApiKey => write!(f, "weather API key is not configured"),
            Self::Api(status) => write!(f, "unexpected status {} from weather API", status),
            Self::Network(e) => write!(f, "{}", e),
            Self::Malformed(field) => write!(f, "malformed weather response, missing {}", field),
        }
    }
}

impl error::Error for FetchError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Network(e) => Some(e),
            _ => None,
        }
    }
}

/// Current conditions for one location, reduced to what the bulletin needs.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReading {
    pub temperature_c: f64,
    /// Provider-supplied free text, localized ("ciel dégagé", "pluie légère", ...).
    pub description: String,
}

/// Client for the OpenWeather current-conditions endpoint.
#[derive(Debug)]
pub struct OpenWeatherClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl OpenWeatherClient {
    const UNITS: &'static str = "metric";
    const LANG: &'static str = "fr";

    pub fn new(client: Client, base_url: &str, api_key: &str) -> Self {
        OpenWeatherClient {
            client,
            base_url: Url::parse(base_url).expect("invalid weather API base URL"),
            api_key: api_key.to_owned(),
        }
    }

    /// Fetch current conditions for a location by name.
    pub async fn current(&self, location: &str) -> Result<WeatherReading, FetchError> {
        if self.api_key.is_empty() {
            return Err(FetchError::MissingApiKey);
        }

        let request_url = self.current_url(location);
        tracing::debug!(message = "making current conditions request", location = %location);

        let res = self
            .client
            .get(request_url)
            .send()
            .await
            .map_err(FetchError::Network)?;

        let status = res.status();
        if !status.is_success() {
            return Err(FetchError::Api(status));
        }

        let conditions = res
            .json::<CurrentConditions>()
            .await
            .map_err(FetchError::Network)?;

        let description = conditions
            .weather
            .into_iter()
            .next()
            .map(|w| w.description)
            .ok_or(FetchError::Malformed("weather[0].description"))?;

        Ok(WeatherReading {
            temperature_c: conditions.main.temp,
            description,
        })
    }

    fn current_url(&self, location: &str) -> Url {
        let encoded_location = utf8_percent_encode(location, NON_ALPHANUMERIC);
        let mut url = self.base_url.clone();
        {
            url.path_segments_mut()
                .map(|mut p| {
                    p.clear().push("data").push("2.5").push("weather");
                })
                .expect("unable to modify weather URL path segments");
        }
        url.set_query(Some(&format!(
            "q={}&appid={}&units={}&lang={}",
            encoded_location,
            self.api_key,
            Self::UNITS,
            Self::LANG,
        )));

        url
    }
}

#[derive(Deserialize, Debug)]
struct CurrentConditions {
    #[serde(alias = "main")]
    main: MainConditions,
    #[serde(alias = "weather")]
    weather: Vec<WeatherCondition>,
}

#[derive(Deserialize, Debug)]
struct MainConditions {
    #[serde(alias = "temp")]
    temp: f64,
}

#[derive(Deserialize, Debug)]
struct WeatherCondition {
    #[serde(alias = "description")]
    description: String,
}

#[cfg(test)]
mod tests {
    use super::{FetchError, OpenWeatherClient};
    use reqwest::{Client, StatusCode};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(base_url: &str, api_key: &str) -> OpenWeatherClient {
        OpenWeatherClient::new(Client::new(), base_url, api_key)
    }

    #[tokio::test]
    async fn missing_api_key_short_circuits() {
        // port 9 is the discard service: any attempted request would hang or fail,
        // a config error must surface before that
        let client = client_for("http://127.0.0.1:9/", "");
        match client.current("Sainte-Croix").await {
            Err(FetchError::MissingApiKey) => {}
            other => panic!("expected MissingApiKey, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn current_extracts_temperature_and_description() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("q", "Sainte-Croix"))
            .and(query_param("units", "metric"))
            .and(query_param("lang", "fr"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "main": { "temp": 22.0, "humidity": 40 },
                "weather": [ { "id": 800, "description": "ciel dégagé" } ],
                "name": "Sainte-Croix"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server.uri(), "test-key");
        let reading = client.current("Sainte-Croix").await.unwrap();
        assert_eq!(reading.temperature_c, 22.0);
        assert_eq!(reading.description, "ciel dégagé");
    }

    #[tokio::test]
    async fn non_success_status_is_an_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = client_for(&server.uri(), "bad-key");
        match client.current("Sainte-Croix").await {
            Err(FetchError::Api(status)) => assert_eq!(status, StatusCode::UNAUTHORIZED),
            other => panic!("expected Api(401), got {:?}", other),
        }
    }

    #[tokio::test]
    async fn server_error_carries_exact_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = client_for(&server.uri(), "test-key");
        match client.current("Sainte-Croix").await {
            Err(FetchError::Api(status)) => assert_eq!(status.as_u16(), 503),
            other => panic!("expected Api(503), got {:?}", other),
        }
    }

    #[tokio::test]
    async fn empty_weather_array_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "main": { "temp": 5.5 },
                "weather": []
            })))
            .mount(&server)
            .await;

        let client = client_for(&server.uri(), "test-key");
        match client.current("Sainte-Croix").await {
            Err(FetchError::Malformed(field)) => assert_eq!(field, "weather[0].description"),
            other => panic!("expected Malformed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn non_json_body_is_a_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server.uri(), "test-key");
        match client.current("Sainte-Croix").await {
            Err(FetchError::Network(_)) => {}
            other => panic!("expected Network, got {:?}", other),
        }
    }

    #[test]
    fn url_carries_encoded_location_and_credentials() {
        let client = client_for("http://localhost:8080/", "k123");
        let url = client.current_url("Sainte-Croix");
        assert_eq!(url.path(), "/data/2.5/weather");
        let query = url.query().unwrap();
        assert!(query.contains("q=Sainte%2DCroix"));
        assert!(query.contains("appid=k123"));
        assert!(query.contains("units=metric"));
        assert!(query.contains("lang=fr"));
    }
}
