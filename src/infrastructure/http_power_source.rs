// HTTP data source for the power metering backend
use crate::application::data_source::{FetchRequest, PowerDataSource};
use crate::domain::series::{Series, Timestamp};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpPowerSource {
    base_url: String,
    client: reqwest::Client,
}

/// Backend payload: metric name to its series.
type PowerPayload = BTreeMap<String, RawSeries>;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawSeries {
    Columns {
        timestamps: Vec<RawTimestamp>,
        values: Vec<f64>,
    },
    Points(Vec<RawPoint>),
}

#[derive(Debug, Deserialize)]
struct RawPoint {
    timestamp: RawTimestamp,
    value: f64,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Millis(i64),
    Text(String),
}

impl RawTimestamp {
    fn to_millis(&self) -> Option<Timestamp> {
        match self {
            RawTimestamp::Millis(ms) => Some(*ms),
            RawTimestamp::Text(text) => {
                if let Ok(time) = chrono::DateTime::parse_from_rfc3339(text) {
                    return Some(time.timestamp_millis());
                }
                // Naive ISO timestamps are taken as UTC
                chrono::NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|time| time.and_utc().timestamp_millis())
            }
        }
    }
}

impl RawSeries {
    fn into_series(self, name: String) -> Series {
        let pairs: Vec<(&RawTimestamp, f64)> = match &self {
            RawSeries::Columns { timestamps, values } => {
                timestamps.iter().zip(values.iter().copied()).collect()
            }
            RawSeries::Points(points) => points.iter().map(|p| (&p.timestamp, p.value)).collect(),
        };

        let mut timestamps = Vec::with_capacity(pairs.len());
        let mut values = Vec::with_capacity(pairs.len());
        for (raw, value) in pairs {
            match raw.to_millis() {
                Some(ms) => {
                    timestamps.push(ms);
                    values.push(value);
                }
                None => tracing::debug!("Skipping point with unreadable timestamp in {}", name),
            }
        }

        Series::new(name, timestamps, values)
    }
}

impl HttpPowerSource {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn build_data_url(&self, request: FetchRequest) -> String {
        let (start, end) = request.bounds();
        let params: Vec<String> = [("start", start), ("end", end)]
            .into_iter()
            .filter_map(|(key, bound)| {
                bound.map(|ms| format!("{}={}", key, urlencoding::encode(&ms.to_string())))
            })
            .collect();

        if params.is_empty() {
            format!("{}/data", self.base_url)
        } else {
            format!("{}/data?{}", self.base_url, params.join("&"))
        }
    }

    fn decode(payload: PowerPayload) -> Vec<Series> {
        payload
            .into_iter()
            .map(|(name, raw)| raw.into_series(name))
            .collect()
    }
}

#[async_trait]
impl PowerDataSource for HttpPowerSource {
    async fn fetch(&self, request: FetchRequest) -> Result<Vec<Series>> {
        let url = self.build_data_url(request);
        tracing::debug!("Fetching power data: {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .context("Failed to send request to power backend")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Power backend request failed with status {}: {}", status, body);
        }

        let payload = response
            .json::<PowerPayload>()
            .await
            .context("Failed to parse power backend response")?;

        let series = Self::decode(payload);
        tracing::debug!(
            "Fetched {} series, {} points",
            series.len(),
            series.iter().map(|s| s.timestamps.len()).sum::<usize>()
        );
        Ok(series)
    }
}
