//! Price-quote API client for the wallet dashboard.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use reqwest::Client as HttpClient;
use serde::Deserialize;

use crate::core::{DriveError, MarketConfig, Result};

/// Time span of a price chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartPeriod {
    Day,
    #[default]
    Week,
    Month,
    Quarter,
    Year,
}

impl ChartPeriod {
    pub const ALL: [ChartPeriod; 5] = [
        ChartPeriod::Day,
        ChartPeriod::Week,
        ChartPeriod::Month,
        ChartPeriod::Quarter,
        ChartPeriod::Year,
    ];

    pub fn days(&self) -> u32 {
        match self {
            ChartPeriod::Day => 1,
            ChartPeriod::Week => 7,
            ChartPeriod::Month => 30,
            ChartPeriod::Quarter => 90,
            ChartPeriod::Year => 365,
        }
    }

    /// Sampling interval requested from the API
    pub fn interval(&self) -> &'static str {
        if self.days() <= 1 {
            "hourly"
        } else {
            "daily"
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartPeriod::Day => "1d",
            ChartPeriod::Week => "7d",
            ChartPeriod::Month => "30d",
            ChartPeriod::Quarter => "90d",
            ChartPeriod::Year => "365d",
        }
    }
}

impl FromStr for ChartPeriod {
    type Err = DriveError;

    fn from_str(s: &str) -> Result<Self> {
        ChartPeriod::ALL
            .iter()
            .copied()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                DriveError::InvalidArgument(format!("Unknown chart period '{}' (use 1d, 7d, 30d, 90d or 365d)", s))
            })
    }
}

impl fmt::Display for ChartPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current price with its 24h change in percent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceQuote {
    pub price: f64,
    pub change_24h: f64,
}

/// One sample of a price chart
#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub at: DateTime<Utc>,
    pub price: f64,
    pub volume: f64,
}

impl PricePoint {
    /// Axis label appropriate for the chart period
    pub fn label(&self, period: ChartPeriod) -> String {
        let days = period.days();
        let fmt = if days == 1 {
            "%H:%M"
        } else if days <= 30 {
            "%b %-d"
        } else {
            "%b %Y"
        };
        self.at.format(fmt).to_string()
    }
}

#[derive(Debug, Deserialize)]
struct MarketChartResponse {
    prices: Vec<(f64, f64)>,
    #[serde(default)]
    total_volumes: Vec<(f64, f64)>,
}

/// Client for a CoinGecko-compatible price API
pub struct PriceClient {
    http: HttpClient,
    config: MarketConfig,
}

impl PriceClient {
    pub fn new(config: MarketConfig) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DriveError::Market(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> Result<T> {
        let resp = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| DriveError::Market(format!("Request to {} failed: {}", url, e)))?;

        if !resp.status().is_success() {
            return Err(DriveError::Market(format!("{} returned {}", url, resp.status())));
        }

        resp.json()
            .await
            .map_err(|e| DriveError::Market(format!("Response parse error from {}: {}", url, e)))
    }

    /// Current price of the configured asset
    pub async fn spot_price(&self) -> Result<PriceQuote> {
        let url = format!("{}/simple/price", self.config.api_url.trim_end_matches('/'));
        let body: HashMap<String, HashMap<String, f64>> = self
            .get_json(
                &url,
                &[
                    ("ids", self.config.asset.clone()),
                    ("vs_currencies", self.config.vs_currency.clone()),
                    ("include_24hr_change", "true".to_string()),
                ],
            )
            .await?;

        let fields = body
            .get(&self.config.asset)
            .ok_or_else(|| DriveError::Market(format!("No quote for {}", self.config.asset)))?;
        let price = *fields
            .get(&self.config.vs_currency)
            .ok_or_else(|| DriveError::Market(format!("No {} price for {}", self.config.vs_currency, self.config.asset)))?;
        let change_24h = fields
            .get(&format!("{}_24h_change", self.config.vs_currency))
            .copied()
            .unwrap_or(0.0);

        Ok(PriceQuote { price, change_24h })
    }

    /// Price history over `period`
    pub async fn market_chart(&self, period: ChartPeriod) -> Result<Vec<PricePoint>> {
        let url = format!(
            "{}/coins/{}/market_chart",
            self.config.api_url.trim_end_matches('/'),
            self.config.asset
        );
        let body: MarketChartResponse = self
            .get_json(
                &url,
                &[
                    ("vs_currency", self.config.vs_currency.clone()),
                    ("days", period.days().to_string()),
                    ("interval", period.interval().to_string()),
                ],
            )
            .await?;

        Ok(chart_points(&body))
    }
}

fn chart_points(body: &MarketChartResponse) -> Vec<PricePoint> {
    body.prices
        .iter()
        .enumerate()
        .filter_map(|(idx, (ms, price))| {
            let at = Utc.timestamp_millis_opt(*ms as i64).single()?;
            let volume = body.total_volumes.get(idx).map(|(_, v)| *v).unwrap_or(0.0);
            Some(PricePoint {
                at,
                price: *price,
                volume,
            })
        })
        .collect()
}
