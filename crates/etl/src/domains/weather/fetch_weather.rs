use async_trait::async_trait;
use futures::future::try_join;
use reqwest::{Client, Url};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use serde::Deserialize;
use slog::{debug, info, Logger};
use std::{sync::Arc, time::Duration};
use time::Date;

use crate::{
    freshness_boundary, parse_date, DateRange, Error, WeatherConfig, WeatherEndpoint, WeatherPlan,
};

/// Daily variables requested from both endpoints.
pub const DAILY_VARIABLES: &str = "temperature_2m_mean,precipitation_sum";

/// Parallel daily arrays as returned under the `daily` key of an Open-Meteo response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DailySeries {
    pub time: Vec<String>,
    pub temperature_2m_mean: Vec<Option<f64>>,
    pub precipitation_sum: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct OpenMeteoResponse {
    daily: DailySeries,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherObservation {
    pub date: Date,
    pub mean_temperature: Option<f64>,
    pub total_precipitation: Option<f64>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn fetch_daily(
        &self,
        endpoint: WeatherEndpoint,
        range: DateRange,
    ) -> Result<DailySeries, Error>;
}

pub struct OpenMeteoClient {
    logger: Logger,
    client: ClientWithMiddleware,
    config: WeatherConfig,
}

impl OpenMeteoClient {
    pub fn new(logger: Logger, config: WeatherConfig) -> Result<Self, Error> {
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        let client = ClientBuilder::new(
            Client::builder()
                .user_agent(config.user_agent.as_str())
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()?,
        )
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build();
        Ok(Self {
            logger,
            client,
            config,
        })
    }

    pub fn request_url(&self, endpoint: WeatherEndpoint, range: DateRange) -> Result<Url, Error> {
        let base = match endpoint {
            WeatherEndpoint::Archive => &self.config.archive_url,
            WeatherEndpoint::Forecast => &self.config.forecast_url,
        };
        let mut params = vec![
            ("latitude", self.config.latitude.to_string()),
            ("longitude", self.config.longitude.to_string()),
            ("start_date", range.start().to_string()),
            ("end_date", range.end().to_string()),
            ("daily", DAILY_VARIABLES.to_string()),
            ("timezone", self.config.timezone.clone()),
        ];
        if endpoint == WeatherEndpoint::Forecast {
            params.push(("past_days", String::from("0")));
        }
        Url::parse_with_params(base, &params)
            .map_err(|e| Error::Config(format!("invalid {} url '{}': {}", endpoint, base, e)))
    }
}

#[async_trait]
impl WeatherSource for OpenMeteoClient {
    async fn fetch_daily(
        &self,
        endpoint: WeatherEndpoint,
        range: DateRange,
    ) -> Result<DailySeries, Error> {
        let url = self.request_url(endpoint, range)?;
        debug!(self.logger, "requesting: {}", url);

        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            Error::UpstreamUnavailable {
                endpoint: url.to_string(),
                reason: e.to_string(),
            }
        })?;
        if !response.status().is_success() {
            return Err(Error::UpstreamUnavailable {
                endpoint: url.to_string(),
                reason: response.status().to_string(),
            });
        }

        let body: OpenMeteoResponse = response.json().await.map_err(|e| {
            Error::Schema(format!("{} response is not a daily series: {}", endpoint, e))
        })?;
        info!(
            self.logger,
            "fetched {} daily weather rows from {} for {}",
            body.daily.time.len(),
            endpoint,
            range
        );
        Ok(body.daily)
    }
}

/// Archive rows followed by forecast rows, as a new series.
pub fn merge_daily(archive: DailySeries, forecast: DailySeries) -> DailySeries {
    DailySeries {
        time: archive.time.into_iter().chain(forecast.time).collect(),
        temperature_2m_mean: archive
            .temperature_2m_mean
            .into_iter()
            .chain(forecast.temperature_2m_mean)
            .collect(),
        precipitation_sum: archive
            .precipitation_sum
            .into_iter()
            .chain(forecast.precipitation_sum)
            .collect(),
    }
}

/// Zips the parallel arrays into observations sorted by date.
pub fn normalize_weather(series: DailySeries) -> Result<Vec<WeatherObservation>, Error> {
    let len = series.time.len();
    if series.temperature_2m_mean.len() != len || series.precipitation_sum.len() != len {
        return Err(Error::Schema(format!(
            "weather arrays differ in length: time={}, temperature_2m_mean={}, precipitation_sum={}",
            len,
            series.temperature_2m_mean.len(),
            series.precipitation_sum.len()
        )));
    }

    let mut observations = series
        .time
        .iter()
        .zip(series.temperature_2m_mean)
        .zip(series.precipitation_sum)
        .map(|((time, mean_temperature), total_precipitation)| {
            let date = parse_date(time)
                .map_err(|_| Error::Schema(format!("weather time '{}' is not a date", time)))?;
            Ok(WeatherObservation {
                date,
                mean_temperature,
                total_precipitation,
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;
    observations.sort_by_key(|obs| obs.date);
    Ok(observations)
}

pub struct WeatherService {
    pub logger: Logger,
    pub source: Arc<dyn WeatherSource>,
}

impl WeatherService {
    pub fn new(logger: Logger, source: Arc<dyn WeatherSource>) -> Self {
        WeatherService { logger, source }
    }

    /// Fetches daily weather for `range`, routing by the freshness boundary derived from `today`.
    pub async fn get_weather(
        &self,
        range: DateRange,
        today: Date,
    ) -> Result<Vec<WeatherObservation>, Error> {
        let plan = WeatherPlan::route(range, freshness_boundary(today));
        info!(self.logger, "weather plan for {}: {}", range, plan);

        let series = match plan {
            WeatherPlan::Archive(range) => {
                self.source
                    .fetch_daily(WeatherEndpoint::Archive, range)
                    .await?
            }
            WeatherPlan::Forecast(range) => {
                self.source
                    .fetch_daily(WeatherEndpoint::Forecast, range)
                    .await?
            }
            WeatherPlan::Split { archive, forecast } => {
                let (archive, forecast) = try_join(
                    self.source.fetch_daily(WeatherEndpoint::Archive, archive),
                    self.source.fetch_daily(WeatherEndpoint::Forecast, forecast),
                )
                .await?;
                merge_daily(archive, forecast)
            }
        };

        let observations = normalize_weather(series)?;
        info!(self.logger, "weather observations: {}", observations.len());
        Ok(observations)
    }
}
