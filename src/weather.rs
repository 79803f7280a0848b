use std::time::Duration;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

/// WeatherCondition
///
/// Coarse buckets of the WMO weather interpretation codes used by Open-Meteo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum WeatherCondition {
    Clear,
    PartlyCloudy,
    Overcast,
    Fog,
    Drizzle,
    Rain,
    Snow,
    RainShowers,
    SnowShowers,
    Thunderstorm,
    Unknown,
}

impl WeatherCondition {
    pub fn label(&self) -> &'static str {
        match self {
            WeatherCondition::Clear => "Clear sky",
            WeatherCondition::PartlyCloudy => "Partly cloudy",
            WeatherCondition::Overcast => "Overcast",
            WeatherCondition::Fog => "Fog",
            WeatherCondition::Drizzle => "Drizzle",
            WeatherCondition::Rain => "Rain",
            WeatherCondition::Snow => "Snow",
            WeatherCondition::RainShowers => "Rain showers",
            WeatherCondition::SnowShowers => "Snow showers",
            WeatherCondition::Thunderstorm => "Thunderstorm",
            WeatherCondition::Unknown => "Unknown",
        }
    }

    /// Icon name the widget looks up in its sprite sheet.
    pub fn icon(&self) -> &'static str {
        match self {
            WeatherCondition::Clear => "sun",
            WeatherCondition::PartlyCloudy => "cloud-sun",
            WeatherCondition::Overcast => "cloud",
            WeatherCondition::Fog => "cloud-fog",
            WeatherCondition::Drizzle => "cloud-drizzle",
            WeatherCondition::Rain | WeatherCondition::RainShowers => "cloud-rain",
            WeatherCondition::Snow | WeatherCondition::SnowShowers => "snowflake",
            WeatherCondition::Thunderstorm => "cloud-lightning",
            WeatherCondition::Unknown => "help-circle",
        }
    }
}

pub fn classify_weather_code(code: i32) -> WeatherCondition {
    match code {
        0 => WeatherCondition::Clear,
        1 | 2 => WeatherCondition::PartlyCloudy,
        3 => WeatherCondition::Overcast,
        45 | 48 => WeatherCondition::Fog,
        51..=57 => WeatherCondition::Drizzle,
        61..=67 => WeatherCondition::Rain,
        71..=77 => WeatherCondition::Snow,
        80..=82 => WeatherCondition::RainShowers,
        85 | 86 => WeatherCondition::SnowShowers,
        95..=99 => WeatherCondition::Thunderstorm,
        _ => WeatherCondition::Unknown,
    }
}

/// `current_weather` block of an Open-Meteo forecast response.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentWeather {
    pub temperature: f64,
    pub windspeed: f64,
    pub weathercode: i32,
    pub time: String,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: CurrentWeather,
}

/// WeatherReport
///
/// What the dashboard widget renders (GET /api/weather).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
pub struct WeatherReport {
    pub temperature_c: f64,
    pub wind_speed_kmh: f64,
    pub weather_code: i32,
    pub condition: WeatherCondition,
    pub label: String,
    pub icon: String,
    /// Local ISO-8601 time of the observation, as reported upstream.
    pub observed_at: String,
}

impl From<CurrentWeather> for WeatherReport {
    fn from(current: CurrentWeather) -> Self {
        let condition = classify_weather_code(current.weathercode);
        WeatherReport {
            temperature_c: current.temperature,
            wind_speed_kmh: current.windspeed,
            weather_code: current.weathercode,
            condition,
            label: condition.label().to_string(),
            icon: condition.icon().to_string(),
            observed_at: current.time,
        }
    }
}

/// Upper bound for one upstream round trip; past it the widget reports 502.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// WeatherClient
///
/// Thin Open-Meteo client for the office location. Cheap to clone; the
/// underlying `reqwest::Client` shares its connection pool.
#[derive(Clone, Debug)]
pub struct WeatherClient {
    http: reqwest::Client,
    base_url: String,
    latitude: f64,
    longitude: f64,
    timeout: Duration,
}

impl WeatherClient {
    pub fn new(base_url: &str, latitude: f64, longitude: f64) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            latitude,
            longitude,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn forecast_url(&self) -> String {
        format!("{}/v1/forecast", self.base_url)
    }

    /// Fetches the current conditions. Non-2xx upstream responses and
    /// requests exceeding the client timeout are errors.
    pub async fn current(&self) -> Result<WeatherReport, reqwest::Error> {
        let response = self
            .http
            .get(self.forecast_url())
            .timeout(self.timeout)
            .query(&[
                ("latitude", self.latitude.to_string()),
                ("longitude", self.longitude.to_string()),
                ("current_weather", "true".to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let forecast = response.json::<ForecastResponse>().await?;
        Ok(WeatherReport::from(forecast.current_weather))
    }
}
