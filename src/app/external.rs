//! Read-only external data: country directory lookup and weather.

use crate::error::AppError;
use rand::Rng;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

pub const DEFAULT_COUNTRY_API_BASE: &str = "https://restcountries.com/v3.1";

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

const WEATHER_CONDITIONS: [&str; 4] = ["Ensolarado", "Nublado", "Chuvoso", "Parcialmente nublado"];

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryLookupReq {
    pub country_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryInfo {
    pub name: String,
    pub official_name: String,
    pub flag: String,
    pub capital: String,
    pub population: u64,
    pub region: String,
    pub currencies: String,
    pub languages: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReq {
    pub city_name: String,
    pub country_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherInfo {
    pub city: String,
    pub temperature: i32,
    pub description: String,
    pub humidity: u8,
    pub wind_speed: u8,
    /// Always true: values are generated locally, not fetched.
    pub simulated: bool,
}

// Subset of the restcountries v3.1 payload.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RestCountry {
    name: RestName,
    flags: RestFlags,
    capital: Vec<String>,
    population: u64,
    region: String,
    currencies: Map<String, Value>,
    languages: Map<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RestName {
    common: String,
    official: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RestFlags {
    png: Option<String>,
    svg: Option<String>,
}

impl From<RestCountry> for CountryInfo {
    fn from(c: RestCountry) -> Self {
        let flag = c
            .flags
            .png
            .filter(|s| !s.is_empty())
            .or(c.flags.svg)
            .unwrap_or_default();
        let currencies: Vec<&str> = c.currencies.keys().map(String::as_str).collect();
        let languages: Vec<&str> = c.languages.values().filter_map(Value::as_str).collect();
        Self {
            name: c.name.common,
            official_name: c.name.official,
            flag,
            capital: c.capital.into_iter().next().unwrap_or_default(),
            population: c.population,
            region: c.region,
            currencies: currencies.join(", "),
            languages: languages.join(", "),
        }
    }
}

/// Reshape a restcountries response body. The first entry wins.
pub fn country_info_from_json(body: Value) -> Option<CountryInfo> {
    let countries: Vec<RestCountry> = match serde_json::from_value(body) {
        Ok(c) => c,
        Err(e) => {
            log::error!("Failed to decode country directory response: {}", e);
            return None;
        }
    };
    countries.into_iter().next().map(CountryInfo::from)
}

/// Client for the public country directory.
#[derive(Debug, Clone)]
pub struct CountryDirectory {
    client: Client,
    base_url: String,
}

impl CountryDirectory {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(LOOKUP_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                log::warn!("Falling back to default HTTP client: {}", e);
                Client::new()
            });
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn lookup_url(&self, country_name: &str) -> Option<Url> {
        let mut url = Url::parse(&self.base_url).ok()?;
        url.path_segments_mut()
            .ok()?
            .pop_if_empty()
            .extend(["name", country_name]);
        url.query_pairs_mut().append_pair("fullText", "false");
        Some(url)
    }

    /// Look up a country by free-text name.
    ///
    /// Returns `None` for no match and for any transport or decode failure.
    pub async fn lookup(&self, country_name: &str) -> Option<CountryInfo> {
        let country_name = country_name.trim();
        if country_name.is_empty() {
            return None;
        }
        let Some(url) = self.lookup_url(country_name) else {
            log::error!("Invalid country directory base URL: {}", self.base_url);
            return None;
        };

        let response = match self.client.get(url).send().await {
            Ok(r) => r,
            Err(e) => {
                log::error!("Country lookup for {:?} failed: {}", country_name, e);
                return None;
            }
        };
        if !response.status().is_success() {
            log::info!(
                "Country lookup for {:?} returned {}",
                country_name,
                response.status()
            );
            return None;
        }
        match response.json::<Value>().await {
            Ok(body) => country_info_from_json(body),
            Err(e) => {
                log::error!("Country lookup for {:?} failed: {}", country_name, e);
                None
            }
        }
    }
}

/// Generate a weather report for a city from `rng`.
pub fn weather_simulated<R: Rng>(
    rng: &mut R,
    req: &WeatherReq,
) -> Result<WeatherInfo, AppError> {
    if req.city_name.trim().is_empty() {
        return Err(AppError::Validation("cityName is required".into()));
    }
    Ok(WeatherInfo {
        city: req.city_name.clone(),
        temperature: rng.gen_range(15..35),
        description: WEATHER_CONDITIONS[rng.gen_range(0..WEATHER_CONDITIONS.len())].to_string(),
        humidity: rng.gen_range(40..80),
        wind_speed: rng.gen_range(5..25),
        simulated: true,
    })
}

pub fn weather_lookup(req: &WeatherReq) -> Result<WeatherInfo, AppError> {
    if let Some(code) = req.country_code.as_deref() {
        log::debug!("Weather for {},{} (simulated)", req.city_name, code);
    }
    weather_simulated(&mut rand::thread_rng(), req)
}
