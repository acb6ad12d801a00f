//! Weather oracle: structured weather conditions for a place and date.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::generation::ChatModel;
use crate::types::ModelMessage;

use super::types::AgentToolParameters;

/// Name used for the structured-output schema.
pub const WEATHER_TYPE_NAME: &str = "WeatherInfo";

const SYSTEM_PROMPT: &str =
    "You are a helpful assistant that determines the weather for a given location.";

/// Typical weather conditions for a location on a date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherInfo {
    /// Amount and type of precipitation.
    pub precipitation: String,
    /// Temperature in degrees Fahrenheit.
    pub temperature: f64,
    /// Wind speed and direction.
    pub wind: String,
    /// General condition, e.g. "sunny".
    pub condition: String,
}

impl WeatherInfo {
    /// Schema the model reply must satisfy. All four fields are required.
    pub fn schema() -> AgentToolParameters {
        AgentToolParameters::object()
            .string("precipitation", "The amount and type of precipitation.", true)
            .number("temperature", "The temperature in Fahrenheit.", true)
            .string("wind", "The wind speed and direction.", true)
            .string("condition", "The general weather condition (e.g., sunny)", true)
            .build()
    }
}

impl fmt::Display for WeatherInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {:.0}°F, precipitation: {}, wind: {}",
            self.condition, self.temperature, self.precipitation, self.wind
        )
    }
}

/// Arguments accepted by `determine_weather`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherArgs {
    pub location: String,
    pub date: String,
}

impl WeatherArgs {
    pub fn parameters() -> AgentToolParameters {
        AgentToolParameters::object()
            .string("location", "The location to determine the weather for.", true)
            .string("date", "The date to determine the weather for.", true)
            .build()
    }
}

/// The two-message prompt sent to the model.
pub fn weather_prompt(args: &WeatherArgs) -> Vec<ModelMessage> {
    vec![
        ModelMessage::system(SYSTEM_PROMPT),
        ModelMessage::user(format!(
            "What is the weather generally like in {} on {}?",
            args.location, args.date
        )),
    ]
}

/// Ask the model for structured weather information.
///
/// Fails with a structured-output error if the reply does not conform to
/// [`WeatherInfo`]; a partial record is never returned.
pub async fn determine_weather(model: &ChatModel, args: &WeatherArgs) -> Result<WeatherInfo> {
    debug!(location = %args.location, date = %args.date, "determine_weather");
    let schema = WeatherInfo::schema();
    let result = model
        .invoke_structured::<WeatherInfo>(weather_prompt(args), &schema.schema, WEATHER_TYPE_NAME)
        .await?;
    Ok(result.object)
}
