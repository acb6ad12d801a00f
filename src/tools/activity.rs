//! Activity recommender: free-text suggestions for a place and its weather.

use std::io;

use serde::{Deserialize, Serialize};
use serde_json::ser::Formatter;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Result, WayfinderError};
use crate::generation::ChatModel;
use crate::types::ModelMessage;

use super::types::AgentToolParameters;
use super::weather::WeatherInfo;

const SYSTEM_PROMPT: &str =
    "You are a helpful assistant that picks two to three activities based on the weather and location.";

/// Arguments accepted by `activity_recommendation`.
///
/// `weather` is kept as a JSON object so whatever the assistant forwards
/// reaches the prompt unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityArgs {
    pub location: String,
    pub weather: Map<String, Value>,
}

impl ActivityArgs {
    pub fn parameters() -> AgentToolParameters {
        // Field shape is advertised, but none of it is required.
        let weather_shape = AgentToolParameters::from_schema(serde_json::json!({
            "type": "object",
            "properties": WeatherInfo::schema().schema["properties"].clone(),
        }));
        AgentToolParameters::object()
            .string("location", "The location.", true)
            .nested("weather", "The weather information.", &weather_shape, true)
            .build()
    }
}

/// The two-message prompt sent to the model.
pub fn activity_prompt(args: &ActivityArgs) -> Result<Vec<ModelMessage>> {
    let weather = to_spaced_json(&args.weather)?;
    Ok(vec![
        ModelMessage::system(SYSTEM_PROMPT),
        ModelMessage::user(format!(
            "What activities would you recommend in {} on given the weather conditions: \n{}?",
            args.location, weather
        )),
    ])
}

/// Single-line JSON with `", "` and `": "` separators.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }
}

fn to_spaced_json<T: Serialize>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
    value.serialize(&mut serializer)?;
    String::from_utf8(buf).map_err(|e| WayfinderError::InvalidState(e.to_string()))
}

/// Ask the model for activity suggestions; the reply text is returned verbatim.
pub async fn activity_recommendation(model: &ChatModel, args: &ActivityArgs) -> Result<String> {
    debug!(location = %args.location, "activity_recommendation");
    let result = model.invoke(activity_prompt(args)?).await?;
    Ok(result.text)
}
