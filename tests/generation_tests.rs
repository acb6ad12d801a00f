//! Tests for the generation layer and the two travel tools over a mock provider.

mod common;

use std::sync::Arc;

use common::{chat_model, fast_retry, MockProvider, PARIS_WEATHER};
use serde_json::json;
use wayfinder::error::WayfinderError;
use wayfinder::generation;
use wayfinder::models::ModelCapabilities;
use wayfinder::tools::{
    activity_recommendation, determine_weather, ActivityArgs, ToolKind, WeatherArgs, WeatherInfo,
};
use wayfinder::types::*;

fn paris() -> WeatherArgs {
    WeatherArgs {
        location: "Paris".into(),
        date: "July 4th".into(),
    }
}

#[tokio::test]
async fn determine_weather_returns_full_record() {
    let provider = Arc::new(MockProvider::new("gemini-2.5-flash"));
    provider.queue_response(PARIS_WEATHER);
    let model = chat_model(provider.clone());

    let info = determine_weather(&model, &paris()).await.unwrap();

    assert_eq!(
        info,
        WeatherInfo {
            precipitation: "none".into(),
            temperature: 77.0,
            wind: "light breeze from the west".into(),
            condition: "sunny".into(),
        }
    );
    let request = &provider.requests()[0];
    assert_eq!(request.settings.temperature, Some(0.0));
    assert_eq!(request.settings.max_tokens, None);
}

#[tokio::test]
async fn determine_weather_accepts_fenced_json() {
    let provider = Arc::new(MockProvider::new("gemini-2.5-flash"));
    provider.queue_response(&format!("```json\n{PARIS_WEATHER}\n```"));
    let model = chat_model(provider);

    let info = determine_weather(&model, &paris()).await.unwrap();
    assert_eq!(info.condition, "sunny");
}

#[tokio::test]
async fn determine_weather_rejects_partial_record() {
    let provider = Arc::new(MockProvider::new("gemini-2.5-flash"));
    provider.queue_response(r#"{"precipitation":"none","temperature":70,"condition":"sunny"}"#);
    let model = chat_model(provider);

    let err = determine_weather(&model, &paris()).await.unwrap_err();

    match err {
        WayfinderError::StructuredOutput { type_name, message } => {
            assert_eq!(type_name, "WeatherInfo");
            assert!(message.contains("wind"), "unexpected message: {message}");
        }
        other => panic!("expected structured output error, got {other:?}"),
    }
}

#[tokio::test]
async fn determine_weather_rejects_prose() {
    let provider = Arc::new(MockProvider::new("gemini-2.5-flash"));
    provider.queue_response("It will be lovely and warm.");
    let model = chat_model(provider);

    let err = determine_weather(&model, &paris()).await.unwrap_err();
    assert!(matches!(err, WayfinderError::StructuredOutput { .. }));
}

#[tokio::test]
async fn schema_instruction_is_used_without_native_schema_support() {
    let provider = Arc::new(MockProvider::with_capabilities(
        "plain-model",
        ModelCapabilities::default(),
    ));
    provider.queue_response(PARIS_WEATHER);
    let model = chat_model(provider.clone());

    determine_weather(&model, &paris()).await.unwrap();

    let request = &provider.requests()[0];
    assert!(request.settings.response_format.is_none());
    assert_eq!(request.messages.len(), 3);
    assert!(request.messages[0].text().contains("\"temperature\""));
}

#[tokio::test]
async fn activity_recommendation_returns_text_verbatim() {
    let provider = Arc::new(MockProvider::new("gemini-2.5-flash"));
    provider.queue_response("  1. Picnic on the Champ de Mars\n2. Seine cruise  ");
    let model = chat_model(provider.clone());
    let args = ActivityArgs {
        location: "Paris".into(),
        weather: json!({"condition": "sunny"}).as_object().unwrap().clone(),
    };

    let text = activity_recommendation(&model, &args).await.unwrap();

    assert_eq!(text, "  1. Picnic on the Champ de Mars\n2. Seine cruise  ");
    let request = &provider.requests()[0];
    assert!(request.tools.is_none());
    assert!(request.settings.response_format.is_none());
}

#[tokio::test]
async fn generate_text_keeps_only_first_tool_call_when_parallel_disabled() {
    let provider = Arc::new(MockProvider::new("gemini-2.5-flash"));
    provider.queue_tool_calls(vec![
        AgentToolCall {
            id: "a".into(),
            name: "determine_weather".into(),
            arguments: json!({}),
        },
        AgentToolCall {
            id: "b".into(),
            name: "activity_recommendation".into(),
            arguments: json!({}),
        },
    ]);

    let result = generation::generate_text(
        provider.as_ref(),
        vec![ModelMessage::user("hi")],
        GenerationSettings::deterministic(),
        &ToolKind::all_definitions(),
        &fast_retry(0),
    )
    .await
    .unwrap();

    assert_eq!(result.tool_calls.len(), 1);
    assert_eq!(result.tool_calls[0].id, "a");
    assert_eq!(result.finish_reason, Some(FinishReason::ToolCalls));
}

#[tokio::test]
async fn generate_text_keeps_all_tool_calls_when_parallel_enabled() {
    let provider = Arc::new(MockProvider::new("gemini-2.5-flash"));
    provider.queue_tool_calls(vec![
        AgentToolCall {
            id: "a".into(),
            name: "determine_weather".into(),
            arguments: json!({}),
        },
        AgentToolCall {
            id: "b".into(),
            name: "determine_weather".into(),
            arguments: json!({}),
        },
    ]);
    let settings = GenerationSettings::builder().parallel_tool_calls(true).build();

    let result = generation::generate_text(
        provider.as_ref(),
        vec![ModelMessage::user("hi")],
        settings,
        &[],
        &fast_retry(0),
    )
    .await
    .unwrap();

    assert_eq!(result.tool_calls.len(), 2);
}

#[tokio::test]
async fn generate_text_retries_transient_errors() {
    let provider = Arc::new(MockProvider::new("gemini-2.5-flash"));
    provider.queue_error(WayfinderError::RateLimited { retry_after_ms: Some(1) });
    provider.queue_error(WayfinderError::Timeout(10));
    provider.queue_response("made it");

    let result = generation::generate_text(
        provider.as_ref(),
        vec![ModelMessage::user("hi")],
        GenerationSettings::default(),
        &[],
        &fast_retry(2),
    )
    .await
    .unwrap();

    assert_eq!(result.text, "made it");
    assert_eq!(provider.request_count(), 3);
}
