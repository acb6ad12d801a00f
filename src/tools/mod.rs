//! The travel tools and their dispatcher.

pub mod activity;
pub mod dispatch;
pub mod types;
pub mod validation;
pub mod weather;

pub use activity::{activity_recommendation, ActivityArgs};
pub use dispatch::{ToolDispatcher, ToolKind, TravelTool};
pub use types::AgentToolParameters;
pub use validation::{validate_against_schema, SchemaViolation};
pub use weather::{determine_weather, WeatherArgs, WeatherInfo};
