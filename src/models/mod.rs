//! Model definitions.

pub mod capabilities;
pub mod google;

pub use capabilities::ModelCapabilities;
pub use google::GoogleModel;
