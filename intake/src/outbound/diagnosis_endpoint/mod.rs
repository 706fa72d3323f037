//! Diagnosis endpoint outbound adapter.
//!
//! Implements the `DiagnosisSink` port over HTTP and reads the endpoint
//! settings from the environment.

mod config;
mod dto;
mod http_sink;

pub use config::{
    DELIVERY_MODE_ENV, DeliveryMode, ENDPOINT_URL_ENV, EndpointConfig, EndpointConfigError,
    diagnosis_sink_from_env, endpoint_config_from_env,
};
pub use http_sink::HttpDiagnosisSink;
