//! Driven port for managed, network-invoked backend functions.
//!
//! Domain services pass JSON payloads through this port and interpret the
//! JSON result; transport framing stays in the outbound adapter.

use async_trait::async_trait;
use serde_json::Value;

use super::define_port_error;

define_port_error! {
    /// Errors raised while invoking a callable function.
    pub enum CallableFunctionError {
        /// The request never produced a response.
        Transport { message: String } =>
            "callable function transport failed: {message}",
        /// The function ran and reported an error.
        Remote { status: String, message: String } =>
            "callable function returned {status}: {message}",
        /// The response body could not be decoded.
        Decode { message: String } =>
            "callable function response decode failed: {message}",
    }
}

/// Port for invoking named backend functions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CallableFunction: Send + Sync {
    /// Invoke `name` with `payload` and return its result payload.
    async fn call(&self, name: &str, payload: Value) -> Result<Value, CallableFunctionError>;
}
