//! Callable-function adapters.

mod dto;
mod http_function;

pub use http_function::HttpCallableFunction;
