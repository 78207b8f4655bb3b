#![forbid(unsafe_code)]

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod memory;
mod wire;

pub use client::QuizApi;
pub use config::ApiConfig;
pub use error::ApiError;
pub use http::HttpQuizApi;
pub use memory::{InMemoryQuizApi, QuizFixture};
