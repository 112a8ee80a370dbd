//! Chat client for locally running language-model servers (Ollama or any
//! OpenAI-compatible server such as LM Studio).

pub mod client;
pub mod clipboard;
pub mod config;
pub mod errors;
pub mod host;
pub mod models;
pub mod provider;
pub mod routes;
pub mod service;

pub use client::ProviderClient;
pub use errors::AppError;
pub use models::{ConnectionStatus, Message, MessageRole, ModelInfo, ProviderKind, ProviderSettings};
pub use service::chat_controller::{ChatController, ControllerOptions};
