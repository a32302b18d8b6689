//! Gemini Image MCP Server Library
//!
//! This library provides image generation, editing and composition on top of
//! the Google Gemini `generateContent` API, exposed as MCP tools.

pub mod client;
pub mod contracts;
pub mod handler;
pub mod request;
pub mod resources;
pub mod response;
pub mod server;

pub use client::{GeminiClient, ImageGenerationApi};
pub use handler::{ImageHandler, ImageTool, ToolOutcome};
pub use request::{GenerationRequest, build_request};
pub use response::{NormalizedResult, normalize};
pub use server::ImageServer;
