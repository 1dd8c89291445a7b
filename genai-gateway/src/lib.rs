//! genai-gateway: HTTP front for Gemini text, image and document generation.

pub mod config;
pub mod dtos;
pub mod handlers;
pub mod services;
pub mod startup;
