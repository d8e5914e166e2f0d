//! Core components, types, and utilities for the tldr-bot.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - Canned replies posted back to chat.
//! - Common types and result handling.

pub mod config;
pub mod messages;
pub mod types;
