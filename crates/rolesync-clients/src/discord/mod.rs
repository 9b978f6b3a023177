//! Chat platform adapter

mod client;
pub mod models;

pub use client::DiscordClient;
