//! Membership database adapter

mod client;
pub mod models;

pub use client::NotionClient;
