//! HTTP request handlers

pub mod health;
pub mod sync;
pub mod webhook;
