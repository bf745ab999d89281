// src/status/mod.rs
pub mod feed;
pub mod poller;
