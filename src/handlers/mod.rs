// src/handlers/mod.rs
pub mod site;
pub mod status;
