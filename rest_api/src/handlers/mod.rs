// rest_api/src/handlers/mod.rs

pub mod admin;
pub mod booking;
pub mod navigator;
pub mod records;
pub mod triage_chat;
