pub mod api;
pub mod config;
pub mod dto;
pub mod error;
pub mod models;
pub mod money;
pub mod response;
pub mod state;
pub mod views;
