//! authchain: an axum service fronted by a priority-ordered request filter
//! chain (authentication before authorization, first abort wins).

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod filter;
pub mod middleware;
pub mod services;
pub mod state;
