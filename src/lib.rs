//! Orderdesk API Library
//!
//! Order management backend for a small supplies and engineering business:
//! clients submit orders, administrators move them through a fixed pipeline,
//! log purchase orders against suppliers, post updates, and read dashboards.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod health;
pub mod items;
pub mod middleware;
pub mod migrator;
pub mod openapi;
pub mod services;
pub mod status;
pub mod tracing;

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
}

/// The versioned API surface, nested under `/api/v1` by the binary.
pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .nest("/orders", handlers::orders::order_routes())
        .nest("/companies", handlers::companies::company_routes())
        .nest("/suppliers", handlers::suppliers::supplier_routes())
        .nest(
            "/purchase-orders",
            handlers::purchase_orders::purchase_order_routes(),
        )
        .nest("/reports", handlers::reports::report_routes())
}
