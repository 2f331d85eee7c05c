//! Backend for a digital business-card service: public profiles with
//! ordered links, physical card orders, visit analytics, lead capture and
//! company pages, authenticated through Supabase.

pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod export;
pub mod logging;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod store;
