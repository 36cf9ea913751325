//! Maplewood Clinic site library.
//!
//! Serves the clinic's JSON API: product catalog, session cart, checkout
//! with Razorpay, contact form, and the admin surface. Exposed as a library
//! so route handlers and services can be tested.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
