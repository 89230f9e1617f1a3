// API routes and handlers

pub mod response;
pub mod health;
pub mod routes;
pub mod auth;
pub mod classes;
pub mod bookings;
pub mod plans;
pub mod weight_logs;
pub mod dashboards;
