//! Clientes service: JSON API and HTML forms over an embedded document store.

pub mod config;
pub mod db;
pub mod flash;
pub mod forms;
pub mod http;
pub mod service;
pub mod store;
pub mod views;
