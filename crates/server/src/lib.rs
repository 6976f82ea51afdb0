pub mod api;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod repository;
pub mod service;
