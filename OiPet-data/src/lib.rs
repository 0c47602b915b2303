// OiPet Data
// This crate handles persistence of pets and health records

// Database configuration, connection pool and migrations
pub mod database;

// Repository traits and their SQLite / in-memory implementations
pub mod repository;

// Data storage models
pub mod models;
