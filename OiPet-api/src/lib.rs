// OiPet Saúde API
//
// HTTP surface over the pet and health record services.

pub mod api;
pub mod config;
pub mod entities;
