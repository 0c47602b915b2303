pub mod health;
pub mod health_records;
pub mod pets;

// Re-export handlers for easier imports
pub use health::{health_check, initialize_server_start_time};
pub use health_records::{
    create_record, delete_record, get_record, get_stats, get_weight_history, list_records,
    update_record,
};
pub use pets::{create_pet, get_pet, list_pets};
