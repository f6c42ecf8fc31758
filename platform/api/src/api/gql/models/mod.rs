pub mod date;
pub mod global_id;
pub mod message;
pub mod user;
