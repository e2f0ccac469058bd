pub mod config;
pub mod days;
pub mod play;
pub mod week;
