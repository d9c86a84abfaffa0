pub mod config;
pub mod controller;
pub mod input;
pub mod logging;
pub mod view;
