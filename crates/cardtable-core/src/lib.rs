pub mod game;
pub mod model;
pub mod notify;
