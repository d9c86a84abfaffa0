pub mod definition;
pub mod match_state;
pub mod round;
pub mod serialization;
