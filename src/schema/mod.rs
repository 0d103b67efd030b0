pub mod sentence;
pub mod token;
