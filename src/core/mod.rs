pub mod casing;
pub mod cleaners;
pub mod config;
pub mod conversation;
pub mod corpus;
pub mod gram;
pub mod text;
