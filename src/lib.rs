pub mod bootstrap;
pub mod conf;
pub mod fixtures;
pub mod models;
pub mod schema;
pub mod utils;
pub mod validation;
