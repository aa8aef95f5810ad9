pub mod backend;
pub mod cache;
pub mod errors;
pub mod factory;
pub mod notify;
pub mod remote;
pub mod service;

pub use factory::AppFactory;
