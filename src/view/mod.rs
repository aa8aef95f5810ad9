pub mod render;
pub mod session;
pub mod state;

pub use session::Session;
