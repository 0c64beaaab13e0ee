pub mod health;
pub mod ws;

pub use health::health;
pub use ws::client_connected;
