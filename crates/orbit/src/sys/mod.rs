pub mod launch;
pub mod protocol;
pub mod runtime;
pub mod server;
pub mod ticker;
