pub mod path;
pub mod server;
pub mod threadpool;
