pub mod confirm;
pub mod http;
pub mod timer;
