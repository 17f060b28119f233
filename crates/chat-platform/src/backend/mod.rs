pub mod http;

pub use http::{check_status, with_timeout, HttpChatBackend};
