pub mod admin;
pub mod api_key;
pub mod channel;
pub mod order;
pub mod user;
pub mod wallet;
