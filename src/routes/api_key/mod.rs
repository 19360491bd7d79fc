mod handler;
mod model;

pub use handler::{create_api_key, delete_api_key, list_api_keys, set_api_key_active};
pub use model::{MerchantApiKey, MintedKey, PERMISSIONS, digest_key, mint_key};
