mod handler;
mod model;

pub use handler::{get_wallet, recharge};
pub use model::{RechargeRequest, WalletSummary, generate_order_no};
