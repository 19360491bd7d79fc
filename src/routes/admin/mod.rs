mod handler;
mod model;

pub use handler::{admin_login, list_all_orders, list_users, update_order_status};
pub use model::{AdminAccount, UpdateStatusRequest};
