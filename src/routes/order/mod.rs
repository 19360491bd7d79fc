mod display;
mod filter;
mod handler;
mod model;
mod payment;

pub use display::{StatusDisplay, StatusTab, StatusTone, status_display};
pub use filter::OrderFilter;
pub use handler::{get_order, list_orders, order_history};
pub use model::{ChannelOrder, NewOrder, OrderDetail, OrderStatus, OrderStatusHistory};
pub use payment::PaymentInfo;
