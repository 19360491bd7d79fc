mod handler;
mod model;

pub use handler::list_channels;
pub use model::PaymentChannel;
