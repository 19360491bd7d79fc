mod handler;
mod model;
pub mod validation;

pub use handler::{
    check_token, login, me, refresh_token, register, update_online_status, update_profile,
};
pub use model::{
    AuthUser, LoginRequest, OnlineStatusRequest, RegisterRequest, UpdateProfileRequest,
    UserProfile,
};
