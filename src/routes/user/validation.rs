//! 注册表单校验。只检查是否填写以及两次密码是否一致，不做格式或强度要求。
//! 每个函数返回 `None` 表示通过，否则返回提示文案。

use super::model::RegisterRequest;

pub const USERNAME_REQUIRED: &str = "请填写账号";
pub const PASSWORD_REQUIRED: &str = "请填写密码";
pub const PASSWORD_MISMATCH: &str = "两次输入的密码不一致";
pub const INVITE_CODE_REQUIRED: &str = "请填入邀请码";

pub fn validate_username(username: &str) -> Option<&'static str> {
    username.trim().is_empty().then_some(USERNAME_REQUIRED)
}

pub fn validate_passwords(password: &str, confirm_password: &str) -> Option<&'static str> {
    if password.is_empty() {
        Some(PASSWORD_REQUIRED)
    } else if password != confirm_password {
        Some(PASSWORD_MISMATCH)
    } else {
        None
    }
}

pub fn validate_invite_code(invite_code: &str) -> Option<&'static str> {
    invite_code.trim().is_empty().then_some(INVITE_CODE_REQUIRED)
}

/// 按账号、密码、邀请码的顺序返回第一个错误
pub fn validate_registration(req: &RegisterRequest) -> Option<&'static str> {
    validate_username(&req.username)
        .or_else(|| validate_passwords(&req.password, &req.confirm_password))
        .or_else(|| validate_invite_code(&req.invite_code))
}
