//! Value Objects

pub mod activation_code;
pub mod email;
pub mod user_id;
pub mod user_password;
