pub mod auth_service;
pub use auth_service::{AuthError, AuthService, CurrentUser, Registration, TokenResult};

pub mod auth_service_impl;
pub use auth_service_impl::StoreAuthService;

pub mod calculator;
pub mod currency;
pub mod text;
pub mod token;
