pub mod errors;
pub mod extractors;
pub mod jwt;
pub mod password;
pub mod refresh_token;
pub mod services;
