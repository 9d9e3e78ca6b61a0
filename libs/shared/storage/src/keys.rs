// The access-token key is configurable (`ClientConfig::token_key`); the rest are fixed.
pub const REFRESH_TOKEN: &str = "refresh_token";
pub const USER: &str = "user";
pub const THEME: &str = "theme";
