/// Placeholder secrets used when nothing is configured. Accepted in dev mode
/// only.
pub const DEFAULT_PASSWORD_PEPPER: &str = "huddle-dev-password-pepper";
pub const DEFAULT_TOKEN_KEY: &str = "huddle-dev-token-key";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;

pub const DEFAULT_ACCESS_TTL_SECS: i64 = 60 * 60;
pub const DEFAULT_REFRESH_TTL_DAYS: i64 = 30;

pub const DEFAULT_WIN_POINTS: i32 = 10;
pub const DEFAULT_TIE_POINTS: i32 = 5;
pub const DEFAULT_LOSS_POINTS: i32 = 0;

pub const MIN_SECRET_LENGTH: usize = 32;
