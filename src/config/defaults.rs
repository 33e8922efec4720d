pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: i64 = 3000;
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";
pub const DEFAULT_RUST_LOG: &str = "info,tower_http=info";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://./data/todos.db?mode=rwc";
pub const DEFAULT_DB_MAX_CONNECTIONS: i64 = 5;
pub const DEFAULT_DB_MIN_IDLE: i64 = 1;
