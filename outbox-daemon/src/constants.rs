//! Daemon constants

/// Banner printed at startup (version appended)
pub const MSG_BANNER: &str = "Outbox relay daemon v";

/// Environment variable consulted when --password is not given
pub const PASSWORD_ENV_VAR: &str = "OUTBOX_FTP_PASSWORD";

/// Directory name under the platform data directory
pub const APP_DIR_NAME: &str = "outboxd";

/// Default history database file name
pub const DB_FILENAME: &str = "outbox.db";
