// src/constants.rs

pub const CONTROL_PORT: u16 = 2121;
pub const USERNAME_REGEX: &str = r"^[a-zA-Z0-9_.-]{1,32}$";
pub const MAX_COMMAND_LENGTH: usize = 4096;
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;
pub const DEFAULT_CONFIG_PATH: &str = "/etc/flatftpd.conf";
