//! Default value functions used by serde for config deserialization.

pub fn default_name() -> String {
    "besso".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_host() -> String {
    "127.0.0.1".to_string()
}

pub fn default_port() -> u16 {
    8080
}

pub fn default_credential_env() -> String {
    "SECRET_KEY".to_string()
}

pub fn default_database() -> String {
    "(default)".to_string()
}

pub fn default_base_url() -> String {
    "https://firestore.googleapis.com/v1".to_string()
}
