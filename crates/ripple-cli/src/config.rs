use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct Config {
    /// Path (or sqlx URL) of the task database
    #[serde(default = "default_database")]
    pub database: String,
    /// Actor name recorded on tasks, comments and replication products;
    /// falls back to $USER when unset
    #[serde(default)]
    pub actor: Option<String>,
}

fn default_database() -> String {
    "ripple.db".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            actor: None,
        }
    }
}

impl Config {
    pub fn new() -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Toml::file("ripple.toml"))
            .merge(Env::prefixed("RIPPLE_"))
            .extract()
    }
}
