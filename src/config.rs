//! # Configuración
//!
//! Toda la configuración del servidor se lee de variables de entorno
//! (cargadas previamente desde `.env` con `dotenvy`).
//!
//! | Variable | Default |
//! |---|---|
//! | `BIND_ADDRESS` | `0.0.0.0:8080` |
//! | `MONGODB_URI` | `mongodb://localhost:27017` |
//! | `MONGODB_DATABASE` | `motoparts_backoffice` |
//! | `UPLOAD_DIR` | `./uploads` |
//! | `MAX_UPLOAD_BYTES` | `5242880` |
//! | `LIST_PAGE_SIZE` | `6` |
//! | `LIST_LOAD_MORE_STEP` | `3` |

use std::env;
use std::path::PathBuf;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
pub const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017";
pub const DEFAULT_MONGODB_DATABASE: &str = "motoparts_backoffice";
pub const DEFAULT_UPLOAD_DIR: &str = "./uploads";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
pub const DEFAULT_PAGE_SIZE: usize = 6;
pub const DEFAULT_LOAD_MORE_STEP: usize = 3;

/// Tamaño inicial de la ventana visible y cuánto crece con "cargar más".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListSettings {
    pub page_size: usize,
    pub load_more_step: usize,
}

impl Default for ListSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            load_more_step: DEFAULT_LOAD_MORE_STEP,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSettings {
    pub dir: PathBuf,
    pub max_bytes: usize,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_address: String,
    pub mongodb_uri: String,
    pub mongodb_database: String,
    pub uploads: UploadSettings,
    pub lists: ListSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            mongodb_uri: DEFAULT_MONGODB_URI.to_string(),
            mongodb_database: DEFAULT_MONGODB_DATABASE.to_string(),
            uploads: UploadSettings::default(),
            lists: ListSettings::default(),
        }
    }
}

impl AppConfig {
    /// Construye la configuración desde el entorno, usando los valores por
    /// defecto para las variables ausentes o mal formadas.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let page_size = parse_usize(&lookup, "LIST_PAGE_SIZE", DEFAULT_PAGE_SIZE).max(1);
        let load_more_step =
            parse_usize(&lookup, "LIST_LOAD_MORE_STEP", DEFAULT_LOAD_MORE_STEP).max(1);

        Self {
            bind_address: lookup("BIND_ADDRESS").unwrap_or(defaults.bind_address),
            mongodb_uri: lookup("MONGODB_URI").unwrap_or(defaults.mongodb_uri),
            mongodb_database: lookup("MONGODB_DATABASE").unwrap_or(defaults.mongodb_database),
            uploads: UploadSettings {
                dir: lookup("UPLOAD_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.uploads.dir),
                max_bytes: parse_usize(&lookup, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES),
            },
            lists: ListSettings {
                page_size,
                load_more_step,
            },
        }
    }
}

fn parse_usize<F>(lookup: &F, key: &str, default: usize) -> usize
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => default,
        Some(raw) => match raw.trim().parse::<usize>() {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(variable = key, value = %raw, error = %e, "Valor inválido, usando default");
                default
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.lists.load_more_step, 3);
    }

    #[test]
    fn overrides_are_read() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("BIND_ADDRESS", "127.0.0.1:3000"),
            ("MONGODB_DATABASE", "otra"),
            ("LIST_PAGE_SIZE", "10"),
            ("UPLOAD_DIR", "/tmp/banners"),
        ]));
        assert_eq!(config.bind_address, "127.0.0.1:3000");
        assert_eq!(config.mongodb_database, "otra");
        assert_eq!(config.lists.page_size, 10);
        assert_eq!(config.uploads.dir, PathBuf::from("/tmp/banners"));
    }

    #[test]
    fn malformed_numbers_fall_back() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("LIST_PAGE_SIZE", "muchos"),
            ("MAX_UPLOAD_BYTES", "-1"),
            ("LIST_LOAD_MORE_STEP", "0"),
        ]));
        assert_eq!(config.lists.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.uploads.max_bytes, DEFAULT_MAX_UPLOAD_BYTES);
        assert_eq!(config.lists.load_more_step, 1);
    }
}
