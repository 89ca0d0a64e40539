use crate::catalog::Catalog;
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::{self, Next},
    response::Response,
    Router,
};
use std::{
    cmp::Ordering,
    path::PathBuf,
    time::{Instant, SystemTime, UNIX_EPOCH},
};
use tower_http::services::{ServeDir, ServeFile};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DIST_DIR: &str = "dist";
const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Info;
const PORT_BOUNDS: (u16, u16) = (1, 65_535);

const CACHE_HTML: &str = "no-cache";
const CACHE_MOCKUPS: &str = "public, max-age=86400";
const CACHE_HASHED_ASSETS: &str = "public, max-age=31536000, immutable";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LogLevel {
    Debug,
    Info,
}

impl PartialOrd for LogLevel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LogLevel {
    fn cmp(&self, other: &Self) -> Ordering {
        fn rank(level: LogLevel) -> u8 {
            match level {
                LogLevel::Debug => 0,
                LogLevel::Info => 1,
            }
        }

        rank(*self).cmp(&rank(*other))
    }
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
        }
    }
}

/// Static host for the built site. Every unknown path falls back to
/// `index.html` so client-side routes survive a reload.
#[derive(Clone, Debug, PartialEq)]
struct HostConfig {
    port: u16,
    dist_dir: PathBuf,
    log_level: LogLevel,
}

impl HostConfig {
    fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = parse_u16_with_bounds(lookup("PORT"), DEFAULT_PORT, PORT_BOUNDS);
        let dist_dir = non_empty(lookup("DIST_DIR"))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DIST_DIR));
        let log_level = parse_log_level(lookup("LOG_LEVEL"), DEFAULT_LOG_LEVEL);

        Self {
            port,
            dist_dir,
            log_level,
        }
    }
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = HostConfig::from_env();
    let catalog = Catalog::embedded()?;
    log_event(
        &config,
        LogLevel::Info,
        "catalog_loaded",
        serde_json::json!({ "projects": catalog.len() }),
    );

    let index = config.dist_dir.join("index.html");
    let static_service = ServeDir::new(&config.dist_dir).not_found_service(ServeFile::new(index));

    let app = Router::new()
        .fallback_service(static_service)
        .layer(middleware::from_fn_with_state(config.clone(), log_and_cache));

    let bind_address = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    log_event(
        &config,
        LogLevel::Info,
        "listening",
        serde_json::json!({
            "url": format!("http://127.0.0.1:{}", config.port),
            "dist_dir": config.dist_dir.display().to_string(),
        }),
    );
    axum::serve(listener, app).await?;
    Ok(())
}

async fn log_and_cache(State(config): State<HostConfig>, request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let mut response = next.run(request).await;
    if !response.headers().contains_key(header::CACHE_CONTROL) {
        response
            .headers_mut()
            .insert(header::CACHE_CONTROL, HeaderValue::from_static(cache_policy(&path)));
    }

    log_event(
        &config,
        LogLevel::Debug,
        "request",
        serde_json::json!({
            "method": method.as_str(),
            "path": path,
            "status": response.status().as_u16(),
            "elapsed_ms": started.elapsed().as_millis() as u64,
        }),
    );
    response
}

fn cache_policy(path: &str) -> &'static str {
    if path.starts_with("/mockups/") {
        return CACHE_MOCKUPS;
    }

    let hashed = [".wasm", ".js", ".css"]
        .iter()
        .any(|extension| path.ends_with(extension));
    if hashed {
        CACHE_HASHED_ASSETS
    } else {
        CACHE_HTML
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_u16_with_bounds(value: Option<String>, default: u16, bounds: (u16, u16)) -> u16 {
    value
        .and_then(|value| value.trim().parse::<u16>().ok())
        .filter(|value| (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}

fn parse_log_level(value: Option<String>, default: LogLevel) -> LogLevel {
    match non_empty(value)
        .unwrap_or_else(|| default.as_str().to_string())
        .to_ascii_lowercase()
        .as_str()
    {
        "debug" => LogLevel::Debug,
        "info" => LogLevel::Info,
        _ => default,
    }
}

fn log_event(config: &HostConfig, level: LogLevel, event: &str, fields: serde_json::Value) {
    if level < config.log_level {
        return;
    }

    let mut payload = serde_json::Map::new();
    payload.insert(
        "ts".to_string(),
        serde_json::Value::Number(serde_json::Number::from(now_unix_seconds())),
    );
    payload.insert("level".to_string(), serde_json::Value::String(level.as_str().to_string()));
    payload.insert("event".to_string(), serde_json::Value::String(event.to_string()));

    if let serde_json::Value::Object(extra) = fields {
        for (key, value) in extra {
            payload.insert(key, value);
        }
    }

    println!("{}", serde_json::Value::Object(payload));
}

fn now_unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|value| value.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> HostConfig {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        HostConfig::from_lookup(|name| env.get(name).cloned())
    }

    #[test]
    fn defaults_apply_without_environment() {
        let config = config_from(&[]);

        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.dist_dir, PathBuf::from(DEFAULT_DIST_DIR));
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn environment_overrides_are_trimmed_and_bounded() {
        let config = config_from(&[
            ("PORT", " 3000 "),
            ("DIST_DIR", "public"),
            ("LOG_LEVEL", "DEBUG"),
        ]);
        assert_eq!(config.port, 3000);
        assert_eq!(config.dist_dir, PathBuf::from("public"));
        assert_eq!(config.log_level, LogLevel::Debug);

        let config = config_from(&[("PORT", "0"), ("DIST_DIR", "   "), ("LOG_LEVEL", "verbose")]);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.dist_dir, PathBuf::from(DEFAULT_DIST_DIR));
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn debug_sorts_below_info() {
        assert!(LogLevel::Debug < LogLevel::Info);
    }

    #[test]
    fn cache_policy_by_asset_kind() {
        assert_eq!(cache_policy("/"), CACHE_HTML);
        assert_eq!(cache_policy("/portfolio"), CACHE_HTML);
        assert_eq!(cache_policy("/mockups/fryzjerka-malgosia-desktop.webp"), CACHE_MOCKUPS);
        assert_eq!(cache_policy("/stalowe-witryny-3f2a.wasm"), CACHE_HASHED_ASSETS);
        assert_eq!(cache_policy("/styles-91c0.css"), CACHE_HASHED_ASSETS);
    }
}
