use crate::config::ProxyConfig;
use crate::error::ConfigError;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{info, warn};
use url::Url;

pub struct ProxyManager;

impl ProxyManager {
    pub const PROXY_FILE: &'static str = "proxies.txt";

    /// Loads proxies from a newline-delimited file.
    /// A missing file is not an error: it yields an empty list.
    pub fn load_proxies(path: impl AsRef<Path>) -> Result<Vec<ProxyConfig>> {
        let path = path.as_ref();
        if !path.exists() {
            warn!("{} not found. Running without proxies.", path.display());
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mut proxies = Vec::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            match Self::parse_line(line) {
                Ok(proxy) => proxies.push(proxy),
                Err(e) => warn!("Skipping proxy: {}", e),
            }
        }

        info!("Loaded {} proxies from {}", proxies.len(), path.display());
        Ok(proxies)
    }

    /// Accepts `scheme://[user:pass@]host:port`, `host:port` and
    /// `host:port:user:pass`.
    pub fn parse_line(line: &str) -> Result<ProxyConfig, ConfigError> {
        let invalid = || ConfigError::InvalidProxy {
            line: line.to_string(),
        };

        if line.contains("://") {
            let parsed = Url::parse(line).map_err(|_| invalid())?;
            let host = parsed.host_str().ok_or_else(invalid)?;
            let port = parsed.port_or_known_default().ok_or_else(invalid)?;
            let username = Some(parsed.username())
                .filter(|u| !u.is_empty())
                .map(str::to_string);
            let password = parsed.password().map(str::to_string);

            return Ok(ProxyConfig {
                url: format!("{}://{}:{}", parsed.scheme(), host, port),
                username,
                password,
            });
        }

        // ip:port -> 2 parts, ip:port:user:pass -> 4 parts
        let parts: Vec<&str> = line.split(':').collect();
        if (parts.len() != 2 && parts.len() != 4) || parts[0].is_empty() {
            return Err(invalid());
        }
        parts[1].parse::<u16>().map_err(|_| invalid())?;

        let (username, password) = if parts.len() == 4 {
            (Some(parts[2].to_string()), Some(parts[3].to_string()))
        } else {
            (None, None)
        };

        Ok(ProxyConfig {
            url: format!("http://{}:{}", parts[0], parts[1]),
            username,
            password,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_host_port() {
        let proxy = ProxyManager::parse_line("10.0.0.1:8080").unwrap();
        assert_eq!(proxy.url, "http://10.0.0.1:8080");
        assert!(proxy.username.is_none());
        assert!(proxy.password.is_none());
    }

    #[test]
    fn test_host_port_user_pass() {
        let proxy = ProxyManager::parse_line("10.0.0.1:8080:alice:s3cret").unwrap();
        assert_eq!(proxy.url, "http://10.0.0.1:8080");
        assert_eq!(proxy.username.as_deref(), Some("alice"));
        assert_eq!(proxy.password.as_deref(), Some("s3cret"));
    }

    #[test]
    fn test_url_with_credentials() {
        let proxy = ProxyManager::parse_line("socks5://bob:pw@proxy.local:1080").unwrap();
        assert_eq!(proxy.url, "socks5://proxy.local:1080");
        assert_eq!(proxy.username.as_deref(), Some("bob"));
        assert_eq!(proxy.password.as_deref(), Some("pw"));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(ProxyManager::parse_line("not-a-proxy").is_err());
        assert!(ProxyManager::parse_line("host:notaport").is_err());
        assert!(ProxyManager::parse_line("a:1:b").is_err());
    }

    #[test]
    fn test_missing_file_is_empty() {
        let proxies = ProxyManager::load_proxies("/nonexistent/proxies.txt").unwrap();
        assert!(proxies.is_empty());
    }

    #[test]
    fn test_file_skips_invalid_and_comments() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# office").unwrap();
        writeln!(file, "1.2.3.4:3128").unwrap();
        writeln!(file, "garbage").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "http://u:p@5.6.7.8:8000").unwrap();

        let proxies = ProxyManager::load_proxies(file.path()).unwrap();
        assert_eq!(proxies.len(), 2);
        assert_eq!(proxies[1].url, "http://5.6.7.8:8000");
    }
}
