// API credentials from the environment or a key file
use anyhow::bail;
use std::path::Path;

#[derive(Clone, PartialEq)]
pub struct Credentials {
    pub secret_id: String,
    pub secret_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("secret_id", &self.secret_id)
            .field("secret_key", &"***")
            .finish()
    }
}

/// `SECRET_ID` / `SECRET_KEY` first, then the key file. Read on every call.
pub async fn resolve_credentials(key_file: &Path) -> anyhow::Result<Credentials> {
    let mut secret_id = env_value("SECRET_ID");
    let mut secret_key = env_value("SECRET_KEY");

    if secret_id.is_none() || secret_key.is_none() {
        match tokio::fs::read_to_string(key_file).await {
            Ok(content) => {
                let (file_id, file_key) = parse_key_file(&content);
                secret_id = secret_id.or(file_id);
                secret_key = secret_key.or(file_key);
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Error reading {}: {}", key_file.display(), e),
        }
    }

    match (secret_id, secret_key) {
        (Some(secret_id), Some(secret_key)) => Ok(Credentials { secret_id, secret_key }),
        _ => bail!("Missing credentials"),
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Lines mentioning `SecretId` / `SecretKey`, value after a full-width or
/// ASCII colon. The first match of each wins.
pub fn parse_key_file(content: &str) -> (Option<String>, Option<String>) {
    let mut secret_id = None;
    let mut secret_key = None;

    for line in content.lines() {
        let Some(value) = value_after_colon(line) else {
            continue;
        };
        if line.contains("SecretId") && secret_id.is_none() {
            secret_id = Some(value);
        } else if line.contains("SecretKey") && secret_key.is_none() {
            secret_key = Some(value);
        }
    }

    (secret_id, secret_key)
}

fn value_after_colon(line: &str) -> Option<String> {
    let (_, value) = line.split_once('：').or_else(|| line.split_once(':'))?;
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_width_colon() {
        let content = "SecretId：AKIDexample\nSecretKey：keyexample\n";
        let (id, key) = parse_key_file(content);
        assert_eq!(id.as_deref(), Some("AKIDexample"));
        assert_eq!(key.as_deref(), Some("keyexample"));
    }

    #[test]
    fn test_parse_ascii_colon_and_noise() {
        let content = "# Tencent Cloud API key\r\nSecretId: AKID2 \r\nSecretKey:\nSecretKey: k2\n";
        let (id, key) = parse_key_file(content);
        assert_eq!(id.as_deref(), Some("AKID2"));
        assert_eq!(key.as_deref(), Some("k2"));
    }

    #[test]
    fn test_parse_missing() {
        assert_eq!(parse_key_file("nothing here"), (None, None));
    }

    #[test]
    fn test_debug_hides_key() {
        let creds = Credentials {
            secret_id: "id".to_string(),
            secret_key: "topsecret".to_string(),
        };
        assert!(!format!("{creds:?}").contains("topsecret"));
    }
}
