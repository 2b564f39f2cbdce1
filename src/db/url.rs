//! Structured connection URL construction and parsing.
//!
//! The rendered formats are stable and shared with other tooling:
//!
//! - `sqlite:///<path>` / `sqlite://` (in-memory)
//! - `postgresql://<user>[:<password>]@<host>[:<port>]/<database>`
//! - `mysql://<user>[:<password>]@<host>[:<port>]/<database>`
//!
//! The password and port segments are omitted entirely when absent.

use std::borrow::Cow;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use url::Url;

use crate::error::UrlError;

const SQLITE_MEMORY_URL: &str = "sqlite://";
const SQLITE_FILE_PREFIX: &str = "sqlite:///";

/// Credentials and target location for a network database backend.
///
/// Optional segments are real options rather than empty-string sentinels, so
/// the rendered URL never contains a dangling `:` or `@`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkUrl {
    username: String,
    password: Option<String>,
    host: String,
    port: Option<u16>,
    database: String,
}

impl NetworkUrl {
    pub fn new(
        username: impl Into<String>,
        host: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: None,
            host: host.into(),
            port: None,
            database: database.into(),
        }
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn username_str(&self) -> &str {
        &self.username
    }

    pub fn host_str(&self) -> &str {
        &self.host
    }

    pub fn database_str(&self) -> &str {
        &self.database
    }

    pub fn password_str(&self) -> Option<&str> {
        self.password.as_deref()
    }

    pub fn port_number(&self) -> Option<u16> {
        self.port
    }
}

impl fmt::Display for NetworkUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", escape_userinfo(&self.username))?;
        if let Some(password) = &self.password {
            write!(f, ":{}", escape_userinfo(password))?;
        }
        write!(f, "@{}", self.host)?;
        if let Some(port) = self.port {
            write!(f, ":{port}")?;
        }
        write!(f, "/{}", self.database)
    }
}

/// A typed connection descriptor for every supported backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionUrl {
    /// Ephemeral in-memory SQLite store, shared through a single engine.
    SqliteMemory,
    /// File-backed SQLite database.
    SqliteFile(PathBuf),
    Postgresql(NetworkUrl),
    Mysql(NetworkUrl),
}

impl ConnectionUrl {
    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::SqliteMemory | Self::SqliteFile(_) => "sqlite",
            Self::Postgresql(_) => "postgresql",
            Self::Mysql(_) => "mysql",
        }
    }
}

impl fmt::Display for ConnectionUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SqliteMemory => f.write_str(SQLITE_MEMORY_URL),
            Self::SqliteFile(path) => write!(f, "{SQLITE_FILE_PREFIX}{}", path.display()),
            Self::Postgresql(net) => write!(f, "postgresql://{net}"),
            Self::Mysql(net) => write!(f, "mysql://{net}"),
        }
    }
}

impl FromStr for ConnectionUrl {
    type Err = UrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == SQLITE_MEMORY_URL {
            return Ok(Self::SqliteMemory);
        }
        if let Some(path) = s.strip_prefix(SQLITE_FILE_PREFIX) {
            if path.is_empty() {
                return Err(UrlError::Invalid {
                    url: s.to_string(),
                    reason: "sqlite file URL has an empty path".to_string(),
                });
            }
            return Ok(Self::SqliteFile(PathBuf::from(path)));
        }

        let parsed = Url::parse(s).map_err(|e| UrlError::Invalid {
            url: s.to_string(),
            reason: e.to_string(),
        })?;

        let net = parse_network(&parsed).map_err(|reason| UrlError::Invalid {
            url: s.to_string(),
            reason,
        })?;

        match parsed.scheme() {
            "postgresql" | "postgres" => Ok(Self::Postgresql(net)),
            "mysql" => Ok(Self::Mysql(net)),
            other => Err(UrlError::UnsupportedScheme(other.to_string())),
        }
    }
}

fn parse_network(parsed: &Url) -> Result<NetworkUrl, String> {
    let host = parsed
        .host_str()
        .ok_or_else(|| "missing host".to_string())?;
    let username = unescape_userinfo(parsed.username());
    if username.is_empty() {
        return Err("missing username".to_string());
    }
    let database = parsed.path().trim_start_matches('/');
    if database.is_empty() {
        return Err("missing database name".to_string());
    }

    let mut net = NetworkUrl::new(username, host, database);
    if let Some(password) = parsed.password() {
        net = net.password(unescape_userinfo(password));
    }
    if let Some(port) = parsed.port() {
        net = net.port(port);
    }
    Ok(net)
}

/// Percent-encode the characters that would make the userinfo segment
/// ambiguous (a password containing `:` or `@` must not split the URL).
fn escape_userinfo(s: &str) -> Cow<'_, str> {
    if !s.contains([':', '@', '/', '%']) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            ':' => out.push_str("%3A"),
            '@' => out.push_str("%40"),
            '/' => out.push_str("%2F"),
            '%' => out.push_str("%25"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

fn unescape_userinfo(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = &s[i + 1..i + 3];
            if let Ok(value) = u8::from_str_radix(hex, 16) {
                out.push(value);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}
