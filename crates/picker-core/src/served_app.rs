use std::fmt;

/// Whether the preview application is currently being served.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ServedAppStatus {
    Offline,
    Online { url: String, port: String },
}

impl ServedAppStatus {
    pub fn from_active_host(host: Option<&str>) -> Self {
        match host.map(str::trim).filter(|host| !host.is_empty()) {
            None => ServedAppStatus::Offline,
            Some(url) => {
                let port = url.rsplit(':').next().unwrap_or(url).to_string();
                ServedAppStatus::Online {
                    url: url.to_string(),
                    port,
                }
            }
        }
    }

    pub fn is_online(&self) -> bool {
        matches!(self, ServedAppStatus::Online { .. })
    }
}

impl fmt::Display for ServedAppStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServedAppStatus::Offline => f.write_str("App Offline"),
            ServedAppStatus::Online { url, port } => write!(f, "App Online {url} ({port})"),
        }
    }
}
