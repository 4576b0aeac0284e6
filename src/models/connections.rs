use serde::{Deserialize, Serialize};

/// Connection settings for the target SQL Server instance.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ConnectParams {
    pub host: String,
    pub port: u16,
    pub catalog: String,
    pub user: String,
    pub password: String,
}

impl ConnectParams {
    /// Builds params from a `host[,port]` data source string, the form the
    /// `-s` flag accepts (e.g. "localhost,1433").
    pub fn new(data_source: &str, catalog: &str, user: &str, password: &str) -> Self {
        let (host, port) = match data_source.split_once(',') {
            Some((host, port)) => (host, port.trim().parse().unwrap_or(1433)),
            None => (data_source, 1433),
        };
        ConnectParams {
            host: host.to_string(),
            port,
            catalog: catalog.to_string(),
            user: user.to_string(),
            password: password.to_string(),
        }
    }
}
