use std::net::SocketAddr;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen: SocketAddr,
    /// SurrealDB endpoint, e.g. `surrealkv://.clientes/db` or `mem://`.
    pub db_endpoint: String,
}

impl ServerConfig {
    /// Directory to create before connecting, for on-disk endpoints.
    pub fn db_dir(&self) -> Option<&str> {
        self.db_endpoint
            .strip_prefix("surrealkv://")
            .filter(|dir| !dir.is_empty())
    }
}
