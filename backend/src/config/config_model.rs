use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub backend_server: BackendServer,
    pub database: Database,
    pub mobile_auth: MobileAuth,
    pub session: Session,
    pub invoices: Invoices,
}

#[derive(Debug, Clone)]
pub struct BackendServer {
    pub port: u16,
    /// MiB.
    pub body_limit: u64,
    /// Seconds.
    pub timeout: u64,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct MobileAuth {
    pub public_key_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub cookie_name: String,
}

#[derive(Debug, Clone)]
pub struct Invoices {
    pub currency: String,
}
