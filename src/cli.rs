use clap::Parser;

use crate::config::AppConfig;

#[derive(Debug, Parser)]
#[command(name = "ngo-scholarship-api")]
#[command(about = "REST backend for the NGO scholarship platform")]
#[command(version)]
pub struct Cli {
    #[arg(long, help = "Bind address (overrides HOST)")]
    pub host: Option<String>,

    #[arg(long, help = "Listen port (overrides PORT)")]
    pub port: Option<u16>,

    #[arg(long, help = "Serve from a seeded in-process store instead of Postgres")]
    pub in_memory: bool,
}

impl Cli {
    /// Command-line flags win over environment configuration.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}
