use std::net::SocketAddr;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
pub struct Args {
    /// Address to bind to
    #[arg(long, default_value = "0.0.0.0:8001")]
    pub address: SocketAddr,

    /// Where to store the shop state (items and carts)
    #[arg(long, default_value = "sqlite://shop.sqlite")]
    pub db_connection_uri: String,
}
