mod api;
mod args;
mod dal;
mod error;
mod stats;

use std::{io, net::SocketAddr};

use tracing::info;

pub use api::ApiBuilder;
pub use args::Args;
pub use dal::{Dal, Sqlite, MIGRATIONS};
pub use error::Error;

pub async fn start(sqlite: Sqlite, address: SocketAddr) -> io::Result<()> {
    let router = api::ApiBuilder::new().with_sqlite(sqlite).into_router();

    info!(address = %address, "Binding to and listening at address");

    api::serve(router, address).await;

    Ok(())
}
