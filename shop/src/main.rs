use clap::Parser;
use shop_api::{Args, Sqlite};
use shop_common::backends::tracing::setup_tracing;
use tracing::trace;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    setup_tracing(tracing_subscriber::registry(), "shop-api");

    trace!(args = ?args, "parsed args");

    let sqlite = Sqlite::new(&args.db_connection_uri)
        .await
        .expect("to open the shop state database");

    shop_api::start(sqlite, args.address)
        .await
        .expect("to start the shop api");
}
