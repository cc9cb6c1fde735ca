use aws_config::{BehaviorVersion, Region};
use lambda_http::{run, service_fn, tracing, Error};

mod config;
mod error;
mod http_handler;
mod model;
mod operations;
mod store;

use config::Config;
use http_handler::function_handler;
use store::DynamoDbStore;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();

    let config = Config::from_env();
    tracing::info!(table = %config.table_name, region = %config.region, "Starting todos handler");

    let sdk_config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.region))
        .load()
        .await;
    let client = aws_sdk_dynamodb::Client::new(&sdk_config);
    let store = DynamoDbStore::new(client, config.table_name);

    run(service_fn(|event| function_handler(&store, event))).await
}
