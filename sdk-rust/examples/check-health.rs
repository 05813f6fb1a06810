use dotenvy::dotenv;
use wallet_sdk::health_status;

mod common;

#[tokio::main]
async fn main() {
    dotenv().ok();
    common::init_tracing();

    let client = common::get_client();
    println!("base url: {}", client.environment().resolve_base_url());

    let response = client.health().await;

    println!("health: {}", health_status(&response));
    println!("{response:#?}");
}
