use dotenvy::dotenv;
use wallet_sdk::error_message;

mod common;

#[tokio::main]
async fn main() {
    dotenv().ok();
    common::init_tracing();

    let client = common::get_client();
    let identifier = std::env::args()
        .nth(1)
        .or_else(|| client.session().current_identifier())
        .expect("pass a mobile number or log in first");

    // Sequenced so the balance reflects any transaction listed before it.
    let transactions = client.transactions(&identifier).await;
    let balance = client.balance(&identifier).await;
    let earnings = client.earnings(&identifier).await;

    for (label, response) in [
        ("transactions", transactions),
        ("balance", balance),
        ("earnings", earnings),
    ] {
        if response.ok {
            println!("{label}:\n{}", response.display_text());
        } else {
            println!("{label} failed ({}): {}", response.status_code, error_message(&response));
        }
    }
}
