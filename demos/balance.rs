//! Print the account balance
//!
//! Run with: NEXTCAPTCHA_CLIENT_KEY=... cargo run --example balance

use nextcaptcha::NextCaptchaClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    let client = NextCaptchaClient::from_env()?;
    println!("Balance: {}", client.get_balance().await?);

    Ok(())
}
