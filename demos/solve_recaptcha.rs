//! Solve a reCAPTCHA v2 challenge end to end
//!
//! Run with: NEXTCAPTCHA_CLIENT_KEY=... cargo run --example solve_recaptcha

use std::time::Instant;

use nextcaptcha::task::RecaptchaV2;
use nextcaptcha::NextCaptchaClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("info,nextcaptcha=debug")
        .init();

    println!("=== NextCaptcha Solve Test ===\n");

    // Step 1: Create the client from the environment
    println!("Step 1: Creating client...");
    let client = NextCaptchaClient::from_env()?;
    println!(
        "  Client ready (solve timeout: {}s)\n",
        client.config().solve_timeout().as_secs()
    );

    // Step 2: Check the account balance
    println!("Step 2: Checking balance...");
    match client.get_balance().await {
        Ok(balance) => println!("  Balance: {}\n", balance),
        Err(e) => println!("  Warning: balance check failed: {}\n", e),
    }

    // Step 3: Solve a demo challenge (Google's reCAPTCHA test page)
    println!("Step 3: Solving reCAPTCHA v2...");
    let params = RecaptchaV2::new(
        "https://www.google.com/recaptcha/api2/demo",
        "6Le-wvkSAAAAAPBMRTvw0Q4Muexq9bi0DJwx_mJ-",
    );

    let start = Instant::now();
    let result = client.recaptcha_v2(params).await?;
    let elapsed = start.elapsed();

    println!("\n=== Result ===");
    println!("Status: {:?}", result.status);
    println!("Time: {:.1}s", elapsed.as_secs_f64());

    match result.get_token() {
        Some(token) => println!("Token: {}...", &token[..token.len().min(60)]),
        None => println!(
            "Not solved: errorId={}, description={}",
            result.error_id,
            result.error_description.as_deref().unwrap_or("none")
        ),
    }

    Ok(())
}
