//! # nextcaptcha
//!
//! Rust client for the NextCaptcha solving service. Submits captcha tasks and
//! polls until a solution arrives, the service fails the task, or the solve
//! timeout runs out.
//!
//! Supported captcha kinds:
//! - reCAPTCHA v2, v2 Enterprise, v2 HS Enterprise
//! - reCAPTCHA v3, v3 HS
//! - mobile reCAPTCHA
//! - hCaptcha, hCaptcha Enterprise
//!
//! ## Quick Start
//!
//! ```no_run
//! use nextcaptcha::task::RecaptchaV2;
//! use nextcaptcha::{ClientConfig, NextCaptchaClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = NextCaptchaClient::new(ClientConfig::new("your-client-key"))?;
//!
//!     println!("balance: {}", client.get_balance().await?);
//!
//!     let result = client
//!         .recaptcha_v2(RecaptchaV2::new("https://example.com", "site-key"))
//!         .await?;
//!
//!     match result.get_token() {
//!         Some(token) => println!("token: {token}"),
//!         None => println!("not solved: {:?}", result.error_description),
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! Task outcomes the service reports (solved, failed, timed out) come back as
//! [`TaskResult`] values; [`Error`] is reserved for transport and protocol
//! faults.

pub mod clock;
pub mod config;
pub mod error;
pub mod solver;
pub mod task;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use solver::{NextCaptchaClient, Solution, TaskResult, TaskStatus};
