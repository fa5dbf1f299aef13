//! Task submission and result polling.

mod client;
mod models;

pub use client::NextCaptchaClient;
pub use models::{Solution, TaskResult, TaskStatus};
