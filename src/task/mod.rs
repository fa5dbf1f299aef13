//! Captcha task payloads and per-kind builders.
//!
//! Supported kinds:
//! - reCAPTCHA v2 (plus Enterprise and HS Enterprise)
//! - reCAPTCHA v3 (plus HS)
//! - mobile reCAPTCHA
//! - hCaptcha (plus Enterprise)

mod builder;
mod types;

pub use builder::{
    HCaptcha, HCaptchaEnterprise, RecaptchaMobile, RecaptchaV2, RecaptchaV2Enterprise,
    RecaptchaV2HsEnterprise, RecaptchaV3, RecaptchaV3Hs,
};
pub use types::{CaptchaTask, ProxyConnection};
