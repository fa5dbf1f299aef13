//! Per-kind task parameters.
//!
//! Each struct gathers the fields of one captcha kind and converts into the
//! matching [`CaptchaTask`] variant. Proxy-capable kinds switch to the
//! proxied task type as soon as a proxy route is configured.

use serde_json::{json, Value};

use super::types::{CaptchaTask, ProxyConnection};

/// Parameters for a reCAPTCHA v2 challenge.
#[derive(Debug, Clone)]
pub struct RecaptchaV2 {
    pub website_url: String,
    pub website_key: String,
    pub recaptcha_data_s_value: String,
    pub is_invisible: bool,
    pub api_domain: String,
    pub page_action: String,
    pub website_info: String,
}

impl RecaptchaV2 {
    /// Create reCAPTCHA v2 parameters for a site.
    pub fn new(website_url: &str, website_key: &str) -> Self {
        Self {
            website_url: website_url.to_string(),
            website_key: website_key.to_string(),
            recaptcha_data_s_value: String::new(),
            is_invisible: false,
            api_domain: String::new(),
            page_action: String::new(),
            website_info: String::new(),
        }
    }

    /// Set the `data-s` value found on some protected pages.
    pub fn with_data_s_value(mut self, value: &str) -> Self {
        self.recaptcha_data_s_value = value.to_string();
        self
    }

    /// Mark the widget as invisible.
    pub fn with_invisible(mut self, invisible: bool) -> Self {
        self.is_invisible = invisible;
        self
    }

    /// Set the reCAPTCHA API domain (google.com or recaptcha.net).
    pub fn with_api_domain(mut self, domain: &str) -> Self {
        self.api_domain = domain.to_string();
        self
    }

    /// Set the page action.
    pub fn with_page_action(mut self, action: &str) -> Self {
        self.page_action = action.to_string();
        self
    }

    /// Attach extra website info.
    pub fn with_website_info(mut self, info: &str) -> Self {
        self.website_info = info.to_string();
        self
    }
}

impl From<RecaptchaV2> for CaptchaTask {
    fn from(p: RecaptchaV2) -> Self {
        CaptchaTask::RecaptchaV2Proxyless {
            website_url: p.website_url,
            website_key: p.website_key,
            recaptcha_data_s_value: p.recaptcha_data_s_value,
            is_invisible: p.is_invisible,
            api_domain: p.api_domain,
            page_action: p.page_action,
            website_info: p.website_info,
        }
    }
}

/// Parameters for a reCAPTCHA v2 Enterprise challenge.
#[derive(Debug, Clone)]
pub struct RecaptchaV2Enterprise {
    pub website_url: String,
    pub website_key: String,
    pub enterprise_payload: Value,
    pub is_invisible: bool,
    pub api_domain: String,
    pub page_action: String,
    pub website_info: String,
}

impl RecaptchaV2Enterprise {
    /// Create reCAPTCHA v2 Enterprise parameters for a site.
    pub fn new(website_url: &str, website_key: &str) -> Self {
        Self {
            website_url: website_url.to_string(),
            website_key: website_key.to_string(),
            enterprise_payload: json!({}),
            is_invisible: false,
            api_domain: String::new(),
            page_action: String::new(),
            website_info: String::new(),
        }
    }

    /// Set the enterprise payload object (`s` value and friends).
    pub fn with_enterprise_payload(mut self, payload: Value) -> Self {
        self.enterprise_payload = payload;
        self
    }

    /// Mark the widget as invisible.
    pub fn with_invisible(mut self, invisible: bool) -> Self {
        self.is_invisible = invisible;
        self
    }

    /// Set the reCAPTCHA API domain.
    pub fn with_api_domain(mut self, domain: &str) -> Self {
        self.api_domain = domain.to_string();
        self
    }

    /// Set the page action.
    pub fn with_page_action(mut self, action: &str) -> Self {
        self.page_action = action.to_string();
        self
    }

    /// Attach extra website info.
    pub fn with_website_info(mut self, info: &str) -> Self {
        self.website_info = info.to_string();
        self
    }
}

impl From<RecaptchaV2Enterprise> for CaptchaTask {
    fn from(p: RecaptchaV2Enterprise) -> Self {
        CaptchaTask::RecaptchaV2EnterpriseProxyless {
            website_url: p.website_url,
            website_key: p.website_key,
            enterprise_payload: p.enterprise_payload,
            is_invisible: p.is_invisible,
            api_domain: p.api_domain,
            page_action: p.page_action,
            website_info: p.website_info,
        }
    }
}

/// Parameters for a reCAPTCHA v2 HS Enterprise challenge.
///
/// Same shape as [`RecaptchaV2Enterprise`], solved through the high-score
/// pipeline.
#[derive(Debug, Clone)]
pub struct RecaptchaV2HsEnterprise {
    pub website_url: String,
    pub website_key: String,
    pub enterprise_payload: Value,
    pub is_invisible: bool,
    pub api_domain: String,
    pub page_action: String,
    pub website_info: String,
}

impl RecaptchaV2HsEnterprise {
    /// Create reCAPTCHA v2 HS Enterprise parameters for a site.
    pub fn new(website_url: &str, website_key: &str) -> Self {
        Self {
            website_url: website_url.to_string(),
            website_key: website_key.to_string(),
            enterprise_payload: json!({}),
            is_invisible: false,
            api_domain: String::new(),
            page_action: String::new(),
            website_info: String::new(),
        }
    }

    /// Set the enterprise payload object.
    pub fn with_enterprise_payload(mut self, payload: Value) -> Self {
        self.enterprise_payload = payload;
        self
    }

    /// Mark the widget as invisible.
    pub fn with_invisible(mut self, invisible: bool) -> Self {
        self.is_invisible = invisible;
        self
    }

    /// Set the reCAPTCHA API domain.
    pub fn with_api_domain(mut self, domain: &str) -> Self {
        self.api_domain = domain.to_string();
        self
    }

    /// Set the page action.
    pub fn with_page_action(mut self, action: &str) -> Self {
        self.page_action = action.to_string();
        self
    }

    /// Attach extra website info.
    pub fn with_website_info(mut self, info: &str) -> Self {
        self.website_info = info.to_string();
        self
    }
}

impl From<RecaptchaV2HsEnterprise> for CaptchaTask {
    fn from(p: RecaptchaV2HsEnterprise) -> Self {
        CaptchaTask::RecaptchaV2HsEnterpriseProxyless {
            website_url: p.website_url,
            website_key: p.website_key,
            enterprise_payload: p.enterprise_payload,
            is_invisible: p.is_invisible,
            api_domain: p.api_domain,
            page_action: p.page_action,
            website_info: p.website_info,
        }
    }
}

/// Parameters for a reCAPTCHA v3 challenge.
///
/// Becomes a `RecaptchaV3Task` when a proxy route is set, otherwise
/// `RecaptchaV3TaskProxyless`.
#[derive(Debug, Clone)]
pub struct RecaptchaV3 {
    pub website_url: String,
    pub website_key: String,
    pub page_action: String,
    pub api_domain: String,
    pub website_info: String,
    pub proxy: ProxyConnection,
}

impl RecaptchaV3 {
    /// Create reCAPTCHA v3 parameters for a site.
    pub fn new(website_url: &str, website_key: &str) -> Self {
        Self {
            website_url: website_url.to_string(),
            website_key: website_key.to_string(),
            page_action: String::new(),
            api_domain: String::new(),
            website_info: String::new(),
            proxy: ProxyConnection::default(),
        }
    }

    /// Set the page action the token is minted for.
    pub fn with_page_action(mut self, action: &str) -> Self {
        self.page_action = action.to_string();
        self
    }

    /// Set the reCAPTCHA API domain.
    pub fn with_api_domain(mut self, domain: &str) -> Self {
        self.api_domain = domain.to_string();
        self
    }

    /// Attach extra website info.
    pub fn with_website_info(mut self, info: &str) -> Self {
        self.website_info = info.to_string();
        self
    }

    /// Route the solve through a proxy.
    pub fn with_proxy(mut self, proxy: ProxyConnection) -> Self {
        self.proxy = proxy;
        self
    }
}

impl From<RecaptchaV3> for CaptchaTask {
    fn from(p: RecaptchaV3) -> Self {
        if p.proxy.is_configured() {
            CaptchaTask::RecaptchaV3 {
                website_url: p.website_url,
                website_key: p.website_key,
                page_action: p.page_action,
                api_domain: p.api_domain,
                website_info: p.website_info,
                proxy: p.proxy,
            }
        } else {
            CaptchaTask::RecaptchaV3Proxyless {
                website_url: p.website_url,
                website_key: p.website_key,
                page_action: p.page_action,
                api_domain: p.api_domain,
                website_info: p.website_info,
            }
        }
    }
}

/// Parameters for a reCAPTCHA v3 HS challenge.
///
/// Always proxyless; the high-score pipeline does not take proxy routes.
#[derive(Debug, Clone)]
pub struct RecaptchaV3Hs {
    pub website_url: String,
    pub website_key: String,
    pub page_action: String,
    pub api_domain: String,
    pub website_info: String,
}

impl RecaptchaV3Hs {
    /// Create reCAPTCHA v3 HS parameters for a site.
    pub fn new(website_url: &str, website_key: &str) -> Self {
        Self {
            website_url: website_url.to_string(),
            website_key: website_key.to_string(),
            page_action: String::new(),
            api_domain: String::new(),
            website_info: String::new(),
        }
    }

    /// Set the page action the token is minted for.
    pub fn with_page_action(mut self, action: &str) -> Self {
        self.page_action = action.to_string();
        self
    }

    /// Set the reCAPTCHA API domain.
    pub fn with_api_domain(mut self, domain: &str) -> Self {
        self.api_domain = domain.to_string();
        self
    }

    /// Attach extra website info.
    pub fn with_website_info(mut self, info: &str) -> Self {
        self.website_info = info.to_string();
        self
    }
}

impl From<RecaptchaV3Hs> for CaptchaTask {
    fn from(p: RecaptchaV3Hs) -> Self {
        CaptchaTask::RecaptchaV3HsProxyless {
            website_url: p.website_url,
            website_key: p.website_key,
            page_action: p.page_action,
            api_domain: p.api_domain,
            website_info: p.website_info,
        }
    }
}

/// Parameters for a mobile reCAPTCHA challenge.
///
/// Becomes a `ReCaptchaMobileTask` when a proxy route is set, otherwise
/// `ReCaptchaMobileTaskProxyLess`.
#[derive(Debug, Clone)]
pub struct RecaptchaMobile {
    pub app_key: String,
    pub app_package_name: String,
    pub app_action: String,
    pub app_device: String,
    pub proxy: ProxyConnection,
}

impl RecaptchaMobile {
    /// Create mobile reCAPTCHA parameters for an app key.
    ///
    /// The device defaults to `ios`.
    pub fn new(app_key: &str) -> Self {
        Self {
            app_key: app_key.to_string(),
            app_package_name: String::new(),
            app_action: String::new(),
            app_device: "ios".to_string(),
            proxy: ProxyConnection::default(),
        }
    }

    /// Set the app package name (bundle id).
    pub fn with_package_name(mut self, name: &str) -> Self {
        self.app_package_name = name.to_string();
        self
    }

    /// Set the in-app action.
    pub fn with_action(mut self, action: &str) -> Self {
        self.app_action = action.to_string();
        self
    }

    /// Set the device platform (ios or android).
    pub fn with_device(mut self, device: &str) -> Self {
        self.app_device = device.to_string();
        self
    }

    /// Route the solve through a proxy.
    pub fn with_proxy(mut self, proxy: ProxyConnection) -> Self {
        self.proxy = proxy;
        self
    }
}

impl From<RecaptchaMobile> for CaptchaTask {
    fn from(p: RecaptchaMobile) -> Self {
        if p.proxy.is_configured() {
            CaptchaTask::RecaptchaMobile {
                app_key: p.app_key,
                app_package_name: p.app_package_name,
                app_action: p.app_action,
                app_device: p.app_device,
                proxy: p.proxy,
            }
        } else {
            CaptchaTask::RecaptchaMobileProxyless {
                app_key: p.app_key,
                app_package_name: p.app_package_name,
                app_action: p.app_action,
                app_device: p.app_device,
            }
        }
    }
}

/// Parameters for an hCaptcha challenge.
///
/// Becomes an `HCaptchaTask` when a proxy route is set, otherwise
/// `HCaptchaTaskProxyless`.
#[derive(Debug, Clone)]
pub struct HCaptcha {
    pub website_url: String,
    pub website_key: String,
    pub is_invisible: bool,
    pub enterprise_payload: Value,
    pub proxy: ProxyConnection,
}

impl HCaptcha {
    /// Create hCaptcha parameters for a site.
    pub fn new(website_url: &str, website_key: &str) -> Self {
        Self {
            website_url: website_url.to_string(),
            website_key: website_key.to_string(),
            is_invisible: false,
            enterprise_payload: json!({}),
            proxy: ProxyConnection::default(),
        }
    }

    /// Mark the widget as invisible.
    pub fn with_invisible(mut self, invisible: bool) -> Self {
        self.is_invisible = invisible;
        self
    }

    /// Set the enterprise payload object (rqdata and friends).
    pub fn with_enterprise_payload(mut self, payload: Value) -> Self {
        self.enterprise_payload = payload;
        self
    }

    /// Route the solve through a proxy.
    pub fn with_proxy(mut self, proxy: ProxyConnection) -> Self {
        self.proxy = proxy;
        self
    }
}

impl From<HCaptcha> for CaptchaTask {
    fn from(p: HCaptcha) -> Self {
        if p.proxy.is_configured() {
            CaptchaTask::HCaptcha {
                website_url: p.website_url,
                website_key: p.website_key,
                is_invisible: p.is_invisible,
                enterprise_payload: p.enterprise_payload,
                proxy: p.proxy,
            }
        } else {
            CaptchaTask::HCaptchaProxyless {
                website_url: p.website_url,
                website_key: p.website_key,
                is_invisible: p.is_invisible,
                enterprise_payload: p.enterprise_payload,
            }
        }
    }
}

/// Parameters for an hCaptcha Enterprise challenge.
///
/// Always sent as `HCaptchaEnterpriseTask`; the proxy fields go on the wire
/// whether or not a route is configured.
#[derive(Debug, Clone)]
pub struct HCaptchaEnterprise {
    pub website_url: String,
    pub website_key: String,
    pub enterprise_payload: Value,
    pub is_invisible: bool,
    pub proxy: ProxyConnection,
}

impl HCaptchaEnterprise {
    /// Create hCaptcha Enterprise parameters for a site.
    pub fn new(website_url: &str, website_key: &str) -> Self {
        Self {
            website_url: website_url.to_string(),
            website_key: website_key.to_string(),
            enterprise_payload: json!({}),
            is_invisible: false,
            proxy: ProxyConnection::default(),
        }
    }

    /// Set the enterprise payload object.
    pub fn with_enterprise_payload(mut self, payload: Value) -> Self {
        self.enterprise_payload = payload;
        self
    }

    /// Mark the widget as invisible.
    pub fn with_invisible(mut self, invisible: bool) -> Self {
        self.is_invisible = invisible;
        self
    }

    /// Route the solve through a proxy.
    pub fn with_proxy(mut self, proxy: ProxyConnection) -> Self {
        self.proxy = proxy;
        self
    }
}

impl From<HCaptchaEnterprise> for CaptchaTask {
    fn from(p: HCaptchaEnterprise) -> Self {
        CaptchaTask::HCaptchaEnterprise {
            website_url: p.website_url,
            website_key: p.website_key,
            enterprise_payload: p.enterprise_payload,
            is_invisible: p.is_invisible,
            proxy: p.proxy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recaptcha_v2_builds_proxyless_task() {
        let task: CaptchaTask = RecaptchaV2::new("https://example.com", "key")
            .with_data_s_value("data-s")
            .with_invisible(true)
            .into();

        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["type"], "RecaptchaV2TaskProxyless");
        assert_eq!(value["recaptchaDataSValue"], "data-s");
        assert_eq!(value["isInvisible"], true);
        assert_eq!(value["apiDomain"], "");
    }

    #[test]
    fn recaptcha_v3_switches_type_on_proxy() {
        let proxyless: CaptchaTask = RecaptchaV3::new("https://example.com", "key")
            .with_page_action("login")
            .into();
        assert_eq!(proxyless.type_tag(), "RecaptchaV3TaskProxyless");

        let proxied: CaptchaTask = RecaptchaV3::new("https://example.com", "key")
            .with_page_action("login")
            .with_proxy(ProxyConnection::new("http", "1.2.3.4", 8080))
            .into();
        assert_eq!(proxied.type_tag(), "RecaptchaV3Task");

        let value = serde_json::to_value(&proxied).unwrap();
        assert_eq!(value["pageAction"], "login");
        assert_eq!(value["proxyAddress"], "1.2.3.4");
    }

    #[test]
    fn empty_proxy_address_stays_proxyless() {
        let task: CaptchaTask = RecaptchaV3::new("https://example.com", "key")
            .with_proxy(ProxyConnection::new("http", "", 8080))
            .into();
        assert_eq!(task.type_tag(), "RecaptchaV3TaskProxyless");

        let value = serde_json::to_value(&task).unwrap();
        assert!(value.get("proxyAddress").is_none());
    }

    #[test]
    fn v3_hs_never_takes_a_proxy_type() {
        let task: CaptchaTask = RecaptchaV3Hs::new("https://example.com", "key")
            .with_page_action("checkout")
            .into();
        assert_eq!(task.type_tag(), "RecaptchaV3HSTaskProxyless");
    }

    #[test]
    fn mobile_defaults_to_ios_and_switches_on_proxy() {
        let proxyless: CaptchaTask = RecaptchaMobile::new("app-key").into();
        let value = serde_json::to_value(&proxyless).unwrap();
        assert_eq!(value["type"], "ReCaptchaMobileTaskProxyLess");
        assert_eq!(value["appDevice"], "ios");

        let proxied: CaptchaTask = RecaptchaMobile::new("app-key")
            .with_package_name("com.example.app")
            .with_device("android")
            .with_proxy(ProxyConnection::new("socks5", "1.2.3.4", 1080))
            .into();
        let value = serde_json::to_value(&proxied).unwrap();
        assert_eq!(value["type"], "ReCaptchaMobileTask");
        assert_eq!(value["appPackageName"], "com.example.app");
        assert_eq!(value["appDevice"], "android");
        assert_eq!(value["proxyPort"], 1080);
    }

    #[test]
    fn hcaptcha_switches_on_proxy_and_keeps_payload() {
        let payload = serde_json::json!({"rqdata": "abc"});

        let proxyless: CaptchaTask = HCaptcha::new("https://example.com", "key")
            .with_enterprise_payload(payload.clone())
            .into();
        let value = serde_json::to_value(&proxyless).unwrap();
        assert_eq!(value["type"], "HCaptchaTaskProxyless");
        assert_eq!(value["enterprisePayload"]["rqdata"], "abc");

        let proxied: CaptchaTask = HCaptcha::new("https://example.com", "key")
            .with_enterprise_payload(payload)
            .with_proxy(ProxyConnection::new("http", "1.2.3.4", 8080))
            .into();
        assert_eq!(proxied.type_tag(), "HCaptchaTask");
    }

    #[test]
    fn hcaptcha_enterprise_tag_never_switches() {
        let without_proxy: CaptchaTask =
            HCaptchaEnterprise::new("https://example.com", "key").into();
        assert_eq!(without_proxy.type_tag(), "HCaptchaEnterpriseTask");

        let with_proxy: CaptchaTask = HCaptchaEnterprise::new("https://example.com", "key")
            .with_proxy(ProxyConnection::new("http", "1.2.3.4", 8080))
            .into();
        assert_eq!(with_proxy.type_tag(), "HCaptchaEnterpriseTask");

        let value = serde_json::to_value(&with_proxy).unwrap();
        assert_eq!(value["proxyAddress"], "1.2.3.4");
    }

    #[test]
    fn enterprise_payload_defaults_to_empty_object() {
        let task: CaptchaTask = RecaptchaV2Enterprise::new("https://example.com", "key").into();
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["enterprisePayload"], serde_json::json!({}));
    }
}
