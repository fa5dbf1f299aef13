//! Wire representation of captcha tasks.
//!
//! Every variant maps to one task `type` tag of the createTask endpoint.
//! Declared fields are always serialized, empty or not; the service treats a
//! missing field and an empty one differently for some task kinds.

use serde::Serialize;
use serde_json::Value;

/// Proxy route attached to proxy-capable task kinds.
///
/// An empty address means no route: the builders fall back to the proxyless
/// task type in that case.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyConnection {
    /// Proxy protocol (http, https, socks4, socks5)
    pub proxy_type: String,
    /// Proxy host address
    pub proxy_address: String,
    /// Proxy port
    pub proxy_port: u16,
    /// Proxy username
    pub proxy_login: String,
    /// Proxy password
    pub proxy_password: String,
}

impl ProxyConnection {
    /// Create a proxy route.
    pub fn new(proxy_type: &str, address: &str, port: u16) -> Self {
        Self {
            proxy_type: proxy_type.to_string(),
            proxy_address: address.to_string(),
            proxy_port: port,
            ..Default::default()
        }
    }

    /// Set the proxy credentials.
    pub fn with_credentials(mut self, login: &str, password: &str) -> Self {
        self.proxy_login = login.to_string();
        self.proxy_password = password.to_string();
        self
    }

    /// A route only counts when an address is set.
    pub fn is_configured(&self) -> bool {
        !self.proxy_address.is_empty()
    }
}

/// Task payload sent to createTask, tagged with the wire task type.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum CaptchaTask {
    #[serde(rename = "RecaptchaV2TaskProxyless")]
    RecaptchaV2Proxyless {
        #[serde(rename = "websiteURL")]
        website_url: String,
        #[serde(rename = "websiteKey")]
        website_key: String,
        #[serde(rename = "recaptchaDataSValue")]
        recaptcha_data_s_value: String,
        #[serde(rename = "isInvisible")]
        is_invisible: bool,
        #[serde(rename = "apiDomain")]
        api_domain: String,
        #[serde(rename = "pageAction")]
        page_action: String,
        #[serde(rename = "websiteInfo")]
        website_info: String,
    },

    #[serde(rename = "RecaptchaV2EnterpriseTaskProxyless")]
    RecaptchaV2EnterpriseProxyless {
        #[serde(rename = "websiteURL")]
        website_url: String,
        #[serde(rename = "websiteKey")]
        website_key: String,
        #[serde(rename = "enterprisePayload")]
        enterprise_payload: Value,
        #[serde(rename = "isInvisible")]
        is_invisible: bool,
        #[serde(rename = "apiDomain")]
        api_domain: String,
        #[serde(rename = "pageAction")]
        page_action: String,
        #[serde(rename = "websiteInfo")]
        website_info: String,
    },

    #[serde(rename = "RecaptchaV2HSEnterpriseTaskProxyless")]
    RecaptchaV2HsEnterpriseProxyless {
        #[serde(rename = "websiteURL")]
        website_url: String,
        #[serde(rename = "websiteKey")]
        website_key: String,
        #[serde(rename = "enterprisePayload")]
        enterprise_payload: Value,
        #[serde(rename = "isInvisible")]
        is_invisible: bool,
        #[serde(rename = "apiDomain")]
        api_domain: String,
        #[serde(rename = "pageAction")]
        page_action: String,
        #[serde(rename = "websiteInfo")]
        website_info: String,
    },

    #[serde(rename = "RecaptchaV3TaskProxyless")]
    RecaptchaV3Proxyless {
        #[serde(rename = "websiteURL")]
        website_url: String,
        #[serde(rename = "websiteKey")]
        website_key: String,
        #[serde(rename = "pageAction")]
        page_action: String,
        #[serde(rename = "apiDomain")]
        api_domain: String,
        #[serde(rename = "websiteInfo")]
        website_info: String,
    },

    #[serde(rename = "RecaptchaV3HSTaskProxyless")]
    RecaptchaV3HsProxyless {
        #[serde(rename = "websiteURL")]
        website_url: String,
        #[serde(rename = "websiteKey")]
        website_key: String,
        #[serde(rename = "pageAction")]
        page_action: String,
        #[serde(rename = "apiDomain")]
        api_domain: String,
        #[serde(rename = "websiteInfo")]
        website_info: String,
    },

    #[serde(rename = "RecaptchaV3Task")]
    RecaptchaV3 {
        #[serde(rename = "websiteURL")]
        website_url: String,
        #[serde(rename = "websiteKey")]
        website_key: String,
        #[serde(rename = "pageAction")]
        page_action: String,
        #[serde(rename = "apiDomain")]
        api_domain: String,
        #[serde(rename = "websiteInfo")]
        website_info: String,
        #[serde(flatten)]
        proxy: ProxyConnection,
    },

    // The service spells this tag with a capital L.
    #[serde(rename = "ReCaptchaMobileTaskProxyLess")]
    RecaptchaMobileProxyless {
        #[serde(rename = "appKey")]
        app_key: String,
        #[serde(rename = "appPackageName")]
        app_package_name: String,
        #[serde(rename = "appAction")]
        app_action: String,
        #[serde(rename = "appDevice")]
        app_device: String,
    },

    #[serde(rename = "ReCaptchaMobileTask")]
    RecaptchaMobile {
        #[serde(rename = "appKey")]
        app_key: String,
        #[serde(rename = "appPackageName")]
        app_package_name: String,
        #[serde(rename = "appAction")]
        app_action: String,
        #[serde(rename = "appDevice")]
        app_device: String,
        #[serde(flatten)]
        proxy: ProxyConnection,
    },

    #[serde(rename = "HCaptchaTaskProxyless")]
    HCaptchaProxyless {
        #[serde(rename = "websiteURL")]
        website_url: String,
        #[serde(rename = "websiteKey")]
        website_key: String,
        #[serde(rename = "isInvisible")]
        is_invisible: bool,
        #[serde(rename = "enterprisePayload")]
        enterprise_payload: Value,
    },

    #[serde(rename = "HCaptchaTask")]
    HCaptcha {
        #[serde(rename = "websiteURL")]
        website_url: String,
        #[serde(rename = "websiteKey")]
        website_key: String,
        #[serde(rename = "isInvisible")]
        is_invisible: bool,
        #[serde(rename = "enterprisePayload")]
        enterprise_payload: Value,
        #[serde(flatten)]
        proxy: ProxyConnection,
    },

    // hCaptcha Enterprise always carries the proxy block, configured or not.
    #[serde(rename = "HCaptchaEnterpriseTask")]
    HCaptchaEnterprise {
        #[serde(rename = "websiteURL")]
        website_url: String,
        #[serde(rename = "websiteKey")]
        website_key: String,
        #[serde(rename = "enterprisePayload")]
        enterprise_payload: Value,
        #[serde(rename = "isInvisible")]
        is_invisible: bool,
        #[serde(flatten)]
        proxy: ProxyConnection,
    },
}

impl CaptchaTask {
    /// Wire task type tag.
    pub fn type_tag(&self) -> &'static str {
        match self {
            Self::RecaptchaV2Proxyless { .. } => "RecaptchaV2TaskProxyless",
            Self::RecaptchaV2EnterpriseProxyless { .. } => "RecaptchaV2EnterpriseTaskProxyless",
            Self::RecaptchaV2HsEnterpriseProxyless { .. } => "RecaptchaV2HSEnterpriseTaskProxyless",
            Self::RecaptchaV3Proxyless { .. } => "RecaptchaV3TaskProxyless",
            Self::RecaptchaV3HsProxyless { .. } => "RecaptchaV3HSTaskProxyless",
            Self::RecaptchaV3 { .. } => "RecaptchaV3Task",
            Self::RecaptchaMobileProxyless { .. } => "ReCaptchaMobileTaskProxyLess",
            Self::RecaptchaMobile { .. } => "ReCaptchaMobileTask",
            Self::HCaptchaProxyless { .. } => "HCaptchaTaskProxyless",
            Self::HCaptcha { .. } => "HCaptchaTask",
            Self::HCaptchaEnterprise { .. } => "HCaptchaEnterpriseTask",
        }
    }
}
