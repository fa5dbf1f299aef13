//! NextCaptcha API client: task submission and result polling.

use std::sync::Arc;

use reqwest::Client;
use tracing::{debug, error, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::task::{
    CaptchaTask, HCaptcha, HCaptchaEnterprise, RecaptchaMobile, RecaptchaV2, RecaptchaV2Enterprise,
    RecaptchaV2HsEnterprise, RecaptchaV3, RecaptchaV3Hs,
};

use super::models::{
    BalanceResponse, CreateTaskRequest, CreateTaskResponse, TaskResult, TaskResultRequest,
};

/// Asynchronous NextCaptcha client.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct NextCaptchaClient {
    config: ClientConfig,
    client: Client,
    clock: Arc<dyn Clock>,
}

impl NextCaptchaClient {
    /// Create a client from a configuration.
    ///
    /// Fails when no client key is set or the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        if !config.is_configured() {
            return Err(Error::MissingClientKey);
        }

        let mut builder = Client::builder()
            .timeout(config.request_timeout())
            .pool_max_idle_per_host(config.pool_max_size);

        if !config.verify_tls {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder.build()?;

        info!(
            "NextCaptcha client created (softId={}, callbackUrl={})",
            config.soft_id, config.callback_url
        );

        Ok(Self {
            config,
            client,
            clock: Arc::new(SystemClock),
        })
    }

    /// Create a client from `NEXTCAPTCHA_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env())
    }

    /// Replace the time source driving the poll loop.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Query the account balance.
    pub async fn get_balance(&self) -> Result<String> {
        let url = format!("{}/getBalance", self.config.api_base_url);

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "clientKey": self.config.client_key }))
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            error!("getBalance failed: {} {}", status, text);
            return Err(Error::Api {
                status: status.as_u16(),
                body: decode_body(&text),
            });
        }

        let parsed: BalanceResponse = serde_json::from_str(&text)
            .map_err(|e| Error::InvalidResponse(format!("{e} in body {text}")))?;

        info!("Balance: {}", parsed.balance);
        Ok(parsed.balance)
    }

    /// Submit a task and poll until it is solved, fails, or times out.
    ///
    /// Remote outcomes come back as [`TaskResult`] values, the synthesized
    /// timeout failure included. `Err` is reserved for transport and protocol
    /// faults, which abort the loop immediately.
    pub async fn solve(&self, task: impl Into<CaptchaTask>) -> Result<TaskResult> {
        let task = task.into();
        info!("Solving {} task", task.type_tag());

        let task_id = self.create_task(task).await?;

        let started = self.clock.now();
        let timeout = self.config.solve_timeout();
        let poll_interval = self.config.poll_interval();

        loop {
            if self.clock.now().duration_since(started) > timeout {
                warn!("Task {} timed out after {:?}", task_id, timeout);
                return Ok(TaskResult::timeout());
            }

            let result = self.task_result(&task_id).await?;

            if result.is_ready() {
                info!("Task {} ready", task_id);
                return Ok(result);
            }

            if result.is_failed() {
                error!(
                    "Task {} failed: errorId={}, description={}",
                    task_id,
                    result.error_id,
                    result.error_description.as_deref().unwrap_or("none")
                );
                return Ok(result);
            }

            debug!("Task {} status: {:?}", task_id, result.status);
            self.clock.sleep(poll_interval).await;
        }
    }

    /// Query the current result of a task once, without polling.
    pub async fn task_result(&self, task_id: &str) -> Result<TaskResult> {
        let url = format!("{}/getTaskResult", self.config.api_base_url);

        let request = TaskResultRequest {
            client_key: self.config.client_key.clone(),
            task_id: task_id.to_string(),
        };

        let response = self.client.post(&url).json(&request).send().await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            error!("getTaskResult failed: {} {}", status, text);
            return Err(Error::Api {
                status: status.as_u16(),
                body: decode_body(&text),
            });
        }

        serde_json::from_str(&text).map_err(|e| Error::InvalidResponse(format!("{e} in body {text}")))
    }

    /// Solve a reCAPTCHA v2 challenge.
    pub async fn recaptcha_v2(&self, params: RecaptchaV2) -> Result<TaskResult> {
        self.solve(params).await
    }

    /// Solve a reCAPTCHA v2 Enterprise challenge.
    pub async fn recaptcha_v2_enterprise(
        &self,
        params: RecaptchaV2Enterprise,
    ) -> Result<TaskResult> {
        self.solve(params).await
    }

    /// Solve a reCAPTCHA v2 HS Enterprise challenge.
    pub async fn recaptcha_v2_hs_enterprise(
        &self,
        params: RecaptchaV2HsEnterprise,
    ) -> Result<TaskResult> {
        self.solve(params).await
    }

    /// Solve a reCAPTCHA v3 challenge.
    pub async fn recaptcha_v3(&self, params: RecaptchaV3) -> Result<TaskResult> {
        self.solve(params).await
    }

    /// Solve a reCAPTCHA v3 HS challenge.
    pub async fn recaptcha_v3_hs(&self, params: RecaptchaV3Hs) -> Result<TaskResult> {
        self.solve(params).await
    }

    /// Solve a mobile reCAPTCHA challenge.
    pub async fn recaptcha_mobile(&self, params: RecaptchaMobile) -> Result<TaskResult> {
        self.solve(params).await
    }

    /// Solve an hCaptcha challenge.
    pub async fn hcaptcha(&self, params: HCaptcha) -> Result<TaskResult> {
        self.solve(params).await
    }

    /// Solve an hCaptcha Enterprise challenge.
    pub async fn hcaptcha_enterprise(&self, params: HCaptchaEnterprise) -> Result<TaskResult> {
        self.solve(params).await
    }

    /// Create a task and hand back its id.
    async fn create_task(&self, task: CaptchaTask) -> Result<String> {
        let url = format!("{}/createTask", self.config.api_base_url);

        let request = CreateTaskRequest {
            client_key: self.config.client_key.clone(),
            soft_id: self.config.soft_id.clone(),
            callback_url: self.config.callback_url.clone(),
            task,
        };

        let response = self.client.post(&url).json(&request).send().await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            error!("createTask failed: {} {}", status, text);
            return Err(Error::Api {
                status: status.as_u16(),
                body: decode_body(&text),
            });
        }

        let result: CreateTaskResponse = serde_json::from_str(&text)
            .map_err(|e| Error::InvalidResponse(format!("{e} in body {text}")))?;

        if result.error_id != 0 {
            warn!(
                "createTask rejected: errorId={}, code={}, description={}",
                result.error_id,
                result.error_code.as_deref().unwrap_or("none"),
                result.error_description.as_deref().unwrap_or("none")
            );
            return Err(Error::TaskRejected {
                error_id: result.error_id,
                error_code: result.error_code,
                error_description: result.error_description,
            });
        }

        let task_id = result
            .task_id
            .ok_or_else(|| Error::InvalidResponse("no taskId in createTask response".into()))?;

        info!("Task {} created", task_id);
        Ok(task_id)
    }
}

/// Decode an API body as JSON, falling back to the raw text.
fn decode_body(text: &str) -> serde_json::Value {
    serde_json::from_str(text).unwrap_or_else(|_| serde_json::Value::String(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::solver::models::TaskStatus;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(server_url: &str) -> ClientConfig {
        ClientConfig::new("test-client-key")
            .with_api_base_url(server_url)
            .with_solve_timeout(Duration::from_secs(2))
            .with_poll_interval(Duration::from_millis(10))
    }

    async fn mount_create_task(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/createTask"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({
                    "errorId": 0,
                    "taskId": 12345
                })),
            )
            .mount(server)
            .await;
    }

    #[test]
    fn empty_client_key_is_rejected() {
        let result = NextCaptchaClient::new(ClientConfig::new(""));
        assert!(matches!(result, Err(Error::MissingClientKey)));
    }

    #[tokio::test]
    async fn solve_polls_until_ready_and_returns_the_solution() {
        let server = MockServer::start().await;
        mount_create_task(&server).await;

        // pending, then processing, then ready
        Mock::given(method("POST"))
            .and(path("/getTaskResult"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "pending"})))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/getTaskResult"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"status": "processing"})),
            )
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/getTaskResult"))
            .and(body_partial_json(json!({
                "clientKey": "test-client-key",
                "taskId": "12345"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "errorId": 0,
                "status": "ready",
                "solution": { "gRecaptchaResponse": "test-response" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = NextCaptchaClient::new(test_config(&server.uri())).unwrap();
        let result = client
            .recaptcha_v2(RecaptchaV2::new("https://example.com", "site-key"))
            .await
            .unwrap();

        assert!(result.is_ready());
        assert_eq!(result.status, TaskStatus::Ready);
        assert_eq!(result.get_token(), Some("test-response"));
    }

    #[tokio::test]
    async fn recaptcha_v3_solution_keeps_the_score() {
        let server = MockServer::start().await;
        mount_create_task(&server).await;

        Mock::given(method("POST"))
            .and(path("/getTaskResult"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "errorId": 0,
                "status": "ready",
                "solution": { "gRecaptchaResponse": "v3-response", "score": 0.9 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = NextCaptchaClient::new(test_config(&server.uri())).unwrap();
        let result = client
            .recaptcha_v3(
                RecaptchaV3::new("https://example.com", "site-key").with_page_action("submit"),
            )
            .await
            .unwrap();

        assert_eq!(result.get_token(), Some("v3-response"));
        let solution = result.solution.unwrap();
        assert_eq!(solution.extra["score"], json!(0.9));
    }

    #[tokio::test]
    async fn unrecognized_status_keeps_the_loop_polling() {
        let server = MockServer::start().await;
        mount_create_task(&server).await;

        Mock::given(method("POST"))
            .and(path("/getTaskResult"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "idle"})))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/getTaskResult"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "ready",
                "solution": { "gRecaptchaResponse": "after-idle" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = NextCaptchaClient::new(test_config(&server.uri())).unwrap();
        let result = client
            .recaptcha_v2(RecaptchaV2::new("https://example.com", "site-key"))
            .await
            .unwrap();

        assert_eq!(result.get_token(), Some("after-idle"));
    }

    #[tokio::test]
    async fn solve_passes_the_failed_result_through() {
        let server = MockServer::start().await;
        mount_create_task(&server).await;

        Mock::given(method("POST"))
            .and(path("/getTaskResult"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "errorId": 1,
                "errorCode": "ERROR_CAPTCHA_UNSOLVABLE",
                "errorDescription": "Test error",
                "status": "failed"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = NextCaptchaClient::new(test_config(&server.uri())).unwrap();
        let result = client
            .recaptcha_v2(RecaptchaV2::new("https://example.com", "site-key"))
            .await
            .unwrap();

        assert!(result.is_failed());
        assert_eq!(result.error_id, 1);
        assert_eq!(result.error_description.as_deref(), Some("Test error"));
        assert!(result.solution.is_none());
    }

    #[tokio::test]
    async fn solve_times_out_with_the_synthesized_failure() {
        let server = MockServer::start().await;
        mount_create_task(&server).await;

        // 2s timeout at 500ms per poll: the fifth poll pushes virtual time
        // past the deadline, so exactly five queries go out.
        Mock::given(method("POST"))
            .and(path("/getTaskResult"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"status": "processing"})),
            )
            .expect(5)
            .mount(&server)
            .await;

        let config = ClientConfig::new("test-client-key")
            .with_api_base_url(&server.uri())
            .with_solve_timeout(Duration::from_secs(2))
            .with_poll_interval(Duration::from_millis(500));
        let client = NextCaptchaClient::new(config)
            .unwrap()
            .with_clock(ManualClock::new());

        let started = std::time::Instant::now();
        let result = client
            .recaptcha_v2(RecaptchaV2::new("https://example.com", "site-key"))
            .await
            .unwrap();

        assert!(result.is_failed());
        assert_eq!(result.error_id, 12);
        assert_eq!(result.error_description.as_deref(), Some("Timeout"));
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "errorId": 12,
                "errorDescription": "Timeout",
                "status": "failed",
            })
        );
        // Virtual sleeps only; the whole loop runs in real milliseconds.
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn rejected_creation_is_an_error_and_stops_before_polling() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/createTask"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "errorId": 1,
                "errorCode": "ERROR_KEY_DENIED",
                "errorDescription": "Account suspended"
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/getTaskResult"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ready"})))
            .expect(0)
            .mount(&server)
            .await;

        let client = NextCaptchaClient::new(test_config(&server.uri())).unwrap();
        let result = client
            .recaptcha_v2(RecaptchaV2::new("https://example.com", "site-key"))
            .await;

        match result {
            Err(Error::TaskRejected {
                error_id,
                error_code,
                error_description,
            }) => {
                assert_eq!(error_id, 1);
                assert_eq!(error_code.as_deref(), Some("ERROR_KEY_DENIED"));
                assert_eq!(error_description.as_deref(), Some("Account suspended"));
            }
            other => panic!("expected TaskRejected, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_task_id_is_an_invalid_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/createTask"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"errorId": 0})))
            .mount(&server)
            .await;

        let client = NextCaptchaClient::new(test_config(&server.uri())).unwrap();
        let result = client
            .recaptcha_v2(RecaptchaV2::new("https://example.com", "site-key"))
            .await;

        match result {
            Err(Error::InvalidResponse(message)) => assert!(message.contains("taskId")),
            other => panic!("expected InvalidResponse, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_success_status_aborts_without_retry() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/createTask"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({"error": "internal"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = NextCaptchaClient::new(test_config(&server.uri())).unwrap();
        let result = client
            .recaptcha_v2(RecaptchaV2::new("https://example.com", "site-key"))
            .await;

        match result {
            Err(Error::Api { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body["error"], "internal");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_success_poll_response_aborts_the_solve() {
        let server = MockServer::start().await;
        mount_create_task(&server).await;

        Mock::given(method("POST"))
            .and(path("/getTaskResult"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .expect(1)
            .mount(&server)
            .await;

        let client = NextCaptchaClient::new(test_config(&server.uri())).unwrap();
        let result = client
            .recaptcha_v2(RecaptchaV2::new("https://example.com", "site-key"))
            .await;

        match result {
            Err(Error::Api { status, body }) => {
                assert_eq!(status, 503);
                assert_eq!(body, json!("unavailable"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_task_sends_account_fields_and_task_payload() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/createTask"))
            .and(body_partial_json(json!({
                "clientKey": "test-client-key",
                "softId": "4321",
                "callbackUrl": "https://example.com/cb",
                "task": {
                    "type": "RecaptchaV2TaskProxyless",
                    "websiteURL": "https://example.com",
                    "websiteKey": "site-key"
                }
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"errorId": 0, "taskId": "abc"})),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/getTaskResult"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "ready",
                "solution": {"gRecaptchaResponse": "ok"}
            })))
            .mount(&server)
            .await;

        let config = test_config(&server.uri())
            .with_soft_id("4321")
            .with_callback_url("https://example.com/cb");
        let client = NextCaptchaClient::new(config).unwrap();

        let result = client
            .recaptcha_v2(RecaptchaV2::new("https://example.com", "site-key"))
            .await
            .unwrap();
        assert!(result.is_ready());
    }

    #[tokio::test]
    async fn task_result_queries_once_without_polling() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/getTaskResult"))
            .and(body_partial_json(json!({
                "clientKey": "test-client-key",
                "taskId": "task-77"
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"status": "processing"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = NextCaptchaClient::new(test_config(&server.uri())).unwrap();
        let result = client.task_result("task-77").await.unwrap();

        assert_eq!(result.status, TaskStatus::Processing);
        assert!(!result.is_terminal());
    }

    #[tokio::test]
    async fn repeated_task_result_queries_see_the_same_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/getTaskResult"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"status": "processing"})),
            )
            .expect(2)
            .mount(&server)
            .await;

        let client = NextCaptchaClient::new(test_config(&server.uri())).unwrap();
        let first = client.task_result("task-88").await.unwrap();
        let second = client.task_result("task-88").await.unwrap();

        assert_eq!(first.status, second.status);
        assert_eq!(first.status, TaskStatus::Processing);
    }

    #[tokio::test]
    async fn get_balance_returns_the_reported_balance() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/getBalance"))
            .and(body_partial_json(json!({"clientKey": "test-client-key"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"balance": "100.00"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = NextCaptchaClient::new(test_config(&server.uri())).unwrap();
        assert_eq!(client.get_balance().await.unwrap(), "100.00");
    }

    #[tokio::test]
    async fn get_balance_accepts_a_numeric_balance() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/getBalance"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"balance": 42.5})))
            .mount(&server)
            .await;

        let client = NextCaptchaClient::new(test_config(&server.uri())).unwrap();
        assert_eq!(client.get_balance().await.unwrap(), "42.5");
    }

    #[tokio::test]
    async fn get_balance_surfaces_api_errors() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/getBalance"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(json!({"errorDescription": "bad key"})),
            )
            .mount(&server)
            .await;

        let client = NextCaptchaClient::new(test_config(&server.uri())).unwrap();
        match client.get_balance().await {
            Err(Error::Api { status, body }) => {
                assert_eq!(status, 401);
                assert_eq!(body["errorDescription"], "bad key");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_balance_body_is_an_invalid_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/getBalance"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = NextCaptchaClient::new(test_config(&server.uri())).unwrap();
        assert!(matches!(
            client.get_balance().await,
            Err(Error::InvalidResponse(_))
        ));
    }

    #[test]
    fn decode_body_falls_back_to_raw_text() {
        assert_eq!(decode_body(r#"{"a": 1}"#), json!({"a": 1}));
        assert_eq!(decode_body("<html>oops</html>"), json!("<html>oops</html>"));
    }
}
