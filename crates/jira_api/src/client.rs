use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client as HttpClient, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::{JiraConfig, API_V2, API_V3};
use crate::error::{JiraError, Result};
use crate::models::{Issue, SearchResults, Worklog, WorklogPage, WorklogPayload, WorklogQuery, WriteReceipt};
use crate::rate_limiter::RateLimiter;

#[derive(Clone)]
pub struct JiraClient {
    http: HttpClient,
    config: JiraConfig,
    limiter: RateLimiter,
}

impl JiraClient {
    pub fn new(config: JiraConfig) -> Result<Self> {
        let http = build_http_client(&config)?;
        let limiter = RateLimiter::new(config.cooldown);
        Ok(Self {
            http,
            config,
            limiter,
        })
    }

    /// Runs a JQL search and returns the first result page.
    pub async fn search_issues(&self, jql: &str, fields: &[&str]) -> Result<Vec<Issue>> {
        let path = format!("{}/search", API_V2);
        let params = [("jql", jql.to_string()), ("fields", fields.join(","))];
        let results: SearchResults = self.get_with_query(&path, &params).await?;
        Ok(results.issues)
    }

    pub async fn get_worklogs(&self, issue_key: &str, query: &WorklogQuery) -> Result<Vec<Worklog>> {
        let path = format!("{}/issue/{}/worklog", API_V2, issue_key);
        let page: WorklogPage = self.get_with_query(&path, &query.to_params()).await?;
        Ok(page.worklogs)
    }

    /// Creates a worklog. Whatever status Jira answers with comes back in the receipt.
    pub async fn create_worklog(&self, issue_key: &str, payload: &WorklogPayload) -> Result<WriteReceipt> {
        let path = format!("{}/issue/{}/worklog", API_V3, issue_key);
        self.send_write(Method::POST, &path, payload).await
    }

    pub async fn update_worklog(
        &self,
        issue_key: &str,
        worklog_id: &str,
        payload: &WorklogPayload,
    ) -> Result<WriteReceipt> {
        let path = format!("{}/issue/{}/worklog/{}", API_V3, issue_key, worklog_id);
        self.send_write(Method::PUT, &path, payload).await
    }

    pub async fn get_with_query<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.limiter.acquire().await;
        let url = self.config.endpoint(path);
        debug!(method = "GET", url = %url, "jira request");
        let response = self.http.get(url).query(query).send().await?;
        Self::parse_json(response).await
    }

    async fn send_write<B>(&self, method: Method, path: &str, body: &B) -> Result<WriteReceipt>
    where
        B: Serialize + ?Sized,
    {
        self.limiter.acquire().await;
        let url = self.config.endpoint(path);
        debug!(method = %method, url = %url, "jira request");
        let response = self.http.request(method, url).json(body).send().await?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            debug!(status = %status, body = %body, "jira write rejected");
            return Ok(WriteReceipt::new(status));
        }

        let receipt = WriteReceipt::new(status);
        match serde_json::from_str::<Worklog>(&body).ok().and_then(|w| w.id) {
            Some(id) => Ok(receipt.with_worklog_id(id)),
            None => Ok(receipt),
        }
    }

    async fn parse_json<T>(response: Response) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        if status.is_success() {
            response.json::<T>().await.map_err(JiraError::from)
        } else if is_auth_failure(status) {
            let body = response.text().await.unwrap_or_default();
            Err(access_denied(status, &body))
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(build_http_error(status, &body))
        }
    }
}

fn build_http_client(config: &JiraConfig) -> Result<HttpClient> {
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, header_value(config.credentials.basic_header())?);
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(USER_AGENT, header_value(config.user_agent.clone())?);

    HttpClient::builder()
        .default_headers(headers)
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .build()
        .map_err(|err| JiraError::Other(err.to_string()))
}

fn header_value(value: String) -> Result<HeaderValue> {
    HeaderValue::from_str(&value).map_err(|err| JiraError::Other(err.to_string()))
}

fn is_auth_failure(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}

fn access_denied(status: StatusCode, body: &str) -> JiraError {
    let detail = extract_error_message(body).unwrap_or_else(|| body.to_string());
    JiraError::Authentication(format!("Access denied ({}) - {}", status, detail))
}

fn build_http_error(status: StatusCode, body: &str) -> JiraError {
    let message = extract_error_message(body).unwrap_or_else(|| body.to_string());
    JiraError::http(status, message)
}

/// Pulls the first entry of Jira's `errorMessages` array, falling back to the `errors` map.
fn extract_error_message(body: &str) -> Option<String> {
    let value = serde_json::from_str::<Value>(body).ok()?;
    let from_list = value
        .get("errorMessages")
        .and_then(Value::as_array)
        .and_then(|messages| messages.iter().find_map(Value::as_str))
        .map(str::to_string);
    from_list.or_else(|| {
        value
            .get("errors")
            .and_then(Value::as_object)
            .and_then(|errors| errors.iter().next())
            .and_then(|(field, message)| message.as_str().map(|m| format!("{}: {}", field, m)))
    })
}
