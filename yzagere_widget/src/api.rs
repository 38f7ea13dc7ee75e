use std::{future::Future, ops::Deref, sync::LazyLock};

use serde::Deserialize;
use url::Url;
use yzagere_models::contact::{ContactFormFields, FieldErrors, RelayResponse};
use yzagere_utils::yzagere_version;

pub static USER_AGENT: LazyLock<String> = LazyLock::new(|| {
    let homepage = env!("CARGO_PKG_HOMEPAGE");
    let version = yzagere_version();

    format!("Yzagere Contact Form ({homepage}, Version {version})")
});

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait ContactApi: Send + Sync + 'static {
    /// Posts the form fields to the relay endpoint.
    ///
    /// Fails if the endpoint cannot be reached or does not answer with a
    /// relay response body.
    fn submit(
        &self,
        fields: &ContactFormFields,
    ) -> impl Future<Output = anyhow::Result<SubmitResponse>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitResponse {
    /// Whether the HTTP status was in the 2xx range.
    pub http_ok: bool,
    pub body: RelayResponse,
    /// Per-field problems the relay found in a rejected submission.
    pub fields: FieldErrors,
}

impl SubmitResponse {
    pub fn is_success(&self) -> bool {
        self.http_ok && self.body.ok
    }
}

#[derive(Debug, Clone)]
pub struct HttpClient(reqwest::Client);

impl Deref for HttpClient {
    type Target = reqwest::Client;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl HttpClient {
    pub fn new() -> anyhow::Result<Self> {
        reqwest::Client::builder()
            .user_agent(&*USER_AGENT)
            .build()
            .map(Self)
            .map_err(Into::into)
    }
}

#[derive(Debug, Clone)]
pub struct HttpContactApi {
    client: HttpClient,
    endpoint: Url,
}

impl HttpContactApi {
    pub fn new(client: HttpClient, endpoint: Url) -> Self {
        Self { client, endpoint }
    }
}

impl ContactApi for HttpContactApi {
    async fn submit(&self, fields: &ContactFormFields) -> anyhow::Result<SubmitResponse> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(fields)
            .send()
            .await?;

        let http_ok = response.status().is_success();
        let ReplyBody { body, fields } = response.json().await?;

        Ok(SubmitResponse {
            http_ok,
            body,
            fields,
        })
    }
}

#[derive(Deserialize)]
struct ReplyBody {
    #[serde(flatten)]
    body: RelayResponse,
    #[serde(default)]
    fields: FieldErrors,
}
