use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use url::Url;
use uuid::Uuid;

use crate::{
    FinalityResponse, NodeClientConfig, NodeClientError, OperationResult, PublishRequest,
    PublishResponse, StorageNetwork,
};

/// reqwest-backed client for one node.
pub struct NodeClient {
    client: Client,
    base: Url,
    auth_token: Option<String>,
}

impl NodeClient {
    pub fn new(config: NodeClientConfig) -> Result<Self, NodeClientError> {
        let client = Client::builder()
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(10))
            .timeout(config.request_timeout)
            .build()?;

        let mut endpoint = config.endpoint;
        if !endpoint.path().ends_with('/') {
            let path = format!("{}/", endpoint.path());
            endpoint.set_path(&path);
        }
        let base = endpoint.join(&format!("{}/", config.api_version.trim_matches('/')))?;

        Ok(Self {
            client,
            base,
            auth_token: config.auth_token,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.auth_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, NodeClientError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(NodeClientError::Status {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl StorageNetwork for NodeClient {
    async fn submit_publish(&self, request: &PublishRequest) -> Result<Uuid, NodeClientError> {
        let url = self.base.join("publish")?;
        let response = self
            .authorized(self.client.post(url))
            .json(request)
            .send()
            .await?;
        let body: PublishResponse = Self::read_json(response).await?;

        tracing::debug!(
            operation_id = %body.operation_id,
            blockchain = %request.blockchain,
            dataset_root = %request.dataset_root,
            "Publish operation submitted"
        );
        Ok(body.operation_id)
    }

    async fn publish_result(&self, operation_id: Uuid) -> Result<OperationResult, NodeClientError> {
        let url = self.base.join(&format!("publish/{operation_id}"))?;
        let response = self.authorized(self.client.get(url)).send().await?;
        Self::read_json(response).await
    }

    async fn finality(&self, ual: &str) -> Result<u64, NodeClientError> {
        let mut url = self.base.join("finality")?;
        url.query_pairs_mut().append_pair("ual", ual);
        let response = self.authorized(self.client.get(url)).send().await?;
        let body: FinalityResponse = Self::read_json(response).await?;
        Ok(body.finality)
    }
}
