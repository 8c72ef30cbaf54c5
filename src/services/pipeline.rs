use async_trait::async_trait;
use dkg_dataset::{Content, DatasetBuilder};
use dkg_domain::PublishResult;

use super::{PublishService, RegistrationOutcome, RegistrationService};
use crate::{
    error::PipelineError,
    queue::{AssetPublisher, BatchRegistrar},
};

/// Builds a dataset from raw content and publishes it to the storage network.
pub(crate) struct PublishPipeline {
    builder: DatasetBuilder,
    publish_service: PublishService,
}

impl PublishPipeline {
    pub(crate) fn new(builder: DatasetBuilder, publish_service: PublishService) -> Self {
        Self {
            builder,
            publish_service,
        }
    }
}

#[async_trait]
impl AssetPublisher for PublishPipeline {
    async fn publish_content(
        &self,
        content: Content,
    ) -> Result<Option<PublishResult>, PipelineError> {
        let prepared = self.builder.build(&content)?;
        tracing::debug!(
            dataset_root = %prepared.dataset_root,
            dataset_size = prepared.dataset_size,
            has_private = prepared.private_root.is_some(),
            "Dataset prepared"
        );
        Ok(self.publish_service.publish(prepared).await?)
    }
}

#[async_trait]
impl BatchRegistrar for RegistrationService {
    async fn register_batch(
        &self,
        batch: Vec<Option<PublishResult>>,
    ) -> Result<Option<RegistrationOutcome>, PipelineError> {
        Ok(RegistrationService::register_batch(self, batch).await?)
    }
}
