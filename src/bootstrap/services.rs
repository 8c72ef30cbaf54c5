use std::sync::Arc;

use dkg_blockchain::BlockchainManager;
use dkg_dataset::DatasetBuilder;
use dkg_node_client::{NodeClient, StorageNetwork};

use crate::{
    config::{self, Config},
    queue::{QueueHandle, QueueState},
    services::{
        FinalityWatcher, LedgerAttestation, PublishPipeline, PublishService, RegistrationService,
    },
};

pub(crate) struct CoreBootstrap {
    pub(crate) config: Arc<Config>,
    pub(crate) queue_state: Arc<QueueState>,
    pub(crate) queue: QueueHandle,
    pub(crate) publish_pipeline: Arc<PublishPipeline>,
    pub(crate) registration_service: Arc<RegistrationService>,
    pub(crate) finality_watcher: Arc<FinalityWatcher>,
}

pub(crate) async fn build_core() -> CoreBootstrap {
    let config = Arc::new(config::initialize_configuration());
    crate::logger::initialize(&config.logger, &config.telemetry);

    let blockchain_manager = Arc::new(
        BlockchainManager::connect(vec![config.blockchain.clone()])
            .await
            .expect("Failed to connect to blockchain"),
    );
    let network: Arc<dyn StorageNetwork> = Arc::new(
        NodeClient::new(config.node.client.clone()).expect("Failed to build storage node client"),
    );

    let publish_service = PublishService::new(
        Arc::clone(&network),
        Arc::new(LedgerAttestation::new(Arc::clone(&blockchain_manager))),
        blockchain_manager.clone(),
        config.publish.hash_function_id,
        config.node.poll,
    );
    let publish_pipeline = Arc::new(PublishPipeline::new(
        DatasetBuilder::new(config.publish.build_options.clone()),
        publish_service,
    ));
    let finality_watcher = Arc::new(FinalityWatcher::new(
        network,
        config.publish.minimum_finalization_confirmations,
        config.node.poll,
    ));
    let registration_service = Arc::new(RegistrationService::new(
        blockchain_manager,
        Arc::clone(&finality_watcher),
    ));

    let queue_state = QueueState::new();
    let queue = QueueHandle::new(Arc::clone(&queue_state));

    CoreBootstrap {
        config,
        queue_state,
        queue,
        publish_pipeline,
        registration_service,
        finality_watcher,
    }
}
