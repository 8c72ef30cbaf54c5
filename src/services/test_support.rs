//! Hand-written fakes for the pipeline's seam traits.

#![allow(clippy::unwrap_used)]

use std::{
    collections::{HashMap, HashSet, VecDeque},
    sync::{
        Mutex,
        atomic::{AtomicU32, Ordering},
    },
};

use alloy::{
    hex,
    signers::{SignerSync, local::PrivateKeySigner},
};
use async_trait::async_trait;
use dkg_blockchain::{
    Address, B256, BlockchainError, CollectionRegistration, PricingSnapshot, RegisteredCollection,
    RegistrationReceipt, U256,
};
use dkg_domain::{
    BlockchainId, Dataset, NodeSignature, PublishResult, SignatureShare, calculate_merkle_root,
};
use dkg_node_client::{
    IdentityIdValue, NodeClientError, OperationData, OperationResult, OperationStatus,
    PublishRequest, SignatureData, StorageNetwork,
};
use uuid::Uuid;

use super::{
    attestation::{Attestation, recover_root_signer},
    pricing::PricingSource,
    registration::LedgerRegistrar,
};

pub(crate) fn sign_root(signer: &PrivateKeySigner, identity_id: u128, root: B256) -> NodeSignature {
    let signature = signer.sign_message_sync(root.as_slice()).unwrap();
    let v = 27 + u8::from(signature.v());
    let r = B256::from(signature.r().to_be_bytes::<32>());
    let s = B256::from(signature.s().to_be_bytes::<32>());
    NodeSignature {
        identity_id,
        v,
        r,
        s,
        vs: NodeSignature::compact_vs(v, s),
    }
}

pub(crate) fn signature_data(signature: &NodeSignature) -> SignatureData {
    SignatureData {
        identity_id: Some(IdentityIdValue::Text(signature.identity_id.to_string())),
        v: Some(signature.v),
        r: Some(hex::encode_prefixed(signature.r)),
        s: Some(hex::encode_prefixed(signature.s)),
        vs: Some(hex::encode_prefixed(signature.vs)),
    }
}

pub(crate) fn completed_result(
    publisher: SignatureData,
    signatures: Vec<SignatureData>,
) -> OperationResult {
    OperationResult {
        status: OperationStatus::Completed,
        data: OperationData {
            min_acks_reached: Some(true),
            publisher_node_signature: Some(publisher),
            signatures,
            error_type: None,
            error_message: None,
        },
    }
}

fn status_result(status: &str) -> OperationResult {
    serde_json::from_value(serde_json::json!({ "status": status, "data": {} })).unwrap()
}

/// Publish result whose merkle root starts with `tag`.
pub(crate) fn publish_result(blockchain: &str, tag: u8) -> PublishResult {
    let share = SignatureShare {
        identity_id: u128::from(tag),
        r: B256::repeat_byte(tag),
        vs: B256::repeat_byte(tag),
    };
    PublishResult {
        operation_id: Uuid::new_v4(),
        blockchain: blockchain.into(),
        dataset_root: B256::repeat_byte(tag),
        dataset: Dataset::new(vec![format!("<urn:item:{tag}> <urn:p> \"{tag}\" .")], None),
        dataset_size: 32,
        knowledge_assets_amount: 1,
        epochs: 2,
        token_amount: U256::from(tag),
        immutable: false,
        publisher_node_signature: share,
        signatures: vec![share],
    }
}

/// Storage node replaying scripted operation results and finality counts.
/// Exhausted scripts answer `PENDING` and a finality count of 0.
#[derive(Default)]
pub(crate) struct ScriptedNetwork {
    results: Mutex<VecDeque<OperationResult>>,
    finality: Mutex<VecDeque<u64>>,
    submitted: Mutex<Vec<B256>>,
    reads: AtomicU32,
}

impl ScriptedNetwork {
    pub(crate) fn with_statuses(statuses: &[&str]) -> Self {
        let network = Self::default();
        network
            .results
            .lock()
            .unwrap()
            .extend(statuses.iter().map(|status| status_result(status)));
        network
    }

    pub(crate) fn completing_with(result: OperationResult) -> Self {
        let network = Self::default();
        network.results.lock().unwrap().push_back(result);
        network
    }

    pub(crate) fn with_finality(self, counts: &[u64]) -> Self {
        self.finality.lock().unwrap().extend(counts.iter().copied());
        self
    }

    pub(crate) fn submitted_roots(&self) -> Vec<B256> {
        self.submitted.lock().unwrap().clone()
    }

    pub(crate) fn reads(&self) -> u32 {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StorageNetwork for ScriptedNetwork {
    async fn submit_publish(&self, request: &PublishRequest) -> Result<Uuid, NodeClientError> {
        self.submitted.lock().unwrap().push(request.dataset_root);
        Ok(Uuid::new_v4())
    }

    async fn publish_result(&self, _: Uuid) -> Result<OperationResult, NodeClientError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| status_result("PENDING")))
    }

    async fn finality(&self, _: &str) -> Result<u64, NodeClientError> {
        Ok(self.finality.lock().unwrap().pop_front().unwrap_or(0))
    }
}

/// Real recovery and merkle root; operational keys come from an allow list.
#[derive(Default)]
pub(crate) struct FakeAttestation {
    authorized: HashMap<u128, Address>,
    failing: HashSet<u128>,
}

impl FakeAttestation {
    pub(crate) fn authorize(mut self, identity_id: u128, signer: Address) -> Self {
        self.authorized.insert(identity_id, signer);
        self
    }

    pub(crate) fn fail_for(mut self, identity_id: u128) -> Self {
        self.failing.insert(identity_id);
        self
    }
}

#[async_trait]
impl Attestation for FakeAttestation {
    fn merkle_root(&self, triples: &[String]) -> Option<B256> {
        calculate_merkle_root(triples)
    }

    fn recover_signer(&self, dataset_root: B256, signature: &NodeSignature) -> Option<Address> {
        recover_root_signer(dataset_root, signature)
    }

    async fn verify_operational_wallet(
        &self,
        _: &BlockchainId,
        identity_id: u128,
        signer: Address,
    ) -> Result<bool, BlockchainError> {
        if self.failing.contains(&identity_id) {
            return Err(BlockchainError::RpcConnectionFailed { attempts: 1 });
        }
        Ok(self.authorized.get(&identity_id) == Some(&signer))
    }
}

#[derive(Default)]
pub(crate) struct FakePricing {
    ask: u64,
}

impl FakePricing {
    pub(crate) fn with_ask(ask: u64) -> Self {
        Self { ask }
    }
}

#[async_trait]
impl PricingSource for FakePricing {
    async fn pricing_snapshot(&self, _: &BlockchainId) -> Result<PricingSnapshot, BlockchainError> {
        Ok(PricingSnapshot {
            stake_weighted_average_ask: U256::from(self.ask),
            time_until_next_epoch: U256::ZERO,
            epoch_length: U256::from(3600),
        })
    }
}

/// Records every batch it is asked to register.
#[derive(Default)]
pub(crate) struct FakeRegistrar {
    fail: bool,
    /// Call index to whether the transaction was mined before the failure.
    scripted_failures: HashMap<usize, bool>,
    calls: Mutex<Vec<(BlockchainId, Vec<CollectionRegistration>)>>,
}

impl FakeRegistrar {
    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Fails the `call`-th transaction (0-based), reverted or mined without usable events.
    pub(crate) fn fail_call(mut self, call: usize, mined: bool) -> Self {
        self.scripted_failures.insert(call, mined);
        self
    }

    pub(crate) fn calls(&self) -> Vec<(BlockchainId, Vec<CollectionRegistration>)> {
        self.calls.lock().unwrap().clone()
    }
}

fn ledger_failure(mined: bool) -> BlockchainError {
    let tx_hash = hex::encode_prefixed(B256::repeat_byte(0xee));
    if mined {
        BlockchainError::UnreadableReceipt {
            tx_hash,
            source: Box::new(BlockchainError::MissingCreatedEvents {
                expected: 1,
                found: 0,
            }),
        }
    } else {
        BlockchainError::TransactionReverted { tx_hash }
    }
}

#[async_trait]
impl LedgerRegistrar for FakeRegistrar {
    async fn register_collections(
        &self,
        blockchain: &BlockchainId,
        registrations: &[CollectionRegistration],
    ) -> Result<RegistrationReceipt, BlockchainError> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((blockchain.clone(), registrations.to_vec()));
            calls.len() - 1
        };
        if self.fail {
            return Err(ledger_failure(false));
        }
        if let Some(&mined) = self.scripted_failures.get(&call) {
            return Err(ledger_failure(mined));
        }

        let storage = Address::repeat_byte(0x11);
        let collections = registrations
            .iter()
            .zip(1u128..)
            .map(|(registration, collection_id)| {
                RegisteredCollection::new(
                    blockchain,
                    storage,
                    collection_id,
                    registration.publish_operation_id.clone(),
                    registration.merkle_root,
                    registration.knowledge_assets_amount,
                )
            })
            .collect();

        Ok(RegistrationReceipt {
            blockchain: blockchain.clone(),
            transaction_hash: B256::repeat_byte(0xee),
            block_number: Some(1),
            gas_used: 21_000,
            collections,
        })
    }
}
