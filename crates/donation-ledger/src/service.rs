//! # Donation Ledger Service
//!
//! Transactional orchestrator over the [`LedgerStore`] and the outbound
//! ports.
//!
//! ## Transaction Discipline
//!
//! Each mutating call runs every fallible step first (authorization,
//! preconditions, oracle submission, proof verification, decoding,
//! homomorphic arithmetic) and only then writes to the store. A call that
//! returns `Err` has not changed the ledger.
//!
//! ## Callback Deduplication
//!
//! Fulfillment checks the request id first (`UnknownOrReplayedRequest`), then
//! re-checks the donation's reveal state (`AlreadyRevealed`). The second
//! check matters when overlapping requests are enabled: two live request ids
//! for one donation both pass the first check.
//!
//! ## Liveness
//!
//! A request whose callback never arrives stays `Requested` forever. No
//! timeout or cancel path exists; `pending_requests()` exposes such entries.

use crate::algorithms::{name_hash, CleartextCodec};
use crate::domain::{
    invariant_name_len, invariant_no_overlapping_request, invariant_not_revealed, Address,
    AggregateKey, AggregateKind, CiphertextHandle, DecryptedDonation, DecryptionTarget,
    DonationId, EncryptedAggregate, EncryptedConnection, EncryptedDonation, LedgerAction,
    LedgerConfig, LedgerError, NameHash, RequestId, RequestState, TrackedRequest,
};
use crate::events::{LedgerEvent, LedgerEventKind};
use crate::ports::inbound::DonationLedgerApi;
use crate::ports::outbound::{
    AccessPolicy, DecryptionOracle, HomomorphicArithmetic, LedgerEventPublisher, ProofVerifier,
    TimeSource,
};
use crate::store::LedgerStore;

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// External services the ledger is wired to.
#[derive(Clone)]
pub struct LedgerDependencies {
    /// Decryption oracle.
    pub oracle: Arc<dyn DecryptionOracle>,
    /// Callback proof verifier.
    pub verifier: Arc<dyn ProofVerifier>,
    /// Homomorphic arithmetic service.
    pub arithmetic: Arc<dyn HomomorphicArithmetic>,
    /// Capability check for privileged operations.
    pub policy: Arc<dyn AccessPolicy>,
    /// Notification sink.
    pub publisher: Arc<dyn LedgerEventPublisher>,
    /// Clock.
    pub clock: Arc<dyn TimeSource>,
}

/// Statistics for the ledger service.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LedgerStats {
    /// Donations recorded.
    pub donations_recorded: u64,
    /// Oracle requests issued (donations and aggregates).
    pub requests_issued: u64,
    /// Donation reveals.
    pub donations_revealed: u64,
    /// Aggregate decryptions processed.
    pub aggregates_revealed: u64,
    /// Callbacks rejected for a bad proof.
    pub rejected_proofs: u64,
    /// Callbacks rejected as unknown or replayed.
    pub rejected_replays: u64,
    /// Calls rejected by the access policy.
    pub unauthorized_calls: u64,
    /// Connection log entries appended.
    pub connections_recorded: u64,
}

/// The Donation Decryption Request Ledger.
pub struct DonationLedgerService {
    /// Service configuration.
    config: LedgerConfig,
    /// Cleartext decoder for the configured ABI version.
    codec: CleartextCodec,
    /// Owned ledger state.
    store: LedgerStore,
    /// Outbound ports.
    deps: LedgerDependencies,
    /// Service statistics.
    stats: LedgerStats,
}

impl DonationLedgerService {
    /// Create a ledger with an empty store.
    pub fn new(config: LedgerConfig, deps: LedgerDependencies) -> Result<Self, LedgerError> {
        config.validate()?;
        let codec = CleartextCodec::new(config.cleartext_abi_version)?;
        info!(
            allow_overlapping_requests = config.allow_overlapping_requests,
            abi_version = codec.version(),
            "Donation ledger initialised"
        );
        Ok(Self {
            config,
            codec,
            store: LedgerStore::new(),
            deps,
            stats: LedgerStats::default(),
        })
    }

    /// Service configuration.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Current service statistics.
    pub fn stats(&self) -> LedgerStats {
        self.stats.clone()
    }

    /// Read access to the owned store.
    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    fn authorize(&mut self, caller: &Address, action: LedgerAction) -> Result<(), LedgerError> {
        self.deps.policy.authorize(caller, action).inspect_err(|_| {
            self.stats.unauthorized_calls += 1;
        })
    }

    fn emit(&self, kind: LedgerEventKind, timestamp: u64) {
        let topic = kind.topic();
        if let Err(e) = self.deps.publisher.publish(LedgerEvent::new(kind, timestamp)) {
            // State is already committed; the notification is lost.
            warn!(topic, "Failed to publish ledger event: {}", e);
        }
    }

    /// Look up an outstanding request and reject unknown or replayed ids.
    fn outstanding_target(&mut self, request_id: RequestId) -> Result<DecryptionTarget, LedgerError> {
        match self.store.requests.outstanding(request_id) {
            Ok(req) => Ok(req.target.clone()),
            Err(e) => {
                self.stats.rejected_replays += 1;
                warn!(%request_id, "Rejected unknown or replayed callback");
                Err(e)
            }
        }
    }

    async fn verify_proof(
        &mut self,
        request_id: RequestId,
        cleartexts: &[u8],
        proof: &[u8],
    ) -> Result<(), LedgerError> {
        if !self.deps.verifier.verify(request_id, cleartexts, proof).await? {
            self.stats.rejected_proofs += 1;
            warn!(%request_id, "Rejected callback with invalid proof; request stays pending");
            return Err(LedgerError::InvalidProof(request_id));
        }
        Ok(())
    }

    async fn submit_request(
        &mut self,
        target: DecryptionTarget,
        handles: &[CiphertextHandle],
    ) -> Result<RequestId, LedgerError> {
        invariant_no_overlapping_request(
            &target,
            self.store.requests.outstanding_for(&target),
            self.config.allow_overlapping_requests,
        )?;

        let request_id = self.deps.oracle.submit_ciphertexts(handles).await?;
        self.store
            .requests
            .track(request_id, target, self.deps.clock.now())?;
        self.stats.requests_issued += 1;
        Ok(request_id)
    }
}

#[async_trait]
impl DonationLedgerApi for DonationLedgerService {
    #[instrument(skip_all)]
    async fn record_donation(
        &mut self,
        caller: Address,
        encrypted_amount: CiphertextHandle,
        encrypted_entity: CiphertextHandle,
        encrypted_donor: CiphertextHandle,
    ) -> Result<DonationId, LedgerError> {
        self.authorize(&caller, LedgerAction::RecordDonation)?;

        let now = self.deps.clock.now();
        let id = self
            .store
            .records
            .record(encrypted_amount, encrypted_entity, encrypted_donor, now);
        self.stats.donations_recorded += 1;

        info!(donation_id = %id, "Donation recorded");
        self.emit(LedgerEventKind::Recorded { id }, now);
        Ok(id)
    }

    #[instrument(skip_all, fields(donation_id = %id))]
    async fn request_decryption(
        &mut self,
        caller: Address,
        id: DonationId,
    ) -> Result<RequestId, LedgerError> {
        self.authorize(&caller, LedgerAction::RequestDecryption)?;
        invariant_not_revealed(id, self.store.records.decrypted_view(id)?)?;

        let handles = self.store.records.encrypted(id)?.handles();
        let request_id = self
            .submit_request(DecryptionTarget::Donation(id), &handles)
            .await?;

        info!(%request_id, "Decryption requested");
        self.emit(
            LedgerEventKind::DecryptionRequested { id, request_id },
            self.deps.clock.now(),
        );
        Ok(request_id)
    }

    #[instrument(skip_all, fields(request_id = %request_id))]
    async fn fulfill_donation_decryption(
        &mut self,
        caller: Address,
        request_id: RequestId,
        cleartexts: &[u8],
        proof: &[u8],
    ) -> Result<DonationId, LedgerError> {
        self.authorize(&caller, LedgerAction::FulfillDecryption)?;

        // Layer 1: the request id.
        let id = match self.outstanding_target(request_id)? {
            DecryptionTarget::Donation(id) => id,
            DecryptionTarget::Aggregate(_) => {
                self.stats.rejected_replays += 1;
                return Err(LedgerError::UnknownOrReplayedRequest(request_id));
            }
        };

        self.verify_proof(request_id, cleartexts, proof).await?;

        let decoded = self.codec.decode_donation(cleartexts)?;
        invariant_name_len(&decoded.entity, self.config.max_name_len)?;
        invariant_name_len(&decoded.donor, self.config.max_name_len)?;

        // Layer 2: the donation itself.
        invariant_not_revealed(id, self.store.records.decrypted_view(id)?)?;

        let plan = self
            .store
            .aggregates
            .prepare_fold(
                self.deps.arithmetic.as_ref(),
                &decoded.entity,
                &decoded.donor,
                decoded.amount,
            )
            .await
            .inspect_err(|e| {
                if e.is_fatal() {
                    error!(donation_id = %id, "Aggregate name hash collision: {}", e);
                }
            })?;

        let now = self.deps.clock.now();
        self.store
            .records
            .reveal(id, decoded.amount, decoded.entity, decoded.donor)?;
        self.store.requests.fulfill(request_id, now)?;
        self.store.aggregates.commit_fold(plan, now);
        self.stats.donations_revealed += 1;

        info!(donation_id = %id, "Donation revealed");
        self.emit(LedgerEventKind::Decrypted { id }, now);
        Ok(id)
    }

    #[instrument(skip_all, fields(aggregate = %key))]
    async fn request_aggregate_decryption(
        &mut self,
        caller: Address,
        key: AggregateKey,
    ) -> Result<RequestId, LedgerError> {
        self.authorize(&caller, LedgerAction::RequestAggregateDecryption)?;

        let total = self
            .store
            .aggregates
            .get(&key)
            .map(|aggregate| aggregate.total)
            .ok_or_else(|| LedgerError::NotFound {
                kind: key.kind,
                hash: name_hash(&key.name),
            })?;

        let request_id = self
            .submit_request(DecryptionTarget::Aggregate(key.clone()), &[total])
            .await?;

        info!(%request_id, "Aggregate decryption requested");
        self.emit(
            LedgerEventKind::AggregateDecryptionRequested { key, request_id },
            self.deps.clock.now(),
        );
        Ok(request_id)
    }

    #[instrument(skip_all, fields(request_id = %request_id))]
    async fn fulfill_aggregate_decryption(
        &mut self,
        caller: Address,
        request_id: RequestId,
        cleartexts: &[u8],
        proof: &[u8],
    ) -> Result<(AggregateKey, u32), LedgerError> {
        self.authorize(&caller, LedgerAction::FulfillDecryption)?;

        let key = match self.outstanding_target(request_id)? {
            DecryptionTarget::Aggregate(key) => key,
            DecryptionTarget::Donation(_) => {
                self.stats.rejected_replays += 1;
                return Err(LedgerError::UnknownOrReplayedRequest(request_id));
            }
        };

        self.verify_proof(request_id, cleartexts, proof).await?;
        let total = self.codec.decode_aggregate(cleartexts)?;

        let now = self.deps.clock.now();
        self.store.aggregates.set_revealed_total(&key, total)?;
        self.store.requests.fulfill(request_id, now)?;
        self.stats.aggregates_revealed += 1;

        info!(aggregate = %key, total, "Aggregate decrypted");
        self.emit(
            LedgerEventKind::AggregateDecrypted {
                key: key.clone(),
                total,
            },
            now,
        );
        Ok((key, total))
    }

    #[instrument(skip_all)]
    async fn record_connection(
        &mut self,
        caller: Address,
        entity1: CiphertextHandle,
        entity2: CiphertextHandle,
        weight: CiphertextHandle,
    ) -> Result<usize, LedgerError> {
        self.authorize(&caller, LedgerAction::RecordConnection)?;

        let now = self.deps.clock.now();
        let index = self.store.connections.append(entity1, entity2, weight, now);
        self.stats.connections_recorded += 1;

        info!(index, "Connection recorded");
        self.emit(LedgerEventKind::ConnectionRecorded { index }, now);
        Ok(index)
    }

    fn get_decrypted_view(&self, id: DonationId) -> Result<&DecryptedDonation, LedgerError> {
        self.store.records.decrypted_view(id)
    }

    fn get_encrypted_donation(&self, id: DonationId) -> Result<&EncryptedDonation, LedgerError> {
        self.store.records.encrypted(id)
    }

    fn donation_count(&self) -> usize {
        self.store.records.len()
    }

    fn get_connection(&self, index: usize) -> Option<&EncryptedConnection> {
        self.store.connections.get(index)
    }

    fn connection_count(&self) -> usize {
        self.store.connections.len()
    }

    fn get_aggregate(&self, key: &AggregateKey) -> Option<&EncryptedAggregate> {
        self.store.aggregates.get(key)
    }

    fn revealed_aggregate_total(&self, key: &AggregateKey) -> Option<u32> {
        self.store
            .aggregates
            .get(key)
            .and_then(|aggregate| aggregate.revealed_total)
    }

    fn aggregate_names(&self, kind: AggregateKind) -> &[String] {
        self.store.aggregates.names(kind)
    }

    fn lookup_by_hash(&self, kind: AggregateKind, hash: &NameHash) -> Result<&str, LedgerError> {
        self.store.aggregates.lookup_by_hash(kind, hash)
    }

    fn request_state(&self, target: &DecryptionTarget) -> RequestState {
        self.store.requests.state_of(target)
    }

    fn pending_requests(&self) -> Vec<&TrackedRequest> {
        self.store.requests.pending()
    }
}
