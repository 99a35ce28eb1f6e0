//! # Ledger Demo
//!
//! Runs the donation decryption protocol end-to-end against the in-memory
//! adapters: record, request, a rejected forged callback, the real callback,
//! a replay, and an aggregate decryption.
//!
//! Configuration comes from `LEDGER_*` environment variables; log level from
//! `RUST_LOG` (default `info`).

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use donation_ledger::{
    AggregateKey, AllowAllPolicy, CiphertextHandle, CleartextCodec, DonationCleartext,
    DonationLedgerApi, DonationLedgerService, HmacProofVerifier, InMemoryDecryptionOracle,
    LedgerConfig, LedgerDependencies, LedgerError, RecordingPublisher, SystemTimeSource,
    TransparentArithmetic,
};

const OPERATOR: [u8; 20] = [0x11; 20];
const ORACLE: [u8; 20] = [0x22; 20];

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = LedgerConfig::from_env();
    let codec = CleartextCodec::new(config.cleartext_abi_version)
        .context("unsupported cleartext ABI version")?;

    let oracle = Arc::new(InMemoryDecryptionOracle::new());
    let verifier = Arc::new(
        HmacProofVerifier::new(b"ledger-demo-oracle-key".to_vec())
            .context("failed to create proof verifier")?,
    );
    let arithmetic = Arc::new(TransparentArithmetic::new());
    let publisher = Arc::new(RecordingPublisher::new());

    let deps = LedgerDependencies {
        oracle: oracle.clone(),
        verifier: verifier.clone(),
        arithmetic: arithmetic.clone(),
        policy: Arc::new(AllowAllPolicy),
        publisher: publisher.clone(),
        clock: Arc::new(SystemTimeSource),
    };
    let mut ledger =
        DonationLedgerService::new(config, deps).context("failed to create ledger")?;

    // Two donations to the same entity from different donors.
    let donations = [(500u32, "EntityA", "DonorX"), (250u32, "EntityA", "DonorY")];
    for (seed, (amount, entity, donor)) in (1u8..).zip(donations) {
        let id = ledger
            .record_donation(
                OPERATOR,
                CiphertextHandle([seed; 32]),
                CiphertextHandle([seed | 0x40; 32]),
                CiphertextHandle([seed | 0x80; 32]),
            )
            .await
            .context("record_donation failed")?;

        let request_id = ledger
            .request_decryption(OPERATOR, id)
            .await
            .context("request_decryption failed")?;

        let cleartexts = codec.encode_donation(&DonationCleartext {
            amount,
            entity: entity.to_string(),
            donor: donor.to_string(),
        });

        let forged = vec![0u8; 32];
        match ledger
            .fulfill_donation_decryption(ORACLE, request_id, &cleartexts, &forged)
            .await
        {
            Err(LedgerError::InvalidProof(_)) => info!(%request_id, "Forged callback rejected"),
            other => bail!("forged callback was not rejected: {:?}", other),
        }

        let proof = verifier.sign(request_id, &cleartexts)?;
        ledger
            .fulfill_donation_decryption(ORACLE, request_id, &cleartexts, &proof)
            .await
            .context("fulfill_donation_decryption failed")?;

        if let Err(e) = ledger
            .fulfill_donation_decryption(ORACLE, request_id, &cleartexts, &proof)
            .await
        {
            info!(%request_id, "Replay rejected: {}", e);
        }

        let view = ledger.get_decrypted_view(id)?;
        info!(
            donation_id = %id,
            amount = view.amount,
            entity = %view.entity,
            donor = %view.donor,
            "Revealed"
        );
    }

    let key = AggregateKey::entity("EntityA");
    let request_id = ledger
        .request_aggregate_decryption(OPERATOR, key.clone())
        .await
        .context("request_aggregate_decryption failed")?;

    let handle = ledger
        .get_aggregate(&key)
        .map(|aggregate| aggregate.total)
        .context("aggregate missing after reveals")?;
    let Some(total) = arithmetic.reveal(&handle) else {
        bail!("aggregate handle {} not known to the arithmetic service", handle);
    };
    let cleartexts = codec.encode_aggregate(total);
    let proof = verifier.sign(request_id, &cleartexts)?;
    let (key, total) = ledger
        .fulfill_aggregate_decryption(ORACLE, request_id, &cleartexts, &proof)
        .await
        .context("fulfill_aggregate_decryption failed")?;
    info!(aggregate = %key, total, "Aggregate decrypted");

    if !ledger.pending_requests().is_empty() {
        warn!(
            pending = ledger.pending_requests().len(),
            "Requests still waiting for a callback"
        );
    }

    let stats = ledger.stats();
    info!(
        donations = stats.donations_recorded,
        requests = stats.requests_issued,
        revealed = stats.donations_revealed,
        rejected_proofs = stats.rejected_proofs,
        rejected_replays = stats.rejected_replays,
        oracle_requests = oracle.request_count(),
        "Demo complete"
    );

    for event in publisher.events() {
        println!("{}", serde_json::to_string(&event)?);
    }

    Ok(())
}
