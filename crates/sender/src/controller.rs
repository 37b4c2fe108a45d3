use std::time::{SystemTime, UNIX_EPOCH};

use futures::join;
use tonforge_boc::boc;
use tonforge_messages::{build_external, build_unsigned, ContractVersion, UnsignedMessage};
use tonforge_wallets::{MnemonicStore, TransferSigner, Wallet, WalletKind, WalletSignerError};

use crate::api::{BroadcastApi, EmulationApi, RatesApi, WalletStateApi};
use crate::{risk, ConfirmError, ConfirmTransactionModel, FailureClass, Operation, RiskInput};

/// Message lifetime substituted when the timeout endpoint degrades. The
/// seqno has no such fallback: without a live seqno the attempt fails.
pub const DEFAULT_MESSAGE_TTL: u64 = 300;

/// Where a confirmation attempt currently stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfirmState {
    Idle,
    FetchingSeqno,
    Building,
    Emulating,
    /// A draft exists and may be confirmed.
    Ready,
    Signing,
    Broadcasting,
    Done,
    Failed(FailureClass),
}

struct Draft {
    message: UnsignedMessage,
    query_id: u64,
}

/// Sequences one transaction from user intent to broadcast.
///
/// `create_request_model` produces the preview the user confirms;
/// `send_transaction` then rebuilds against a fresh seqno, signs and
/// broadcasts exactly once. Each preview run replaces the stored draft, so
/// a signature can never cover an earlier run's seqno.
pub struct ConfirmationController<A, S> {
    api: A,
    signer: TransferSigner<S>,
    wallet: Wallet,
    operation: Operation,
    currency: String,
    draft: Option<Draft>,
    state: ConfirmState,
}

impl<A, S> ConfirmationController<A, S>
where
    A: WalletStateApi + EmulationApi + BroadcastApi + RatesApi,
    S: MnemonicStore,
{
    pub fn new(
        api: A,
        signer: TransferSigner<S>,
        wallet: Wallet,
        operation: Operation,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            api,
            signer,
            wallet,
            operation,
            currency: currency.into(),
            draft: None,
            state: ConfirmState::Idle,
        }
    }

    pub fn state(&self) -> ConfirmState {
        self.state
    }

    /// Builds a fresh draft and its confirmation model: fetch seqno,
    /// timeout, balance and rate, build the unsigned message, dry-run it
    /// remotely and map the projected fee and risk.
    ///
    /// Replaces any previous draft. Degradation of the timeout or rate
    /// endpoints is tolerated; a seqno or emulation failure fails the run.
    pub async fn create_request_model(
        &mut self,
    ) -> Result<ConfirmTransactionModel, ConfirmError> {
        self.draft = None;
        self.transition(ConfirmState::FetchingSeqno);

        let (seqno, timeout, balance, rate) = join!(
            self.api.seqno(&self.wallet.address),
            self.api.safe_timeout(),
            self.api.balance(&self.wallet.address),
            self.api.ton_rate(&self.currency),
        );
        let seqno = seqno.map_err(|e| self.fail(ConfirmError::Load(e)))?;
        let balance = balance.map_err(|e| self.fail(ConfirmError::Load(e)))?;
        let timeout = timeout.unwrap_or_else(|err| {
            tracing::warn!(%err, "timeout endpoint degraded, using the default ttl");
            DEFAULT_MESSAGE_TTL
        });
        let rate = rate.unwrap_or_else(|err| {
            tracing::warn!(%err, "rate endpoint degraded, omitting fiat figures");
            None
        });

        self.transition(ConfirmState::Building);
        let query_id = now_secs();
        let message = match self.build_message(seqno, now_secs() + timeout, query_id) {
            Ok(message) => message,
            Err(err) => return Err(self.fail(err)),
        };

        self.transition(ConfirmState::Emulating);
        let emulation = match self.emulate(&message).await {
            Ok(emulation) => emulation,
            Err(err) => return Err(self.fail(err)),
        };

        let model = ConfirmTransactionModel::new(
            emulation.description.clone(),
            risk::evaluate(RiskInput {
                fee: emulation.fee,
                risk_total: emulation.risk_total,
                risk_nft_count: emulation.risk_nft_count,
                total_balance: balance,
                rate,
                currency: &self.currency,
            }),
        );

        tracing::debug!(
            operation = self.operation.kind(),
            seqno,
            high_risk = model.is_high_risk,
            "draft ready"
        );
        self.draft = Some(Draft { message, query_id });
        self.transition(ConfirmState::Ready);
        Ok(model)
    }

    /// Signs and broadcasts the current draft.
    ///
    /// The seqno is re-fetched first; if the wallet advanced since the
    /// preview, the message is rebuilt so the signature covers the live
    /// seqno. The draft is consumed either way: a failed send requires a
    /// new `create_request_model` run, there is no automatic retry.
    pub async fn send_transaction(&mut self) -> Result<(), ConfirmError> {
        let draft = match self.draft.take() {
            Some(draft) => draft,
            None => return Err(self.fail(ConfirmError::StaleDraft)),
        };

        self.transition(ConfirmState::Signing);
        let seqno = match self.api.seqno(&self.wallet.address).await {
            Ok(seqno) => seqno,
            Err(err) => return Err(self.fail(ConfirmError::Load(err))),
        };
        let message = if seqno == draft.message.seqno() {
            draft.message
        } else {
            tracing::debug!(
                drafted = draft.message.seqno(),
                live = seqno,
                "seqno advanced since preview, rebuilding"
            );
            match self.build_message(seqno, draft.message.valid_until(), draft.query_id) {
                Ok(message) => message,
                Err(err) => return Err(self.fail(err)),
            }
        };

        let payload = match self.signer.sign(&message, &self.wallet).await {
            Ok(payload) => payload,
            Err(err) => return Err(self.fail(ConfirmError::Signing(err))),
        };

        self.transition(ConfirmState::Broadcasting);
        if let Err(err) = self.api.broadcast(&payload.to_base64()).await {
            return Err(self.fail(ConfirmError::Send(err)));
        }
        tracing::info!(operation = self.operation.kind(), seqno, "message broadcast");
        self.transition(ConfirmState::Done);
        Ok(())
    }

    fn build_message(
        &self,
        seqno: u32,
        valid_until: u64,
        query_id: u64,
    ) -> Result<UnsignedMessage, ConfirmError> {
        let version = self.signing_version()?;
        let transfer = self.operation.to_transfer(&self.wallet.address, query_id)?;
        Ok(build_unsigned(version, seqno, valid_until, &transfer)?)
    }

    fn signing_version(&self) -> Result<ContractVersion, ConfirmError> {
        self.wallet.version().ok_or_else(|| {
            let err = match self.wallet.kind {
                WalletKind::Lockup { .. } => WalletSignerError::lockup_unsupported(),
                _ => WalletSignerError::watch_only_unsupported(),
            };
            ConfirmError::Signing(err)
        })
    }

    async fn emulate(
        &self,
        message: &UnsignedMessage,
    ) -> Result<crate::api::Emulation, ConfirmError> {
        // The dry run wants a broadcast-shaped message before a signature
        // exists; a zeroed signature keeps the size and layout honest.
        let external = build_external(message, &self.wallet.address, &[0u8; 64])?;
        self.api
            .emulate(&boc::encode_base64(&external))
            .await
            .map_err(ConfirmError::Load)
    }

    fn fail(&mut self, err: ConfirmError) -> ConfirmError {
        tracing::warn!(%err, class = ?err.class(), "confirmation attempt failed");
        self.state = ConfirmState::Failed(err.class());
        err
    }

    fn transition(&mut self, state: ConfirmState) {
        tracing::debug!(from = ?self.state, to = ?state, "confirm state");
        self.state = state;
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}
