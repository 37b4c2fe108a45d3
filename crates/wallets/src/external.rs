use std::sync::Arc;

use base64::{engine::general_purpose, Engine as _};
use parking_lot::Mutex;
use tokio::sync::oneshot;
use tonforge_messages::ContractVersion;
use url::Url;

use crate::WalletSignerError;

/// URL scheme the external signer application is registered for.
pub const EXTERNAL_SIGNER_SCHEME: &str = "tonsign";

/// Bridge between the signing service and the hosting application's URL
/// handling.
///
/// One signing attempt at a time: [`request`] builds the `tonsign://` deep
/// link and parks a resolver; the host eventually feeds the callback URL to
/// [`complete`], or abandons the attempt through [`cancel`]. A second
/// `request` while one is pending fails with
/// [`WalletSignerError::SignerBusy`] instead of displacing it.
///
/// [`request`]: Self::request
/// [`complete`]: Self::complete
/// [`cancel`]: Self::cancel
#[derive(Clone, Debug, Default)]
pub struct ExternalSignerChannel {
    pending: Arc<Mutex<Option<PendingSign>>>,
}

#[derive(Debug)]
struct PendingSign {
    tx: oneshot::Sender<Result<[u8; 64], WalletSignerError>>,
}

/// An in-flight external signing request: the deep link to open plus the
/// suspension point awaiting the signature.
#[derive(Debug)]
pub struct SignRequest {
    url: Url,
    rx: oneshot::Receiver<Result<[u8; 64], WalletSignerError>>,
}

impl SignRequest {
    /// The `tonsign://` deep link the hosting application must open.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Suspends until the channel is completed or cancelled. Dropping the
    /// channel counts as cancellation, so this never stalls forever.
    pub async fn wait(self) -> Result<[u8; 64], WalletSignerError> {
        match self.rx.await {
            Ok(result) => result,
            Err(_) => Err(WalletSignerError::Cancelled),
        }
    }
}

impl ExternalSignerChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a signing deep link for `body` and parks the resolver.
    ///
    /// `return_scheme` is the scheme the signer calls back on; the callback
    /// URL's `sign` parameter must carry the base64url signature.
    pub fn request(
        &self,
        public_key: &[u8; 32],
        body: &[u8],
        version: ContractVersion,
        return_scheme: &str,
    ) -> Result<SignRequest, WalletSignerError> {
        let mut pending = self.pending.lock();
        if let Some(p) = pending.as_ref() {
            // A stale slot whose waiter is gone no longer counts as busy.
            if !p.tx.is_closed() {
                return Err(WalletSignerError::SignerBusy);
            }
        }

        let mut url = Url::parse(&format!("{EXTERNAL_SIGNER_SCHEME}://"))
            .map_err(|e| WalletSignerError::SigningFailed(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("pk", &general_purpose::URL_SAFE_NO_PAD.encode(public_key))
            .append_pair("body", &general_purpose::URL_SAFE_NO_PAD.encode(body))
            .append_pair("v", version.as_str())
            .append_pair("return", return_scheme);

        let (tx, rx) = oneshot::channel();
        *pending = Some(PendingSign { tx });
        Ok(SignRequest { url, rx })
    }

    /// Resolves the pending request from the signer's callback URL.
    ///
    /// A malformed callback resolves the waiting signer with a failure and
    /// reports the parse problem to the caller as well.
    pub fn complete(&self, callback: &Url) -> Result<(), WalletSignerError> {
        let pending = self.pending.lock().take().ok_or(WalletSignerError::NoPendingRequest)?;
        match parse_signature(callback) {
            Ok(signature) => {
                let _ = pending.tx.send(Ok(signature));
                Ok(())
            }
            Err(err) => {
                let _ = pending
                    .tx
                    .send(Err(WalletSignerError::SigningFailed("malformed response".into())));
                Err(err)
            }
        }
    }

    /// Abandons the pending request, resolving the waiting signer with
    /// [`WalletSignerError::Cancelled`]. A no-op when nothing is pending.
    pub fn cancel(&self) {
        if let Some(pending) = self.pending.lock().take() {
            let _ = pending.tx.send(Err(WalletSignerError::Cancelled));
        }
    }

    /// Whether a signing request is currently awaiting its response.
    pub fn is_pending(&self) -> bool {
        self.pending.lock().as_ref().is_some_and(|p| !p.tx.is_closed())
    }
}

fn parse_signature(callback: &Url) -> Result<[u8; 64], WalletSignerError> {
    let value = callback
        .query_pairs()
        .find(|(k, _)| k == "sign")
        .map(|(_, v)| v.into_owned())
        .ok_or_else(|| WalletSignerError::MalformedResponse("missing sign parameter".into()))?;
    let bytes = general_purpose::URL_SAFE_NO_PAD
        .decode(value.as_bytes())
        .map_err(|e| WalletSignerError::MalformedResponse(e.to_string()))?;
    bytes
        .try_into()
        .map_err(|b: Vec<u8>| WalletSignerError::MalformedResponse(format!(
            "signature is {} bytes, expected 64",
            b.len()
        )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel_request(channel: &ExternalSignerChannel) -> SignRequest {
        channel.request(&[0x11; 32], b"body", ContractVersion::V4R2, "tonforge").unwrap()
    }

    fn callback(signature: &[u8]) -> Url {
        let encoded = general_purpose::URL_SAFE_NO_PAD.encode(signature);
        Url::parse(&format!("tonforge://publish?sign={encoded}")).unwrap()
    }

    #[test]
    fn deep_link_carries_all_parameters() {
        let channel = ExternalSignerChannel::new();
        let request = channel_request(&channel);
        let url = request.url();
        assert_eq!(url.scheme(), EXTERNAL_SIGNER_SCHEME);
        let pairs: Vec<(String, String)> =
            url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())).collect();
        assert_eq!(pairs.iter().find(|(k, _)| k == "v").unwrap().1, "v4r2");
        assert_eq!(pairs.iter().find(|(k, _)| k == "return").unwrap().1, "tonforge");
        let pk = &pairs.iter().find(|(k, _)| k == "pk").unwrap().1;
        assert_eq!(general_purpose::URL_SAFE_NO_PAD.decode(pk).unwrap(), vec![0x11; 32]);
        let body = &pairs.iter().find(|(k, _)| k == "body").unwrap().1;
        assert_eq!(general_purpose::URL_SAFE_NO_PAD.decode(body).unwrap(), b"body");
    }

    #[tokio::test]
    async fn complete_resolves_the_wait() {
        let channel = ExternalSignerChannel::new();
        let request = channel_request(&channel);
        assert!(channel.is_pending());

        channel.complete(&callback(&[0x7f; 64])).unwrap();
        let signature = request.wait().await.unwrap();
        assert_eq!(signature, [0x7f; 64]);
        assert!(!channel.is_pending());
    }

    #[tokio::test]
    async fn cancel_resolves_with_cancelled() {
        let channel = ExternalSignerChannel::new();
        let request = channel_request(&channel);
        channel.cancel();
        assert!(matches!(request.wait().await, Err(WalletSignerError::Cancelled)));
    }

    #[tokio::test]
    async fn dropping_the_channel_cancels_the_wait() {
        let channel = ExternalSignerChannel::new();
        let request = channel_request(&channel);
        drop(channel);
        assert!(matches!(request.wait().await, Err(WalletSignerError::Cancelled)));
    }

    #[tokio::test]
    async fn second_request_is_rejected_not_displaced() {
        let channel = ExternalSignerChannel::new();
        let first = channel_request(&channel);
        assert!(matches!(
            channel.request(&[0x22; 32], b"other", ContractVersion::V3R2, "tonforge"),
            Err(WalletSignerError::SignerBusy)
        ));

        // The first request is still resolvable.
        channel.complete(&callback(&[0x01; 64])).unwrap();
        assert_eq!(first.wait().await.unwrap(), [0x01; 64]);
    }

    #[tokio::test]
    async fn abandoned_request_frees_the_slot() {
        let channel = ExternalSignerChannel::new();
        drop(channel_request(&channel));
        // The waiter is gone; a new request may claim the channel.
        assert!(channel_request(&channel).url().query().is_some());
    }

    #[tokio::test]
    async fn malformed_response_fails_the_wait() {
        let channel = ExternalSignerChannel::new();
        let request = channel_request(&channel);
        let bad = Url::parse("tonforge://publish?sign=%21%21not-base64").unwrap();
        assert!(matches!(
            channel.complete(&bad),
            Err(WalletSignerError::MalformedResponse(_))
        ));
        assert!(matches!(request.wait().await, Err(WalletSignerError::SigningFailed(_))));
    }

    #[test]
    fn complete_without_pending_request_is_an_error() {
        let channel = ExternalSignerChannel::new();
        assert!(matches!(
            channel.complete(&callback(&[0u8; 64])),
            Err(WalletSignerError::NoPendingRequest)
        ));
    }

    #[test]
    fn short_signature_is_malformed() {
        let channel = ExternalSignerChannel::new();
        let request = channel_request(&channel);
        assert!(matches!(
            channel.complete(&callback(&[0u8; 12])),
            Err(WalletSignerError::MalformedResponse(_))
        ));
        drop(request);
    }
}
