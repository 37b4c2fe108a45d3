use crate::RiskModel;

/// Everything the confirmation screen shows for one drafted attempt.
///
/// Derived from a single emulation run and discarded with the draft; it is
/// never updated in place, a new draft produces a new model.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfirmTransactionModel {
    /// Human-readable description of the projected ledger event, as
    /// reported by emulation.
    pub event_description: String,
    /// Formatted network fee, e.g. `≈ 0.0051 TON`.
    pub fee: String,
    /// Fee converted at the current rate; absent when no rate is known.
    pub fee_fiat: Option<String>,
    pub risk_title: String,
    pub risk_caption: String,
    pub is_high_risk: bool,
}

impl ConfirmTransactionModel {
    pub(crate) fn new(event_description: String, risk: RiskModel) -> Self {
        Self {
            event_description,
            fee: risk.fee,
            fee_fiat: risk.fee_fiat,
            risk_title: risk.risk_title,
            risk_caption: risk.risk_caption,
            is_high_risk: risk.is_high_risk,
        }
    }
}
