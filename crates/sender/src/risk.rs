use tonforge_boc::Coins;

/// Fraction of the balance at which a transaction is flagged: risk of at
/// least one fifth of holdings is "high". Product policy, not derived.
pub const HIGH_RISK_DENOMINATOR: u128 = 5;

/// Inputs to the fee/risk mapping, straight from emulation plus the
/// wallet's current state.
#[derive(Clone, Copy, Debug)]
pub struct RiskInput<'a> {
    pub fee: Coins,
    pub risk_total: Coins,
    pub risk_nft_count: u32,
    pub total_balance: Coins,
    /// Coin price in `currency`; `None` suppresses fiat strings entirely.
    pub rate: Option<f64>,
    pub currency: &'a str,
}

/// Human-facing fee and risk figures.
#[derive(Clone, Debug, PartialEq)]
pub struct RiskModel {
    pub fee: String,
    pub fee_fiat: Option<String>,
    pub risk_title: String,
    pub risk_caption: String,
    pub is_high_risk: bool,
}

/// Pure mapping from emulation figures to display strings.
pub fn evaluate(input: RiskInput<'_>) -> RiskModel {
    // risk >= balance / 5, compared exactly in integers so the boundary
    // case lands on the high-risk side.
    let is_high_risk = input
        .risk_total
        .saturating_mul(HIGH_RISK_DENOMINATOR)
        .nano()
        >= input.total_balance.nano();

    let risk_title = format!("Total risk: {} TON", input.risk_total);
    let risk_caption = if input.risk_nft_count > 0 {
        format!(
            "Up to {} TON and {} NFT{} could leave your wallet",
            input.risk_total,
            input.risk_nft_count,
            if input.risk_nft_count == 1 { "" } else { "s" }
        )
    } else {
        format!("Up to {} TON could leave your wallet", input.risk_total)
    };

    RiskModel {
        fee: format!("\u{2248} {} TON", input.fee),
        fee_fiat: fiat(input.fee, input.rate, input.currency),
        risk_title,
        risk_caption,
        is_high_risk,
    }
}

fn fiat(amount: Coins, rate: Option<f64>, currency: &str) -> Option<String> {
    let rate = rate?;
    Some(format!("\u{2248} {:.2} {currency}", amount.as_tons_f64() * rate))
}
