//! Quote refresh routine used by the quote coordinator

use crate::{
    actions::Action,
    error::QuoteError,
    error_flasher::ErrorFlasher,
    provider::AssetBuyer,
    store::DispatchHandle,
    types::{AffiliateInfo, Asset, UnitAmount},
};
use async_trait::async_trait;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use std::sync::Arc;

/// Fetches a quote and dispatches its outcome
///
/// Implementations own all of their dispatches, including failures; they
/// never report errors back to the caller.
#[async_trait]
pub trait QuoteUpdater: Send + Sync {
    async fn update_buy_quote(
        &self,
        asset_buyer: Arc<dyn AssetBuyer>,
        dispatch: DispatchHandle,
        asset: Asset,
        asset_unit_amount: UnitAmount,
        should_set_pending: bool,
        affiliate_info: Option<AffiliateInfo>,
    );
}

/// Converts a unit amount to base units (`amount * 10^decimals`, truncated)
pub fn to_base_unit_amount(amount: UnitAmount, decimals: u32) -> Result<u128, QuoteError> {
    if amount.is_sign_negative() {
        return Err(QuoteError::InvalidAmount(format!("{} is negative", amount)));
    }

    let scale = 10u128
        .checked_pow(decimals)
        .and_then(Decimal::from_u128)
        .ok_or_else(|| QuoteError::InvalidAmount(format!("unsupported decimals {}", decimals)))?;

    amount
        .checked_mul(scale)
        .and_then(|base| base.trunc().to_u128())
        .ok_or_else(|| QuoteError::InvalidAmount(format!("{} overflows base units", amount)))
}

/// Default quote refresh routine
///
/// Flashes a user-facing message for every failure and marks the quote
/// request as failed; on success clears any flashed error.
pub struct BuyQuoteUpdater {
    error_flasher: Arc<ErrorFlasher>,
}

impl BuyQuoteUpdater {
    pub fn new(error_flasher: Arc<ErrorFlasher>) -> Self {
        Self { error_flasher }
    }

    fn fail(&self, dispatch: &DispatchHandle, asset: &Asset, error: &QuoteError) {
        tracing::warn!(
            asset_data = %asset.asset_data,
            error = %error,
            "Failed to update buy quote"
        );
        self.error_flasher
            .flash_new_error_message(dispatch, &error.user_message(&asset.formatted_symbol()));
        dispatch.dispatch(Action::SetQuoteRequestStateFailure);
    }
}

#[async_trait]
impl QuoteUpdater for BuyQuoteUpdater {
    async fn update_buy_quote(
        &self,
        asset_buyer: Arc<dyn AssetBuyer>,
        dispatch: DispatchHandle,
        asset: Asset,
        asset_unit_amount: UnitAmount,
        should_set_pending: bool,
        affiliate_info: Option<AffiliateInfo>,
    ) {
        let decimals = asset.decimals().unwrap_or(0);
        let base_unit_amount = match to_base_unit_amount(asset_unit_amount, decimals) {
            Ok(amount) => amount,
            Err(e) => {
                self.fail(&dispatch, &asset, &e);
                return;
            }
        };

        if should_set_pending {
            dispatch.dispatch(Action::SetQuoteRequestStatePending);
        }

        let fee_percentage = affiliate_info.as_ref().map(|info| info.fee_percentage);
        match asset_buyer
            .get_buy_quote(&asset.asset_data, base_unit_amount, fee_percentage)
            .await
        {
            Ok(quote) => {
                tracing::debug!(
                    asset_data = %asset.asset_data,
                    amount = base_unit_amount,
                    "Fetched buy quote"
                );
                self.error_flasher.clear_error(&dispatch);
                dispatch.dispatch(Action::UpdateLatestBuyQuote(quote));
            }
            Err(e) => self.fail(&dispatch, &asset, &e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::mock::{sample_quote, MockAssetBuyer};
    use crate::store::mock::RecordingDispatch;
    use crate::types::AssetMetaData;
    use rust_decimal_macros::dec;

    const ZRX: &str = "0xf47261b0000000000000000000000000e41d2489571d322189246dafa5ebde1f4699f498";

    fn zrx() -> Asset {
        Asset {
            asset_data: ZRX.to_string(),
            meta_data: AssetMetaData::ERC20 {
                symbol: "zrx".to_string(),
                decimals: 18,
                name: None,
                primary_color: None,
            },
        }
    }

    fn updater() -> BuyQuoteUpdater {
        BuyQuoteUpdater::new(Arc::new(ErrorFlasher::default()))
    }

    #[test]
    fn test_to_base_unit_amount() {
        assert_eq!(
            to_base_unit_amount(dec!(1.5), 18).unwrap(),
            1_500_000_000_000_000_000
        );
        assert_eq!(to_base_unit_amount(dec!(0.0000001), 6).unwrap(), 0);
        assert_eq!(to_base_unit_amount(dec!(3), 0).unwrap(), 3);
        assert!(to_base_unit_amount(dec!(-1), 18).is_err());
        assert!(to_base_unit_amount(dec!(1), 40).is_err());
    }

    #[tokio::test]
    async fn test_success_sets_pending_and_updates_quote() {
        let buyer = Arc::new(MockAssetBuyer::new());
        buyer.set_quote(|| Ok(sample_quote(ZRX, 2_000_000_000_000_000_000)));
        let recorder = RecordingDispatch::new();

        let affiliate = AffiliateInfo {
            fee_recipient: "0xfee".to_string(),
            fee_percentage: 0.01,
        };
        updater()
            .update_buy_quote(buyer.clone(), recorder.clone(), zrx(), dec!(2), true, Some(affiliate))
            .await;

        assert_eq!(
            recorder.actions(),
            vec![
                Action::SetQuoteRequestStatePending,
                Action::HideError,
                Action::UpdateLatestBuyQuote(sample_quote(ZRX, 2_000_000_000_000_000_000)),
            ]
        );
        assert_eq!(
            buyer.quote_requests(),
            vec![(ZRX.to_string(), 2_000_000_000_000_000_000, Some(0.01))]
        );
    }

    #[tokio::test]
    async fn test_insufficient_liquidity_flashes_symbol() {
        let buyer = Arc::new(MockAssetBuyer::new());
        buyer.set_quote(|| Err(QuoteError::InsufficientAssetLiquidity));
        let recorder = RecordingDispatch::new();

        updater()
            .update_buy_quote(buyer, recorder.clone(), zrx(), dec!(1), false, None)
            .await;

        assert_eq!(
            recorder.actions(),
            vec![
                Action::set_error_message("Not enough ZRX available"),
                Action::SetQuoteRequestStateFailure,
            ]
        );
    }

    #[tokio::test]
    async fn test_unexpected_error_is_not_propagated() {
        let buyer = Arc::new(MockAssetBuyer::new());
        buyer.set_quote(|| {
            Err(QuoteError::Provider(crate::error::ProviderError::RateLimitExceeded))
        });
        let recorder = RecordingDispatch::new();

        updater()
            .update_buy_quote(buyer, recorder.clone(), zrx(), dec!(1), true, None)
            .await;

        assert_eq!(
            recorder.actions(),
            vec![
                Action::SetQuoteRequestStatePending,
                Action::set_error_message("Something went wrong"),
                Action::SetQuoteRequestStateFailure,
            ]
        );
    }

    #[tokio::test]
    async fn test_negative_amount_fails_without_quote_request() {
        let buyer = Arc::new(MockAssetBuyer::new());
        buyer.set_quote(|| Ok(sample_quote(ZRX, 1)));
        let recorder = RecordingDispatch::new();

        updater()
            .update_buy_quote(buyer.clone(), recorder.clone(), zrx(), dec!(-2), true, None)
            .await;

        assert_eq!(
            recorder.actions(),
            vec![
                Action::set_error_message("Invalid amount"),
                Action::SetQuoteRequestStateFailure,
            ]
        );
        assert!(buyer.quote_requests().is_empty());
    }
}
