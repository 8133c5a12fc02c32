//! Campaign discount resolution.
//!
//! First-match policy: campaigns are ordered by `discount_value`
//! descending and the first applicable one wins. This is deliberately not
//! best-of-all-matches — the original storefront behaved this way and
//! checkout previews must agree with stored orders. The resolver sorts
//! internally rather than trusting callers to pre-sort.

use chrono::Utc;
use uuid::Uuid;

use asirex_domain::money::Money;

use crate::domain::repository::CampaignRepository;
use crate::domain::types::{Campaign, DiscountType};
use crate::error::StorefrontError;

/// Outcome of discount resolution for a cart.
#[derive(Debug, Clone)]
pub struct DiscountResolution {
    pub campaign_id: Option<Uuid>,
    pub campaign_name: Option<String>,
    pub discount: Money,
}

impl DiscountResolution {
    pub fn none() -> Self {
        Self {
            campaign_id: None,
            campaign_name: None,
            discount: Money::ZERO,
        }
    }
}

/// Pick at most one campaign for the cart and compute its capped discount.
///
/// Invariants: the returned discount never exceeds `order_amount`, and
/// never exceeds the campaign's `max_discount_amount` when set.
pub fn resolve_discount(
    campaigns: &[Campaign],
    order_amount: Money,
    categories: &[String],
    product_ids: &[Uuid],
) -> DiscountResolution {
    let mut ordered: Vec<&Campaign> = campaigns.iter().collect();
    ordered.sort_by(|a, b| b.discount_value.cmp(&a.discount_value));

    for campaign in ordered {
        if order_amount < campaign.min_order_amount {
            continue;
        }
        if !campaign.covers(categories, product_ids) {
            continue;
        }

        let raw = match campaign.discount_type {
            DiscountType::Percentage => order_amount.percent(campaign.discount_value),
            DiscountType::Fixed => Money(campaign.discount_value),
        };
        let capped = match campaign.max_discount_amount {
            Some(cap) => raw.min(cap),
            None => raw,
        };
        let discount = capped.min(order_amount);

        return DiscountResolution {
            campaign_id: Some(campaign.id),
            campaign_name: Some(campaign.name.clone()),
            discount,
        };
    }

    DiscountResolution::none()
}

pub struct PreviewDiscountInput {
    pub order_amount: Money,
    pub categories: Vec<String>,
    pub product_ids: Vec<Uuid>,
}

pub struct PreviewDiscountUseCase<C: CampaignRepository> {
    pub campaigns: C,
}

impl<C: CampaignRepository> PreviewDiscountUseCase<C> {
    pub async fn execute(
        &self,
        input: PreviewDiscountInput,
    ) -> Result<DiscountResolution, StorefrontError> {
        let live = self.campaigns.find_live(Utc::now()).await?;
        Ok(resolve_discount(
            &live,
            input.order_amount,
            &input.categories,
            &input.product_ids,
        ))
    }
}
