use serde::{Deserialize, Serialize};
use std::fmt;

const LARGE_DISCOUNT_FROM: f64 = 20.0;
const AGGRESSIVE_PROMOTION_FROM: f64 = 40.0;

/// Discount level chosen from the size of a month's cancellation drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromotionTier {
    LightDiscount,
    LargeDiscount,
    AggressivePromotion,
}

impl PromotionTier {
    /// Half-open bands: `< 20`, `[20, 40)`, `>= 40`. NaN falls into the
    /// lightest tier.
    pub fn classify(percentage_drop: f64) -> Self {
        if percentage_drop.is_nan() || percentage_drop < LARGE_DISCOUNT_FROM {
            Self::LightDiscount
        } else if percentage_drop < AGGRESSIVE_PROMOTION_FROM {
            Self::LargeDiscount
        } else {
            Self::AggressivePromotion
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::LightDiscount => "light discount",
            Self::LargeDiscount => "large discount",
            Self::AggressivePromotion => "aggressive promotion",
        }
    }
}

impl fmt::Display for PromotionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
