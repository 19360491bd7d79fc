//! 订单详情页的金额展示。折扣和汇率是写死的业务常量，与渠道配置无关。

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// 8 折
fn payable_rate() -> Decimal {
    Decimal::new(8, 1)
}

/// 展示用 USDT 汇率 7.5
fn display_usdt_rate() -> Decimal {
    Decimal::new(75, 1)
}

fn two_decimals(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentInfo {
    pub amount: String,
    /// 优惠金额 (amount × 0.2)
    pub discount: String,
    /// 折后应付 (amount × 0.8)
    pub payable: String,
    /// 折后金额折合 USDT (amount × 0.8 / 7.5)
    pub usdt_amount: String,
    /// 优惠金额折合 USDT (amount × 0.2 / 7.5)
    pub discount_usdt: String,
}

impl PaymentInfo {
    pub fn compute(amount: Decimal) -> Self {
        let payable = amount * payable_rate();
        let discount = amount - payable;

        Self {
            amount: two_decimals(amount),
            discount: two_decimals(discount),
            payable: two_decimals(payable),
            usdt_amount: two_decimals(payable / display_usdt_rate()),
            discount_usdt: two_decimals(discount / display_usdt_rate()),
        }
    }
}
