use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::routes::order::ChannelOrder;

#[derive(Debug, Serialize)]
pub struct WalletSummary {
    pub balance: Decimal,
    pub transactions: Vec<ChannelOrder>,
}

#[derive(Debug, Deserialize)]
pub struct RechargeRequest {
    pub channel_code: String,
    pub amount: Decimal,
    pub note: Option<String>,
}

/// NUMERIC(18, 2) 能存下的最大金额
/// 即 999_999_999_999_999_999 × 10^-2（`Decimal::new` 不是 const fn，这里用 from_parts 拆成 lo/mid/hi）
pub const MAX_RECHARGE_AMOUNT: Decimal = Decimal::from_parts(0xA763_FFFF, 0x0DE0_B6B3, 0, false, 2);

/// 四舍五入到分并检查范围，返回可入库的金额
pub fn normalize_amount(amount: Decimal) -> Result<Decimal, &'static str> {
    let amount = amount.round_dp(2);
    if amount <= Decimal::ZERO {
        return Err("充值金额必须大于0");
    }
    if amount > MAX_RECHARGE_AMOUNT {
        return Err("充值金额超出上限");
    }
    Ok(amount)
}

/// 充值单号：R + UTC 时间 (YYYYMMDDHHMMSS) + 6 位随机十六进制
pub fn generate_order_no(now: DateTime<Utc>) -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!(
        "R{}{}",
        now.format("%Y%m%d%H%M%S"),
        random[..6].to_uppercase()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn order_no_layout() {
        let now = Utc.with_ymd_and_hms(2025, 3, 9, 14, 5, 7).unwrap();
        let no = generate_order_no(now);

        assert_eq!(no.len(), 21);
        assert!(no.starts_with("R20250309140507"));
        assert!(no[15..].chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
    }

    #[test]
    fn order_numbers_differ_within_the_same_second() {
        let now = Utc::now();
        assert_ne!(generate_order_no(now), generate_order_no(now));
    }

    #[test]
    fn amount_cap_matches_the_column() {
        assert_eq!(MAX_RECHARGE_AMOUNT.to_string(), "9999999999999999.99");
    }

    #[test]
    fn amount_is_rounded_and_bounded() {
        assert_eq!(normalize_amount(Decimal::new(100_006, 3)), Ok(Decimal::new(10001, 2)));
        assert_eq!(normalize_amount(MAX_RECHARGE_AMOUNT), Ok(MAX_RECHARGE_AMOUNT));
        assert_eq!(normalize_amount(Decimal::new(4, 3)), Err("充值金额必须大于0"));
        assert_eq!(normalize_amount(Decimal::new(-5, 0)), Err("充值金额必须大于0"));
        assert_eq!(
            normalize_amount(Decimal::from(100_000_000_000_000_000_i64)),
            Err("充值金额超出上限")
        );
    }

    #[test]
    fn recharge_amount_accepts_strings_and_numbers() {
        let req: RechargeRequest =
            serde_json::from_str(r#"{"channel_code":"alipay","amount":"100.50"}"#).unwrap();
        assert_eq!(req.amount, Decimal::new(10050, 2));
        assert!(req.note.is_none());

        let req: RechargeRequest =
            serde_json::from_str(r#"{"channel_code":"bank","amount":20,"note":"首充"}"#).unwrap();
        assert_eq!(req.amount, Decimal::from(20));
    }
}
