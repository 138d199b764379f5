use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::GiftCardError;

/// 时间戳显示格式 (ISO 8601，精确到秒)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// 法币
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum FiatCurrency {
    #[default]
    Eur,
    Usd,
    Gbp,
}

impl FiatCurrency {
    pub const ALL: [FiatCurrency; 3] = [FiatCurrency::Eur, FiatCurrency::Usd, FiatCurrency::Gbp];

    pub fn code(&self) -> &'static str {
        match self {
            FiatCurrency::Eur => "EUR",
            FiatCurrency::Usd => "USD",
            FiatCurrency::Gbp => "GBP",
        }
    }

    /// 循环切换到下一个币种（用于表单选择）
    pub fn next(self) -> Self {
        match self {
            FiatCurrency::Eur => FiatCurrency::Usd,
            FiatCurrency::Usd => FiatCurrency::Gbp,
            FiatCurrency::Gbp => FiatCurrency::Eur,
        }
    }
}

impl fmt::Display for FiatCurrency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for FiatCurrency {
    type Err = GiftCardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        Self::ALL
            .into_iter()
            .find(|c| c.code() == upper)
            .ok_or_else(|| GiftCardError::UnsupportedCurrency(s.to_string()))
    }
}

/// 模拟兑换的加密货币
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum CryptoSymbol {
    #[default]
    Btc,
    Eth,
    Usdc,
}

impl CryptoSymbol {
    pub const ALL: [CryptoSymbol; 3] = [CryptoSymbol::Btc, CryptoSymbol::Eth, CryptoSymbol::Usdc];

    pub fn symbol(&self) -> &'static str {
        match self {
            CryptoSymbol::Btc => "BTC",
            CryptoSymbol::Eth => "ETH",
            CryptoSymbol::Usdc => "USDC",
        }
    }

    pub fn next(self) -> Self {
        match self {
            CryptoSymbol::Btc => CryptoSymbol::Eth,
            CryptoSymbol::Eth => CryptoSymbol::Usdc,
            CryptoSymbol::Usdc => CryptoSymbol::Btc,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            CryptoSymbol::Btc => CryptoSymbol::Usdc,
            CryptoSymbol::Eth => CryptoSymbol::Btc,
            CryptoSymbol::Usdc => CryptoSymbol::Eth,
        }
    }
}

impl fmt::Display for CryptoSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for CryptoSymbol {
    type Err = GiftCardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        Self::ALL
            .into_iter()
            .find(|c| c.symbol() == upper)
            .ok_or_else(|| GiftCardError::UnsupportedCrypto(s.to_string()))
    }
}

/// 礼品卡状态：pending -> redeemed，单向且不可逆
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CardStatus {
    #[default]
    Pending,
    Redeemed,
}

impl fmt::Display for CardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardStatus::Pending => f.write_str("pending"),
            CardStatus::Redeemed => f.write_str("redeemed"),
        }
    }
}

/// 一次兑换的结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Redemption {
    pub redeemed_at: DateTime<Utc>,
    pub crypto: CryptoSymbol,
    pub amount_crypto: f64,
    pub wallet_address: String,
}

impl Redemption {
    pub fn redeemed_at_display(&self) -> String {
        self.redeemed_at.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// 礼品卡
///
/// 兑换字段在兑换前均为 `None`，兑换时一次性全部写入。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GiftCard {
    pub code: String,
    pub fiat_currency: FiatCurrency,
    pub amount_fiat: f64,
    pub recipient_name: Option<String>,
    pub message: Option<String>,
    pub status: CardStatus,
    pub created_at: DateTime<Utc>,
    pub redeemed_at: Option<DateTime<Utc>>,
    pub redeemed_crypto: Option<CryptoSymbol>,
    pub redeemed_amount_crypto: Option<f64>,
    pub redeemed_wallet: Option<String>,
}

impl GiftCard {
    pub fn new(
        code: String,
        fiat_currency: FiatCurrency,
        amount_fiat: f64,
        recipient_name: Option<String>,
        message: Option<String>,
    ) -> Self {
        Self {
            code,
            fiat_currency,
            amount_fiat,
            recipient_name: recipient_name.and_then(non_empty),
            message: message.and_then(non_empty),
            status: CardStatus::Pending,
            created_at: Utc::now(),
            redeemed_at: None,
            redeemed_crypto: None,
            redeemed_amount_crypto: None,
            redeemed_wallet: None,
        }
    }

    pub fn is_redeemed(&self) -> bool {
        self.status == CardStatus::Redeemed
    }

    /// 已兑换时返回兑换信息
    pub fn redemption(&self) -> Option<Redemption> {
        if !self.is_redeemed() {
            return None;
        }

        Some(Redemption {
            redeemed_at: self.redeemed_at?,
            crypto: self.redeemed_crypto?,
            amount_crypto: self.redeemed_amount_crypto?,
            wallet_address: self.redeemed_wallet.clone().unwrap_or_default(),
        })
    }

    /// 写入兑换信息并切换为 redeemed
    pub(crate) fn mark_redeemed(&mut self, redemption: &Redemption) {
        self.status = CardStatus::Redeemed;
        self.redeemed_at = Some(redemption.redeemed_at);
        self.redeemed_crypto = Some(redemption.crypto);
        self.redeemed_amount_crypto = Some(redemption.amount_crypto);
        self.redeemed_wallet = Some(redemption.wallet_address.clone());
    }

    pub fn created_at_display(&self) -> String {
        self.created_at.format(TIMESTAMP_FORMAT).to_string()
    }

    /// 收卡人看到的预览
    pub fn preview(&self) -> String {
        format!(
            "You received a crypto gift card from {}!\n\nAmount: {:.2} {}\nMessage: {}\nCard code: {}",
            self.recipient_name.as_deref().unwrap_or("a friend"),
            self.amount_fiat,
            self.fiat_currency,
            self.message.as_deref().unwrap_or("(no message)"),
            self.code
        )
    }

    /// 兑换页显示的卡片详情
    pub fn details(&self) -> String {
        format!(
            "Status: {}\nCreated: {}\nOriginal amount: {:.2} {}\nFrom: {}\nMessage: {}",
            self.status,
            self.created_at_display(),
            self.amount_fiat,
            self.fiat_currency,
            self.recipient_name.as_deref().unwrap_or("Unknown"),
            self.message.as_deref().unwrap_or("(no message)")
        )
    }
}

/// 规范化用户输入的卡号（去空白并转大写）
pub fn normalize_code(input: &str) -> String {
    input.trim().to_uppercase()
}

/// 生成分享链接
pub fn share_link(base_url: &str, code: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), code)
}

fn non_empty(text: String) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_card_is_pending() {
        let card = GiftCard::new("ABCD1234".to_string(), FiatCurrency::Eur, 50.0, None, None);
        assert_eq!(card.status, CardStatus::Pending);
        assert!(card.redemption().is_none());
        assert!(card.redeemed_at.is_none());
        assert!(card.redeemed_crypto.is_none());
        assert!(card.redeemed_amount_crypto.is_none());
    }

    #[test]
    fn test_blank_optional_text_is_dropped() {
        let card = GiftCard::new(
            "ABCD1234".to_string(),
            FiatCurrency::Usd,
            20.0,
            Some("   ".to_string()),
            Some("  Happy birthday ".to_string()),
        );
        assert_eq!(card.recipient_name, None);
        assert_eq!(card.message.as_deref(), Some("Happy birthday"));
    }

    #[test]
    fn test_preview_defaults() {
        let card = GiftCard::new("ABCD1234".to_string(), FiatCurrency::Gbp, 12.5, None, None);
        let preview = card.preview();
        assert!(preview.contains("from a friend!"));
        assert!(preview.contains("12.50 GBP"));
        assert!(preview.contains("(no message)"));
        assert!(preview.contains("ABCD1234"));

        let details = card.details();
        assert!(details.contains("Status: pending"));
        assert!(details.contains("From: Unknown"));
    }

    #[test]
    fn test_parse_currency_and_crypto() {
        assert_eq!(" eur ".parse::<FiatCurrency>(), Ok(FiatCurrency::Eur));
        assert_eq!("GBP".parse::<FiatCurrency>(), Ok(FiatCurrency::Gbp));
        assert_eq!(
            "JPY".parse::<FiatCurrency>(),
            Err(GiftCardError::UnsupportedCurrency("JPY".to_string()))
        );
        assert_eq!("usdc".parse::<CryptoSymbol>(), Ok(CryptoSymbol::Usdc));
        assert_eq!(
            "DOGE".parse::<CryptoSymbol>(),
            Err(GiftCardError::UnsupportedCrypto("DOGE".to_string()))
        );
    }

    #[test]
    fn test_cycling_visits_every_variant() {
        let mut currency = FiatCurrency::Eur;
        for expected in [FiatCurrency::Usd, FiatCurrency::Gbp, FiatCurrency::Eur] {
            currency = currency.next();
            assert_eq!(currency, expected);
        }

        assert_eq!(CryptoSymbol::Btc.prev(), CryptoSymbol::Usdc);
        assert_eq!(CryptoSymbol::Usdc.next(), CryptoSymbol::Btc);
    }

    #[test]
    fn test_normalize_code_and_share_link() {
        assert_eq!(normalize_code("  ab12cd34\n"), "AB12CD34");
        assert_eq!(
            share_link("https://zeypay.com/card/", "AB12CD34"),
            "https://zeypay.com/card/AB12CD34"
        );
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let card = GiftCard::new("ABCD1234".to_string(), FiatCurrency::Eur, 5.0, None, None);
        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["status"], "pending");
        assert_eq!(json["fiat_currency"], "EUR");
        assert!(json["redeemed_at"].is_null());
    }
}
