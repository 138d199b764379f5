//! 错误类型

use std::io;
use std::path::PathBuf;

use crate::models::Redemption;

/// 礼品卡操作错误
///
/// 所有变体都是可恢复的：界面显示提示后回到同一步骤。
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GiftCardError {
    #[error("Please enter an amount between {min:.2} and {max:.2} (got {amount}).")]
    InvalidAmount { amount: f64, min: f64, max: f64 },
    #[error("Gift card {0} not found. Check the code.")]
    NotFound(String),
    #[error(
        "This card was already redeemed on {} in {} ({:.6} {}).",
        .0.redeemed_at_display(),
        .0.crypto,
        .0.amount_crypto,
        .0.crypto
    )]
    AlreadyRedeemed(Redemption),
    #[error("Please enter a (simulated) wallet address.")]
    MissingWallet,
    #[error("Unsupported fiat currency: {0}")]
    UnsupportedCurrency(String),
    #[error("Unsupported cryptocurrency: {0}")]
    UnsupportedCrypto(String),
    #[error("Could not find an unused gift card code after {0} attempts")]
    CodeSpaceExhausted(u32),
}

/// 配置加载错误
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Could not read settings file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Could not parse settings file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid settings: {0}")]
    Invalid(String),
}
