//! 模拟汇率换算
//!
//! 所有汇率均为写死的常量，没有任何实时行情。

use crate::models::{CryptoSymbol, FiatCurrency};

/// 法币兑美元汇率
pub fn fiat_usd_rate(currency: FiatCurrency) -> f64 {
    match currency {
        FiatCurrency::Eur => 1.1,
        FiatCurrency::Usd => 1.0,
        FiatCurrency::Gbp => 1.25,
    }
}

/// 每单位加密货币的美元价格
pub fn crypto_rate(symbol: CryptoSymbol) -> f64 {
    match symbol {
        CryptoSymbol::Btc => 60_000.0,
        CryptoSymbol::Eth => 3_000.0,
        CryptoSymbol::Usdc => 1.0,
    }
}

pub fn fiat_to_usd(amount: f64, currency: FiatCurrency) -> f64 {
    amount * fiat_usd_rate(currency)
}

/// 法币金额换算为加密货币数量
pub fn convert(amount_fiat: f64, currency: FiatCurrency, symbol: CryptoSymbol) -> f64 {
    fiat_to_usd(amount_fiat, currency) / crypto_rate(symbol)
}

/// 兑换确认前展示的模拟报价
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote {
    pub amount_usd: f64,
    pub crypto_price_usd: f64,
    pub amount_crypto: f64,
}

pub fn quote(amount_fiat: f64, currency: FiatCurrency, symbol: CryptoSymbol) -> Quote {
    Quote {
        amount_usd: fiat_to_usd(amount_fiat, currency),
        crypto_price_usd: crypto_rate(symbol),
        amount_crypto: convert(amount_fiat, currency, symbol),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn test_fiat_to_usd() {
        assert!((fiat_to_usd(100.0, FiatCurrency::Eur) - 110.0).abs() < EPSILON);
        assert!((fiat_to_usd(100.0, FiatCurrency::Usd) - 100.0).abs() < EPSILON);
        assert!((fiat_to_usd(100.0, FiatCurrency::Gbp) - 125.0).abs() < EPSILON);
    }

    #[test]
    fn test_convert_eur_to_btc() {
        let amount = convert(100.0, FiatCurrency::Eur, CryptoSymbol::Btc);
        assert!((amount - 110.0 / 60_000.0).abs() < EPSILON);
        assert!((amount - 0.001_833_333).abs() < 1e-9);
    }

    #[test]
    fn test_convert_is_deterministic() {
        for currency in FiatCurrency::ALL {
            for symbol in CryptoSymbol::ALL {
                let first = convert(42.5, currency, symbol);
                let second = convert(42.5, currency, symbol);
                assert_eq!(first.to_bits(), second.to_bits());
            }
        }
    }

    #[test]
    fn test_quote_matches_convert() {
        let q = quote(50.0, FiatCurrency::Gbp, CryptoSymbol::Eth);
        assert!((q.amount_usd - 62.5).abs() < EPSILON);
        assert_eq!(q.crypto_price_usd, 3_000.0);
        assert_eq!(q.amount_crypto, convert(50.0, FiatCurrency::Gbp, CryptoSymbol::Eth));
    }

    #[test]
    fn test_usdc_is_one_to_one_with_usd() {
        assert_eq!(convert(10.0, FiatCurrency::Usd, CryptoSymbol::Usdc), 10.0);
    }
}
