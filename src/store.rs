use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use uuid::Uuid;

use crate::error::GiftCardError;
use crate::models::{CryptoSymbol, FiatCurrency, GiftCard, Redemption};
use crate::rates;
use crate::settings::AmountLimits;

/// 卡号字母表 (A-Z0-9)
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
pub const CODE_LENGTH: usize = 8;
const MAX_CODE_ATTEMPTS: u32 = 16;

/// 会话内的礼品卡存储（仅内存）
pub struct GiftCardStore {
    session_id: Uuid,
    cards: HashMap<String, GiftCard>,
    limits: AmountLimits,
    rng: StdRng,
}

impl GiftCardStore {
    pub fn new(limits: AmountLimits) -> Self {
        Self::with_rng(limits, StdRng::from_entropy())
    }

    pub fn with_rng(limits: AmountLimits, rng: StdRng) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            cards: HashMap::new(),
            limits,
            rng,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn limits(&self) -> &AmountLimits {
        &self.limits
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// 创建礼品卡，返回卡号
    pub fn create(
        &mut self,
        fiat_currency: FiatCurrency,
        amount_fiat: f64,
        recipient_name: Option<String>,
        message: Option<String>,
    ) -> Result<String, GiftCardError> {
        if !self.limits.contains(amount_fiat) {
            warn!(
                "[{}] rejected gift card amount {} {}",
                self.session_id, amount_fiat, fiat_currency
            );
            return Err(GiftCardError::InvalidAmount {
                amount: amount_fiat,
                min: self.limits.min,
                max: self.limits.max,
            });
        }

        let code = self.generate_code()?;
        let card = GiftCard::new(
            code.clone(),
            fiat_currency,
            amount_fiat,
            recipient_name,
            message,
        );
        self.cards.insert(code.clone(), card);

        info!(
            "[{}] created gift card {} for {:.2} {}",
            self.session_id, code, amount_fiat, fiat_currency
        );
        Ok(code)
    }

    /// 按卡号精确查找（调用方负责规范化）
    pub fn lookup(&self, code: &str) -> Option<&GiftCard> {
        let card = self.cards.get(code);
        debug!(
            "[{}] lookup {} -> {}",
            self.session_id,
            code,
            if card.is_some() { "found" } else { "not found" }
        );
        card
    }

    /// 兑换礼品卡
    ///
    /// 检查顺序：卡号不存在、已兑换、钱包地址为空。已兑换时返回原有兑换信息，不做任何修改。
    pub fn redeem(
        &mut self,
        code: &str,
        crypto: CryptoSymbol,
        wallet_address: &str,
    ) -> Result<Redemption, GiftCardError> {
        let session_id = self.session_id;
        let Some(card) = self.cards.get_mut(code) else {
            warn!("[{}] redeem of unknown card {}", session_id, code);
            return Err(GiftCardError::NotFound(code.to_string()));
        };

        if let Some(existing) = card.redemption() {
            warn!("[{}] card {} was already redeemed", session_id, code);
            return Err(GiftCardError::AlreadyRedeemed(existing));
        }

        let wallet_address = wallet_address.trim();
        if wallet_address.is_empty() {
            return Err(GiftCardError::MissingWallet);
        }

        let redemption = Redemption {
            redeemed_at: Utc::now(),
            crypto,
            amount_crypto: rates::convert(card.amount_fiat, card.fiat_currency, crypto),
            wallet_address: wallet_address.to_string(),
        };
        card.mark_redeemed(&redemption);

        info!(
            "[{}] redeemed card {} for {:.6} {} to {}",
            session_id, code, redemption.amount_crypto, crypto, redemption.wallet_address
        );
        Ok(redemption)
    }

    /// 按创建时间排序的所有礼品卡
    pub fn cards(&self) -> Vec<&GiftCard> {
        let mut cards: Vec<&GiftCard> = self.cards.values().collect();
        cards.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.code.cmp(&b.code))
        });
        cards
    }

    /// 导出全部礼品卡为 JSON（演示用）
    pub fn snapshot_json(&self) -> serde_json::Result<String> {
        let ordered: BTreeMap<&str, &GiftCard> = self
            .cards
            .iter()
            .map(|(code, card)| (code.as_str(), card))
            .collect();
        serde_json::to_string_pretty(&ordered)
    }

    /// 生成未被占用的卡号
    fn generate_code(&mut self) -> Result<String, GiftCardError> {
        for _ in 0..MAX_CODE_ATTEMPTS {
            let code: String = (0..CODE_LENGTH)
                .filter_map(|_| CODE_ALPHABET.choose(&mut self.rng))
                .map(|&b| char::from(b))
                .collect();
            if !self.cards.contains_key(&code) {
                return Ok(code);
            }
            debug!("[{}] code collision on {}, retrying", self.session_id, code);
        }
        Err(GiftCardError::CodeSpaceExhausted(MAX_CODE_ATTEMPTS))
    }
}

impl Default for GiftCardStore {
    fn default() -> Self {
        Self::new(AmountLimits::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CardStatus;

    fn seeded_store() -> GiftCardStore {
        GiftCardStore::with_rng(AmountLimits::default(), StdRng::seed_from_u64(7))
    }

    #[test]
    fn test_create_then_lookup_is_pending() {
        let mut store = seeded_store();
        let code = store
            .create(FiatCurrency::Usd, 25.0, Some("Alice".to_string()), None)
            .unwrap();

        assert_eq!(code.len(), CODE_LENGTH);
        assert!(code.bytes().all(|b| CODE_ALPHABET.contains(&b)));

        let card = store.lookup(&code).unwrap();
        assert_eq!(card.status, CardStatus::Pending);
        assert_eq!(card.recipient_name.as_deref(), Some("Alice"));
        assert!(card.redeemed_at.is_none());
        assert!(card.redeemed_crypto.is_none());
        assert!(card.redeemed_amount_crypto.is_none());
        assert!(card.redeemed_wallet.is_none());
    }

    #[test]
    fn test_amount_boundaries() {
        let mut store = seeded_store();
        assert!(store.create(FiatCurrency::Eur, 5.0, None, None).is_ok());
        assert!(store.create(FiatCurrency::Eur, 10_000.0, None, None).is_ok());

        for amount in [0.0, -10.0, 4.99, 10_000.01, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                store.create(FiatCurrency::Eur, amount, None, None),
                Err(GiftCardError::InvalidAmount { .. })
            ));
        }
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_eur_to_btc_redemption() {
        let mut store = seeded_store();
        let code = store.create(FiatCurrency::Eur, 100.0, None, None).unwrap();

        let redemption = store.redeem(&code, CryptoSymbol::Btc, "bc1qdemo").unwrap();
        assert!((redemption.amount_crypto - 100.0 * 1.1 / 60_000.0).abs() < 1e-12);
        assert_eq!(redemption.wallet_address, "bc1qdemo");

        let card = store.lookup(&code).unwrap();
        assert_eq!(card.status, CardStatus::Redeemed);
        assert_eq!(card.redeemed_crypto, Some(CryptoSymbol::Btc));
        assert_eq!(card.redeemed_amount_crypto, Some(redemption.amount_crypto));
        assert_eq!(card.redeemed_at, Some(redemption.redeemed_at));
    }

    #[test]
    fn test_second_redeem_does_not_change_facts() {
        let mut store = seeded_store();
        let code = store.create(FiatCurrency::Gbp, 40.0, None, None).unwrap();
        let first = store.redeem(&code, CryptoSymbol::Eth, "0xabc").unwrap();

        let second = store.redeem(&code, CryptoSymbol::Usdc, "0xdef");
        assert_eq!(second, Err(GiftCardError::AlreadyRedeemed(first.clone())));

        let card = store.lookup(&code).unwrap();
        assert_eq!(card.redemption(), Some(first));
    }

    #[test]
    fn test_missing_wallet_leaves_card_pending() {
        let mut store = seeded_store();
        let code = store.create(FiatCurrency::Usd, 10.0, None, None).unwrap();

        assert_eq!(
            store.redeem(&code, CryptoSymbol::Usdc, "   "),
            Err(GiftCardError::MissingWallet)
        );
        assert_eq!(store.lookup(&code).unwrap().status, CardStatus::Pending);
    }

    #[test]
    fn test_unknown_code_leaves_store_unchanged() {
        let mut store = seeded_store();
        let code = store.create(FiatCurrency::Usd, 10.0, None, None).unwrap();
        let before = store.snapshot_json().unwrap();

        assert_eq!(
            store.redeem("ZZZZZZZZ", CryptoSymbol::Btc, "0xabc"),
            Err(GiftCardError::NotFound("ZZZZZZZZ".to_string()))
        );
        assert!(store.lookup("ZZZZZZZZ").is_none());
        assert_eq!(store.snapshot_json().unwrap(), before);
        assert_eq!(store.len(), 1);
        assert!(store.lookup(&code).is_some());
    }

    #[test]
    fn test_two_cards_get_distinct_codes() {
        let mut store = seeded_store();
        let first = store.create(FiatCurrency::Eur, 20.0, None, None).unwrap();
        let second = store.create(FiatCurrency::Usd, 30.0, None, None).unwrap();

        assert_ne!(first, second);
        assert_eq!(store.len(), 2);
        assert_eq!(store.lookup(&first).unwrap().amount_fiat, 20.0);
        assert_eq!(store.lookup(&second).unwrap().amount_fiat, 30.0);
    }

    #[test]
    fn test_generation_skips_existing_codes() {
        // 相同种子会产生相同的第一个卡号
        let mut reference = seeded_store();
        let taken = reference.create(FiatCurrency::Eur, 20.0, None, None).unwrap();

        let mut store = seeded_store();
        let card = GiftCard::new(taken.clone(), FiatCurrency::Eur, 20.0, None, None);
        store.cards.insert(taken.clone(), card);

        let fresh = store.create(FiatCurrency::Eur, 20.0, None, None).unwrap();
        assert_ne!(fresh, taken);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_snapshot_json_lists_cards() {
        let mut store = seeded_store();
        assert_eq!(store.snapshot_json().unwrap(), "{}");

        let code = store.create(FiatCurrency::Eur, 15.0, None, None).unwrap();
        let value: serde_json::Value = serde_json::from_str(&store.snapshot_json().unwrap()).unwrap();
        assert_eq!(value[&code]["status"], "pending");
        assert_eq!(value[&code]["amount_fiat"], 15.0);
        assert_eq!(store.cards().len(), 1);
    }

    #[test]
    fn test_stores_are_isolated() {
        let mut first = seeded_store();
        let second = seeded_store();
        let code = first.create(FiatCurrency::Eur, 15.0, None, None).unwrap();

        assert!(second.lookup(&code).is_none());
        assert_ne!(first.session_id(), second.session_id());
    }
}
