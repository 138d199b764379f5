//! App 状态定义 (Model)
//!
//! 包含应用状态结构体及相关枚举

use crate::models::{CryptoSymbol, FiatCurrency, GiftCard};
use crate::rates::{self, Quote};
use crate::settings::Settings;
use crate::store::GiftCardStore;

/// 应用状态
pub struct App {
    pub store: GiftCardStore,
    pub settings: Settings,
    pub tab: Tab,
    pub mode: AppMode,
    pub input_buffer: String,
    pub notice: Option<Notice>,
    pub create_form: CreateForm,
    pub redeem_form: RedeemForm,
    pub last_created: Option<String>, // 最近创建的卡号
    pub admin_scroll: u16,
}

/// 页签
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Create,
    Redeem,
    Admin,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Create, Tab::Redeem, Tab::Admin];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Create => "Create Gift Card",
            Tab::Redeem => "Redeem Gift Card",
            Tab::Admin => "Demo / Admin view",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Create => 0,
            Tab::Redeem => 1,
            Tab::Admin => 2,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// 应用模式
#[derive(Debug, Clone, PartialEq)]
pub enum AppMode {
    Normal,
    Editing(InputField),
    Confirm(ConfirmAction),
}

/// 确认操作类型
#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmAction {
    Redeem(String), // 待兑换的卡号
}

/// 输入字段类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    Amount,
    Recipient,
    Message,
    Code,
    Wallet,
}

impl InputField {
    pub fn label(&self) -> &'static str {
        match self {
            InputField::Amount => "Amount",
            InputField::Recipient => "Recipient name (optional)",
            InputField::Message => "Personal message",
            InputField::Code => "Gift card code",
            InputField::Wallet => "Recipient wallet address (simulated)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// 底部状态栏提示
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}

/// 创建页表单
#[derive(Debug, Clone, PartialEq)]
pub struct CreateForm {
    pub currency: FiatCurrency,
    pub amount: f64,
    pub recipient: String,
    pub message: String,
}

/// 兑换页表单
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RedeemForm {
    pub code_input: String,
    pub active_code: Option<String>, // 已查到的卡号
    pub crypto: CryptoSymbol,
    pub wallet: String,
}

impl App {
    /// 创建新的应用实例
    pub fn new(store: GiftCardStore, settings: Settings) -> Self {
        let create_form = CreateForm {
            currency: FiatCurrency::default(),
            amount: settings.amount.default,
            recipient: String::new(),
            message: String::new(),
        };
        Self {
            store,
            settings,
            tab: Tab::Create,
            mode: AppMode::Normal,
            input_buffer: String::new(),
            notice: None,
            create_form,
            redeem_form: RedeemForm::default(),
            last_created: None,
            admin_scroll: 0,
        }
    }

    /// 最近创建的礼品卡
    pub fn last_created_card(&self) -> Option<&GiftCard> {
        self.last_created
            .as_deref()
            .and_then(|code| self.store.lookup(code))
    }

    /// 兑换页当前的礼品卡
    pub fn active_card(&self) -> Option<&GiftCard> {
        self.redeem_form
            .active_code
            .as_deref()
            .and_then(|code| self.store.lookup(code))
    }

    /// 当前卡片与所选币种的模拟报价
    pub fn active_quote(&self) -> Option<Quote> {
        self.active_card().map(|card| {
            rates::quote(card.amount_fiat, card.fiat_currency, self.redeem_form.crypto)
        })
    }

    /// 字段当前值（进入编辑时载入输入框）
    pub fn field_value(&self, field: InputField) -> String {
        match field {
            InputField::Amount => format!("{:.2}", self.create_form.amount),
            InputField::Recipient => self.create_form.recipient.clone(),
            InputField::Message => self.create_form.message.clone(),
            InputField::Code => self.redeem_form.code_input.clone(),
            InputField::Wallet => self.redeem_form.wallet.clone(),
        }
    }
}
