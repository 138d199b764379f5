//! 业务逻辑处理 (Update/Dispatch)
//!
//! 包含核心的 dispatch 逻辑和各种业务处理方法

use super::actions::Action;
use super::state::{App, AppMode, ConfirmAction, InputField, Notice, NoticeLevel, Tab};
use crate::error::GiftCardError;
use crate::models::{normalize_code, share_link};

impl App {
    /// 核心逻辑分发，返回 true 表示退出
    pub fn dispatch(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => return true,
            Action::NextTab => self.select_tab(self.tab.next()),
            Action::PrevTab => self.select_tab(self.tab.prev()),
            Action::SelectTab(tab) => self.select_tab(tab),

            Action::CycleCurrency => {
                self.create_form.currency = self.create_form.currency.next();
            }
            Action::IncreaseAmount => self.step_amount(1),
            Action::DecreaseAmount => self.step_amount(-1),
            Action::GenerateCard => self.generate_card(),

            Action::NextCrypto => {
                self.redeem_form.crypto = self.redeem_form.crypto.next();
            }
            Action::PrevCrypto => {
                self.redeem_form.crypto = self.redeem_form.crypto.prev();
            }
            Action::StartRedeem => self.start_redeem(),

            Action::ScrollUp => self.admin_scroll = self.admin_scroll.saturating_sub(1),
            Action::ScrollDown => self.admin_scroll = self.admin_scroll.saturating_add(1),

            Action::StartEdit(field) => self.start_edit(field),
            Action::Cancel => self.cancel(),

            Action::Submit => match &self.mode {
                AppMode::Editing(field) => {
                    let field = *field;
                    self.confirm_edit(field);
                }
                AppMode::Confirm(_) => self.execute_confirm(),
                AppMode::Normal => {}
            },

            Action::Input(c) => {
                if matches!(self.mode, AppMode::Editing(_)) {
                    self.input_buffer.push(c);
                }
            }

            Action::DeleteChar => {
                if matches!(self.mode, AppMode::Editing(_)) {
                    self.input_buffer.pop();
                }
            }
        }
        false
    }

    // ============ 导航相关 ============

    pub fn select_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.notice = None;
    }

    // ============ 创建相关 ============

    /// 按步长调整金额
    pub fn step_amount(&mut self, steps: i32) {
        let limits = *self.store.limits();
        self.create_form.amount = limits.step_by(self.create_form.amount, steps);
    }

    /// 生成礼品卡
    pub fn generate_card(&mut self) {
        let form = self.create_form.clone();
        match self.store.create(
            form.currency,
            form.amount,
            Some(form.recipient),
            Some(form.message),
        ) {
            Ok(code) => {
                self.last_created = Some(code);
                self.notice = Some(Notice::new(
                    NoticeLevel::Success,
                    "Gift card successfully created!",
                ));
            }
            Err(e) => self.show_error(&e),
        }
    }

    /// 当前创建卡的分享链接
    pub fn last_share_link(&self) -> Option<String> {
        self.last_created
            .as_deref()
            .map(|code| share_link(&self.settings.share_base_url, code))
    }

    // ============ 编辑相关 ============

    /// 开始编辑字段
    pub fn start_edit(&mut self, field: InputField) {
        if field == InputField::Wallet && !self.can_redeem_active() {
            self.notice = Some(Notice::new(
                NoticeLevel::Info,
                "Look up a pending gift card first.",
            ));
            return;
        }
        self.input_buffer = self.field_value(field);
        self.mode = AppMode::Editing(field);
    }

    /// 确认编辑
    pub fn confirm_edit(&mut self, field: InputField) {
        let value = std::mem::take(&mut self.input_buffer);
        self.mode = AppMode::Normal;

        match field {
            InputField::Amount => match value.trim().parse::<f64>() {
                Ok(amount) => {
                    self.create_form.amount = amount;
                    self.notice = None;
                }
                Err(_) => {
                    self.notice = Some(Notice::new(
                        NoticeLevel::Error,
                        format!("'{}' is not a valid amount.", value.trim()),
                    ));
                }
            },
            InputField::Recipient => self.create_form.recipient = value,
            InputField::Message => self.create_form.message = value,
            InputField::Code => self.look_up_code(&value),
            InputField::Wallet => self.redeem_form.wallet = value,
        }
    }

    // ============ 兑换相关 ============

    /// 查询卡号
    pub fn look_up_code(&mut self, input: &str) {
        let code = normalize_code(input);
        self.redeem_form.code_input = code.clone();
        self.redeem_form.wallet.clear();

        if code.is_empty() {
            self.redeem_form.active_code = None;
            self.notice = None;
            return;
        }

        let found = self.store.lookup(&code).map(|card| card.redemption());
        match found {
            None => {
                self.redeem_form.active_code = None;
                self.show_error(&GiftCardError::NotFound(code));
            }
            Some(Some(redemption)) => {
                self.redeem_form.active_code = Some(code);
                self.show_error(&GiftCardError::AlreadyRedeemed(redemption));
            }
            Some(None) => {
                self.redeem_form.active_code = Some(code);
                self.notice = Some(Notice::new(
                    NoticeLevel::Info,
                    "Choose the cryptocurrency to redeem.",
                ));
            }
        }
    }

    fn can_redeem_active(&self) -> bool {
        self.active_card().is_some_and(|card| !card.is_redeemed())
    }

    /// 打开兑换确认框
    pub fn start_redeem(&mut self) {
        let Some((code, redemption)) = self
            .active_card()
            .map(|card| (card.code.clone(), card.redemption()))
        else {
            self.notice = Some(Notice::new(
                NoticeLevel::Info,
                "Enter a gift card code first.",
            ));
            return;
        };

        if let Some(redemption) = redemption {
            self.show_error(&GiftCardError::AlreadyRedeemed(redemption));
            return;
        }
        if self.redeem_form.wallet.trim().is_empty() {
            self.show_error(&GiftCardError::MissingWallet);
            return;
        }

        self.mode = AppMode::Confirm(ConfirmAction::Redeem(code));
    }

    /// 执行确认操作
    pub fn execute_confirm(&mut self) {
        let mode = std::mem::replace(&mut self.mode, AppMode::Normal);
        match mode {
            AppMode::Confirm(ConfirmAction::Redeem(code)) => {
                let wallet = self.redeem_form.wallet.clone();
                match self.store.redeem(&code, self.redeem_form.crypto, &wallet) {
                    Ok(redemption) => {
                        self.notice = Some(Notice::new(
                            NoticeLevel::Success,
                            format!(
                                "Gift card redeemed successfully! You received {:.6} {} to wallet {} (simulated).",
                                redemption.amount_crypto,
                                redemption.crypto,
                                redemption.wallet_address
                            ),
                        ));
                    }
                    Err(e) => self.show_error(&e),
                }
            }
            other => self.mode = other,
        }
    }

    // ============ 通用操作 ============

    /// 错误转为状态栏提示；已兑换只是提醒
    pub fn show_error(&mut self, error: &GiftCardError) {
        let level = match error {
            GiftCardError::AlreadyRedeemed(_) => NoticeLevel::Warning,
            _ => NoticeLevel::Error,
        };
        self.notice = Some(Notice::new(level, error.to_string()));
    }

    /// 取消当前操作
    pub fn cancel(&mut self) {
        self.mode = AppMode::Normal;
        self.input_buffer.clear();
        self.notice = None;
    }
}
