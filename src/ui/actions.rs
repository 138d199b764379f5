//! Action 枚举定义 (Intent)
//!
//! 用户交互转化为明确的语义化 Action

use super::state::{InputField, Tab};

/// 用户操作枚举
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    NextTab,
    PrevTab,
    SelectTab(Tab),

    // 创建页
    CycleCurrency,
    IncreaseAmount,
    DecreaseAmount,
    GenerateCard,

    // 兑换页
    NextCrypto,
    PrevCrypto,
    StartRedeem,

    // 管理页
    ScrollUp,
    ScrollDown,

    // 表单/通用交互
    StartEdit(InputField),
    Cancel,      // Esc / n
    Submit,      // Enter / y
    Input(char), // 输入字符
    DeleteChar,  // Backspace
}
