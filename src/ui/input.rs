//! 键盘事件映射 (Input -> Action)
//!
//! 将按键事件转换为 Action

use crossterm::event::KeyCode;

use super::actions::Action;
use super::state::{App, AppMode, InputField, Tab};

/// 根据当前页签、模式和按键获取对应的 Action
pub fn get_action(tab: Tab, mode: &AppMode, key: KeyCode) -> Option<Action> {
    match mode {
        AppMode::Normal => global_action(key).or_else(|| tab_action(tab, key)),
        AppMode::Editing(_) => match key {
            KeyCode::Esc => Some(Action::Cancel),
            KeyCode::Enter => Some(Action::Submit),
            KeyCode::Backspace => Some(Action::DeleteChar),
            KeyCode::Char(c) => Some(Action::Input(c)),
            _ => None,
        },
        AppMode::Confirm(_) => match key {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => Some(Action::Submit),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(Action::Cancel),
            _ => None,
        },
    }
}

fn global_action(key: KeyCode) -> Option<Action> {
    match key {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Tab => Some(Action::NextTab),
        KeyCode::BackTab => Some(Action::PrevTab),
        KeyCode::Char('1') => Some(Action::SelectTab(Tab::Create)),
        KeyCode::Char('2') => Some(Action::SelectTab(Tab::Redeem)),
        KeyCode::Char('3') => Some(Action::SelectTab(Tab::Admin)),
        _ => None,
    }
}

fn tab_action(tab: Tab, key: KeyCode) -> Option<Action> {
    match tab {
        Tab::Create => match key {
            KeyCode::Char('c') => Some(Action::CycleCurrency),
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Right => Some(Action::IncreaseAmount),
            KeyCode::Char('-') | KeyCode::Left => Some(Action::DecreaseAmount),
            KeyCode::Char('a') => Some(Action::StartEdit(InputField::Amount)),
            KeyCode::Char('r') => Some(Action::StartEdit(InputField::Recipient)),
            KeyCode::Char('m') => Some(Action::StartEdit(InputField::Message)),
            KeyCode::Char('g') | KeyCode::Enter => Some(Action::GenerateCard),
            _ => None,
        },
        Tab::Redeem => match key {
            KeyCode::Char('e') | KeyCode::Enter => Some(Action::StartEdit(InputField::Code)),
            KeyCode::Char('b') | KeyCode::Right => Some(Action::NextCrypto),
            KeyCode::Left => Some(Action::PrevCrypto),
            KeyCode::Char('w') => Some(Action::StartEdit(InputField::Wallet)),
            KeyCode::Char('c') => Some(Action::StartRedeem),
            _ => None,
        },
        Tab::Admin => match key {
            KeyCode::Char('j') | KeyCode::Down => Some(Action::ScrollDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::ScrollUp),
            _ => None,
        },
    }
}

/// 处理按键事件，返回 true 表示退出
pub fn handle_key_event(app: &mut App, key: KeyCode) -> bool {
    match get_action(app.tab, &app.mode, key) {
        Some(action) => app.dispatch(action),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::state::ConfirmAction;

    #[test]
    fn test_editing_captures_shortcut_letters() {
        let mode = AppMode::Editing(InputField::Recipient);
        assert_eq!(
            get_action(Tab::Create, &mode, KeyCode::Char('q')),
            Some(Action::Input('q'))
        );
        assert_eq!(
            get_action(Tab::Create, &mode, KeyCode::Char('2')),
            Some(Action::Input('2'))
        );
    }

    #[test]
    fn test_same_key_differs_per_tab() {
        let mode = AppMode::Normal;
        assert_eq!(
            get_action(Tab::Create, &mode, KeyCode::Char('c')),
            Some(Action::CycleCurrency)
        );
        assert_eq!(
            get_action(Tab::Redeem, &mode, KeyCode::Char('c')),
            Some(Action::StartRedeem)
        );
        assert_eq!(get_action(Tab::Admin, &mode, KeyCode::Char('c')), None);
    }

    #[test]
    fn test_confirm_keys() {
        let mode = AppMode::Confirm(ConfirmAction::Redeem("ABCD1234".to_string()));
        assert_eq!(get_action(Tab::Redeem, &mode, KeyCode::Char('y')), Some(Action::Submit));
        assert_eq!(get_action(Tab::Redeem, &mode, KeyCode::Esc), Some(Action::Cancel));
        assert_eq!(get_action(Tab::Redeem, &mode, KeyCode::Char('q')), None);
    }
}
