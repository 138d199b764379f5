//! 视图层模块
//!
//! 包含主渲染入口和各种视图组件

pub mod components;
pub mod layouts;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap},
};

use super::state::{App, AppMode, ConfirmAction, InputField, Tab};
use crate::models::CardStatus;
use components::{
    field_line, format_usd_price, notice_color, render_dialog_framework, render_input_widget,
};
use layouts::centered_rect;

/// 渲染 UI
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // 标题
            Constraint::Length(3), // 页签
            Constraint::Min(10),   // 内容
            Constraint::Length(3), // 帮助
        ])
        .split(frame.area());

    render_title(frame, chunks[0]);
    render_tabs(frame, app, chunks[1]);
    match app.tab {
        Tab::Create => render_create(frame, app, chunks[2]),
        Tab::Redeem => render_redeem(frame, app, chunks[2]),
        Tab::Admin => render_admin(frame, app, chunks[2]),
    }
    render_help(frame, app, chunks[3]);

    // 渲染弹窗
    match &app.mode {
        AppMode::Editing(field) => render_edit_dialog(frame, app, *field),
        AppMode::Confirm(action) => render_confirm_dialog(frame, app, action),
        AppMode::Normal => {}
    }
}

fn render_title(frame: &mut Frame, area: Rect) {
    let title = Paragraph::new("🎁 ZeyPay – Crypto Gift Cards (Prototype)")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| format!("{} {}", i + 1, tab.title()));

    let tabs = Tabs::new(titles)
        .select(app.tab.index())
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        );
    frame.render_widget(tabs, area);
}

fn render_create(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(3)])
        .split(area);

    let form = &app.create_form;
    let limits = app.store.limits();
    let lines = vec![
        field_line("c", "Fiat currency", form.currency.to_string()),
        field_line(
            "+/-/a",
            "Amount",
            format!(
                "{:.2}  ({:.2} – {:.2})",
                form.amount, limits.min, limits.max
            ),
        ),
        field_line("r", "Recipient name (optional)", or_placeholder(&form.recipient)),
        field_line("m", "Personal message", or_placeholder(&form.message)),
        Line::from(""),
        Line::from(Span::styled(
            "Your gift card will be held in a simulated blockchain escrow until redemption.",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )),
    ];
    let form_widget = Paragraph::new(lines).block(
        Block::default()
            .title("Create a crypto gift card")
            .borders(Borders::ALL),
    );
    frame.render_widget(form_widget, chunks[0]);

    let content = match (app.last_created_card(), app.last_share_link()) {
        (Some(card), Some(link)) => format!(
            "Share this code or link with the recipient:\n\nCode: {}\nGift link: {}\n\n── Preview of what the recipient sees ──\n{}",
            card.code,
            link,
            card.preview()
        ),
        _ => "Press [g] to generate a gift card.".to_string(),
    };
    let result = Paragraph::new(content)
        .block(Block::default().title("Gift card").borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    frame.render_widget(result, chunks[1]);
}

fn render_redeem(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5)])
        .split(area);

    let code = Paragraph::new(field_line(
        "e",
        "Gift card code",
        or_placeholder(&app.redeem_form.code_input),
    ))
    .block(
        Block::default()
            .title("Paste the gift card code you received")
            .borders(Borders::ALL),
    );
    frame.render_widget(code, chunks[0]);

    let mut lines: Vec<Line> = Vec::new();
    match app.active_card() {
        None => lines.push(Line::from("No gift card selected.")),
        Some(card) => {
            lines.extend(card.details().lines().map(|l| Line::from(l.to_string())));
            lines.push(Line::from(""));

            match (card.status, card.redemption()) {
                (CardStatus::Redeemed, Some(redemption)) => {
                    lines.push(Line::from(Span::styled(
                        format!(
                            "This card was already redeemed on {} in {} ({:.6} {}).",
                            redemption.redeemed_at_display(),
                            redemption.crypto,
                            redemption.amount_crypto,
                            redemption.crypto
                        ),
                        Style::default().fg(Color::Yellow),
                    )));
                    lines.push(Line::from(format!(
                        "Wallet: {}",
                        redemption.wallet_address
                    )));
                }
                _ => {
                    let crypto = app.redeem_form.crypto;
                    lines.push(field_line("b/←/→", "Crypto", crypto.to_string()));
                    if let Some(quote) = app.active_quote() {
                        lines.push(Line::from(format!(
                            "  Fiat amount (approx in USD): {:.2} USD",
                            quote.amount_usd
                        )));
                        lines.push(Line::from(format!(
                            "  {} price (simulated): {} USD",
                            crypto,
                            format_usd_price(quote.crypto_price_usd)
                        )));
                        lines.push(Line::from(format!(
                            "  You would receive: {:.6} {}",
                            quote.amount_crypto, crypto
                        )));
                    }
                    lines.push(Line::from(""));
                    lines.push(field_line(
                        "w",
                        "Wallet address",
                        or_placeholder(&app.redeem_form.wallet),
                    ));
                    lines.push(Line::from(Span::styled(
                        "[c] Confirm redemption",
                        Style::default().fg(Color::Green),
                    )));
                    lines.push(Line::from(""));
                    lines.push(Line::from(Span::styled(
                        "In a real app, this would call a DEX / on-chain smart contract and send funds to the user's wallet.",
                        Style::default()
                            .fg(Color::DarkGray)
                            .add_modifier(Modifier::ITALIC),
                    )));
                }
            }
        }
    }

    let details = Paragraph::new(lines)
        .block(Block::default().title("Gift card details").borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    frame.render_widget(details, chunks[1]);
}

fn render_admin(frame: &mut Frame, app: &App, area: Rect) {
    let redeemed = app
        .store
        .cards()
        .iter()
        .filter(|card| card.is_redeemed())
        .count();
    let title = format!(
        "Current in-memory gift cards ({} pending, {} redeemed) · session {}",
        app.store.len() - redeemed,
        redeemed,
        app.store.session_id()
    );

    let content = if app.store.is_empty() {
        "No gift cards created yet in this session.".to_string()
    } else {
        app.store
            .snapshot_json()
            .unwrap_or_else(|e| format!("Could not serialize gift cards: {e}"))
    };

    let dump = Paragraph::new(content)
        .block(Block::default().title(title).borders(Borders::ALL))
        .scroll((app.admin_scroll, 0));
    frame.render_widget(dump, area);
}

fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = match (&app.mode, app.tab) {
        (AppMode::Normal, Tab::Create) => {
            "[c] 币种  [+/-] 金额  [a] 输入金额  [r] 收件人  [m] 留言  [g] 生成  [Tab] 切换  [q] 退出"
        }
        (AppMode::Normal, Tab::Redeem) => {
            "[e] 卡号  [b/←/→] 币种  [w] 钱包  [c] 确认兑换  [Tab] 切换  [q] 退出"
        }
        (AppMode::Normal, Tab::Admin) => "[j/k] 滚动  [Tab] 切换  [q] 退出",
        (AppMode::Editing(_), _) => "[Enter] 保存  [Esc] 取消",
        (AppMode::Confirm(_), _) => "[y] 确认  [n] 取消",
    };

    let mut spans = vec![Span::styled(help_text, Style::default().fg(Color::Gray))];
    if let Some(notice) = &app.notice {
        spans.push(Span::raw("  |  "));
        spans.push(Span::styled(
            notice.text.clone(),
            Style::default().fg(notice_color(notice.level)),
        ));
    }

    let help = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    frame.render_widget(help, area);
}

fn render_edit_dialog(frame: &mut Frame, app: &App, field: InputField) {
    let area = centered_rect(70, 30, frame.area());
    let inner = render_dialog_framework(frame, area, field.label());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(inner);

    render_input_widget(
        frame,
        chunks[0],
        field.label(),
        &app.input_buffer,
        true,
        Color::Yellow,
    );

    let hint = Paragraph::new("按 Enter 保存，Esc 取消").style(Style::default().fg(Color::Gray));
    frame.render_widget(hint, chunks[1]);
}

fn render_confirm_dialog(frame: &mut Frame, app: &App, action: &ConfirmAction) {
    let area = centered_rect(50, 25, frame.area());
    frame.render_widget(Clear, area);

    let message = match action {
        ConfirmAction::Redeem(code) => {
            let amount = app
                .active_quote()
                .map(|q| format!("{:.6}", q.amount_crypto))
                .unwrap_or_default();
            format!(
                "Redeem gift card {} for {} {} to wallet {}?",
                code, amount, app.redeem_form.crypto, app.redeem_form.wallet
            )
        }
    };

    let dialog = Paragraph::new(format!("{}\n\n[y] 确认  [n] 取消", message))
        .style(Style::default().fg(Color::Green))
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Confirm redemption").borders(Borders::ALL));

    frame.render_widget(dialog, area);
}

fn or_placeholder(value: &str) -> String {
    if value.trim().is_empty() {
        "(empty)".to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::settings::Settings;
    use crate::store::GiftCardStore;
    use crate::ui::actions::Action;

    fn rendered_text(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_render_every_tab() {
        let settings = Settings::default();
        let store = GiftCardStore::with_rng(settings.amount, StdRng::seed_from_u64(1));
        let mut app = App::new(store, settings);

        assert!(rendered_text(&app).contains("Create a crypto gift card"));

        app.dispatch(Action::GenerateCard);
        let code = app.last_created.clone().unwrap();
        assert!(rendered_text(&app).contains(&code));

        app.dispatch(Action::SelectTab(Tab::Redeem));
        app.look_up_code(&code);
        let text = rendered_text(&app);
        assert!(text.contains("Status: pending"));
        assert!(text.contains("60,000"));

        app.dispatch(Action::SelectTab(Tab::Admin));
        assert!(rendered_text(&app).contains(&format!("\"{code}\"")));
    }

    #[test]
    fn test_render_empty_admin_and_dialogs() {
        let mut app = App::new(GiftCardStore::default(), Settings::default());
        app.dispatch(Action::SelectTab(Tab::Admin));
        assert!(rendered_text(&app).contains("No gift cards created yet"));

        app.dispatch(Action::StartEdit(InputField::Recipient));
        rendered_text(&app);
    }
}
