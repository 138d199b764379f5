mod error;
mod logging;
mod models;
mod rates;
mod settings;
mod store;
mod ui;

use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::info;
use ratatui::prelude::*;

use crate::settings::Settings;
use crate::store::GiftCardStore;
use crate::ui::{App, render};

#[derive(Parser)]
#[command(version, about = "ZeyPay crypto gift cards demo", long_about = None)]
struct Args {
    /// 配置文件路径，默认 ~/.config/zeypay/config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// 覆盖配置中的日志级别
    #[arg(long)]
    log_level: Option<String>,
    /// log4rs YAML 配置文件，替代内置日志配置
    #[arg(long)]
    log4rs: Option<PathBuf>,
}

/// 获取应用目录 (如 ~/.config/zeypay/)
fn app_dir(base: Option<PathBuf>) -> io::Result<PathBuf> {
    let dir = base
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "Could not locate user directory"))?
        .join("zeypay");

    fs::create_dir_all(&dir)?;

    Ok(dir)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = match args.config {
        Some(path) => path,
        None => app_dir(dirs::config_dir())?.join("config.toml"),
    };
    let settings = Settings::load(&config_path)?;

    match &args.log4rs {
        Some(path) => logging::init_from_file(path)?,
        None => {
            let log_dir = app_dir(dirs::data_dir())?;
            logging::init(&settings.logging, &log_dir, args.log_level.as_deref())?;
        }
    }

    // 每个会话一个独立的存储，退出即丢弃
    let store = GiftCardStore::new(settings.amount);
    info!(
        "Starting ZeyPay session {} (config: {})",
        store.session_id(),
        config_path.display()
    );
    let mut app = App::new(store, settings);

    // 设置终端
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // 主循环
    let result = run_app(&mut terminal, &mut app);

    // 恢复终端
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    info!(
        "Session {} ended with {} gift card(s)",
        app.store.session_id(),
        app.store.len()
    );

    result.context("Terminal error")
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| render(f, app))?;

        if let crossterm::event::Event::Key(key) = crossterm::event::read()? {
            if key.kind == crossterm::event::KeyEventKind::Press && ui::handle_key_event(app, key.code) {
                break;
            }
        }
    }
    Ok(())
}
