//! 日志初始化
//!
//! 终端界面占用了 stdout，因此日志只写入文件。

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::LevelFilter;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

use crate::settings::LoggingSettings;

const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {l:<5} {t} - {m}{n}";

/// 使用 log4rs 配置文件初始化
pub fn init_from_file(path: &Path) -> Result<()> {
    log4rs::init_file(path, Default::default())
        .with_context(|| format!("Could not initialize logging from {}", path.display()))
}

/// 使用内置配置初始化，返回日志文件路径
pub fn init(settings: &LoggingSettings, default_dir: &Path, level_override: Option<&str>) -> Result<PathBuf> {
    let level: LevelFilter = level_override
        .unwrap_or(&settings.level)
        .parse()
        .context("Invalid log level")?;

    let path = settings
        .file
        .clone()
        .unwrap_or_else(|| default_dir.join("zeypay.log"));
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let file = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build(&path)
        .with_context(|| format!("Could not open log file {}", path.display()))?;

    let config = Config::builder()
        .appender(Appender::builder().build("file", Box::new(file)))
        .build(Root::builder().appender("file").build(level))?;

    log4rs::init_config(config)?;
    Ok(path)
}
