//! Настройка логирования для бинарника
//!
//! Библиотека только пишет события `tracing`, подписчика ставит вызывающий.

use tracing_subscriber::EnvFilter;

/// Фильтр по умолчанию, если `RUST_LOG` не задан
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "tor_installer=debug"
    } else {
        "tor_installer=info"
    }
}

/// Поставить глобальный fmt-подписчик (stderr). Повторный вызов игнорируется.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
