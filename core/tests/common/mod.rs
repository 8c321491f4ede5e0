use std::sync::Once;

use tracing::Level;

static INIT: Once = Once::new();

/// 初始化测试日志，每个测试开头调用
pub fn init_test_logger() {
    INIT.call_once(|| {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::TRACE)
            .with_test_writer()
            .with_target(true)
            .compact()
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
    });
}
