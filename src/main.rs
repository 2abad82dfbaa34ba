use anyhow::Result;
use invoice_ingest::utils::logging;
use invoice_ingest::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::load()?;

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    let mut app = App::initialize(config).await?;
    let report = app.run().await?;

    if !report.is_clean() {
        tracing::warn!("⚠️ 部分文件未能导入，详情见报告");
    }

    Ok(())
}
