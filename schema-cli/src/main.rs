use clap::Parser;
use schema_cli::{Cli, CliApp, report_failure, setup_logging, with_stage};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // 解析命令行参数
    let cli = Cli::parse();

    // 设置日志记录
    setup_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        report_failure(&e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let app = CliApp::new(cli.config.as_deref()).map_err(with_stage)?;
    app.run(cli.command).await.map_err(with_stage)
}
