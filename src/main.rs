use clap::Parser;

use brandtracker::cli::Cli;
use brandtracker::config::{get_config, init_config, update_config};
use brandtracker::runtime::lifetime::apply_session_overrides;
use brandtracker::runtime::modes::run_cli;
use brandtracker::system::init_logging;

#[tokio::main]
async fn main() {
    // 加载 .env（可选）
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_config(cli.config.as_deref());
    let mut config = (*get_config()).clone();
    apply_session_overrides(&mut config, cli.year, cli.editor.clone(), cli.role);
    update_config(config.clone());

    // guard 需要存活到程序结束
    let _log_guard = match init_logging(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{}", e.format_colored());
            std::process::exit(1);
        }
    };

    if let Err(e) = run_cli(&config, cli.command).await {
        eprintln!("{}", e.format_colored());
        std::process::exit(1);
    }
}
