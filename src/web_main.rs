//! Web 服务器主程序入口

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use chat_translate::chat::{MessageService, TranslationPipeline};
use chat_translate::env::{self, EnvConfig, EnvVar};
use chat_translate::storage::InMemoryMessageStore;
use chat_translate::translation::config::load_dotenv;
use chat_translate::translation::{TranslationConfig, Translator};
use chat_translate::web::{WebConfig, WebServer};

/// Chat server with automatic message translation
#[derive(Parser, Debug)]
#[command(name = "chat-translate-web", version, about)]
struct Args {
    /// Bind address [env: CHAT_TRANSLATE_BIND_ADDRESS]
    #[arg(short, long)]
    bind: Option<String>,

    /// Port number [env: CHAT_TRANSLATE_PORT]
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory with the client bundle, served for unknown paths
    #[arg(short, long)]
    static_dir: Option<String>,

    /// Translation provider config file (TOML)
    #[arg(short, long)]
    config: Option<String>,

    /// Print the environment variable reference and exit
    #[arg(long)]
    print_env_docs: bool,

    /// Write an example config file to PATH and exit
    #[arg(long, value_name = "PATH")]
    write_example_config: Option<PathBuf>,
}

fn init_tracing() {
    // RUST_LOG 优先于 CHAT_TRANSLATE_LOG_LEVEL
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = env::core::LogLevel::get().unwrap_or_else(|_| "info".to_string());
        EnvFilter::new(level)
    });

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.print_env_docs {
        print!("{}", env::generate_env_docs());
        return Ok(());
    }

    if let Some(path) = &args.write_example_config {
        TranslationConfig::write_example(path)?;
        println!("Example config written to {}", path.display());
        return Ok(());
    }

    // .env 中的日志级别和运行模式要在初始化日志之前生效
    let env_file = load_dotenv();
    init_tracing();
    if let Some(env_file) = env_file {
        tracing::info!("已加载环境变量文件: {}", env_file);
    }

    match EnvConfig::from_env() {
        Ok(env_config) => env_config.print_summary(),
        Err(e) => tracing::warn!("环境变量配置有误: {}", e),
    }

    // 翻译提供方
    let translation_config = TranslationConfig::load_from(args.config.as_deref())?;
    let translator = Translator::from_config(&translation_config)?;

    // 存储 → 流水线 → 服务
    let store = Arc::new(InMemoryMessageStore::new());
    let pipeline = TranslationPipeline::new(store.clone(), translator);
    let service = MessageService::new(store, pipeline);

    // 命令行参数覆盖环境变量
    let mut web_config = WebConfig::from_env()?;
    if let Some(bind) = args.bind {
        web_config.bind_addr = bind;
    }
    if let Some(port) = args.port {
        web_config.port = port;
    }
    if let Some(static_dir) = args.static_dir {
        web_config.static_dir = Some(static_dir);
    }
    web_config.validate()?;

    if web_config.is_development() {
        tracing::info!("开发模式: CORS 源 {:?}", web_config.cors_origins);
    }

    WebServer::new(web_config, service).start().await?;

    Ok(())
}
