pub mod assistant;
pub mod config;
pub mod knowledge;
pub mod logging;
pub mod model;
pub mod model_gateway;
pub mod prompt;
pub mod providers;
pub mod repl;

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use assistant::Assistant;
use config::{API_KEY_VAR, Config};
use knowledge::KnowledgeBase;
use model_gateway::DeepSeekGateway;
use repl::run_repl;

pub async fn run() -> Result<()> {
    let dotenv_result = dotenvy::dotenv();
    let _log_guard = logging::init();
    if let Err(err) = dotenv_result {
        warn!(error = %err, ".env file not loaded");
    }

    let cfg = Config::from_env();
    info!(
        model = %cfg.model,
        api_url = %cfg.api_url,
        knowledge_base = %cfg.knowledge_base_path,
        timeout_secs = cfg.request_timeout_secs,
        "loaded runtime configuration"
    );
    if cfg.api_key.is_none() {
        warn!("{API_KEY_VAR} is not set; every query will fail");
    }

    let kb = KnowledgeBase::load(&cfg.knowledge_base_path)
        .inspect_err(|err| error!(error = %err, "failed to load knowledge base"))
        .context("Failed to load knowledge base")?;

    let client = providers::deepseek::build_client(&cfg)
        .context("Failed to initialize HTTP client")?;
    let assistant = Assistant::new(&kb, &cfg, DeepSeekGateway::new(&client, &cfg));

    run_repl(&assistant, &cfg.exit_keyword).await
}
