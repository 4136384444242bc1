//! Manual pipeline runs: `evaluate <url> [name]`. Prints the full
//! evaluation result as JSON.

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use siteval_common::types::Project;
use siteval_common::Config;
use siteval_engine::Evaluator;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let url = std::env::args()
        .nth(1)
        .context("usage: evaluate <url> [name]")?;
    let name = std::env::args().nth(2).unwrap_or_else(|| url.clone());

    let config = Config::from_env()?;
    let evaluator = Evaluator::from_config(&config);

    let project = Project {
        name,
        url,
        description: None,
        category: None,
        target_audience: None,
        competitors: Vec::new(),
    };

    let result = evaluator.evaluate(&project).await;
    println!("{}", serde_json::to_string_pretty(&result)?);

    if !result.success {
        std::process::exit(1);
    }
    Ok(())
}
