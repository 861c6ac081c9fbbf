//! `deskwren status` — Show configuration and loaded knowledge.

use deskwren_config::AppConfig;
use deskwren_knowledge::KnowledgeStore;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let store = KnowledgeStore::load(&config.knowledge_dir);

    println!("deskwren Status");
    println!("===============");
    println!("  Config dir:     {}", AppConfig::config_dir().display());
    println!("  Model:          {}", config.model);
    println!("  Max tokens:     {}", config.max_tokens);
    println!("  Temperature:    {}", config.temperature);
    println!("  Knowledge dir:  {}", config.knowledge_dir.display());
    println!("  Log path:       {}", config.log_path.display());
    println!("  API key:        {}", if config.has_api_key() { "configured" } else { "missing" });

    if store.is_empty() {
        println!("\n  Knowledge base is empty — add .txt files to {}", store.dir().display());
    } else {
        println!("\n  Knowledge topics ({}):", store.len());
        for topic in store.topics() {
            println!("    - {topic}");
        }
    }

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("\n  Config file found at {}", config_path.display());
    } else {
        println!("\n  No config file — using defaults");
    }

    Ok(())
}
