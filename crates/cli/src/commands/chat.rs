//! `deskwren chat` — Interactive support session or single-message mode.
//!
//! Reserved inputs in interactive mode: `quit` (exports the conversation
//! log and exits), `history`, `stats`, `reload`. Blank lines are ignored;
//! everything else goes to the agent.

use std::sync::Arc;

use deskwren_agent::SupportAgent;
use deskwren_config::AppConfig;
use deskwren_knowledge::KnowledgeStore;
use deskwren_providers::AnthropicProvider;
use tokio::io::{AsyncBufReadExt, BufReader};

/// The closed set of reserved session commands. Anything that doesn't
/// parse as one of these is a customer query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionCommand {
    Quit,
    History,
    Stats,
    Reload,
}

impl SessionCommand {
    fn parse(input: &str) -> Option<Self> {
        match input.to_lowercase().as_str() {
            "quit" => Some(Self::Quit),
            "history" => Some(Self::History),
            "stats" => Some(Self::Stats),
            "reload" => Some(Self::Reload),
            _ => None,
        }
    }
}

pub async fn run(message: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    // Check for API key early — give a clear error
    let api_key = match config.require_api_key() {
        Ok(key) => key.to_string(),
        Err(e) => {
            eprintln!();
            eprintln!("  ERROR: No API key configured!");
            eprintln!();
            eprintln!("  Set the environment variable:");
            eprintln!("    export ANTHROPIC_API_KEY='sk-ant-...'");
            eprintln!();
            eprintln!("  Or add it to your config file:");
            eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
            eprintln!();
            return Err(e.into());
        }
    };

    let provider = Arc::new(AnthropicProvider::new(api_key));
    let store = KnowledgeStore::load(&config.knowledge_dir);
    let topics_loaded = store.len();

    let mut agent = SupportAgent::new(provider, &config.model, store)
        .with_max_tokens(config.max_tokens)
        .with_temperature(config.temperature)
        .with_top_k(config.top_k)
        .with_history_window(config.history_window);

    if let Some(msg) = message {
        // Single message mode
        eprint!("  Thinking...");
        let outcome = agent.handle_turn(&msg).await?;
        eprint!("\r              \r");
        println!("{}", outcome.response);
        if !outcome.topics_used.is_empty() {
            println!("\n  Used knowledge from: {}", outcome.topics_used.join(", "));
        }
        return Ok(());
    }

    // Interactive mode
    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║       deskwren — Support Agent Session       ║");
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("  Model:      {}", config.model);
    println!("  Knowledge:  {} topics from {}", topics_loaded, config.knowledge_dir.display());
    println!();
    println!("  Commands: 'quit' = exit, 'history' = see conversation,");
    println!("            'stats' = analytics, 'reload' = refresh knowledge");
    println!();

    let stdin = tokio::io::stdin();
    let reader = BufReader::new(stdin);
    let mut lines = reader.lines();

    print_prompt()?;

    while let Some(line) = lines.next_line().await? {
        let input = line.trim();

        if input.is_empty() {
            print_prompt()?;
            continue;
        }

        match SessionCommand::parse(input) {
            Some(SessionCommand::Quit) => {
                match agent.export_log(&config.log_path) {
                    Ok(()) => println!("\n  Conversation saved to {}", config.log_path.display()),
                    Err(e) => eprintln!("\n  [Error] Could not save conversation log: {e}"),
                }
                break;
            }
            Some(SessionCommand::History) => {
                show_history(&agent);
                print_prompt()?;
                continue;
            }
            Some(SessionCommand::Stats) => {
                show_stats(&agent);
                print_prompt()?;
                continue;
            }
            Some(SessionCommand::Reload) => {
                agent.reload_knowledge();
                println!("\n  Knowledge base reloaded ({} topics)\n", agent.knowledge().len());
                print_prompt()?;
                continue;
            }
            None => {}
        }

        eprint!("  ...");
        match agent.handle_turn(input).await {
            Ok(outcome) => {
                eprint!("\r     \r");
                println!();
                for line in outcome.response.lines() {
                    println!("  Agent > {line}");
                }
                if outcome.topics_used.is_empty() {
                    println!("\n  No relevant knowledge found (answered from general knowledge)");
                } else {
                    println!("\n  Used knowledge from: {}", outcome.topics_used.join(", "));
                }
                println!();
            }
            Err(e) => {
                eprint!("\r     \r");
                eprintln!("  [Error] {e}");
                println!();
            }
        }

        print_prompt()?;
    }

    println!();
    println!("  Goodbye!");
    println!();

    Ok(())
}

fn print_prompt() -> std::io::Result<()> {
    use std::io::Write;
    print!("  Customer > ");
    std::io::stdout().flush()
}

fn show_history(agent: &SupportAgent) {
    let history = agent.history();
    println!("\n  Conversation history ({} exchanges):", history.len());
    for (i, exchange) in history.iter().enumerate() {
        println!("\n  {}. Customer: {}", i + 1, exchange.query);
        println!("     Agent: {}", exchange.response);
        if !exchange.context_used.is_empty() {
            println!("     Context: {}", exchange.context_used.join(", "));
        }
    }
    println!();
}

fn show_stats(agent: &SupportAgent) {
    let stats = agent.stats();
    println!("\n  Agent statistics");
    println!("  ================");
    println!("  Total exchanges:        {}", stats.total_exchanges);
    println!("  Knowledge base topics:  {}", stats.knowledge_topics);
    if !stats.top_topics.is_empty() {
        println!("\n  Most used knowledge topics:");
        for (topic, count) in &stats.top_topics {
            println!("    - {topic}: {count} times");
        }
    }
    println!();
}
