//! The support agent controller — the heart of deskwren.
//!
//! Each turn follows a **Retrieve → Compose → Generate → Record** cycle:
//!
//! 1. **Retrieve** — rank knowledge documents against the query
//! 2. **Compose** — assemble the prompt with documents + recent exchanges
//! 3. **Generate** — call the injected provider (the only failure point)
//! 4. **Record** — append the exchange, return the answer + topics used
//!
//! One turn runs start-to-finish before the next is accepted; a failed
//! generation leaves the conversation memory untouched.

pub mod composer;

use std::path::Path;
use std::sync::Arc;

use deskwren_core::agent::{AgentStats, TurnPhase};
use deskwren_core::error::{Error, Result};
use deskwren_core::provider::{GenerationRequest, Provider};
use deskwren_core::Exchange;
use deskwren_knowledge::KnowledgeStore;
use deskwren_memory::ConversationMemory;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// What a completed turn hands back to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnOutcome {
    /// The generated answer.
    pub response: String,

    /// Topics of the documents that informed the answer, in ranking
    /// order. Empty when no relevant knowledge was found.
    pub topics_used: Vec<String>,
}

/// The per-session agent controller.
///
/// Owns one knowledge store and one conversation memory for its whole
/// lifetime; the provider is an injected capability handle. No sharing
/// across sessions, no concurrent writers.
pub struct SupportAgent {
    provider: Arc<dyn Provider>,
    model: String,
    max_tokens: u32,
    temperature: f32,
    top_k: usize,
    history_window: usize,
    knowledge: KnowledgeStore,
    memory: ConversationMemory,
    phase: TurnPhase,
}

impl SupportAgent {
    /// Create a new agent with default turn parameters (top 3 documents,
    /// 3-exchange window, 300 output tokens).
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        knowledge: KnowledgeStore,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            max_tokens: 300,
            temperature: 0.7,
            top_k: 3,
            history_window: 3,
            knowledge,
            memory: ConversationMemory::new(),
            phase: TurnPhase::Idle,
        }
    }

    /// Set the maximum tokens per generated answer.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the generation temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set how many documents a query retrieves at most.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Set how many recent exchanges the prompt carries.
    pub fn with_history_window(mut self, history_window: usize) -> Self {
        self.history_window = history_window;
        self
    }

    /// Process one customer query.
    ///
    /// Empty or whitespace-only input is rejected before anything else
    /// happens: no phase change, no provider call, no memory append. A
    /// provider failure propagates and likewise leaves memory unchanged.
    pub async fn handle_turn(&mut self, query: &str) -> Result<TurnOutcome> {
        if query.trim().is_empty() {
            return Err(Error::EmptyQuery);
        }

        self.enter_phase(TurnPhase::Retrieving);
        let ranked = deskwren_knowledge::rank(query, &self.knowledge, self.top_k);
        debug!(documents = ranked.len(), "Knowledge retrieved");

        self.enter_phase(TurnPhase::Composing);
        let prompt = composer::compose(
            query,
            &ranked,
            self.memory.recent_window(self.history_window),
        );

        self.enter_phase(TurnPhase::Generating);
        let request = GenerationRequest {
            model: self.model.clone(),
            prompt,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };
        let response = match self.provider.generate(request).await {
            Ok(response) => response,
            Err(e) => {
                self.enter_phase(TurnPhase::Idle);
                return Err(e.into());
            }
        };

        self.enter_phase(TurnPhase::Recording);
        let topics_used: Vec<String> = ranked.into_iter().map(|doc| doc.topic).collect();
        self.memory
            .append(Exchange::new(query, response.text.clone(), topics_used.clone()));
        self.enter_phase(TurnPhase::Idle);

        info!(
            topics = topics_used.len(),
            answer_len = response.text.len(),
            "Turn completed"
        );

        Ok(TurnOutcome {
            response: response.text,
            topics_used,
        })
    }

    /// The full exchange log, oldest first.
    pub fn history(&self) -> &[Exchange] {
        self.memory.all()
    }

    /// Session statistics: exchange count, store size, most-used topics
    /// (count descending, topic ascending, at most five).
    pub fn stats(&self) -> AgentStats {
        let mut top_topics: Vec<(String, usize)> = self.memory.usage_counts().into_iter().collect();
        top_topics.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        top_topics.truncate(5);

        AgentStats {
            total_exchanges: self.memory.len(),
            knowledge_topics: self.knowledge.len(),
            top_topics,
        }
    }

    /// Re-read the knowledge directory. Runs between turns only.
    pub fn reload_knowledge(&mut self) {
        self.knowledge.reload();
        info!(topics = self.knowledge.len(), "Knowledge base reloaded");
    }

    /// Write the full conversation log to `path` as JSON.
    pub fn export_log(&self, path: &Path) -> Result<()> {
        self.memory.export_to(path)?;
        Ok(())
    }

    /// The knowledge store (read-only).
    pub fn knowledge(&self) -> &KnowledgeStore {
        &self.knowledge
    }

    /// The current turn phase; `Idle` between turns.
    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    fn enter_phase(&mut self, phase: TurnPhase) {
        debug!(phase = phase.as_str(), "Turn phase");
        self.phase = phase;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deskwren_core::error::ProviderError;
    use deskwren_core::provider::{GenerationResponse, Usage};
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// A mock provider that returns a sequence of scripted responses and
    /// counts how often it was called.
    struct SequentialMockProvider {
        responses: Mutex<Vec<String>>,
        call_count: Mutex<usize>,
    }

    impl SequentialMockProvider {
        fn new(responses: Vec<&str>) -> Self {
            Self {
                responses: Mutex::new(responses.into_iter().map(String::from).collect()),
                call_count: Mutex::new(0),
            }
        }

        fn single_text(text: &str) -> Self {
            Self::new(vec![text])
        }

        fn call_count(&self) -> usize {
            *self.call_count.lock().unwrap()
        }
    }

    #[async_trait::async_trait]
    impl Provider for SequentialMockProvider {
        fn name(&self) -> &str {
            "sequential_mock"
        }

        async fn generate(
            &self,
            _request: GenerationRequest,
        ) -> std::result::Result<GenerationResponse, ProviderError> {
            let mut count = self.call_count.lock().unwrap();
            let responses = self.responses.lock().unwrap();

            if *count >= responses.len() {
                panic!(
                    "SequentialMockProvider: no more responses (call #{}, have {})",
                    *count,
                    responses.len()
                );
            }

            let text = responses[*count].clone();
            *count += 1;
            Ok(GenerationResponse {
                text,
                model: "mock-model".into(),
                usage: Some(Usage {
                    prompt_tokens: 10,
                    completion_tokens: 5,
                    total_tokens: 15,
                }),
            })
        }
    }

    /// A provider that always fails with a network error.
    struct FailingProvider;

    #[async_trait::async_trait]
    impl Provider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        async fn generate(
            &self,
            _request: GenerationRequest,
        ) -> std::result::Result<GenerationResponse, ProviderError> {
            Err(ProviderError::Network("connection refused".into()))
        }
    }

    fn knowledge_with(docs: &[(&str, &str)]) -> (TempDir, KnowledgeStore) {
        let tmp = TempDir::new().unwrap();
        for (topic, content) in docs {
            std::fs::write(tmp.path().join(format!("{topic}.txt")), content).unwrap();
        }
        let store = KnowledgeStore::load(tmp.path());
        (tmp, store)
    }

    fn agent_with(
        provider: Arc<dyn Provider>,
        docs: &[(&str, &str)],
    ) -> (TempDir, SupportAgent) {
        let (tmp, store) = knowledge_with(docs);
        (tmp, SupportAgent::new(provider, "mock-model", store))
    }

    #[tokio::test]
    async fn turn_answers_and_records_exchange() {
        let provider = Arc::new(SequentialMockProvider::single_text(
            "Shipping is free over $50.",
        ));
        let (_tmp, mut agent) = agent_with(
            provider.clone(),
            &[("shipping", "Free shipping on orders over $50.")],
        );

        let outcome = agent.handle_turn("what are your shipping rates").await.unwrap();

        assert_eq!(outcome.response, "Shipping is free over $50.");
        assert_eq!(outcome.topics_used, vec!["shipping"]);
        assert_eq!(agent.history().len(), 1);
        assert_eq!(agent.history()[0].query, "what are your shipping rates");
        assert_eq!(agent.history()[0].context_used, vec!["shipping"]);
        assert_eq!(agent.phase(), TurnPhase::Idle);
    }

    #[tokio::test]
    async fn empty_query_makes_no_call_and_no_exchange() {
        let provider = Arc::new(SequentialMockProvider::new(vec![]));
        let (_tmp, mut agent) = agent_with(provider.clone(), &[("shipping", "Free shipping.")]);

        let err = agent.handle_turn("   \t ").await.unwrap_err();
        assert!(matches!(err, Error::EmptyQuery));
        assert_eq!(provider.call_count(), 0);
        assert!(agent.history().is_empty());
        assert_eq!(agent.phase(), TurnPhase::Idle);
    }

    #[tokio::test]
    async fn failed_generation_leaves_memory_unchanged() {
        let (_tmp, mut agent) =
            agent_with(Arc::new(FailingProvider), &[("shipping", "Free shipping.")]);

        let err = agent.handle_turn("shipping question").await.unwrap_err();
        assert!(matches!(err, Error::Provider(_)));
        assert!(agent.history().is_empty());
        assert_eq!(agent.phase(), TurnPhase::Idle);
    }

    #[tokio::test]
    async fn no_relevant_knowledge_yields_empty_topics() {
        let provider = Arc::new(SequentialMockProvider::single_text("I can help anyway."));
        let (_tmp, mut agent) = agent_with(provider, &[("shipping", "Free shipping.")]);

        let outcome = agent.handle_turn("xylophone quartz").await.unwrap();
        assert!(outcome.topics_used.is_empty());
        assert!(agent.history()[0].context_used.is_empty());
    }

    #[tokio::test]
    async fn stats_report_usage_and_store_size() {
        let provider = Arc::new(SequentialMockProvider::new(vec!["a1", "a2", "a3"]));
        let (_tmp, mut agent) = agent_with(
            provider,
            &[
                ("shipping", "Free shipping on orders."),
                ("returns", "30-day return policy."),
            ],
        );

        agent.handle_turn("shipping please").await.unwrap();
        agent.handle_turn("shipping again").await.unwrap();
        agent.handle_turn("returns please").await.unwrap();

        let stats = agent.stats();
        assert_eq!(stats.total_exchanges, 3);
        assert_eq!(stats.knowledge_topics, 2);
        assert_eq!(stats.top_topics[0], ("shipping".into(), 2));
        assert_eq!(stats.top_topics[1], ("returns".into(), 1));
    }

    #[tokio::test]
    async fn reload_picks_up_new_documents() {
        let provider = Arc::new(SequentialMockProvider::new(vec!["a1", "a2"]));
        let (tmp, store) = knowledge_with(&[]);
        let mut agent = SupportAgent::new(provider, "mock-model", store);

        let outcome = agent.handle_turn("payment options").await.unwrap();
        assert!(outcome.topics_used.is_empty());

        std::fs::write(tmp.path().join("payment.txt"), "We accept Visa and payment by card.")
            .unwrap();
        agent.reload_knowledge();

        let outcome = agent.handle_turn("payment options").await.unwrap();
        assert_eq!(outcome.topics_used, vec!["payment"]);
    }

    #[tokio::test]
    async fn export_log_writes_all_exchanges() {
        let provider = Arc::new(SequentialMockProvider::new(vec!["a1", "a2"]));
        let (_tmp, mut agent) = agent_with(provider, &[("shipping", "Free shipping.")]);

        agent.handle_turn("shipping?").await.unwrap();
        agent.handle_turn("and returns?").await.unwrap();

        let out = TempDir::new().unwrap();
        let path = out.path().join("conversation_logs.json");
        agent.export_log(&path).unwrap();

        let parsed: Vec<serde_json::Value> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0]["query"], "shipping?");
    }

    /// Records every prompt it is asked to complete.
    struct CapturingProvider {
        prompts: Mutex<Vec<String>>,
    }

    impl CapturingProvider {
        fn new() -> Self {
            Self {
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn last_prompt(&self) -> String {
            self.prompts.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait::async_trait]
    impl Provider for CapturingProvider {
        fn name(&self) -> &str {
            "capturing"
        }

        async fn generate(
            &self,
            request: GenerationRequest,
        ) -> std::result::Result<GenerationResponse, ProviderError> {
            self.prompts.lock().unwrap().push(request.prompt);
            Ok(GenerationResponse {
                text: "ok".into(),
                model: "mock-model".into(),
                usage: None,
            })
        }
    }

    #[tokio::test]
    async fn recent_window_flows_into_prompt() {
        let provider = Arc::new(CapturingProvider::new());
        let (_tmp, agent) = agent_with(provider.clone(), &[]);
        let mut agent = agent.with_history_window(2);

        agent.handle_turn("first").await.unwrap();
        agent.handle_turn("second").await.unwrap();
        agent.handle_turn("third").await.unwrap();
        agent.handle_turn("fourth").await.unwrap();

        // Window of 2: the fourth prompt carries "second" and "third"
        // as prior exchanges, but not "first".
        let prompt = provider.last_prompt();
        assert!(prompt.contains("Customer: second"));
        assert!(prompt.contains("Customer: third"));
        assert!(!prompt.contains("Customer: first"));
        assert!(prompt.contains("CUSTOMER QUESTION: fourth"));
    }
}
