use tracing::debug;

use crate::config::Config;
use crate::knowledge::KnowledgeBase;
use crate::model::{ChatError, Message};
use crate::model_gateway::{ModelGateway, ModelGatewayRequest};
use crate::prompt::build_prompt;

/// Answers one query at a time against a fixed knowledge base. Nothing is
/// carried over between queries.
pub struct Assistant<'a, G> {
    kb: &'a KnowledgeBase,
    system_prompt: &'a str,
    gateway: G,
}

impl<'a, G> Assistant<'a, G>
where
    G: ModelGateway,
{
    pub fn new(kb: &'a KnowledgeBase, cfg: &'a Config, gateway: G) -> Self {
        Self {
            kb,
            system_prompt: &cfg.system_prompt,
            gateway,
        }
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        self.kb
    }

    pub fn build_messages(&self, query: &str) -> Result<Vec<Message>, ChatError> {
        let prompt = build_prompt(self.kb, query).map_err(ChatError::Prompt)?;
        Ok(vec![Message::system(self.system_prompt), Message::user(prompt)])
    }

    pub async fn answer(&self, query: &str) -> Result<String, ChatError> {
        let messages = self.build_messages(query)?;
        debug!(
            query_len = query.len(),
            prompt_len = messages[1].content.len(),
            "answering query"
        );

        let response = self.gateway.chat(ModelGatewayRequest { messages }).await?;
        Ok(response.content)
    }
}
