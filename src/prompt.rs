use serde::Serialize;

use crate::knowledge::{KnowledgeBase, SUCCESS_TEMPLATE, UNKNOWN_TEMPLATE};

#[derive(Debug, Serialize)]
struct PromptContext<'a> {
    knowledge_base: &'a KnowledgeBase,
    user_query: &'a str,
}

/// Embeds the whole knowledge base and the raw query in one prompt. The
/// format lines come from the knowledge base's own templates.
pub fn build_prompt(kb: &KnowledgeBase, query: &str) -> Result<String, serde_json::Error> {
    let context = serde_json::to_string_pretty(&PromptContext {
        knowledge_base: kb,
        user_query: query,
    })?;

    Ok(format!(
        "Analyze the request using ONLY this knowledge base:\n\
         {context}\n\
         \n\
         Response format:\n\
         - If the request belongs to a specific team: {success}\n\
         - If the team cannot be determined: {unknown}",
        success = kb.template(SUCCESS_TEMPLATE),
        unknown = kb.template(UNKNOWN_TEMPLATE),
    ))
}
