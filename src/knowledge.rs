use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const SUCCESS_TEMPLATE: &str = "success";
pub const UNKNOWN_TEMPLATE: &str = "unknown";

#[derive(Debug, thiserror::Error)]
pub enum KnowledgeBaseError {
    #[error("failed to read knowledge base '{}': {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse knowledge base '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A support team as described in the knowledge base. Only the model reads
/// these fields; nothing here matches against them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Team {
    pub name: String,
    pub keywords: Vec<String>,
    pub exclusions: Vec<String>,
    pub tags: Vec<String>,
    pub description: String,
    pub contacts: BTreeMap<String, String>,
    pub examples: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeBase {
    pub teams: Vec<Team>,
    #[serde(rename = "response_template")]
    pub response_templates: BTreeMap<String, String>,
}

impl KnowledgeBase {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, KnowledgeBaseError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| KnowledgeBaseError::FileAccess {
            path: path.to_path_buf(),
            source,
        })?;
        let kb = Self::from_json(&raw).map_err(|source| KnowledgeBaseError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        info!(
            path = %path.display(),
            team_count = kb.team_count(),
            "loaded knowledge base"
        );
        Ok(kb)
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn team_count(&self) -> usize {
        self.teams.len()
    }

    /// Missing templates render as empty text.
    pub fn template(&self, name: &str) -> &str {
        self.response_templates
            .get(name)
            .map(String::as_str)
            .unwrap_or("")
    }
}

#[cfg(test)]
pub(crate) const SAMPLE_KB: &str = r##"{
  "teams": [
    {
      "name": "Network Operations",
      "keywords": ["vpn", "wifi", "сеть"],
      "exclusions": ["printer"],
      "tags": ["infra"],
      "description": "Connectivity and VPN issues",
      "contacts": {"email": "netops@example.com", "chat": "#netops"},
      "examples": ["VPN drops every hour"]
    },
    {
      "name": "Facilities",
      "keywords": ["printer"]
    }
  ],
  "response_template": {
    "success": "Team: {team}. Contact: {contact}",
    "unknown": "Could not determine the team, please clarify"
  }
}"##;

#[cfg(test)]
mod tests {
    use std::fs;

    use super::{
        KnowledgeBase, KnowledgeBaseError, SAMPLE_KB, SUCCESS_TEMPLATE, UNKNOWN_TEMPLATE,
    };

    #[test]
    fn load_reads_every_team() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let path = dir.path().join("knowledge_base.json");
        fs::write(&path, SAMPLE_KB).expect("fixture should be written");

        let kb = KnowledgeBase::load(&path).expect("knowledge base should load");

        assert_eq!(kb.team_count(), 2);
        let netops = &kb.teams[0];
        assert_eq!(netops.name, "Network Operations");
        assert_eq!(netops.keywords, vec!["vpn", "wifi", "сеть"]);
        assert_eq!(netops.exclusions, vec!["printer"]);
        assert_eq!(netops.tags, vec!["infra"]);
        assert_eq!(
            netops.contacts.get("email").map(String::as_str),
            Some("netops@example.com")
        );
        assert_eq!(netops.examples, vec!["VPN drops every hour"]);
    }

    #[test]
    fn contact_values_keep_leading_hash() {
        let kb = KnowledgeBase::from_json(SAMPLE_KB).expect("fixture should parse");
        assert_eq!(
            kb.teams[0].contacts.get("chat").map(String::as_str),
            Some("#netops")
        );
    }

    #[test]
    fn absent_team_fields_default_to_empty() {
        let kb = KnowledgeBase::from_json(SAMPLE_KB).expect("fixture should parse");
        let facilities = &kb.teams[1];
        assert!(facilities.exclusions.is_empty());
        assert!(facilities.tags.is_empty());
        assert!(facilities.contacts.is_empty());
        assert!(facilities.description.is_empty());
    }

    #[test]
    fn reencoding_preserves_field_values() {
        let kb = KnowledgeBase::from_json(SAMPLE_KB).expect("fixture should parse");
        let encoded = serde_json::to_string(&kb).expect("knowledge base should encode");
        assert!(encoded.contains("\"response_template\""));

        let decoded = KnowledgeBase::from_json(&encoded).expect("encoded form should parse");
        assert_eq!(decoded, kb);
    }

    #[test]
    fn template_returns_named_text_or_empty() {
        let kb = KnowledgeBase::from_json(SAMPLE_KB).expect("fixture should parse");
        assert_eq!(kb.template(SUCCESS_TEMPLATE), "Team: {team}. Contact: {contact}");
        assert_eq!(
            kb.template(UNKNOWN_TEMPLATE),
            "Could not determine the team, please clarify"
        );
        assert_eq!(KnowledgeBase::default().template(SUCCESS_TEMPLATE), "");
    }

    #[test]
    fn missing_file_is_a_file_access_error() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let err = KnowledgeBase::load(dir.path().join("absent.json"))
            .expect_err("missing file should fail");
        assert!(matches!(err, KnowledgeBaseError::FileAccess { .. }), "got {err:?}");
        assert!(err.to_string().contains("absent.json"));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let path = dir.path().join("broken.json");
        fs::write(&path, r#"{"teams": [ {"name": "x"} "#).expect("fixture should be written");

        let err = KnowledgeBase::load(&path).expect_err("malformed json should fail");
        assert!(matches!(err, KnowledgeBaseError::Parse { .. }), "got {err:?}");
    }

    #[test]
    fn wrong_shape_is_a_parse_error() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let path = dir.path().join("shape.json");
        fs::write(&path, r#"{"teams": "not a list"}"#).expect("fixture should be written");

        let err = KnowledgeBase::load(&path).expect_err("wrong shape should fail");
        assert!(matches!(err, KnowledgeBaseError::Parse { .. }), "got {err:?}");
    }
}
