//! Generation request payload
//!
//! JSON body accepted by the chat endpoint. The declared mode depends on how
//! many reference documents (graph nodes) the user attached as context.

use serde::Serialize;

/// Reference documents and relations attached to a request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextAnchors {
    pub node_ids: Vec<String>,
    pub edge_ids: Vec<String>,
}

impl ContextAnchors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a node; attaching the same node twice is a no-op
    pub fn add_node(&mut self, node_id: &str) {
        if !self.node_ids.iter().any(|id| id == node_id) {
            self.node_ids.push(node_id.to_string());
        }
    }

    pub fn add_edge(&mut self, edge_id: &str) {
        if !self.edge_ids.iter().any(|id| id == edge_id) {
            self.edge_ids.push(edge_id.to_string());
        }
    }

    pub fn clear(&mut self) {
        self.node_ids.clear();
        self.edge_ids.clear();
    }

    pub fn mode(&self) -> RequestMode {
        match self.node_ids.len() {
            0 => RequestMode::General,
            1 => RequestMode::SingleContext,
            _ => RequestMode::MultiContext,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestMode {
    General,
    SingleContext,
    MultiContext,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub session_id: String,
    pub question: String,
    pub context_node_ids: Vec<String>,
    pub context_edge_ids: Vec<String>,
    pub mode: RequestMode,
    pub force_web: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub node_ids: Vec<String>,
}

impl GenerationRequest {
    pub fn new(session_id: &str, question: &str, anchors: &ContextAnchors, force_web: bool) -> Self {
        let mode = anchors.mode();
        let (node_id, node_ids) = match mode {
            RequestMode::General => (None, Vec::new()),
            RequestMode::SingleContext => (anchors.node_ids.first().cloned(), Vec::new()),
            RequestMode::MultiContext => (None, anchors.node_ids.clone()),
        };

        Self {
            session_id: session_id.to_string(),
            question: question.to_string(),
            context_node_ids: anchors.node_ids.clone(),
            context_edge_ids: anchors.edge_ids.clone(),
            mode,
            force_web,
            node_id,
            node_ids,
        }
    }
}
