use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct UiState {
    pub current_step: u32,
    pub is_loading: bool,
    pub form_errors: BTreeMap<String, String>,
    pub modal_open: bool,
    pub modal_content: Option<serde_json::Value>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            current_step: 1,
            is_loading: false,
            form_errors: BTreeMap::new(),
            modal_open: false,
            modal_content: None,
        }
    }
}
