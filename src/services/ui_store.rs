use crate::db::StatePersistence;
use crate::models::UiState;

/// Wizard step, loading flag, field errors and the modal.
#[derive(Default)]
pub struct UiStore {
    state: UiState,
    persistence: Option<StatePersistence>,
}

impl UiStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_persistence(persistence: StatePersistence) -> anyhow::Result<Self> {
        let state = persistence.load()?;
        Ok(Self {
            state,
            persistence: Some(persistence),
        })
    }

    fn persist(&self) {
        if let Some(persistence) = &self.persistence {
            persistence.save(&self.state);
        }
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn set_step(&mut self, step: u32) {
        self.state.current_step = step;
        self.persist();
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.state.is_loading = loading;
        self.persist();
    }

    pub fn set_form_error(&mut self, field: &str, error: &str) {
        self.state
            .form_errors
            .insert(field.to_string(), error.to_string());
        self.persist();
    }

    pub fn clear_form_errors(&mut self) {
        self.state.form_errors.clear();
        self.persist();
    }

    pub fn open_modal(&mut self, content: serde_json::Value) {
        self.state.modal_content = Some(content);
        self.state.modal_open = true;
        self.persist();
    }

    pub fn close_modal(&mut self) {
        self.state.modal_open = false;
        self.state.modal_content = None;
        self.persist();
    }
}
