use chrono::Utc;

use crate::db::StatePersistence;
use crate::models::booking::new_booking_id;
use crate::models::{
    BookingData, BookingFormData, BookingState, BookingStatistics, BookingStatus, FormDataPatch,
};
use crate::services::catalog::CatalogStore;
use crate::services::dates;

/// The in-progress booking form, the submitted history and the selection state.
///
/// The store runs in one of two modes. With no editing index it creates new bookings; with
/// an index set, the form stands for changes to that history entry. Every mutation is
/// saved through the attached [`StatePersistence`], if any.
#[derive(Default)]
pub struct BookingStore {
    state: BookingState,
    persistence: Option<StatePersistence>,
}

impl BookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrates from the persisted entry and keeps saving to it.
    pub fn with_persistence(persistence: StatePersistence) -> anyhow::Result<Self> {
        let state: BookingState = persistence.load()?;
        tracing::info!(
            key = persistence.key(),
            history = state.booking_history.len(),
            "booking state restored"
        );
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

    // ── Reads ──

    pub fn state(&self) -> &BookingState {
        &self.state
    }

    pub fn form_data(&self) -> &BookingFormData {
        &self.state.form_data
    }

    pub fn history(&self) -> &[BookingData] {
        &self.state.booking_history
    }

    pub fn selected_service_id(&self) -> Option<u32> {
        self.state.selected_service_id
    }

    pub fn selected_service_ids(&self) -> &[u32] {
        &self.state.selected_service_ids
    }

    pub fn editing_item_index(&self) -> Option<usize> {
        self.state.editing_item_index
    }

    /// True once the user has typed or picked anything worth warning about on navigation.
    pub fn has_form_data(&self) -> bool {
        let form = &self.state.form_data;
        !form.name.is_empty()
            || !form.phone.is_empty()
            || !form.email.is_empty()
            || !form.date.is_empty()
            || !form.time_slot.is_empty()
            || !form.extra_persons.is_empty()
    }

    pub fn is_edit_mode(&self) -> bool {
        self.state.editing_item_index.is_some()
    }

    pub fn editing_item(&self) -> Option<&BookingData> {
        self.state
            .editing_item_index
            .and_then(|i| self.state.booking_history.get(i))
    }

    pub fn statistics(&self, catalog: &CatalogStore) -> BookingStatistics {
        let mut stats = BookingStatistics {
            total_bookings: self.state.booking_history.len(),
            ..Default::default()
        };
        for booking in &self.state.booking_history {
            match booking.status {
                BookingStatus::Pending => stats.pending_bookings += 1,
                BookingStatus::Confirmed => stats.confirmed_bookings += 1,
                BookingStatus::Cancelled => {
                    stats.cancelled_bookings += 1;
                    continue;
                }
            }
            let price = booking
                .form
                .selected_staff_id
                .and_then(|id| catalog.get_staff_by_id(id))
                .map(|staff| staff.price)
                .unwrap_or(0);
            stats.total_amount += u64::from(price);
        }
        stats
    }

    // ── Selection ──

    /// Picking a new service drops the staff and slot chosen for the old one, unless an
    /// existing booking is being edited.
    pub fn set_selected_service(&mut self, service_id: u32) {
        self.state.selected_service_id = Some(service_id);
        let form = &mut self.state.form_data;
        form.service_id = Some(service_id);
        if self.state.editing_item_index.is_none() {
            form.selected_staff_id = None;
            form.time_slot.clear();
        }
        self.persist();
    }

    /// A slot belongs to a staff member, so changing staff always clears it.
    pub fn set_selected_staff(&mut self, staff_id: u32) {
        let form = &mut self.state.form_data;
        form.selected_staff_id = Some(staff_id);
        form.time_slot.clear();
        self.persist();
    }

    pub fn toggle_service_selection(&mut self, service_id: u32) {
        let ids = &mut self.state.selected_service_ids;
        match ids.iter().position(|id| *id == service_id) {
            Some(pos) => {
                ids.remove(pos);
            }
            None => ids.push(service_id),
        }
        self.persist();
    }

    // ── Form ──

    /// Merges `patch` into the form, then fills an unset form service id from the
    /// selection. An id already on the form is never overwritten.
    pub fn update_form_data(&mut self, patch: FormDataPatch) {
        patch.apply_to(&mut self.state.form_data);
        if self.state.form_data.service_id.is_none() {
            self.state.form_data.service_id = self.state.selected_service_id;
        }
        self.persist();
    }

    pub fn set_booking_data(&mut self, data: BookingFormData) {
        self.state.form_data = data;
        self.persist();
    }

    pub fn clear_form_data(&mut self) {
        self.state.form_data = BookingFormData::default();
        self.persist();
    }

    /// Repairs a form restored from storage: canonicalises the date to `YYYY-MM-DD` and
    /// fills an unset selection from the form's service id. Unreadable dates are left as
    /// they are.
    pub fn restore_page_state(&mut self) {
        let form = &mut self.state.form_data;
        if !form.date.is_empty() {
            let iso = dates::format_iso_date(Some(&form.date));
            if !iso.is_empty() && iso != form.date {
                tracing::debug!(from = %form.date, to = %iso, "normalised restored date");
                form.date = iso;
            }
        }
        if self.state.selected_service_id.is_none() {
            self.state.selected_service_id = form.service_id;
        }
        self.persist();
    }

    // ── History ──

    /// Submits the form contents.
    ///
    /// In create mode a new entry is appended with a fresh id, `pending` status and the
    /// current time. In edit mode the targeted entry takes the submitted fields but keeps
    /// its id, status and creation time, and the store leaves edit mode. Returns the entry
    /// written, or `None` when the editing index no longer points at an entry.
    pub fn add_booking(&mut self, data: BookingFormData) -> Option<&BookingData> {
        let now = Utc::now();

        let written = match self.state.editing_item_index.take() {
            Some(index) => match self.state.booking_history.get_mut(index) {
                Some(entry) => {
                    entry.form = data;
                    entry.updated_at = Some(now);
                    tracing::info!(id = %entry.id, index, "booking updated");
                    Some(index)
                }
                None => {
                    tracing::warn!(index, "editing index out of range, nothing updated");
                    None
                }
            },
            None => {
                let booking = BookingData {
                    id: new_booking_id(),
                    status: BookingStatus::Pending,
                    created_at: now,
                    updated_at: None,
                    form: data,
                };
                tracing::info!(id = %booking.id, "booking added");
                self.state.booking_history.push(booking);
                Some(self.state.booking_history.len() - 1)
            }
        };

        self.persist();
        written.and_then(|i| self.state.booking_history.get(i))
    }

    /// Out-of-range indices are ignored.
    pub fn remove_booking_from_history(&mut self, index: usize) -> bool {
        if index >= self.state.booking_history.len() {
            return false;
        }
        let removed = self.state.booking_history.remove(index);
        tracing::info!(id = %removed.id, index, "booking removed from history");
        self.persist();
        true
    }

    pub fn clear_booking_history(&mut self) {
        self.state.booking_history.clear();
        tracing::info!("booking history cleared");
        self.persist();
    }

    /// Out-of-range indices are ignored.
    pub fn set_booking_status(&mut self, index: usize, status: BookingStatus) -> bool {
        let Some(entry) = self.state.booking_history.get_mut(index) else {
            return false;
        };
        entry.status = status;
        entry.updated_at = Some(Utc::now());
        tracing::info!(id = %entry.id, status = status.as_str(), "booking status changed");
        self.persist();
        true
    }

    // ── Mode ──

    pub fn set_editing_item_index(&mut self, index: Option<usize>) {
        self.state.editing_item_index = index;
        self.persist();
    }

    pub fn clear_editing_item_index(&mut self) {
        self.set_editing_item_index(None);
    }

    /// Loads a history entry into the form and enters edit mode for it.
    pub fn start_editing(&mut self, index: usize) -> bool {
        let Some(entry) = self.state.booking_history.get(index) else {
            return false;
        };
        self.state.form_data = entry.form.clone();
        self.state.selected_service_id = entry.form.service_id;
        self.state.editing_item_index = Some(index);
        tracing::debug!(index, "editing booking");
        self.persist();
        true
    }

    /// Drops the selection and the form. History and edit mode are untouched.
    pub fn clear(&mut self) {
        self.state.selected_service_id = None;
        self.state.form_data = BookingFormData::default();
        self.persist();
    }

    /// Starts a brand-new booking.
    pub fn reset_all_state(&mut self) {
        self.state.selected_service_id = None;
        self.state.editing_item_index = None;
        self.state.form_data = BookingFormData::default();
        self.persist();
    }
}
