use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExtraPerson {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
}

/// The live booking form. Field names follow the persisted camelCase layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct BookingFormData {
    pub total_people: u32,
    /// `YYYY-MM-DD`, or empty.
    pub date: String,
    /// `HH:MM`, or empty.
    pub time_slot: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub extra_persons: Vec<ExtraPerson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_staff_id: Option<u32>,
}

impl Default for BookingFormData {
    fn default() -> Self {
        Self {
            total_people: 1,
            date: String::new(),
            time_slot: String::new(),
            name: String::new(),
            phone: String::new(),
            email: String::new(),
            extra_persons: Vec::new(),
            service_id: None,
            selected_staff_id: None,
        }
    }
}

/// Partial form update. `None` leaves the field untouched. The two id fields tell an absent
/// key (`None`) from an explicit `null` (`Some(None)`), which clears the id.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct FormDataPatch {
    pub total_people: Option<u32>,
    pub date: Option<String>,
    pub time_slot: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub extra_persons: Option<Vec<ExtraPerson>>,
    #[serde(deserialize_with = "explicit_null")]
    pub service_id: Option<Option<u32>>,
    #[serde(deserialize_with = "explicit_null")]
    pub selected_staff_id: Option<Option<u32>>,
}

fn explicit_null<'de, D>(deserializer: D) -> Result<Option<Option<u32>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<u32>::deserialize(deserializer).map(Some)
}

impl FormDataPatch {
    pub fn apply_to(self, form: &mut BookingFormData) {
        if let Some(v) = self.total_people {
            form.total_people = v;
        }
        if let Some(v) = self.date {
            form.date = v;
        }
        if let Some(v) = self.time_slot {
            form.time_slot = v;
        }
        if let Some(v) = self.name {
            form.name = v;
        }
        if let Some(v) = self.phone {
            form.phone = v;
        }
        if let Some(v) = self.email {
            form.email = v;
        }
        if let Some(v) = self.extra_persons {
            form.extra_persons = v;
        }
        if let Some(v) = self.service_id {
            form.service_id = v;
        }
        if let Some(v) = self.selected_staff_id {
            form.selected_staff_id = v;
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(BookingStatus::Pending),
            "confirmed" => Some(BookingStatus::Confirmed),
            "cancelled" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }
}

/// A submitted booking as kept in the history list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingData {
    /// Entries written before ids were mandatory get a fresh one on load.
    #[serde(default = "new_booking_id")]
    pub id: String,
    #[serde(default)]
    pub status: BookingStatus,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub form: BookingFormData,
}

pub fn new_booking_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Everything the booking store persists.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct BookingState {
    pub selected_service_id: Option<u32>,
    pub selected_service_ids: Vec<u32>,
    pub form_data: BookingFormData,
    pub booking_history: Vec<BookingData>,
    pub editing_item_index: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingStatistics {
    pub total_bookings: usize,
    pub pending_bookings: usize,
    pub confirmed_bookings: usize,
    pub cancelled_bookings: usize,
    pub total_amount: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_serializes_camel_case() {
        let form = BookingFormData {
            time_slot: "10:00".to_string(),
            service_id: Some(1),
            ..Default::default()
        };
        let json = serde_json::to_value(&form).unwrap();
        assert_eq!(json["totalPeople"], 1);
        assert_eq!(json["timeSlot"], "10:00");
        assert_eq!(json["serviceId"], 1);
        assert!(json.get("selectedStaffId").is_none());
    }

    #[test]
    fn test_form_missing_fields_use_defaults() {
        let form: BookingFormData = serde_json::from_str(r#"{"name":"Amy"}"#).unwrap();
        assert_eq!(form.name, "Amy");
        assert_eq!(form.total_people, 1);
        assert!(form.extra_persons.is_empty());
    }

    #[test]
    fn test_patch_only_touches_given_fields() {
        let mut form = BookingFormData {
            name: "Amy".to_string(),
            phone: "0912345678".to_string(),
            ..Default::default()
        };
        FormDataPatch {
            phone: Some("0987654321".to_string()),
            ..Default::default()
        }
        .apply_to(&mut form);
        assert_eq!(form.name, "Amy");
        assert_eq!(form.phone, "0987654321");
    }

    #[test]
    fn test_patch_null_clears_ids() {
        let mut form = BookingFormData {
            service_id: Some(1),
            selected_staff_id: Some(2),
            ..Default::default()
        };

        let untouched: FormDataPatch = serde_json::from_str(r#"{"name":"Amy"}"#).unwrap();
        assert_eq!(untouched.selected_staff_id, None);
        untouched.apply_to(&mut form);
        assert_eq!(form.selected_staff_id, Some(2));

        let cleared: FormDataPatch =
            serde_json::from_str(r#"{"selectedStaffId":null,"serviceId":3}"#).unwrap();
        cleared.apply_to(&mut form);
        assert_eq!(form.selected_staff_id, None);
        assert_eq!(form.service_id, Some(3));
    }

    #[test]
    fn test_legacy_entry_without_id_gets_one() {
        let booking: BookingData = serde_json::from_str(r#"{"name":"Ben"}"#).unwrap();
        assert!(!booking.id.is_empty());
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.form.name, "Ben");
    }

    #[test]
    fn test_booking_data_flattens_form() {
        let json = r#"{
            "id": "abc",
            "status": "confirmed",
            "createdAt": "2024-01-15T08:00:00Z",
            "totalPeople": 2,
            "date": "2024-01-20",
            "timeSlot": "14:00",
            "name": "Amy",
            "phone": "",
            "email": "amy@example.com",
            "extraPersons": [{"name": "Ben", "phone": "0912345678", "email": ""}],
            "serviceId": 1,
            "selectedStaffId": 2
        }"#;
        let booking: BookingData = serde_json::from_str(json).unwrap();
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.form.total_people, 2);
        assert_eq!(booking.form.extra_persons[0].name, "Ben");
        assert_eq!(booking.form.selected_staff_id, Some(2));
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(BookingStatus::parse("cancelled"), Some(BookingStatus::Cancelled));
        assert_eq!(BookingStatus::parse("done"), None);
        assert_eq!(BookingStatus::Pending.as_str(), "pending");
    }
}
