use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    pub id: u32,
    pub name: String,
    /// Hourly price.
    pub price: u32,
    /// Human-readable range, e.g. `9:00-18:00`.
    pub work_time: String,
    pub available_slots: Vec<String>,
    /// Lunch breaks and the like. Not consulted by any availability query.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unavailable_slots: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: u32,
    pub name: String,
    pub service_type: String,
    pub staff_ids: Vec<u32>,
}

/// A staff member as shown under a service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StaffDisplayInfo {
    pub service_id: u32,
    pub staff_id: u32,
    pub staff_name: String,
    pub work_time: String,
    pub price: u32,
    pub available_slots: Vec<String>,
}

impl StaffDisplayInfo {
    pub fn new(service_id: u32, staff: &Staff) -> Self {
        Self {
            service_id,
            staff_id: staff.id,
            staff_name: staff.name.clone(),
            work_time: staff.work_time.clone(),
            price: staff.price,
            available_slots: staff.available_slots.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PriceRange {
    pub min_price: u32,
    pub max_price: u32,
}
