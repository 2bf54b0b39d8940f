use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};

use crate::models::{PriceRange, Service, Staff, StaffDisplayInfo};
use crate::services::dates;

/// Where catalog data comes from. The built-in [`SeedCatalog`] is hard-coded; an
/// API-backed source slots in here.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn load(&self) -> anyhow::Result<(Vec<Staff>, Vec<Service>)>;
}

pub struct SeedCatalog;

#[async_trait]
impl CatalogSource for SeedCatalog {
    async fn load(&self) -> anyhow::Result<(Vec<Staff>, Vec<Service>)> {
        Ok((seed_staff(), seed_services()))
    }
}

/// Read model over staff and services. Lookups never fail: unknown ids give `None` or an
/// empty list.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    staff_members: Vec<Staff>,
    services: Vec<Service>,
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::with_data(seed_staff(), seed_services())
    }
}

impl CatalogStore {
    pub fn with_data(staff_members: Vec<Staff>, services: Vec<Service>) -> Self {
        Self {
            staff_members,
            services,
        }
    }

    pub async fn load_from(source: &dyn CatalogSource) -> anyhow::Result<Self> {
        let (staff, services) = source.load().await?;
        tracing::info!(
            staff = staff.len(),
            services = services.len(),
            "catalog loaded"
        );
        Ok(Self::with_data(staff, services))
    }

    pub fn staff_members(&self) -> &[Staff] {
        &self.staff_members
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }

    pub async fn fetch_services(&self) -> Vec<Service> {
        self.services.clone()
    }

    pub fn service_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = Vec::new();
        for service in &self.services {
            if !types.contains(&service.service_type.as_str()) {
                types.push(&service.service_type);
            }
        }
        types
    }

    pub fn total_staff_count(&self) -> usize {
        self.staff_members.len()
    }

    pub fn total_service_count(&self) -> usize {
        self.services.len()
    }

    pub fn get_service_by_id(&self, id: u32) -> Option<&Service> {
        self.services.iter().find(|s| s.id == id)
    }

    pub fn get_staff_by_id(&self, id: u32) -> Option<&Staff> {
        self.staff_members.iter().find(|s| s.id == id)
    }

    pub fn get_service_type_by_id(&self, id: u32) -> Option<&str> {
        self.get_service_by_id(id).map(|s| s.service_type.as_str())
    }

    /// Staff of the first service carrying `service_type`.
    pub fn get_staff_by_service_type(&self, service_type: &str) -> Vec<StaffDisplayInfo> {
        let Some(service) = self.services.iter().find(|s| s.service_type == service_type) else {
            return Vec::new();
        };
        self.resolve_staff(service)
            .map(|staff| StaffDisplayInfo::new(service.id, staff))
            .collect()
    }

    pub fn get_staff_by_service_id(&self, service_id: u32) -> Vec<&Staff> {
        match self.get_service_by_id(service_id) {
            Some(service) => self.resolve_staff(service).collect(),
            None => Vec::new(),
        }
    }

    /// Unresolvable staff ids are skipped.
    fn resolve_staff<'a>(&'a self, service: &'a Service) -> impl Iterator<Item = &'a Staff> + 'a {
        service
            .staff_ids
            .iter()
            .filter_map(move |id| self.get_staff_by_id(*id))
    }

    pub fn get_available_slots(&self, staff_id: u32, date: Option<&str>) -> Vec<String> {
        self.get_available_slots_at(staff_id, date, Local::now().naive_local())
    }

    /// Full slot list without a date; with a date, past hours are dropped when it is today.
    pub fn get_available_slots_at(
        &self,
        staff_id: u32,
        date: Option<&str>,
        now: NaiveDateTime,
    ) -> Vec<String> {
        let Some(staff) = self.get_staff_by_id(staff_id) else {
            return Vec::new();
        };
        match date.filter(|d| !d.is_empty()) {
            Some(date) => dates::filter_available_slots_at(&staff.available_slots, date, now),
            None => staff.available_slots.clone(),
        }
    }

    pub fn is_slot_available(&self, staff_id: u32, date: &str, slot: &str) -> bool {
        self.is_slot_available_at(staff_id, date, slot, Local::now().naive_local())
    }

    pub fn is_slot_available_at(
        &self,
        staff_id: u32,
        date: &str,
        slot: &str,
        now: NaiveDateTime,
    ) -> bool {
        self.get_available_slots_at(staff_id, Some(date), now)
            .iter()
            .any(|s| s == slot)
    }

    /// `None` when the service is unknown or none of its staff resolve.
    pub fn get_service_price_range(&self, service_id: u32) -> Option<PriceRange> {
        let service = self.get_service_by_id(service_id)?;
        self.resolve_staff(service).fold(None, |range, staff| {
            Some(match range {
                None => PriceRange {
                    min_price: staff.price,
                    max_price: staff.price,
                },
                Some(r) => PriceRange {
                    min_price: r.min_price.min(staff.price),
                    max_price: r.max_price.max(staff.price),
                },
            })
        })
    }
}

fn slots(labels: &[&str]) -> Vec<String> {
    labels.iter().map(|s| s.to_string()).collect()
}

fn seed_staff() -> Vec<Staff> {
    vec![
        Staff {
            id: 1,
            name: "張美容師".to_string(),
            price: 1000,
            work_time: "9:00-18:00".to_string(),
            available_slots: slots(&["9:00", "10:00", "11:00", "14:00", "15:00", "16:00", "17:00"]),
            unavailable_slots: Some(slots(&["12:00", "13:00"])),
        },
        Staff {
            id: 2,
            name: "陳美容師".to_string(),
            price: 1200,
            work_time: "10:00-19:00".to_string(),
            available_slots: slots(&["10:00", "11:00", "14:00", "15:00", "16:00", "17:00", "18:00"]),
            unavailable_slots: Some(slots(&["12:00", "13:00"])),
        },
        Staff {
            id: 3,
            name: "李按摩師".to_string(),
            price: 1300,
            work_time: "10:00-20:00".to_string(),
            available_slots: slots(&[
                "10:00", "11:00", "14:00", "15:00", "16:00", "17:00", "18:00", "19:00",
            ]),
            unavailable_slots: Some(slots(&["12:00", "13:00"])),
        },
        Staff {
            id: 4,
            name: "王造型師".to_string(),
            price: 1500,
            work_time: "11:00-19:00".to_string(),
            available_slots: slots(&["11:00", "12:00", "14:00", "15:00", "16:00", "17:00", "18:00"]),
            unavailable_slots: Some(slots(&["13:00"])),
        },
        Staff {
            id: 5,
            name: "林造型師".to_string(),
            price: 1800,
            work_time: "9:00-17:00".to_string(),
            available_slots: slots(&["9:00", "10:00", "11:00", "14:00", "15:00", "16:00"]),
            unavailable_slots: Some(slots(&["12:00", "13:00"])),
        },
    ]
}

fn seed_services() -> Vec<Service> {
    vec![
        Service {
            id: 1,
            name: "臉部護理".to_string(),
            service_type: "facial".to_string(),
            staff_ids: vec![1, 2],
        },
        Service {
            id: 2,
            name: "按摩".to_string(),
            service_type: "massage".to_string(),
            staff_ids: vec![3],
        },
        Service {
            id: 3,
            name: "造型設計".to_string(),
            service_type: "styling".to_string(),
            staff_ids: vec![4, 5],
        },
    ]
}
