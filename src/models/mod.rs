pub mod booking;
pub mod catalog;
pub mod ui;

pub use booking::{
    BookingData, BookingFormData, BookingState, BookingStatistics, BookingStatus, ExtraPerson,
    FormDataPatch,
};
pub use catalog::{PriceRange, Service, Staff, StaffDisplayInfo};
pub use ui::UiState;
