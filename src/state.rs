use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rusqlite::Connection;

use crate::config::AppConfig;
use crate::db::snapshot::{BOOKING_STORE_KEY, UI_STORE_KEY};
use crate::db::StatePersistence;
use crate::services::{BookingStore, CatalogSource, CatalogStore, UiStore};

pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub config: AppConfig,
    pub catalog: CatalogStore,
    pub booking: Mutex<BookingStore>,
    pub ui: Mutex<UiStore>,
}

impl AppState {
    /// Loads the catalog and rehydrates both stores from `conn`.
    pub async fn init(
        config: AppConfig,
        conn: Connection,
        source: &dyn CatalogSource,
    ) -> anyhow::Result<Self> {
        let db = Arc::new(Mutex::new(conn));
        let catalog = CatalogStore::load_from(source).await?;
        let booking =
            BookingStore::with_persistence(StatePersistence::new(Arc::clone(&db), BOOKING_STORE_KEY))?;
        let ui = UiStore::with_persistence(StatePersistence::new(Arc::clone(&db), UI_STORE_KEY))?;

        Ok(Self {
            db,
            config,
            catalog,
            booking: Mutex::new(booking),
            ui: Mutex::new(ui),
        })
    }

    pub fn booking(&self) -> MutexGuard<'_, BookingStore> {
        self.booking.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn ui(&self) -> MutexGuard<'_, UiStore> {
        self.ui.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
