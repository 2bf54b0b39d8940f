use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub limits: BookingLimits,
}

/// Head-count and field-length ceilings applied by form validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BookingLimits {
    pub min_people: u32,
    pub max_people: u32,
    pub max_extra_people: usize,
    pub name_max_length: usize,
}

impl Default for BookingLimits {
    fn default() -> Self {
        Self {
            min_people: 1,
            max_people: 5,
            max_extra_people: 4,
            name_max_length: 20,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = BookingLimits::default();
        Self {
            port: env_parse("PORT", 3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "booking.db".to_string()),
            limits: BookingLimits {
                min_people: defaults.min_people,
                max_people: env_parse("MAX_PEOPLE", defaults.max_people),
                max_extra_people: env_parse("MAX_EXTRA_PEOPLE", defaults.max_extra_people),
                name_max_length: env_parse("NAME_MAX_LENGTH", defaults.name_max_length),
            },
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
