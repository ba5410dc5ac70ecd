pub mod notifier;
pub mod store;
pub mod weather_source;

pub use notifier::{NotificationError, Notifier};
pub use store::{AlertStore, HistoryStore, StoreError, SubscriptionStore};
pub use weather_source::{WeatherError, WeatherSource};
