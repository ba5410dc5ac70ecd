pub mod alert;
pub mod assessment;
pub mod history;
pub mod subscription;
pub mod weather;
pub mod zone;

pub use alert::{Alert, AlertOrigin, AlertQuery, AlertStatus, NewAlert};
pub use assessment::{RiskAssessment, RiskFactor};
pub use history::{HistoryQuery, HistoryRecord};
pub use subscription::{AlertPreferences, NewSubscription, Subscription, SubscriptionError};
pub use weather::{Coordinates, ForecastError, ForecastPoint, ForecastWindow, WeatherSnapshot};
pub use zone::{MonitoredZone, ZoneId, ZoneStatus};
