//! UART discovery on candidate pins

pub mod activity;
pub mod line;
pub mod tx;

pub use activity::{ActivityMonitor, LineState, MAX_PINS};
pub use line::{DiscoveryError, LineCharacterizer, LineReport, LineSettings};
pub use tx::discover_tx;
