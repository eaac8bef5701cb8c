//! Admin content management: one generic panel per collection, the
//! session that gates them and the shell that owns them.

pub mod articles;
pub mod banners;
pub mod categories;
pub mod console;
pub mod contacts;
pub mod panel;
pub mod products;
pub mod promotions;
pub mod session;
pub mod uploads;

pub use console::{AdminConsole, AdminPanels};
pub use panel::{Deletable, ResourceKind, ResourcePanel, SaveOutcome};
pub use session::{KeyStore, SessionController, SessionState};
