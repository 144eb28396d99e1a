//! The invoice model: column schema, rows, totals and export snapshots.
//!
//! [`LineTable`] keeps the schema and rows consistent, [`TotalCalculator`]
//! derives amounts, and [`InvoiceSession`] ties them to the header and turns
//! user commands into model changes.

mod config;
mod currencies;
mod error;
mod header;
pub mod logo;
mod rows;
mod schema;
mod session;
mod snapshot;
mod table;
mod totals;

pub use config::*;
pub use currencies::*;
pub use error::*;
pub use header::*;
pub use logo::{ImageFormat, Logo, LogoSlot, UploadTicket};
pub use rows::*;
pub use schema::*;
pub use session::*;
pub use snapshot::*;
pub use table::*;
pub use totals::*;
