//! Sheet state and logic (UI-agnostic).

mod clipboard;
mod fill;
mod history;
mod layout;
mod navigate;
mod ops;
mod selection;
mod state;

pub use fill::{AutofillGateway, FillRequest, FillResponse, FillTicket, check_covers};
pub use history::{History, Snapshot};
pub use layout::Layout;
pub use navigate::Direction;
pub use selection::{Modifiers, PointerSession, Selection, range_ids};
pub use state::Sheet;
