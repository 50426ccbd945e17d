//! gridfill-core - UI-agnostic sheet session: selection, history, clipboard,
//! autofill and input dispatch over the gridfill engine.

pub mod config;
pub mod document;
pub mod error;
pub mod input;
pub mod storage;

pub use config::{AutofillBackend, AutofillConfig, GridConfig, LayoutConfig, load_config};
pub use document::{
    AutofillGateway, Direction, FillRequest, FillResponse, FillTicket, PointerSession, Sheet,
};
pub use error::{FillError, GridError, Result};
pub use input::{Action, ActionOutcome, Key, apply_action};

pub use gridfill_engine::engine::{CellId, CellValue, Position, SortDirection, SortKey};
