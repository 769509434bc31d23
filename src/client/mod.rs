//! The authenticated HTTP client facade and its refresh protocol.

mod facade;
mod policy;
mod refresh;

pub use facade::{ApiClient, ApiRequest, REFRESH_PATH};
pub use policy::{action_for, msg, ErrorAction, STATUS_ACTIONS};
pub use refresh::{RefreshCoordinator, RefreshOutcome, RefreshTicket};
