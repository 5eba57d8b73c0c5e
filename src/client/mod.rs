//! HTTP clients for the remote records API and the upload relay.

pub mod api;
pub mod error;
pub mod relay;

pub use api::{ApiClient, ListQuery, MonthlyReport};
pub use error::{ClientError, ClientResult};
pub use relay::{Attachment, RelayClient};
