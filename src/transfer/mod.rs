//! Remote file-transfer backends used by the upload relay.
//!
//! Every relay request opens its own session through a [`TransferConnector`]
//! and closes it before responding. There is no pooling.

pub mod error;
pub mod ftp;
pub mod local;
pub mod traits;

pub use error::{TransferError, TransferResult};
pub use ftp::FtpConnector;
pub use local::LocalConnector;
pub use traits::{TransferConnector, TransferSession};

use std::sync::Arc;
use std::time::Duration;

use crate::config::{TransferBackend, TransferConfig};

/// Build the connector selected by configuration.
pub fn connector_from_config(config: &TransferConfig) -> Arc<dyn TransferConnector> {
    match config.backend {
        TransferBackend::Ftp => Arc::new(FtpConnector::new(
            config.host.clone(),
            config.port,
            config.user.clone(),
            config.password.clone(),
            Duration::from_secs(config.connect_timeout_secs),
        )),
        TransferBackend::Local => Arc::new(LocalConnector::new(config.local_root.clone())),
    }
}
