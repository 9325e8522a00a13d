/*!

This library keeps the web-terminal resource bundle current on every cluster the dashboard serves.
Seeds are submitted to a [`SeedBootstrapQueue`] which drains them through the bootstrap pipeline;
[`bootstrap_garden`] runs the cleanup and attach steps once against the garden cluster at process
startup. The composition root owns the queue and injects it wherever submission is needed.

```no_run
use std::sync::Arc;
use terminal_bootstrap::{bootstrap_garden, Admission, GardenClient, SeedBootstrapQueue, TerminalBootstrapConfig};

# async fn startup(config: TerminalBootstrapConfig) -> terminal_bootstrap::Result<()> {
let config = Arc::new(config);
let garden = Arc::new(GardenClient::try_default().await?);
if let Admission::Enabled = config.admission() {
    if let Err(error) = bootstrap_garden(garden.as_ref(), &config).await {
        log::error!("failed to bootstrap terminal resources for garden cluster: {}", error);
    }
}
let queue = SeedBootstrapQueue::start(config, garden, None);
# let _ = queue;
# Ok(())
# }
```

!*/

#![deny(
    clippy::expect_used,
    clippy::get_unwrap,
    clippy::panic,
    clippy::panic_in_result_fn,
    clippy::panicking_unwrap,
    clippy::unwrap_in_result,
    clippy::unwrap_used
)]

pub use config::{Admission, TerminalBootstrapConfig};
pub use error::{Error, Result};
pub use garden::{CredentialWait, Garden, GardenClient, SeedConnection};
pub use pipeline::{bootstrap_garden, bootstrap_seed};
pub use queue::{BootstrapOutcome, SeedBootstrapQueue};

mod config;
pub mod error;
mod garden;
mod pipeline;
mod queue;
