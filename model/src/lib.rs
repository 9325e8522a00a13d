/*!

This library provides the cluster-object model for the dashboard web terminal feature: the `Seed`
and `Shoot` records read from the garden cluster, typed manifests for the terminal resource bundle
(cleanup service account, RBAC roles, cleanup cron job and the kube-apiserver exposure objects),
and the idempotent client primitives used to apply them.

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

pub use error::{Error, Result};
pub use owner::owner_references_for_service_account;
pub use seed::{Seed, SeedSecretRef, SeedSpec};
pub use shoot::{Shoot, ShootCloud, ShootSpec, ShootStatus};

pub mod clients;
pub mod constants;
mod error;
mod owner;
mod seed;
mod shoot;
pub mod system;
