//! Distribution providers and loading

pub mod loader;
pub mod provider;
pub mod remote;
pub mod synthetic;

pub use loader::{load_distribution, LoadedDistribution};
pub use provider::{DataError, DataSource, DistributionProvider};
pub use remote::{RemoteProvider, RemoteSettings};
pub use synthetic::{generate_distribution, SyntheticProvider};
