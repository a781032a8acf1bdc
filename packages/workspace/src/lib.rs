pub mod server;

pub use server::{HostError, HostHandle, HostServer, DEFAULT_CHANNEL_CAPACITY};

// Re-export the document operations the host performs
pub use blockscope_editor::{FeatureStore, PresentationGenerator};
