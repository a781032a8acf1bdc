//! # Blockscope Client
//!
//! Client side of the message protocol. The client holds the feature record
//! set and never touches the document: it asks the host to tag, extract,
//! persist and generate, and reduces the answers into its records.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ ClientSession                        │
//! │  - request/response by RequestId     │
//! │  - per-request timeout               │
//! │  - note refresh fan-out              │
//! └──────────────────────────────────────┘
//!          ↓                    ↓
//! ┌─────────────────┐   ┌─────────────────┐
//! │ FeatureSet      │   │ CSV export      │
//! │ (reducer)       │   │                 │
//! └─────────────────┘   └─────────────────┘
//! ```

mod correlation;
mod csv;
mod errors;
mod features;
mod session;

pub use correlation::Correlator;
pub use csv::{csv_file_name, export_csv, CSV_HEADER};
pub use errors::ClientError;
pub use features::FeatureSet;
pub use session::{ClientConfig, ClientSession, DEFAULT_REQUEST_TIMEOUT};
