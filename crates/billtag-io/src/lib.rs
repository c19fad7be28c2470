//! # billtag-io: Tables In, Reports Out
//!
//! The thin adapters around [`billtag_core`]: a tab-separated table reader
//! and the itemization renderers.
//!
//! ## Data Flow
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐    ┌──────────┐
//! │  bill.tsv    │───►│ reader::read │───►│ core allocate│───►│ render_* │
//! │ (tab table)  │    │ Vec<RawLine> │    │  Allocation  │    │  String  │
//! └──────────────┘    └──────────────┘    └──────────────┘    └──────────┘
//! ```

pub mod error;
pub mod reader;
pub mod render;

pub use error::{IoError, IoResult};
pub use reader::{read, read_path};
pub use render::{render_json, render_text};
