//! Prelude module - common imports for tabula users
//!
//! ```rust
//! use tabula::prelude::*;
//! ```

pub use crate::{
    // Cell types
    Address,
    Value,

    // Error types
    Error,
    Result,

    // Main type
    Sheet,

    // Capability bits
    CAP_CYCLIC_DEPS,
};
