//! Lookup tables that drive token typing
//!
//! - [`ReservedTokenTable`]: exact literal matches, consulted during the scan
//! - [`FormatValidatorTable`]: predicates, consulted by the post-typing pass
//!
//! Both resolve ties by registration order: the first registered match wins.

pub mod formats;
pub mod reserved;
pub mod validators;

pub use formats::StandardFormat;
pub use reserved::{ReservedEntry, ReservedTokenTable};
pub use validators::{FormatPredicate, FormatValidator, FormatValidatorTable};
