pub mod error;
pub mod format;
pub mod g11;
pub mod model;
pub mod record;
pub mod serialization;

pub use crate::error::ParseError;
pub use crate::format::StatementFormat;
pub use crate::g11::reject::{DEFAULT_REJECT_REASONS, RejectReasonTable};
pub use crate::g11::{G11Import, G11Parser, G11_FTYPE};
pub use crate::model::{Amount, Attachment, Currency, RecordKind, Statement, Transaction};
pub use crate::record::{Field, FieldKind, FieldValue, FixedWidthFile, RawLine};
