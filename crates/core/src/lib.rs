pub mod config;
pub mod pay;
pub mod record;
pub mod sequence;

pub use config::{Config, ConfigError, OcrConfig, OutputConfig, PayPolicy, RangeResolution};
pub use pay::{Pay, PayUnit};
pub use record::{EmploymentType, ExtractedFields, JobRecord, ListingId};
pub use sequence::{Sequence, SequenceExhausted};
