pub mod assemble;
pub mod capture;
pub mod employment;
pub mod numeric;
pub mod pay;
pub mod pipeline;
pub mod preprocess;
pub mod recognizer;

pub use assemble::RecordAssembler;
pub use capture::{capture_with_fallback, BoundingBox, CaptureError, DirectoryCapture, RegionCapture};
pub use employment::classify_employment;
pub use numeric::normalize_number;
pub use pay::{PayCategory, PayExtractor, PayMatch};
pub use pipeline::{spawn_intake_watcher, ListingPipeline, PipelineError};
pub use preprocess::{prepare_image, PreprocessError};
pub use recognizer::{MockRecognizer, OcrBackend, OcrError, ScriptedRecognizer};
