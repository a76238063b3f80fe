//! Plant Disease Detector Common Library
//!
//! CLIとWeb(WASM)で共有される型・契約・コントローラ

pub mod types;
pub mod error;
pub mod contract;
pub mod parser;
pub mod preview;
pub mod view;
pub mod detector;

pub use types::{AnalysisResult, Intensity, SelectedFile};
pub use error::{Error, Result};
pub use contract::{endpoint_url, IMAGE_FIELD, PROCESS_IMAGE_PATH};
pub use parser::parse_analysis_response;
pub use preview::{encode_data_url, guess_mime_type, FALLBACK_MIME_TYPE};
pub use view::{format_number, format_percentage, render_text, ResultView, SeverityView};
pub use detector::{
    Completion, DetectorState, Outcome, Phase, PreviewState, PreviewTicket, SubmitRejected,
    SubmitTicket, SUBMIT_LABEL, SUBMIT_LABEL_LOADING,
};
