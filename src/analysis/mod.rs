//! The analysis service that turns posted records into narrative insights
//! with a generative-language model.

mod endpoint;
mod model;
mod payload;

pub use endpoint::build_analysis_router;
pub use model::{DEFAULT_MODEL, GEMINI_API_URL, Gemini, GenerativeModel, ModelError};
pub use payload::{AnalyzeRequest, build_prompt};
