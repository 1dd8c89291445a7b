use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct GenerateTextRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerateResponse {
    pub output: String,
}
