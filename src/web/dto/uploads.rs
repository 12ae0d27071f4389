use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UploadResponse {
    pub url: String,
}

/// Multipart body of an upload, documentation only.
#[derive(utoipa::ToSchema)]
#[allow(unused)]
pub struct UploadForm {
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}
