use serde::Serialize;

/// `{ "status": "200", "data": [...] }` wrapper returned by the list
/// endpoints.
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub status: &'static str,
    pub data: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn ok(data: Vec<T>) -> Self {
        Self { status: "200", data }
    }
}

/// `{ "message": ..., "data": ... }`; `data` is omitted when `None`.
#[derive(Debug, Serialize)]
pub struct MessageResponse<T> {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl MessageResponse<()> {
    pub fn message(message: &'static str) -> Self {
        Self { message, data: None }
    }
}

impl<T> MessageResponse<T> {
    pub fn with_data(message: &'static str, data: T) -> Self {
        Self {
            message,
            data: Some(data),
        }
    }
}
