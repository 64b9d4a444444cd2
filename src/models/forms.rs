use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

// Times arrive as raw `datetime-local` strings and are parsed by the accounting service.
#[derive(Debug, Deserialize)]
pub struct RecordForm {
    pub work_type: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct FlashQuery {
    pub error: Option<String>,
}
