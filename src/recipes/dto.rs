use serde::Deserialize;

/// Request body for `POST /addrecipes`.
#[derive(Debug, Default, Deserialize)]
pub struct CreateRecipeRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub ingredients: Option<Vec<String>>,
    #[serde(default)]
    pub instructions: Option<Vec<String>>,
    #[serde(default)]
    pub image: Option<String>, // URL or base64, optional
}
