use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::CreateRecipeRequest,
    repo::RecipeRepo,
    repo_types::{NewRecipe, Recipe},
};
use crate::{
    auth::services::present,
    error::{AppError, AppResult},
};

pub async fn list_recipes(recipes: &dyn RecipeRepo) -> AppResult<Vec<Recipe>> {
    Ok(recipes.list().await?)
}

pub async fn create_recipe(recipes: &dyn RecipeRepo, req: CreateRecipeRequest) -> AppResult<Recipe> {
    let title = present(req.title);
    let ingredients = req.ingredients.filter(|v| !v.is_empty());
    let instructions = req.instructions.filter(|v| !v.is_empty());

    let (Some(title), Some(ingredients), Some(instructions)) = (title, ingredients, instructions)
    else {
        warn!("recipe rejected: missing fields");
        return Err(AppError::BadRequest("All fields are required"));
    };

    let recipe = recipes
        .create(NewRecipe {
            title,
            ingredients,
            instructions,
            image: present(req.image),
        })
        .await?;

    info!(recipe_id = %recipe.id, title = %recipe.title, "recipe added");
    Ok(recipe)
}

pub async fn delete_recipe(recipes: &dyn RecipeRepo, id: &str) -> AppResult<()> {
    let Ok(id) = Uuid::parse_str(id) else {
        return Err(AppError::NotFound("Recipe not found"));
    };
    if !recipes.delete(id).await? {
        return Err(AppError::NotFound("Recipe not found"));
    }
    info!(recipe_id = %id, "recipe deleted");
    Ok(())
}
