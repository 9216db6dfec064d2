use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{NewRecipe, Recipe};

/// The `recipes` collection.
#[async_trait]
pub trait RecipeRepo: Send + Sync {
    async fn list(&self) -> anyhow::Result<Vec<Recipe>>;
    async fn create(&self, new: NewRecipe) -> anyhow::Result<Recipe>;
    /// Returns `false` when no recipe had that id.
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct PgRecipeRepo {
    db: PgPool,
}

impl PgRecipeRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RecipeRepo for PgRecipeRepo {
    async fn list(&self) -> anyhow::Result<Vec<Recipe>> {
        sqlx::query_as::<_, Recipe>(
            r#"
            SELECT id, title, ingredients, instructions, image, created_at
            FROM recipes
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list recipes")
    }

    async fn create(&self, new: NewRecipe) -> anyhow::Result<Recipe> {
        sqlx::query_as::<_, Recipe>(
            r#"
            INSERT INTO recipes (title, ingredients, instructions, image)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, ingredients, instructions, image, created_at
            "#,
        )
        .bind(&new.title)
        .bind(&new.ingredients)
        .bind(&new.instructions)
        .bind(&new.image) // Option<String> → NULL allowed
        .fetch_one(&self.db)
        .await
        .context("insert recipe")
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete recipe")?;
        Ok(res.rows_affected() > 0)
    }
}
