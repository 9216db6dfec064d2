use std::{future::Future, str::FromStr, time::Duration};

use anyhow::Context;
use async_trait::async_trait;
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    PgPool,
};
use tracing::{info, warn};

use crate::{
    auth::repo::{PgUserRepo, UserRepo},
    config::DatabaseConfig,
    recipes::repo::{PgRecipeRepo, RecipeRepo},
};

/// Owns the database connection and hands out the two collections.
#[async_trait]
pub trait DataStore: Send + Sync {
    fn users(&self) -> &dyn UserRepo;
    fn recipes(&self) -> &dyn RecipeRepo;
    /// Cheap round-trip used by the readiness probe.
    async fn ping(&self) -> anyhow::Result<()>;
}

pub struct PgStore {
    pool: PgPool,
    users: PgUserRepo,
    recipes: PgRecipeRepo,
}

impl PgStore {
    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            users: PgUserRepo::new(pool.clone()),
            recipes: PgRecipeRepo::new(pool.clone()),
            pool,
        }
    }

    /// Connects with exponential backoff and gives up after
    /// `connect_retries` failed retries.
    pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<Self> {
        let mut options = PgConnectOptions::from_str(&cfg.url).context("parse DATABASE_URL")?;
        if let Some(name) = &cfg.name {
            options = options.database(name);
        }

        let pool = retry_with_backoff(
            cfg.connect_retries,
            Duration::from_millis(cfg.connect_backoff_ms),
            "connect to database",
            || {
                let options = options.clone();
                async move {
                    PgPoolOptions::new()
                        .max_connections(cfg.max_connections)
                        .connect_with(options)
                        .await
                        .map_err(anyhow::Error::from)
                }
            },
        )
        .await?;

        info!(database = ?cfg.name, "connected to database");
        Ok(Self::from_pool(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl DataStore for PgStore {
    fn users(&self) -> &dyn UserRepo {
        &self.users
    }

    fn recipes(&self) -> &dyn RecipeRepo {
        &self.recipes
    }

    async fn ping(&self) -> anyhow::Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("database ping")?;
        Ok(())
    }
}

pub(crate) async fn retry_with_backoff<T, F, Fut>(
    retries: u32,
    initial_delay: Duration,
    what: &str,
    mut op: F,
) -> anyhow::Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
{
    let mut delay = initial_delay;
    let mut attempt = 0u32;
    loop {
        match op().await {
            Ok(v) => return Ok(v),
            Err(e) if attempt < retries => {
                attempt += 1;
                let delay_ms = delay.as_millis();
                warn!(error = %e, attempt, retries, delay_ms, "{what} failed; retrying");
                tokio::time::sleep(delay).await;
                delay = delay.saturating_mul(2);
            }
            Err(e) => {
                return Err(e.context(format!("{what}: giving up after {} attempt(s)", attempt + 1)))
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod memory {
    use std::sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    };

    use async_trait::async_trait;
    use time::OffsetDateTime;
    use uuid::Uuid;

    use super::DataStore;
    use crate::{
        auth::{
            repo::UserRepo,
            repo_types::{NewUser, User},
        },
        recipes::{
            repo::RecipeRepo,
            repo_types::{NewRecipe, Recipe},
        },
    };

    /// In-process stand-in for `PgStore`. `set_failing(true)` makes every
    /// call return an error.
    #[derive(Default)]
    pub struct MemoryStore {
        users: MemoryUsers,
        recipes: MemoryRecipes,
        failing: AtomicBool,
    }

    #[derive(Default)]
    pub struct MemoryUsers {
        rows: Mutex<Vec<User>>,
        failing: AtomicBool,
    }

    #[derive(Default)]
    pub struct MemoryRecipes {
        rows: Mutex<Vec<Recipe>>,
        failing: AtomicBool,
    }

    impl MemoryStore {
        pub fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
            self.users.failing.store(failing, Ordering::SeqCst);
            self.recipes.failing.store(failing, Ordering::SeqCst);
        }

        pub fn user_rows(&self) -> Vec<User> {
            self.users.rows.lock().unwrap().clone()
        }

        pub fn recipe_rows(&self) -> Vec<Recipe> {
            self.recipes.rows.lock().unwrap().clone()
        }
    }

    fn check(failing: &AtomicBool) -> anyhow::Result<()> {
        if failing.load(Ordering::SeqCst) {
            anyhow::bail!("memory store unavailable");
        }
        Ok(())
    }

    #[async_trait]
    impl DataStore for MemoryStore {
        fn users(&self) -> &dyn UserRepo {
            &self.users
        }

        fn recipes(&self) -> &dyn RecipeRepo {
            &self.recipes
        }

        async fn ping(&self) -> anyhow::Result<()> {
            check(&self.failing)
        }
    }

    #[async_trait]
    impl UserRepo for MemoryUsers {
        async fn list(&self) -> anyhow::Result<Vec<User>> {
            check(&self.failing)?;
            Ok(self.rows.lock().unwrap().clone())
        }

        async fn create(&self, new: NewUser) -> anyhow::Result<User> {
            check(&self.failing)?;
            let user = User {
                id: Uuid::new_v4(),
                username: new.username,
                email: new.email,
                password_hash: new.password_hash,
                created_at: OffsetDateTime::now_utc(),
            };
            self.rows.lock().unwrap().push(user.clone());
            Ok(user)
        }

        async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
            check(&self.failing)?;
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.email == email)
                .cloned())
        }

        async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
            check(&self.failing)?;
            Ok(self.rows.lock().unwrap().iter().find(|u| u.id == id).cloned())
        }

        async fn delete(&self, id: Uuid) -> anyhow::Result<Option<User>> {
            check(&self.failing)?;
            let mut rows = self.rows.lock().unwrap();
            Ok(rows
                .iter()
                .position(|u| u.id == id)
                .map(|idx| rows.remove(idx)))
        }
    }

    #[async_trait]
    impl RecipeRepo for MemoryRecipes {
        async fn list(&self) -> anyhow::Result<Vec<Recipe>> {
            check(&self.failing)?;
            Ok(self.rows.lock().unwrap().clone())
        }

        async fn create(&self, new: NewRecipe) -> anyhow::Result<Recipe> {
            check(&self.failing)?;
            let recipe = Recipe {
                id: Uuid::new_v4(),
                title: new.title,
                ingredients: new.ingredients,
                instructions: new.instructions,
                image: new.image,
                created_at: OffsetDateTime::now_utc(),
            };
            self.rows.lock().unwrap().push(recipe.clone());
            Ok(recipe)
        }

        async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
            check(&self.failing)?;
            let mut rows = self.rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|r| r.id != id);
            Ok(rows.len() != before)
        }
    }
}
