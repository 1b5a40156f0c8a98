use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::entities::faqs;
use crate::models::listing::{Listing, ListingFilter, ListingStatus, NewListing, SortKey};
use crate::models::visit::{DimensionCount, NewVisit, VisitDimension};

pub mod migrator;
pub mod repositories;

pub use repositories::faq::FaqUpdate;
pub use repositories::user::User;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn listing_repo(&self) -> repositories::listing::ListingRepository {
        repositories::listing::ListingRepository::new(self.conn.clone())
    }

    fn visit_repo(&self) -> repositories::visit::VisitRepository {
        repositories::visit::VisitRepository::new(self.conn.clone())
    }

    fn faq_repo(&self) -> repositories::faq::FaqRepository {
        repositories::faq::FaqRepository::new(self.conn.clone())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    pub async fn create_listing(&self, listing: &NewListing) -> Result<Listing> {
        self.listing_repo().create(listing).await
    }

    pub async fn get_listing(&self, id: i32) -> Result<Option<Listing>> {
        self.listing_repo().get(id).await
    }

    pub async fn search_listings(
        &self,
        filter: &ListingFilter,
        sort: SortKey,
    ) -> Result<Vec<Listing>> {
        self.listing_repo().search(filter, sort).await
    }

    pub async fn count_listings(&self) -> Result<u64> {
        self.listing_repo().count().await
    }

    pub async fn update_listing_status(&self, id: i32, status: ListingStatus) -> Result<bool> {
        self.listing_repo().update_status(id, status).await
    }

    pub async fn increment_listing_views(&self, id: i32) -> Result<()> {
        self.listing_repo().increment_views(id).await
    }

    pub async fn increment_listing_inquiries(&self, id: i32) -> Result<bool> {
        self.listing_repo().increment_inquiries(id).await
    }

    pub async fn record_visit(&self, visit: &NewVisit) -> Result<()> {
        self.visit_repo().record(visit).await
    }

    pub async fn aggregate_visits(
        &self,
        start: Option<&str>,
        end: Option<&str>,
        dimension: VisitDimension,
    ) -> Result<Vec<DimensionCount>> {
        self.visit_repo().aggregate(start, end, dimension).await
    }

    pub async fn count_visits(&self, start: Option<&str>, end: Option<&str>) -> Result<u64> {
        self.visit_repo().count(start, end).await
    }

    pub async fn list_faqs(&self, category: Option<&str>) -> Result<Vec<faqs::Model>> {
        self.faq_repo().list_active(category).await
    }

    pub async fn list_all_faqs(&self) -> Result<Vec<faqs::Model>> {
        self.faq_repo().list_all().await
    }

    pub async fn get_faq(&self, id: i32) -> Result<Option<faqs::Model>> {
        self.faq_repo().get(id).await
    }

    pub async fn create_faq(
        &self,
        question: &str,
        answer: &str,
        category: &str,
        display_order: i32,
    ) -> Result<faqs::Model> {
        self.faq_repo()
            .create(question, answer, category, display_order)
            .await
    }

    pub async fn update_faq(&self, id: i32, updates: FaqUpdate) -> Result<Option<faqs::Model>> {
        self.faq_repo().update(id, updates).await
    }

    pub async fn soft_delete_faq(&self, id: i32) -> Result<bool> {
        self.faq_repo().soft_delete(id).await
    }

    pub async fn get_user(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        email: &str,
        city: &str,
    ) -> Result<User> {
        self.user_repo()
            .create(username, password, email, city)
            .await
    }

    pub async fn verify_user_password(&self, username: &str, password: &str) -> Result<bool> {
        self.user_repo().verify_password(username, password).await
    }
}
