use anyhow::Result;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::info;

use crate::entities::{faqs, prelude::*};

/// Partial update payload. Absent fields leave the column untouched.
#[derive(Debug, Clone, Default)]
pub struct FaqUpdate {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub category: Option<String>,
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
}

pub struct FaqRepository {
    conn: DatabaseConnection,
}

impl FaqRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Active FAQs ordered for display, optionally narrowed to one category.
    pub async fn list_active(&self, category: Option<&str>) -> Result<Vec<faqs::Model>> {
        let mut query = Faqs::find()
            .filter(faqs::Column::IsActive.eq(true))
            .order_by_asc(faqs::Column::DisplayOrder);

        if let Some(category) = category {
            query = query.filter(faqs::Column::Category.eq(category));
        }

        Ok(query.all(&self.conn).await?)
    }

    /// Every row including soft-deleted ones, for admin views.
    pub async fn list_all(&self) -> Result<Vec<faqs::Model>> {
        Ok(Faqs::find()
            .order_by_asc(faqs::Column::DisplayOrder)
            .all(&self.conn)
            .await?)
    }

    pub async fn get(&self, id: i32) -> Result<Option<faqs::Model>> {
        Ok(Faqs::find_by_id(id).one(&self.conn).await?)
    }

    pub async fn create(
        &self,
        question: &str,
        answer: &str,
        category: &str,
        display_order: i32,
    ) -> Result<faqs::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let active_model = faqs::ActiveModel {
            question: Set(question.to_string()),
            answer: Set(answer.to_string()),
            category: Set(category.to_string()),
            display_order: Set(display_order),
            is_active: Set(true),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active_model.insert(&self.conn).await?;
        info!("Created FAQ {}: {}", model.id, model.question);
        Ok(model)
    }

    pub async fn update(&self, id: i32, updates: FaqUpdate) -> Result<Option<faqs::Model>> {
        let Some(model) = Faqs::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: faqs::ActiveModel = model.into();

        if let Some(question) = updates.question {
            active.question = Set(question);
        }
        if let Some(answer) = updates.answer {
            active.answer = Set(answer);
        }
        if let Some(category) = updates.category {
            active.category = Set(category);
        }
        if let Some(display_order) = updates.display_order {
            active.display_order = Set(display_order);
        }
        if let Some(is_active) = updates.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        Ok(Some(active.update(&self.conn).await?))
    }

    /// Flips the active flag instead of removing the row. Returns false when
    /// no such FAQ exists.
    pub async fn soft_delete(&self, id: i32) -> Result<bool> {
        let result = Faqs::update_many()
            .col_expr(faqs::Column::IsActive, Expr::value(false))
            .col_expr(
                faqs::Column::UpdatedAt,
                Expr::value(chrono::Utc::now().to_rfc3339()),
            )
            .filter(faqs::Column::Id.eq(id))
            .exec(&self.conn)
            .await?;

        let deleted = result.rows_affected > 0;
        if deleted {
            info!("Soft-deleted FAQ {}", id);
        }
        Ok(deleted)
    }
}
