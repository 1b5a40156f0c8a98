use anyhow::Result;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter,
    QuerySelect, Set,
};

use crate::entities::{prelude::*, visits};
use crate::models::visit::{DimensionCount, NewVisit, UNKNOWN_LABEL, VisitDimension};

#[derive(Debug, FromQueryResult)]
struct GroupRow {
    label: Option<String>,
    count: i64,
}

pub struct VisitRepository {
    conn: DatabaseConnection,
}

impl VisitRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn record(&self, visit: &NewVisit) -> Result<()> {
        let active_model = visits::ActiveModel {
            recorded_at: Set(chrono::Utc::now().to_rfc3339()),
            path: Set(visit.path.clone()),
            device_type: Set(visit.device_type.clone()),
            platform: Set(visit.platform.clone()),
            browser: Set(visit.browser.clone()),
            user_id: Set(visit.user_id),
            session_id: Set(visit.session_id.clone()),
            ..Default::default()
        };

        Visits::insert(active_model).exec(&self.conn).await?;
        Ok(())
    }

    /// Counts visits per distinct value of the grouping column, optionally
    /// bounded to an inclusive time window. Unclassified values are reported
    /// under the "Unknown" label.
    pub async fn aggregate(
        &self,
        start: Option<&str>,
        end: Option<&str>,
        dimension: VisitDimension,
    ) -> Result<Vec<DimensionCount>> {
        let column = match dimension {
            VisitDimension::Device => visits::Column::DeviceType,
            VisitDimension::Platform => visits::Column::Platform,
            VisitDimension::Browser => visits::Column::Browser,
            VisitDimension::Path => visits::Column::Path,
        };

        let mut query = Visits::find()
            .select_only()
            .column_as(column, "label")
            .column_as(visits::Column::Id.count(), "count")
            .group_by(column);

        if let Some(start) = start {
            query = query.filter(visits::Column::RecordedAt.gte(start));
        }

        if let Some(end) = end {
            query = query.filter(visits::Column::RecordedAt.lte(end));
        }

        let rows = query.into_model::<GroupRow>().all(&self.conn).await?;

        Ok(rows
            .into_iter()
            .map(|row| DimensionCount {
                label: row.label.unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
                count: row.count,
            })
            .collect())
    }

    pub async fn count(&self, start: Option<&str>, end: Option<&str>) -> Result<u64> {
        let mut query = Visits::find();

        if let Some(start) = start {
            query = query.filter(visits::Column::RecordedAt.gte(start));
        }

        if let Some(end) = end {
            query = query.filter(visits::Column::RecordedAt.lte(end));
        }

        Ok(query.count(&self.conn).await?)
    }
}
