use anyhow::Result;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::info;

use crate::entities::{listings, prelude::*};
use crate::models::listing::{Listing, ListingFilter, ListingStatus, NewListing, SortKey};

pub struct ListingRepository {
    conn: DatabaseConnection,
}

impl ListingRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model_to_listing(model: listings::Model) -> Result<Listing> {
        Ok(Listing {
            id: model.id,
            seller_id: model.seller_id,
            category: model.category.parse()?,
            brand: model.brand,
            model: model.model,
            purchase_year: model.purchase_year,
            price: model.price,
            gear_transmission: model.gear_transmission.parse()?,
            frame_material: model.frame_material.parse()?,
            suspension: model.suspension.parse()?,
            condition: model.condition.parse()?,
            cycle_type: model.cycle_type.parse()?,
            wheel_size: model.wheel_size.parse()?,
            has_receipt: model.has_receipt,
            additional_details: model.additional_details,
            images: serde_json::from_str(&model.images).unwrap_or_default(),
            is_premium: model.is_premium,
            status: model.status.parse()?,
            views: model.views,
            inquiries: model.inquiries,
            created_at: model.created_at,
        })
    }

    pub async fn create(&self, listing: &NewListing) -> Result<Listing> {
        let active_model = listings::ActiveModel {
            seller_id: Set(listing.seller_id),
            category: Set(listing.category.as_str().to_string()),
            brand: Set(listing.brand.clone()),
            model: Set(listing.model.clone()),
            purchase_year: Set(listing.purchase_year),
            price: Set(listing.price),
            gear_transmission: Set(listing.gear_transmission.as_str().to_string()),
            frame_material: Set(listing.frame_material.as_str().to_string()),
            suspension: Set(listing.suspension.as_str().to_string()),
            condition: Set(listing.condition.as_str().to_string()),
            cycle_type: Set(listing.cycle_type.as_str().to_string()),
            wheel_size: Set(listing.wheel_size.as_str().to_string()),
            has_receipt: Set(listing.has_receipt),
            additional_details: Set(listing.additional_details.clone()),
            images: Set(serde_json::to_string(&listing.images)?),
            is_premium: Set(listing.is_premium),
            status: Set(ListingStatus::Available.as_str().to_string()),
            views: Set(0),
            inquiries: Set(0),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let model = active_model.insert(&self.conn).await?;

        info!("Created listing {}: {} {}", model.id, model.brand, model.model);
        Self::map_model_to_listing(model)
    }

    pub async fn get(&self, id: i32) -> Result<Option<Listing>> {
        let model = Listings::find_by_id(id).one(&self.conn).await?;
        model.map(Self::map_model_to_listing).transpose()
    }

    /// Builds one select from the supplied filter and sort directive.
    ///
    /// Every present filter narrows the result (AND); absent filters impose
    /// no constraint, so an empty filter returns the whole table. Price
    /// bounds are inclusive.
    pub async fn search(&self, filter: &ListingFilter, sort: SortKey) -> Result<Vec<Listing>> {
        let mut query = Listings::find();

        if let Some(brand) = &filter.brand {
            query = query.filter(listings::Column::Brand.eq(brand.as_str()));
        }

        if let Some(year) = filter.purchase_year {
            query = query.filter(listings::Column::PurchaseYear.eq(year));
        }

        if let Some(condition) = filter.condition {
            query = query.filter(listings::Column::Condition.eq(condition.as_str()));
        }

        if let Some(transmission) = filter.gear_transmission {
            query = query.filter(listings::Column::GearTransmission.eq(transmission.as_str()));
        }

        if let Some(material) = filter.frame_material {
            query = query.filter(listings::Column::FrameMaterial.eq(material.as_str()));
        }

        if let Some(suspension) = filter.suspension {
            query = query.filter(listings::Column::Suspension.eq(suspension.as_str()));
        }

        if let Some(wheel_size) = filter.wheel_size {
            query = query.filter(listings::Column::WheelSize.eq(wheel_size.as_str()));
        }

        if let Some(min_price) = filter.min_price {
            query = query.filter(listings::Column::Price.gte(min_price));
        }

        if let Some(max_price) = filter.max_price {
            query = query.filter(listings::Column::Price.lte(max_price));
        }

        if let Some(category) = filter.category {
            query = query.filter(listings::Column::Category.eq(category.as_str()));
        }

        if let Some(premium) = filter.is_premium {
            query = query.filter(listings::Column::IsPremium.eq(premium));
        }

        if let Some(seller_id) = filter.seller_id {
            query = query.filter(listings::Column::SellerId.eq(seller_id));
        }

        if let Some(ids) = &filter.ids {
            query = query.filter(listings::Column::Id.is_in(ids.iter().copied()));
        }

        if let Some(status) = filter.status {
            query = query.filter(listings::Column::Status.eq(status.as_str()));
        }

        query = match sort {
            SortKey::Relevance | SortKey::Newest => {
                query.order_by_desc(listings::Column::CreatedAt)
            }
            SortKey::PriceAsc => query.order_by_asc(listings::Column::Price),
            SortKey::PriceDesc => query.order_by_desc(listings::Column::Price),
        };

        let rows = query.all(&self.conn).await?;
        rows.into_iter().map(Self::map_model_to_listing).collect()
    }

    /// Mutates only the status column. Returns false when no such listing
    /// exists.
    pub async fn update_status(&self, id: i32, status: ListingStatus) -> Result<bool> {
        let result = Listings::update_many()
            .col_expr(listings::Column::Status, Expr::value(status.as_str()))
            .filter(listings::Column::Id.eq(id))
            .exec(&self.conn)
            .await?;

        let updated = result.rows_affected > 0;
        if updated {
            info!("Listing {} status -> {}", id, status);
        }
        Ok(updated)
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(Listings::find().count(&self.conn).await?)
    }

    pub async fn increment_views(&self, id: i32) -> Result<()> {
        Listings::update_many()
            .col_expr(
                listings::Column::Views,
                Expr::col(listings::Column::Views).add(1),
            )
            .filter(listings::Column::Id.eq(id))
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    pub async fn increment_inquiries(&self, id: i32) -> Result<bool> {
        let result = Listings::update_many()
            .col_expr(
                listings::Column::Inquiries,
                Expr::col(listings::Column::Inquiries).add(1),
            )
            .filter(listings::Column::Id.eq(id))
            .exec(&self.conn)
            .await?;
        Ok(result.rows_affected > 0)
    }
}
