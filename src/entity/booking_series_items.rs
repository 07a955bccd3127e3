//! 系列预约关联实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "booking_series_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub series_id: i64,
    pub booking_id: i64,
    pub session_id: Option<i64>,
    pub occurrence_index: i64,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::booking_series::Entity",
        from = "Column::SeriesId",
        to = "super::booking_series::Column::Id"
    )]
    Series,
    #[sea_orm(
        belongs_to = "super::bookings::Entity",
        from = "Column::BookingId",
        to = "super::bookings::Column::Id"
    )]
    Booking,
}

impl Related<super::booking_series::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Series.def()
    }
}

impl Related<super::bookings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Booking.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_series_item(self) -> crate::models::series::entities::BookingSeriesItem {
        use crate::models::series::entities::BookingSeriesItem;
        use chrono::{DateTime, Utc};

        BookingSeriesItem {
            id: self.id,
            series_id: self.series_id,
            booking_id: self.booking_id,
            session_id: self.session_id,
            occurrence_index: self.occurrence_index,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
        }
    }
}
