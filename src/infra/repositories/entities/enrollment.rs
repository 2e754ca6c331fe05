//! SeaORM entity for the enrollments table.

use std::collections::HashMap;

use sea_orm::entity::prelude::*;

use crate::domain;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "enrollments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub is_paid: bool,
    #[sea_orm(column_type = "JsonBinary")]
    pub progress: Json,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::CourseId",
        to = "super::course::Column::Id"
    )]
    Course,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for domain::Enrollment {
    fn from(model: Model) -> Self {
        let progress: HashMap<Uuid, bool> =
            serde_json::from_value(model.progress).unwrap_or_default();

        Self {
            id: model.id,
            user_id: model.user_id,
            course_id: model.course_id,
            is_paid: model.is_paid,
            progress,
            created_at: model.created_at,
        }
    }
}
