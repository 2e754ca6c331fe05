//! SeaORM entity for the courses table.

use sea_orm::entity::prelude::*;

use crate::domain::{self, Difficulty, Lesson};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub faculty: String,
    pub category: String,
    pub difficulty: String,
    pub price: i64,
    pub thumbnail_url: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub lessons: Json,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::enrollment::Entity")]
    Enrollments,
}

impl Related<super::enrollment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for domain::Course {
    fn from(model: Model) -> Self {
        // Lessons are written by this crate as a JSON array; anything
        // unreadable degrades to an empty list rather than failing reads.
        let lessons: Vec<Lesson> = serde_json::from_value(model.lessons).unwrap_or_default();

        Self {
            id: model.id,
            title: model.title,
            slug: model.slug,
            description: model.description,
            faculty: model.faculty,
            category: model.category,
            difficulty: model
                .difficulty
                .parse()
                .unwrap_or(Difficulty::Beginner),
            price: model.price,
            thumbnail_url: model.thumbnail_url,
            lessons,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
