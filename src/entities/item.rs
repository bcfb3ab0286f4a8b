//! Item entity - One tracked line of the shared inventory.
//!
//! Names are stored normalized (trimmed, lower-case, single spaces) so that
//! `Glock`, ` glock ` and `GLOCK` all address the same row.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Item database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "items")]
pub struct Model {
    /// Unique identifier for the item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Normalized item name (e.g., "glock", "cargador pistolas")
    #[sea_orm(unique)]
    pub name: String,
    /// Units in stock, never negative
    pub quantity: i64,
    /// When the item was first tracked
    pub created_at: DateTime,
    /// When the quantity last changed
    pub updated_at: DateTime,
}

/// Items have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
