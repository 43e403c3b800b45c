//! Item entity <-> model mapper

use roster_core::entities::Item;

use crate::models::ItemModel;

impl From<ItemModel> for Item {
    fn from(model: ItemModel) -> Self {
        Item {
            id: model.item_id,
            created_date: Some(model.created_date),
        }
    }
}
