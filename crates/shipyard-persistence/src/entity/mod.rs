//! SeaORM entity definitions

pub mod shipping_entry;
pub mod version_record;
