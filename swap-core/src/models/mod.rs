pub mod item;
pub mod item_view;

pub use item::{Item, NewItem};
pub use item_view::ItemView;
