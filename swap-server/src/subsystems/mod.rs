pub mod reset;
pub mod storefront;
pub mod views;
