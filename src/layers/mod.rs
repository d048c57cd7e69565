pub mod animation;
pub mod category;
pub mod marker;
