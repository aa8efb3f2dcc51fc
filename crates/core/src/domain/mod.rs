pub mod field;
pub mod product;
pub mod quote;
pub mod record;
pub mod rules;
pub mod user;
