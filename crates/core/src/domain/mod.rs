pub mod field;
pub mod product;
pub mod quotation;
