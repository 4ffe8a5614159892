pub mod batch;
pub mod cell;
pub mod row;
