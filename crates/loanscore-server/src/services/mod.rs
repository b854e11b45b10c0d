pub mod form;
pub mod predict;
