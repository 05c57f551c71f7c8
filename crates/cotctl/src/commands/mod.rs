pub mod compare;
pub mod completion;
pub mod instrument;
pub mod report;
pub mod side_by_side;
