pub mod history;
pub mod model;
