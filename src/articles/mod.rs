pub mod model;
pub mod time;

pub use model::Article;
pub use time::relative_time;
