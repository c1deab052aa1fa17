pub mod clean;
pub mod deadline;
pub mod detail;
pub mod discussion;
pub mod model;
pub mod resolver;
pub mod source;
pub mod state;

pub use detail::{ArticleDetail, load_detail};
pub use model::{PreviewFailure, PreviewOrigin, PreviewResult};
pub use resolver::{DEFAULT_PREVIEW_DEADLINE, PreviewResolver};
pub use source::{HttpPreviewSource, PreviewSource};
pub use state::PreviewState;
