pub mod identity;
pub mod ranked_index;
pub mod score;
pub mod skiplist;

pub use identity::*;
pub use ranked_index::*;
pub use score::*;
pub use skiplist::*;
