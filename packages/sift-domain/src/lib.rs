pub mod assessment;
pub mod candidate;
pub mod category;
pub mod duration;
pub mod intent;
pub mod plan;
pub mod posting;

pub use assessment::{Assessment, RemoteTesting};
pub use candidate::{ScoredCandidate, similarity_from_distance};
pub use category::Category;
pub use intent::{PrimaryFocus, QueryIntent, Specificity};
pub use plan::{CountBand, SelectionPlan};
