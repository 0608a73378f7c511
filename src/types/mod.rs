pub mod candidate;
pub mod errors;
pub mod ids;
pub mod mount;
pub mod report;

pub use candidate::*;
pub use errors::*;
pub use ids::*;
pub use mount::*;
pub use report::*;
