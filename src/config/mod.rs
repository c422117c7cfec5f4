pub mod types;
pub mod lookup;
pub mod normalizer;
pub mod resolved;

pub use types::*;
pub use lookup::*;
pub use normalizer::*;
pub use resolved::*;
