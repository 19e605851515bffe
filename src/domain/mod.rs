mod money;
mod period;
mod seller;
mod transaction;
mod window;

pub use money::*;
pub use period::*;
pub use seller::*;
pub use transaction::*;
pub use window::*;
