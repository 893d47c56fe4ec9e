mod account;
mod ids;
mod integrity;
mod money;
mod transaction;
mod user;

pub use account::*;
pub use ids::*;
pub use integrity::*;
pub use money::*;
pub use transaction::*;
pub use user::*;
