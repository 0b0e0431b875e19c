mod alert;
mod api_key;
mod audit;
mod device;
mod license;
mod two_factor;
mod user;

pub use alert::*;
pub use api_key::*;
pub use audit::*;
pub use device::*;
pub use license::*;
pub use two_factor::*;
pub use user::*;
