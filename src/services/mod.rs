pub mod traits;
pub mod report_service;
pub mod auth_service;

#[cfg(target_arch = "wasm32")]
pub mod api_client;
#[cfg(target_arch = "wasm32")]
pub mod location_service;

pub use traits::*;
pub use report_service::*;
pub use auth_service::*;

#[cfg(target_arch = "wasm32")]
pub use api_client::*;
#[cfg(target_arch = "wasm32")]
pub use location_service::*;
