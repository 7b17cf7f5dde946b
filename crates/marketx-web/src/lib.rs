//! # MarketX Web
//!
//! Server-rendered Market Explorer dashboard.
//!
//! Each `GET /` carries the whole display state in its query string
//! (`symbol`, `charts=show|hide`, `tab`). The handler classifies the symbol,
//! fetches through the shared [`MarketData`](marketx_core::MarketData) cache,
//! builds a [`Dashboard`] and renders it with tera.
//!
//! | Route | Description |
//! |-------|-------------|
//! | `GET /` | Dashboard page |
//! | `GET /healthz` | Liveness check, returns `ok` |

pub mod config;
pub mod dashboard;
pub mod error;
pub mod render;
pub mod routes;
pub mod state;
pub mod view;

pub use config::Config;
pub use dashboard::{build_dashboard, Dashboard};
pub use error::WebError;
pub use render::Templates;
pub use routes::app_router;
pub use state::AppState;
pub use view::{Layout, Tab, ViewQuery, ViewState};
