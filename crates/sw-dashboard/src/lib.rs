// Stablewatch dashboard
// Request-scoped view building and the JSON service on top of it

pub mod config;
pub mod service;
pub mod view;

pub use config::ServiceConfig;
pub use service::{handle_connection, route, serve, HttpResponse};
pub use view::{render_dashboard, ChartPoint, CoinSummary, DashboardRequest, DashboardView, PegChart, ScenarioRow};
