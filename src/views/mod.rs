pub mod agenda_view;
pub mod client_view;
pub mod dashboard_view;
