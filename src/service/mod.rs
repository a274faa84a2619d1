pub mod agenda;
pub mod confirmation;
pub mod dashboard_service;
pub mod repository;
pub mod session_service;
