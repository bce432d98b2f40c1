pub mod attendance_handlers;
pub mod attendance_models;
pub mod attendance_repository;
pub mod attendance_service;
