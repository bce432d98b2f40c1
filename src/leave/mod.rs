pub mod leave_dto;
pub mod leave_handlers;
pub mod leave_models;
pub mod leave_repository;
pub mod leave_service;
