/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Outbound message fan-out to live connections.
pub mod poll_events;
/// Session gateway applying client requests to the poll.
pub mod poll_service;
/// Public service for read-only poll information.
pub mod public_service;
/// Background weekly reset check.
pub mod reset_scheduler;
/// WebSocket connection and message handling service.
pub mod websocket_service;
