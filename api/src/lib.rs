// Module layout (Clean Architecture style)
// - bootstrap: configuration and service wiring
// - infrastructure: Postgres and in-memory adapters
// - presentation: HTTP handlers, error envelope and routing
// - application: access checks, validation, ports and use cases
// - domain: core models and the address default policy

pub mod application;
pub mod bootstrap;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
