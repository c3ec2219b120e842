//! Tests for readiness services
//!
//! Page-backed probes run against a fixture cart page; the HTTP quotation
//! probe runs against a wiremock server.
