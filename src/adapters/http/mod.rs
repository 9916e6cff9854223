//! HTTP surface.

pub mod query_http;

pub use query_http::{
    build_router, shutdown_signal, ApiError, ErrorResponse, QueryHttpConfig, QueryHttpServer, QueryRequest,
};
