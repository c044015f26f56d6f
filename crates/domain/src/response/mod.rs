//! Dispatch and response types

mod spec;

pub use spec::{
    CORS_STATUS_TEXT, DispatchRequest, HeaderMap, HttpResponse, NETWORK_STATUS_TEXT,
    ResponseDescriptor,
};
