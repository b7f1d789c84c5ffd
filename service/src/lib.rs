pub mod clock;
pub mod discovery;
pub mod gallery;
pub mod moment_service_impl;
pub mod quota;
