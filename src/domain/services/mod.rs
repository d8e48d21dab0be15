pub mod analytics;
pub mod defaults;
pub mod dispatch;
pub mod export;
pub mod fallback;
pub mod guest_batch;
pub mod guest_import;
pub mod guest_service;
pub mod placeholders;
pub mod polls;
