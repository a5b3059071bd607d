//! Application ports

pub mod registry;

pub use registry::{
    PROVIDER_ADAPTERS, ProviderAdapterConfig, ProviderAdapterEntry, ProviderRegistry,
    list_provider_adapters, resolve_provider_adapter,
};
