mod provider;

pub use provider::ProviderLlm;
